//! Application error type mapping to HTTP status codes.
//!
//! | variant        | status | body                  |
//! |----------------|--------|-----------------------|
//! | `Validation`   | 400    | `{error}`             |
//! | `WorkerFailed` | 500    | `{error, history}`    |
//! | `Store`        | 503    | `{error}`             |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use chatgate_types::chat::ChatFailure;
use chatgate_types::error::StoreError;

#[derive(Debug)]
pub enum AppError {
    /// Malformed or incomplete request.
    Validation(String),
    /// The worker failed; carries its error text and the unmodified history.
    WorkerFailed(ChatFailure),
    /// The history backend failed.
    Store(StoreError),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            AppError::WorkerFailed(failure) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(failure)).into_response()
            }
            AppError::Store(e) => {
                tracing::error!(error = %e, "History store failure");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({ "error": e.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
