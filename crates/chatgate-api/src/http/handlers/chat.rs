//! Chat turn endpoint.
//!
//! POST /chat  `{sessionId, query}`
//!
//! - 200 `{answer, history}` when the worker answers
//! - 500 `{error, history}` when the worker fails (nothing is stored)
//! - 400 `{error}` for a malformed body
//! - 503 `{error}` when the history store is unreachable

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tracing::Instrument;
use uuid::Uuid;

use chatgate_core::chat::service::ChatOutcome;
use chatgate_types::chat::{ChatReply, ChatRequest};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /chat - Run one chat turn through the worker and store it.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, AppError> {
    let Json(request) = body.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let turn = request.validate().map_err(AppError::Validation)?;

    let span = tracing::info_span!(
        "chat_turn",
        request_id = %Uuid::now_v7(),
        session_id = %turn.session_id,
    );

    match state.chat_service.chat(&turn).instrument(span).await? {
        ChatOutcome::Answered(reply) => Ok(Json(reply)),
        ChatOutcome::WorkerFailed(failure) => Err(AppError::WorkerFailed(failure)),
    }
}
