//! Session history endpoints.
//!
//! - GET    /history/{sessionId} - stored messages, `[]` if none
//! - DELETE /history/{sessionId} - `{success: true}`, whether or not it existed

use axum::extract::{Path, State};
use axum::Json;

use chatgate_types::chat::DeleteAck;
use chatgate_types::message::Message;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /history/{sessionId} - Full history of a session.
pub async fn get_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<Message>>, AppError> {
    let history = state.chat_service.history(&session_id).await?;
    Ok(Json(history))
}

/// DELETE /history/{sessionId} - Delete a session.
pub async fn delete_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<DeleteAck>, AppError> {
    state.chat_service.clear_history(&session_id).await?;
    Ok(Json(DeleteAck { success: true }))
}
