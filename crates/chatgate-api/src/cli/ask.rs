//! One-shot chat turn from the command line.
//!
//! Goes through the same `ChatService` as `POST /chat`, so a successful turn
//! is stored in the session exactly as an HTTP turn would be.

use anyhow::{anyhow, bail, Result};
use console::style;

use chatgate_core::chat::service::ChatOutcome;
use chatgate_types::chat::ChatRequest;

use crate::state::AppState;

pub async fn ask(state: &AppState, session_id: String, query: String, json: bool) -> Result<()> {
    let turn = ChatRequest {
        session_id: Some(session_id),
        query: Some(query),
    }
    .validate()
    .map_err(|e| anyhow!(e))?;

    match state.chat_service.chat(&turn).await? {
        ChatOutcome::Answered(reply) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&reply)?);
            } else {
                println!();
                println!("{}", reply.answer);
                println!();
                println!(
                    "  {}",
                    style(format!(
                        "session '{}' now holds {} messages",
                        turn.session_id,
                        reply.history.len()
                    ))
                    .dim()
                );
            }
            Ok(())
        }
        ChatOutcome::WorkerFailed(failure) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&failure)?);
            }
            bail!("worker failed: {}", failure.error.trim())
        }
    }
}
