//! Chat service sequencing a turn: worker -> persistence -> response.
//!
//! ChatService is the only place that ties the stateless request to the
//! stateful session log. A turn either appends exactly two messages (user,
//! then assistant) or, when the worker fails, appends nothing.

use tracing::{debug, error, info};

use chatgate_types::chat::{ChatFailure, ChatReply, ChatTurn};
use chatgate_types::error::StoreError;
use chatgate_types::message::Message;

use crate::chat::session_lock::SessionLocks;
use crate::history::store::HistoryStore;
use crate::worker::invoker::Worker;

/// Result of a chat turn that reached the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// Worker answered; both messages were stored.
    Answered(ChatReply),
    /// Worker failed; history is returned unmodified.
    WorkerFailed(ChatFailure),
}

/// Orchestrates chat turns and history access.
///
/// Generic over `HistoryStore` and `Worker` so that chatgate-core never
/// depends on chatgate-infra.
pub struct ChatService<S: HistoryStore, W: Worker> {
    store: S,
    worker: W,
    session_locks: Option<SessionLocks>,
}

impl<S: HistoryStore, W: Worker> ChatService<S, W> {
    pub fn new(store: S, worker: W) -> Self {
        Self {
            store,
            worker,
            session_locks: None,
        }
    }

    /// Serialize turns that target the same session id.
    ///
    /// Off by default: concurrent turns on one session may interleave.
    pub fn with_session_serialization(mut self, enabled: bool) -> Self {
        self.session_locks = enabled.then(SessionLocks::new);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn worker(&self) -> &W {
        &self.worker
    }

    /// Run one chat turn.
    ///
    /// Worker failures are a normal outcome ([`ChatOutcome::WorkerFailed`]);
    /// only backend failures are returned as `Err`.
    pub async fn chat(&self, turn: &ChatTurn) -> Result<ChatOutcome, StoreError> {
        let _guard = match &self.session_locks {
            Some(locks) => Some(locks.acquire(&turn.session_id).await),
            None => None,
        };

        let answer = match self.worker.invoke(&turn.query).await {
            Ok(answer) => answer,
            Err(err) => {
                error!(
                    session_id = %turn.session_id,
                    worker = self.worker.name(),
                    error = %err,
                    "Worker invocation failed"
                );
                let history = self.store.get_history(&turn.session_id).await?;
                return Ok(ChatOutcome::WorkerFailed(ChatFailure {
                    error: err.to_string(),
                    history,
                }));
            }
        };

        self.store
            .append_message(&turn.session_id, &Message::user(turn.query.as_str()))
            .await?;
        self.store
            .append_message(&turn.session_id, &Message::assistant(answer.as_str()))
            .await?;

        let history = self.store.get_history(&turn.session_id).await?;
        info!(
            session_id = %turn.session_id,
            history_len = history.len(),
            "Chat turn stored"
        );

        Ok(ChatOutcome::Answered(ChatReply { answer, history }))
    }

    /// Full history of a session; empty if it does not exist.
    pub async fn history(&self, session_id: &str) -> Result<Vec<Message>, StoreError> {
        self.store.get_history(session_id).await
    }

    /// Delete a session. Succeeds whether or not it existed.
    pub async fn clear_history(&self, session_id: &str) -> Result<(), StoreError> {
        self.store.delete_session(session_id).await?;
        debug!(session_id = %session_id, store = self.store.name(), "Session deleted");
        Ok(())
    }
}
