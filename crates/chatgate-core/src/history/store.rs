//! HistoryStore trait definition.

use chatgate_types::error::StoreError;
use chatgate_types::message::Message;

/// Append-only, expiring message log keyed by session id.
///
/// Implementations must preserve append order per session and reset the
/// session's expiry to the configured TTL on every append. Reads and deletes
/// never touch the expiry.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in chatgate-infra (e.g., `RedisHistoryStore`).
pub trait HistoryStore: Send + Sync {
    /// Short backend name for logs (e.g., "redis", "memory").
    fn name(&self) -> &str;

    /// Append a message to the tail of the session and refresh its TTL.
    fn append_message(
        &self,
        session_id: &str,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Read the whole history in stored order. Empty if the session does not exist.
    fn get_history(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, StoreError>> + Send;

    /// Remove the session entirely. Deleting a missing session succeeds.
    fn delete_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}
