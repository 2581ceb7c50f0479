//! Worker trait definition.

use chatgate_types::error::WorkerError;

/// An external text generator that turns one query into one answer.
///
/// A call either resolves with the answer (already trimmed) or with a
/// [`WorkerError`]. Implementations must not retry.
///
/// Implementations live in chatgate-infra (e.g., `SubprocessWorker`).
pub trait Worker: Send + Sync {
    /// Human-readable worker name for logs.
    fn name(&self) -> &str;

    /// Run the worker for a single query.
    fn invoke(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<String, WorkerError>> + Send;
}
