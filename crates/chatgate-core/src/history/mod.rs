//! Per-session conversation history.
//!
//! - `HistoryStore`: RPITIT trait implemented by backends (Redis in infra)
//! - `BoxHistoryStore`: object-safe wrapper for runtime backend selection
//! - `InMemoryHistoryStore`: process-local backend with the same TTL rules

pub mod box_store;
pub mod memory;
pub mod store;
