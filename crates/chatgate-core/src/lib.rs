//! Business logic and port traits for chatgate.
//!
//! Defines the `HistoryStore` and `Worker` traits that the infrastructure
//! layer implements, plus `ChatService`, which sequences a chat turn over
//! them. Depends only on `chatgate-types` -- never on `chatgate-infra`,
//! Redis, or process spawning.

pub mod chat;
pub mod history;
pub mod worker;
