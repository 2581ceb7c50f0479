//! HTTP layer for chatgate.
//!
//! Axum routes for chat turns and session history, with permissive CORS and
//! request tracing. Response bodies are plain JSON in the shapes the chat
//! frontend expects (no envelope).

pub mod error;
pub mod handlers;
pub mod router;
