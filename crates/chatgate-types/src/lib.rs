//! Shared domain types for chatgate.
//!
//! Conversation messages, the HTTP wire shapes of a chat turn, gateway
//! configuration, and the error enums shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod message;
