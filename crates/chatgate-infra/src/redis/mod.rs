//! Redis-backed session history.
//!
//! Each session is one Redis list keyed by the session id; every element is a
//! JSON-encoded `Message`.

pub mod connection;
pub mod history;

pub use connection::connect;
pub use history::RedisHistoryStore;
