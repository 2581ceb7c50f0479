//! Infrastructure layer for chatgate.
//!
//! Implementations of the traits defined in `chatgate-core`: the Redis-backed
//! history store and the subprocess worker, plus the configuration loader.

pub mod config;
pub mod redis;
pub mod worker;
