//! Chat turn orchestration.

pub mod service;
pub mod session_lock;
