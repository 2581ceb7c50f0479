use std::time::Duration;

use thiserror::Error;

/// Errors from the session history backend.
///
/// An absent session is never an error; reads return an empty history and
/// deletes succeed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("history backend unavailable: {0}")]
    Connection(String),

    #[error("history backend command failed: {0}")]
    Command(String),

    #[error("failed to encode message: {0}")]
    Encoding(String),
}

/// Errors from invoking the external worker process.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The worker exited non-zero. Displays as the captured stderr text.
    #[error("{stderr}")]
    Failed { code: Option<i32>, stderr: String },

    #[error("failed to start worker '{program}': {reason}")]
    Spawn { program: String, reason: String },

    #[error("worker timed out after {timeout:?}")]
    TimedOut { timeout: Duration },

    #[error("worker i/o error: {0}")]
    Io(String),
}

/// Errors while loading gateway configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config file '{path}': {reason}")]
    Parse { path: String, reason: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
