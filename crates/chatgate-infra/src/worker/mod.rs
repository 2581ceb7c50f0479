//! External worker implementations.

pub mod subprocess;

pub use subprocess::SubprocessWorker;
