//! Logging and trace export setup shared by chatgate binaries.

pub mod tracing_setup;
