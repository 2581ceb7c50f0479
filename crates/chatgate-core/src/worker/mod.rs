//! External text-generation worker abstractions.

pub mod box_worker;
pub mod invoker;
