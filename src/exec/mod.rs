// src/exec/mod.rs

//! Execution layer.
//!
//! - [`task`] defines [`Task`], the operation value stored in each node.
//! - [`executor`] owns the concurrent run loop: it dispatches every ready
//!   node as its own Tokio task and counts down in-degrees as they finish.
//! - [`command`] builds tasks that run shell commands via
//!   `tokio::process::Command`.

pub mod command;
pub mod executor;
pub mod task;

pub use command::shell_task;
pub use executor::Executor;
pub use task::{Task, TaskFuture};
