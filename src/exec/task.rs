// src/exec/task.rs

//! The stored operation behind every graph node.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::anyhow;

/// Future produced by a single invocation of a [`Task`].
pub type TaskFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

type TaskFn = dyn Fn() -> TaskFuture + Send + Sync;

/// A zero-argument, fallible operation owned by a graph node.
///
/// Cloning a `Task` only clones the handle; every clone invokes the same
/// closure. The executor invokes it at most once per run.
#[derive(Clone)]
pub struct Task {
    op: Arc<TaskFn>,
}

impl Task {
    /// Wrap a closure that returns a future.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        Self {
            op: Arc::new(move || Box::pin(f()) as TaskFuture),
        }
    }

    /// Wrap a synchronous closure.
    ///
    /// Each invocation runs on tokio's blocking pool, so an operation that
    /// sleeps or does blocking I/O does not hold up its siblings.
    pub fn blocking<F>(f: F) -> Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Self::from_async(move || {
            let f = Arc::clone(&f);
            async move {
                tokio::task::spawn_blocking(move || (*f)())
                    .await
                    .map_err(|e| anyhow!("blocking operation did not complete: {e}"))?
            }
        })
    }

    /// Start one invocation of the operation.
    pub fn invoke(&self) -> TaskFuture {
        (self.op)()
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}
