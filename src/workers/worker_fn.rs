//! # Function-backed worker (`WorkerFn`).
//!
//! [`WorkerFn`] wraps a pair of closures, each producing a fresh future per
//! call, into a [`Worker`]. No shared mutable state is implied; if the start
//! and stop sides need common state, capture an `Arc<...>` explicitly in
//! both closures.
//!
//! ## Example
//! ```
//! use workvisor::{WorkerError, WorkerFn, WorkerRef};
//!
//! let w: WorkerRef = WorkerFn::arc(
//!     || async { Ok::<_, WorkerError>(()) },
//!     || async { Ok::<_, WorkerError>(()) },
//! );
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::WorkerError;
use crate::workers::worker::Worker;

/// Closure-backed worker implementation.
///
/// Each lifecycle call invokes the corresponding closure to create a new
/// future, so restarts never observe state left over from a prior attempt.
pub struct WorkerFn<S, T> {
    on_start: S,
    on_stop: T,
}

impl<S, T, SF, TF> WorkerFn<S, T>
where
    S: Fn() -> SF + Send + Sync + 'static,
    SF: Future<Output = Result<(), WorkerError>> + Send + 'static,
    T: Fn() -> TF + Send + Sync + 'static,
    TF: Future<Output = Result<(), WorkerError>> + Send + 'static,
{
    /// Creates a new function-backed worker.
    pub fn new(on_start: S, on_stop: T) -> Self {
        Self { on_start, on_stop }
    }

    /// Creates the worker and returns it as a shared `Arc`.
    pub fn arc(on_start: S, on_stop: T) -> Arc<Self> {
        Arc::new(Self::new(on_start, on_stop))
    }
}

#[async_trait]
impl<S, T, SF, TF> Worker for WorkerFn<S, T>
where
    S: Fn() -> SF + Send + Sync + 'static,
    SF: Future<Output = Result<(), WorkerError>> + Send + 'static,
    T: Fn() -> TF + Send + Sync + 'static,
    TF: Future<Output = Result<(), WorkerError>> + Send + 'static,
{
    async fn start(&self) -> Result<(), WorkerError> {
        (self.on_start)().await
    }

    async fn stop(&self) -> Result<(), WorkerError> {
        (self.on_stop)().await
    }
}
