//! # Worker capability.
//!
//! [`Worker`] is the contract every registered background component
//! satisfies: an awaitable `start`, an awaitable `stop` tolerant of repeat
//! calls, and an infallible key/value status view. The orchestrator treats
//! every worker as opaque through this trait; the shared handle type is
//! [`WorkerRef`], an `Arc<dyn Worker>`.
//!
//! Legacy components with synchronous stop paths are wrapped behind this
//! trait so callers never branch on calling convention.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::WorkerError;

/// Key/value status map reported by a worker.
pub type StatusMap = serde_json::Map<String, serde_json::Value>;

/// Shared handle to a worker implementation.
pub type WorkerRef = Arc<dyn Worker>;

/// A long-running background component with an explicit lifecycle.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use workvisor::{StatusMap, Worker, WorkerError};
///
/// struct CacheJanitor;
///
/// #[async_trait]
/// impl Worker for CacheJanitor {
///     async fn start(&self) -> Result<(), WorkerError> {
///         // open handles, spawn internal loops...
///         Ok(())
///     }
///
///     async fn stop(&self) -> Result<(), WorkerError> {
///         // must be safe even if start() never ran
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Worker: Send + Sync + 'static {
    /// Brings the worker up. Called at most once per lifecycle unless the
    /// worker is restarted; idempotency is not required.
    async fn start(&self) -> Result<(), WorkerError>;

    /// Brings the worker down. Must be safe to call repeatedly and even if
    /// `start()` was never called or failed.
    async fn stop(&self) -> Result<(), WorkerError>;

    /// Live status for monitoring. Must never fail; called on demand,
    /// potentially frequently. Default: empty map.
    fn status(&self) -> StatusMap {
        StatusMap::new()
    }
}
