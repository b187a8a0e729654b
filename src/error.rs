//! Error types used across the orchestrator.
//!
//! Four enums, one per failure surface:
//!
//! - [`RegistryError`] — registration rejected (cycle in the dependency graph).
//! - [`StartError`] — why a worker failed to reach `Running`.
//! - [`StopError`] — why a worker's stop sequence misbehaved.
//! - [`WorkerError`] — errors raised by worker implementations themselves.
//!
//! Timeouts and failures are distinct variants, not one generic raised error:
//! a start timeout is equivalent to a start failure, while a stop timeout is
//! resolved by forced cancellation and is never surfaced as a failed state.

use std::time::Duration;
use thiserror::Error;

/// Errors produced while registering a worker.
///
/// Registration is all-or-nothing: when it fails, the registry is left
/// exactly as it was before the call.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The proposed dependency edge would close a cycle.
    ///
    /// `path` lists the full cycle, first node repeated at the end
    /// (e.g. `["a", "b", "a"]`).
    #[error("dependency cycle detected: {}", path.join(" -> "))]
    Cycle {
        /// Names along the cycle, first node repeated last.
        path: Vec<String>,
    },
}

impl RegistryError {
    /// Short stable label (snake_case) for logs and metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RegistryError::Cycle { .. } => "registry_cycle",
        }
    }
}

/// Why a worker failed to start.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum StartError {
    /// `start()` did not complete within the configured startup timeout.
    #[error("start timed out after {timeout:?}")]
    Timeout {
        /// The timeout that was exceeded.
        timeout: Duration,
    },

    /// `start()` returned an error.
    #[error("start failed: {reason}")]
    Failed {
        /// The underlying error message.
        reason: String,
    },

    /// One or more dependencies were not `Running` when the worker's
    /// priority group was processed.
    #[error("unmet dependencies: {missing:?}")]
    UnmetDependency {
        /// Dependency names that were not `Running`.
        missing: Vec<String>,
    },
}

impl StartError {
    /// Short stable label (snake_case) for logs and metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StartError::Timeout { .. } => "start_timeout",
            StartError::Failed { .. } => "start_failed",
            StartError::UnmetDependency { .. } => "unmet_dependency",
        }
    }
}

/// Why a worker's stop sequence misbehaved.
///
/// `Timeout` exists for internal bookkeeping only: a timed-out stop is
/// resolved by forcibly cancelling the underlying task and the record still
/// ends in `Stopped`. Only [`StopError::Failed`] moves a record to `Failed`.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum StopError {
    /// `stop()` did not complete within the shutdown timeout.
    #[error("stop timed out after {timeout:?}")]
    Timeout {
        /// The timeout that was exceeded.
        timeout: Duration,
    },

    /// `stop()` returned an error.
    #[error("stop failed: {reason}")]
    Failed {
        /// The underlying error message.
        reason: String,
    },
}

/// Errors raised by worker implementations.
///
/// This is the error type of the [`Worker`](crate::Worker) capability and of
/// task futures driven through a [`TaskHandle`](crate::TaskHandle).
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum WorkerError {
    /// Execution failed with a message.
    #[error("{reason}")]
    Fail {
        /// The underlying error message.
        reason: String,
    },

    /// Execution was cancelled (cooperatively or by forced abort).
    #[error("worker cancelled")]
    Canceled,
}

impl WorkerError {
    /// Convenience constructor for [`WorkerError::Fail`].
    pub fn fail(reason: impl Into<String>) -> Self {
        WorkerError::Fail {
            reason: reason.into(),
        }
    }

    /// Short stable label (snake_case) for logs and metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::Fail { .. } => "worker_failed",
            WorkerError::Canceled => "worker_canceled",
        }
    }
}
