//! # Lifecycle events emitted by the orchestrator.
//!
//! [`EventKind`] classifies what happened; [`Event`] carries the metadata
//! (worker name, reason, restart count, timestamp). Every event gets a
//! globally unique, monotonically increasing sequence number so subscribers
//! can restore exact order even when delivery interleaves.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of orchestrator events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Registration ===
    /// A worker record was created or replaced.
    ///
    /// Sets: `worker`; `reason` = "overwrite" when an existing name was
    /// replaced.
    WorkerRegistered,

    // === Startup ===
    /// A worker's `start()` is about to be invoked.
    ///
    /// Sets: `worker`.
    WorkerStarting,

    /// A worker reached `Running`.
    ///
    /// Sets: `worker`.
    WorkerStarted,

    /// A worker's start failed or timed out.
    ///
    /// Sets: `worker`, `reason`.
    StartFailed,

    /// A worker was held back because a dependency was not `Running`.
    ///
    /// Sets: `worker`, `reason` (missing dependency names).
    DependencyUnmet,

    /// A required worker failed; remaining priority groups were skipped.
    ///
    /// Sets: `worker` (the failing worker).
    StartupAborted,

    /// `start_all()` finished without an aborting failure.
    StartupComplete,

    // === Shutdown ===
    /// `stop_all()` began; the health monitor is being stopped first.
    ShutdownRequested,

    /// A worker's stop sequence is about to begin.
    ///
    /// Sets: `worker`.
    WorkerStopping,

    /// A worker reached `Stopped`.
    ///
    /// Sets: `worker`.
    WorkerStopped,

    /// A worker's stop sequence exceeded the shutdown timeout and its task
    /// was forcibly cancelled. The worker still ends `Stopped`.
    ///
    /// Sets: `worker`.
    StopForced,

    /// `stop()` itself returned an error; the worker ends `Failed`.
    ///
    /// Sets: `worker`, `reason`.
    StopFailed,

    /// `stop_all()` finished; every group has resolved.
    ShutdownComplete,

    // === Health monitoring ===
    /// A task-based worker's handle completed cleanly while the record was
    /// still `Running`. The record moves to `Stopped`; no restart.
    ///
    /// Sets: `worker`.
    WorkerExited,

    /// A task-based worker's handle completed with an error while `Running`.
    ///
    /// Sets: `worker`, `reason`.
    WorkerCrashed,

    /// A restart attempt is beginning (monitor-driven or manual).
    ///
    /// Sets: `worker`, `reason`, `restarts` (count before this attempt).
    RestartScheduled,

    /// A restart attempt succeeded; the worker is `Running` again.
    ///
    /// Sets: `worker`, `restarts` (count including this attempt).
    WorkerRestarted,

    /// A restart attempt failed; the worker stays `Failed`.
    ///
    /// Sets: `worker`, `reason`, `restarts` (count including this attempt).
    RestartFailed,

    /// The worker reached `max_restarts`; recovery will not be attempted
    /// again.
    ///
    /// Sets: `worker`, `restarts`.
    RestartExhausted,
}

/// Orchestrator event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - remaining fields are set depending on [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the worker, if applicable.
    pub worker: Option<Arc<str>>,
    /// Human-readable reason (errors, missing dependencies, etc.).
    pub reason: Option<Arc<str>>,
    /// Restart count, where applicable.
    pub restarts: Option<u32>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            worker: None,
            reason: None,
            restarts: None,
        }
    }

    /// Attaches a worker name.
    #[inline]
    pub fn with_worker(mut self, worker: impl Into<Arc<str>>) -> Self {
        self.worker = Some(worker.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a restart count.
    #[inline]
    pub fn with_restarts(mut self, restarts: u32) -> Self {
        self.restarts = Some(restarts);
        self
    }
}
