//! # Worker registration record and state machine.
//!
//! One [`WorkerRecord`] per registered worker. Records are passive data: the
//! controller mutates them during `start_all`/`stop_all`, the health monitor
//! mutates them during recovery, and nothing else touches `state`.
//!
//! ## State machine
//! ```text
//! Registered ──► Starting ──► Running ──► Stopping ──► Stopped
//!                   │            │            │
//!                   ▼            ▼            ▼
//!                 Failed ◄── (crash/exit) Failed (stop() errored)
//!
//! register_running() commits directly as Running (the task already
//! executes); the restart procedure loops Failed/Running back through
//! Stopping → Starting.
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::core::spec::{RunningSpec, WorkerSpec};
use crate::workers::{TaskHandle, WorkerRef};

/// Shared, individually lockable record handle.
///
/// Records in one priority group are mutated concurrently, so each gets its
/// own lock rather than relying on the registry-wide map lock.
pub type RecordRef = Arc<RwLock<WorkerRecord>>;

/// Lifecycle state of a registered worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WorkerState {
    /// Registered, never started.
    Registered,
    /// `start()` in flight.
    Starting,
    /// Started successfully (or registered as already running).
    Running,
    /// Stop sequence in flight.
    Stopping,
    /// Stopped cleanly, or forcibly cancelled on shutdown timeout.
    Stopped,
    /// Start failed, crash detected, or `stop()` errored.
    Failed,
}

impl WorkerState {
    /// Stable state name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerState::Registered => "Registered",
            WorkerState::Starting => "Starting",
            WorkerState::Running => "Running",
            WorkerState::Stopping => "Stopping",
            WorkerState::Stopped => "Stopped",
            WorkerState::Failed => "Failed",
        }
    }

    /// All states, in lifecycle order. Used to pre-seed aggregate counts.
    pub const ALL: [WorkerState; 6] = [
        WorkerState::Registered,
        WorkerState::Starting,
        WorkerState::Running,
        WorkerState::Stopping,
        WorkerState::Stopped,
        WorkerState::Failed,
    ];
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration metadata and runtime state for one worker.
#[derive(Clone)]
pub struct WorkerRecord {
    /// Unique, process-wide worker name.
    pub name: String,
    /// The worker implementation; absent only for handle-only registrations.
    pub worker: Option<WorkerRef>,
    /// Lower starts earlier, stops later.
    pub priority: i32,
    /// Free-form label for grouping and observability; no behavioral effect.
    pub category: String,
    /// A required worker's startup failure aborts the whole startup.
    pub required: bool,
    /// Names that must be `Running` before this worker may start.
    pub depends_on: Vec<String>,
    /// Current lifecycle state.
    pub state: WorkerState,
    /// Set when the worker reaches `Running`.
    pub started_at: Option<DateTime<Utc>>,
    /// Set when the worker's stop sequence resolves.
    pub stopped_at: Option<DateTime<Utc>>,
    /// Last error message; cleared on successful (re)start.
    pub error: Option<String>,
    /// Auto-recovery attempts so far; never decremented.
    pub restart_count: u32,
    /// Cancellable task handle; present only for task-based workers.
    pub handle: Option<Arc<TaskHandle>>,
}

impl WorkerRecord {
    /// Builds a fresh record in state `Registered` from a registration spec.
    pub(crate) fn registered(spec: WorkerSpec) -> Self {
        Self {
            name: spec.name,
            worker: Some(spec.worker),
            priority: spec.priority,
            category: spec.category,
            required: spec.required,
            depends_on: spec.depends_on,
            state: WorkerState::Registered,
            started_at: None,
            stopped_at: None,
            error: None,
            restart_count: 0,
            handle: spec.handle,
        }
    }

    /// Builds a record for a component already executing: state `Running`,
    /// `started_at` set, no dependencies.
    pub(crate) fn running(spec: RunningSpec) -> Self {
        Self {
            name: spec.name,
            worker: spec.worker,
            priority: spec.priority,
            category: spec.category,
            required: spec.required,
            depends_on: Vec::new(),
            state: WorkerState::Running,
            started_at: Some(Utc::now()),
            stopped_at: None,
            error: None,
            restart_count: 0,
            handle: Some(spec.handle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::WorkerFn;

    #[test]
    fn state_serializes_as_bare_name() {
        let json = serde_json::to_string(&WorkerState::Running).unwrap();
        assert_eq!(json, "\"Running\"");
        assert_eq!(WorkerState::Running.as_str(), "Running");
    }

    #[test]
    fn registered_record_defaults() {
        let worker = WorkerFn::arc(
            || async { Ok(()) },
            || async { Ok(()) },
        );
        let rec = WorkerRecord::registered(WorkerSpec::new("sync", worker));
        assert_eq!(rec.state, WorkerState::Registered);
        assert_eq!(rec.priority, 50);
        assert_eq!(rec.category, "general");
        assert!(rec.required);
        assert!(rec.started_at.is_none());
        assert_eq!(rec.restart_count, 0);
    }
}
