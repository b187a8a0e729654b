//! # StatusReporter: JSON-ready snapshots of the registry.
//!
//! Read-only view over the records. A snapshot is a point-in-time copy, safe
//! to serialize and ship to a health endpoint; nothing here mutates state.
//!
//! ## Rules
//! - `worker.status()` is merged best-effort: a panicking implementation
//!   yields an empty detail map, never a poisoned snapshot.
//! - `by_state` always carries all six states, so dashboards see zeros
//!   instead of missing keys.
//! - Health is strict: every `required` record must be `Running`.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::core::record::WorkerState;
use crate::core::registry::Registry;
use crate::workers::{StatusMap, WorkerRef};

/// Point-in-time status of one worker.
#[derive(Debug, Clone, Serialize)]
pub struct WorkerStatus {
    pub name: String,
    pub category: String,
    pub priority: i32,
    pub state: WorkerState,
    pub required: bool,
    pub depends_on: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub restart_count: u32,
    /// Live detail from `Worker::status()`, merged best-effort.
    pub detail: StatusMap,
}

/// Point-in-time status of the whole registry.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub generated_at: DateTime<Utc>,
    pub total_workers: usize,
    /// Count per state; all six states are always present.
    pub by_state: BTreeMap<&'static str, usize>,
    pub healthy: bool,
    /// Sorted by (priority, name) for stable output.
    pub workers: Vec<WorkerStatus>,
}

/// Read-only status surface over the registry.
pub struct StatusReporter {
    registry: Arc<Registry>,
}

impl StatusReporter {
    pub(crate) fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Builds a full snapshot of every registered worker.
    pub async fn get_status(&self) -> StatusSnapshot {
        let mut by_state: BTreeMap<&'static str, usize> = WorkerState::ALL
            .iter()
            .map(|s| (s.as_str(), 0))
            .collect();
        let mut workers: Vec<WorkerStatus> = Vec::new();
        let mut healthy = true;

        for rec in self.registry.all().await {
            let r = rec.read().await;
            *by_state.entry(r.state.as_str()).or_insert(0) += 1;
            if r.required && r.state != WorkerState::Running {
                healthy = false;
            }

            let detail = match &r.worker {
                Some(w) => probe_detail(&r.name, w),
                None => StatusMap::new(),
            };
            workers.push(WorkerStatus {
                name: r.name.clone(),
                category: r.category.clone(),
                priority: r.priority,
                state: r.state,
                required: r.required,
                depends_on: r.depends_on.clone(),
                started_at: r.started_at,
                stopped_at: r.stopped_at,
                error: r.error.clone(),
                restart_count: r.restart_count,
                detail,
            });
        }

        workers.sort_by(|a, b| (a.priority, a.name.as_str()).cmp(&(b.priority, b.name.as_str())));
        StatusSnapshot {
            generated_at: Utc::now(),
            total_workers: workers.len(),
            by_state,
            healthy,
            workers,
        }
    }

    /// True iff every `required` record is `Running`.
    pub async fn is_healthy(&self) -> bool {
        for rec in self.registry.all().await {
            let r = rec.read().await;
            if r.required && r.state != WorkerState::Running {
                return false;
            }
        }
        true
    }

    /// Returns the underlying worker implementation, if registered.
    pub async fn get_worker(&self, name: &str) -> Option<WorkerRef> {
        self.registry.worker(name).await
    }
}

/// Calls `Worker::status()` with panic containment.
fn probe_detail(name: &str, worker: &WorkerRef) -> StatusMap {
    match catch_unwind(AssertUnwindSafe(|| worker.status())) {
        Ok(map) => map,
        Err(_) => {
            warn!(worker = %name, "status() panicked, reporting empty detail");
            StatusMap::new()
        }
    }
}
