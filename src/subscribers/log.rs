//! # Logging subscriber.
//!
//! [`LogWriter`] turns lifecycle events into `tracing` records at a level
//! matching their severity. Useful as the default observability wiring;
//! implement a custom [`Subscribe`](crate::Subscribe) for metrics or audit
//! sinks.

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Subscriber that logs every lifecycle event via `tracing`.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let worker = e.worker.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::WorkerRegistered => {
                info!(seq = e.seq, worker, "registered");
            }
            EventKind::WorkerStarting => {
                info!(seq = e.seq, worker, "starting");
            }
            EventKind::WorkerStarted => {
                info!(seq = e.seq, worker, "started");
            }
            EventKind::StartFailed => {
                error!(seq = e.seq, worker, reason, "start failed");
            }
            EventKind::DependencyUnmet => {
                warn!(seq = e.seq, worker, reason, "dependency unmet");
            }
            EventKind::StartupAborted => {
                error!(seq = e.seq, worker, "startup aborted");
            }
            EventKind::StartupComplete => {
                info!(seq = e.seq, "startup complete");
            }
            EventKind::ShutdownRequested => {
                info!(seq = e.seq, "shutdown requested");
            }
            EventKind::WorkerStopping => {
                info!(seq = e.seq, worker, "stopping");
            }
            EventKind::WorkerStopped => {
                info!(seq = e.seq, worker, "stopped");
            }
            EventKind::StopForced => {
                warn!(seq = e.seq, worker, "stop forced after timeout");
            }
            EventKind::StopFailed => {
                error!(seq = e.seq, worker, reason, "stop failed");
            }
            EventKind::ShutdownComplete => {
                info!(seq = e.seq, "shutdown complete");
            }
            EventKind::WorkerExited => {
                info!(seq = e.seq, worker, "task exited");
            }
            EventKind::WorkerCrashed => {
                error!(seq = e.seq, worker, reason, restarts = e.restarts, "crashed");
            }
            EventKind::RestartScheduled => {
                warn!(seq = e.seq, worker, reason, restarts = e.restarts, "restart scheduled");
            }
            EventKind::WorkerRestarted => {
                info!(seq = e.seq, worker, restarts = e.restarts, "restarted");
            }
            EventKind::RestartFailed => {
                error!(seq = e.seq, worker, reason, restarts = e.restarts, "restart failed");
            }
            EventKind::RestartExhausted => {
                error!(seq = e.seq, worker, restarts = e.restarts, "restart budget exhausted");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
