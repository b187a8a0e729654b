//! # workvisor
//!
//! **Workvisor** is a lifecycle supervisor for heterogeneous background
//! workers inside one process.
//!
//! It registers workers with priorities and dependencies, starts them in
//! dependency- and priority-aware order, stops them gracefully in reverse
//! order within bounded time, detects crashed task-based workers, and
//! restarts them within a configurable budget.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  WorkerSpec  │   │  WorkerSpec  │   │  RunningSpec │
//!     │ (worker #1)  │   │ (worker #2)  │   │ (live task)  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Orchestrator (facade)                                            │
//! │  - Registry (name → WorkerRecord, cycle-validated dependencies)   │
//! │  - LifecycleController (start_all / stop_all / restarts)          │
//! │  - HealthMonitor (task sweep + bounded auto-recovery)             │
//! │  - StatusReporter (JSON-ready snapshots)                          │
//! └──────┬────────────────────────────────────────────────────────────┘
//!        │ Publishes Events:
//!        │ WorkerStarting / WorkerStarted / StartFailed / WorkerCrashed
//!        │ RestartScheduled / WorkerRestarted / RestartExhausted / ...
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │             (capacity: OrchestratorConfig::bus_capacity)          │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │    listener task       │
//!                       │   (in Orchestrator)    │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                            (per-sub queues)
//!                         ┌─────────┼─────────┐
//!                         ▼         ▼         ▼
//!                     sub1.on   sub2.on   subN.on
//!                      _event()  _event()  _event()
//! ```
//!
//! ### Lifecycle
//! ```text
//! start_all():
//!   groups by priority, ascending
//!   ├─► dependency gate (required + unmet ─► abort startup)
//!   ├─► group members start concurrently, bounded by startup_timeout
//!   │     Ok ─► Running; Err/timeout ─► Failed (required ─► abort)
//!   └─► on success: spawn HealthMonitor (if auto_recovery)
//!
//! HealthMonitor (every poll_interval):
//!   task handle finished while record Running?
//!     ├─ exited Ok  ─► Stopped
//!     └─ crashed    ─► Failed ─► restart_count < max_restarts?
//!           ├─ yes ─► stop (tolerant) ─► settle ─► start (bounded)
//!           └─ no  ─► RestartExhausted, stays Failed
//!
//! stop_all():
//!   groups by priority, DESCENDING; per worker:
//!   stop() bounded by shutdown_timeout, then handle cancel─await─abort
//!     ├─ resolved (clean or forced) ─► Stopped
//!     └─ stop() returned Err        ─► Failed
//! ```
//!
//! ## Features
//! | Area               | Description                                                       | Key types / traits                        |
//! |--------------------|-------------------------------------------------------------------|-------------------------------------------|
//! | **Worker API**     | Implement start/stop/status, or build from closures and tasks.    | [`Worker`], [`WorkerFn`], [`TaskWorker`]  |
//! | **Registration**   | Priorities, categories, required flags, dependencies.             | [`WorkerSpec`], [`RunningSpec`]           |
//! | **Supervision**    | Ordered startup/shutdown, bounded restarts.                       | [`Orchestrator`]                          |
//! | **Observability**  | Lifecycle events, subscribers, status snapshots.                  | [`Subscribe`], [`Event`], [`StatusSnapshot`] |
//! | **Errors**         | Typed errors per failure surface.                                 | [`RegistryError`], [`StartError`], [`StopError`], [`WorkerError`] |
//! | **Configuration**  | Centralized timing bounds and budgets.                            | [`OrchestratorConfig`]                    |
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use workvisor::{
//!     LogWriter, Orchestrator, OrchestratorConfig, TaskWorker, WorkerFn,
//!     WorkerSpec, wait_for_shutdown_signal,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let orchestrator = Orchestrator::builder(OrchestratorConfig::default())
//!         .with_subscriber(Arc::new(LogWriter))
//!         .build();
//!
//!     let database = WorkerFn::arc(
//!         || async { /* open pool */ Ok(()) },
//!         || async { /* drain pool */ Ok(()) },
//!     );
//!     orchestrator
//!         .register(WorkerSpec::new("database", database).with_priority(10))
//!         .await?;
//!
//!     let sync_loop = TaskWorker::arc(|token: CancellationToken| async move {
//!         loop {
//!             tokio::select! {
//!                 _ = token.cancelled() => return Ok(()),
//!                 _ = tokio::time::sleep(std::time::Duration::from_secs(30)) => {
//!                     /* sync one batch */
//!                 }
//!             }
//!         }
//!     });
//!     let handle = sync_loop.handle();
//!     orchestrator
//!         .register(
//!             WorkerSpec::new("sync-loop", sync_loop)
//!                 .with_priority(20)
//!                 .with_category("sync")
//!                 .with_dependencies(["database"])
//!                 .with_handle(handle),
//!         )
//!         .await?;
//!
//!     if !orchestrator.start_all().await {
//!         orchestrator.stop_all().await;
//!         return Err("startup failed".into());
//!     }
//!
//!     wait_for_shutdown_signal().await?;
//!     orchestrator.shutdown().await;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod subscribers;
mod workers;

// ---- Public re-exports ----

pub use config::OrchestratorConfig;
pub use crate::core::{
    wait_for_shutdown_signal, LifecycleController, Orchestrator, OrchestratorBuilder, RecordRef,
    Registry, RunningSpec, StatusReporter, StatusSnapshot, WorkerRecord, WorkerSpec, WorkerState,
    WorkerStatus,
};
pub use error::{RegistryError, StartError, StopError, WorkerError};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
pub use workers::{HandleProbe, StatusMap, TaskHandle, TaskWorker, Worker, WorkerFn, WorkerRef};
