//! # HealthMonitor: crash detection and bounded auto-recovery.
//!
//! A single background task that sweeps every record carrying a
//! [`TaskHandle`](crate::TaskHandle) on a fixed interval:
//!
//! ```text
//! every poll_interval:
//!   for each record with a handle, state == Running:
//!     probe the task outcome (non-consuming while it still runs)
//!       ├─ still running ─► next record
//!       ├─ exited Ok     ─► Stopped (deliberate completion, no recovery)
//!       └─ exited Err / panicked ─► Failed, then:
//!             restart_count < max_restarts ─► shared restart procedure
//!             budget exhausted             ─► stays Failed, exhaustion event
//! ```
//!
//! ## Rules
//! - Only `Running` records are swept; shutdown flips records to `Stopping`
//!   before cancelling them, so the monitor never fights `stop_all`.
//! - The budget gate is checked *before* the attempt, so a worker is given
//!   exactly `max_restarts` recovery attempts over its lifetime.
//! - Exhaustion is an event and a log line, never an error value; other
//!   workers keep running.

use std::sync::Arc;

use chrono::Utc;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::OrchestratorConfig;
use crate::core::controller::LifecycleController;
use crate::core::record::{RecordRef, WorkerState};
use crate::core::registry::Registry;
use crate::events::{Bus, Event, EventKind};

/// Periodic liveness sweep over task-backed records.
pub(crate) struct HealthMonitor {
    registry: Arc<Registry>,
    controller: Arc<LifecycleController>,
    bus: Bus,
    cfg: OrchestratorConfig,
}

impl HealthMonitor {
    pub(crate) fn new(
        registry: Arc<Registry>,
        controller: Arc<LifecycleController>,
        bus: Bus,
        cfg: OrchestratorConfig,
    ) -> Self {
        Self {
            registry,
            controller,
            bus,
            cfg,
        }
    }

    /// Runs the sweep loop until the token is cancelled.
    pub(crate) async fn run(self, token: CancellationToken) {
        let mut ticker = time::interval(self.cfg.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!(interval = ?self.cfg.poll_interval, "health monitor running");
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = ticker.tick() => self.sweep().await,
            }
        }
        debug!("health monitor stopped");
    }

    /// One pass over all task-backed records.
    async fn sweep(&self) {
        for rec in self.registry.task_records().await {
            let (name, state, handle) = {
                let r = rec.read().await;
                (r.name.clone(), r.state, r.handle.clone())
            };
            if state != WorkerState::Running {
                continue;
            }
            let Some(handle) = handle else { continue };
            let Some(outcome) = handle.try_take_outcome().await else {
                continue;
            };

            match outcome {
                Ok(()) => {
                    {
                        let mut r = rec.write().await;
                        r.state = WorkerState::Stopped;
                        r.stopped_at = Some(Utc::now());
                    }
                    info!(worker = %name, "task exited cleanly");
                    self.bus
                        .publish(Event::now(EventKind::WorkerExited).with_worker(name));
                }
                Err(e) => self.handle_crash(&rec, &name, e.to_string()).await,
            }
        }
    }

    async fn handle_crash(&self, rec: &RecordRef, name: &str, reason: String) {
        let restarts = {
            let mut r = rec.write().await;
            r.state = WorkerState::Failed;
            r.error = Some(reason.clone());
            r.restart_count
        };
        warn!(worker = %name, error = %reason, restarts, "worker crashed");
        self.bus.publish(
            Event::now(EventKind::WorkerCrashed)
                .with_worker(name.to_string())
                .with_reason(reason.clone())
                .with_restarts(restarts),
        );

        if restarts < self.controller.max_restarts() {
            self.controller.restart_record(rec, &reason).await;
        } else {
            warn!(worker = %name, restarts, "restart budget exhausted, worker stays failed");
            self.bus.publish(
                Event::now(EventKind::RestartExhausted)
                    .with_worker(name.to_string())
                    .with_restarts(restarts),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::spec::{RunningSpec, WorkerSpec};
    use crate::error::WorkerError;
    use crate::workers::{TaskHandle, TaskWorker, Worker};
    use std::time::Duration;

    fn fast_cfg() -> OrchestratorConfig {
        OrchestratorConfig {
            poll_interval: Duration::from_millis(100),
            settle_delay: Duration::from_millis(10),
            auto_recovery: false, // the controller must not spawn its own
            ..OrchestratorConfig::default()
        }
    }

    fn harness(cfg: OrchestratorConfig) -> (Arc<Registry>, Arc<LifecycleController>, HealthMonitor) {
        let bus = Bus::new(256);
        let registry = Registry::new(bus.clone());
        let controller = LifecycleController::new(Arc::clone(&registry), bus.clone(), cfg.clone());
        let monitor = HealthMonitor::new(
            Arc::clone(&registry),
            Arc::clone(&controller),
            bus,
            cfg,
        );
        (registry, controller, monitor)
    }

    async fn settle() {
        // Paused-clock runtimes advance instantly; this just yields until
        // spawned tasks have run to completion.
        time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn clean_exit_is_marked_stopped_without_recovery() {
        let (reg, ctrl, monitor) = harness(fast_cfg());
        let task = TaskWorker::arc(|_token| async { Ok(()) });
        let handle = task.handle();
        reg.register(WorkerSpec::new("one-shot", task).with_handle(handle))
            .await
            .unwrap();
        assert!(ctrl.start_all().await);

        settle().await;
        monitor.sweep().await;

        let rec = reg.get("one-shot").await.unwrap();
        let guard = rec.read().await;
        assert_eq!(guard.state, WorkerState::Stopped);
        assert!(guard.stopped_at.is_some());
        assert_eq!(guard.restart_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn crash_is_restarted_until_the_budget_runs_out() {
        let cfg = OrchestratorConfig {
            max_restarts: 3,
            ..fast_cfg()
        };
        let (reg, ctrl, monitor) = harness(cfg);
        let task = TaskWorker::arc(|_token| async { Err(WorkerError::fail("boom")) });
        let handle = task.handle();
        reg.register(WorkerSpec::new("crashy", task).with_handle(handle))
            .await
            .unwrap();
        assert!(ctrl.start_all().await);

        let mut events = monitor.bus.subscribe();

        // Three sweeps consume the budget; each restart respawns a task that
        // crashes again before the next sweep.
        for expected in 1..=3u32 {
            settle().await;
            monitor.sweep().await;
            let rec = reg.get("crashy").await.unwrap();
            let guard = rec.read().await;
            assert_eq!(guard.restart_count, expected);
            assert_eq!(guard.state, WorkerState::Running);
        }

        // Fourth crash: budget exhausted, record stays failed.
        settle().await;
        monitor.sweep().await;
        let rec = reg.get("crashy").await.unwrap();
        let guard = rec.read().await;
        assert_eq!(guard.state, WorkerState::Failed);
        assert_eq!(guard.restart_count, 3);
        assert!(guard.error.as_deref().unwrap().contains("boom"));
        drop(guard);

        let mut exhausted = 0;
        while let Ok(ev) = events.try_recv() {
            if ev.kind == EventKind::RestartExhausted {
                exhausted += 1;
                assert_eq!(ev.restarts, Some(3));
            }
        }
        assert_eq!(exhausted, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_task_is_treated_as_a_crash() {
        let cfg = OrchestratorConfig {
            max_restarts: 0,
            ..fast_cfg()
        };
        let (reg, ctrl, monitor) = harness(cfg);
        let task = TaskWorker::arc(|_token| async { panic!("sudden death") });
        let handle = task.handle();
        reg.register(
            WorkerSpec::new("panicky", task).with_handle(handle).optional(),
        )
        .await
        .unwrap();
        assert!(ctrl.start_all().await);

        settle().await;
        monitor.sweep().await;

        let rec = reg.get("panicky").await.unwrap();
        let guard = rec.read().await;
        assert_eq!(guard.state, WorkerState::Failed);
        assert!(guard.error.as_deref().unwrap().contains("panicked"));
    }

    #[tokio::test(start_paused = true)]
    async fn handle_only_record_fails_its_restart() {
        let (reg, _ctrl, monitor) = harness(fast_cfg());
        // Registered through the running path with no worker attached:
        // nothing can respawn the task once it dies.
        let handle = Arc::new(TaskHandle::empty());
        let failing = tokio::spawn(async { Err(WorkerError::fail("died")) });
        handle.install(failing, CancellationToken::new()).await;
        reg.register_running(RunningSpec::new("external", Arc::clone(&handle)))
            .await;

        settle().await;
        monitor.sweep().await;
        let rec = reg.get("external").await.unwrap();
        let guard = rec.read().await;
        assert_eq!(guard.state, WorkerState::Failed);
        assert!(guard
            .error
            .as_deref()
            .unwrap()
            .contains("no start routine"));
        assert_eq!(guard.restart_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn running_registration_with_worker_is_restartable() {
        let (reg, _ctrl, monitor) = harness(fast_cfg());
        let task = TaskWorker::arc(|_token| async { Err(WorkerError::fail("died")) });
        let handle = task.handle();
        task.start().await.unwrap();
        reg.register_running(
            RunningSpec::new("live-feed", handle).with_worker(Arc::clone(&task) as _),
        )
        .await;

        settle().await;
        monitor.sweep().await;

        // The attached worker let the restart procedure respawn the task.
        let rec = reg.get("live-feed").await.unwrap();
        let guard = rec.read().await;
        assert_eq!(guard.state, WorkerState::Running);
        assert_eq!(guard.restart_count, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn non_running_records_are_ignored() {
        let (reg, ctrl, monitor) = harness(fast_cfg());
        let task = TaskWorker::arc(|_token| async { Err(WorkerError::fail("boom")) });
        let handle = task.handle();
        reg.register(WorkerSpec::new("halted", task).with_handle(handle))
            .await
            .unwrap();
        assert!(ctrl.start_all().await);
        ctrl.stop_all().await;

        let before = reg.state_of("halted").await.unwrap();
        monitor.sweep().await;
        assert_eq!(reg.state_of("halted").await.unwrap(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn run_loop_stops_on_cancellation() {
        let (_reg, _ctrl, monitor) = harness(fast_cfg());
        let token = CancellationToken::new();
        let join = tokio::spawn(monitor.run(token.clone()));
        settle().await;
        token.cancel();
        time::timeout(Duration::from_secs(1), join)
            .await
            .expect("monitor did not stop")
            .unwrap();
    }
}
