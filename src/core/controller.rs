//! # LifecycleController: priority-grouped startup, shutdown, restarts.
//!
//! Drives every state transition a record goes through:
//!
//! ```text
//! start_all():
//!   groups by priority, ascending
//!   for each group:
//!     ├─► skip records already Running (registered via the running path)
//!     ├─► dependency check (required + unmet ─► abort startup)
//!     ├─► start group members concurrently (JoinSet)
//!     │     each: Starting ─► start() within startup_timeout
//!     │             ├─ Ok      ─► Running, started_at, error cleared
//!     │             └─ Err/t-o ─► Failed, error recorded
//!     └─► any required member Failed ─► abort after this group
//!   on success: started = true, spawn HealthMonitor (if auto_recovery)
//!
//! stop_all():
//!   shutting_down swap-guard (idempotent)
//!   cancel + join health monitor (bounded)
//!   groups by priority, DESCENDING; members in Running|Starting:
//!     each: Stopping ─► stop() within shutdown_timeout
//!           handle.shutdown(shutdown_timeout)  (cancel ─► await ─► abort)
//!           ├─ resolved (clean or forced) ─► Stopped
//!           └─ stop() returned Err        ─► Failed
//!   next group only after the current one fully resolves
//! ```
//!
//! ## Rules
//! - Within a group, no ordering; across groups, strict ordering both ways.
//! - A start timeout is a failure; a stop timeout is not (forced abort,
//!   record still ends `Stopped`).
//! - The restart procedure is shared between the health monitor and the
//!   manual `restart_worker` entry point; it is the only code that touches
//!   `restart_count`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::config::OrchestratorConfig;
use crate::core::monitor::HealthMonitor;
use crate::core::record::{RecordRef, WorkerState};
use crate::core::registry::Registry;
use crate::error::{StartError, StopError};
use crate::events::{Bus, Event, EventKind};

/// Running health-monitor task, owned by the controller.
struct MonitorHandle {
    token: CancellationToken,
    join: JoinHandle<()>,
}

/// Drives startup, shutdown, and restarts over the registry.
pub struct LifecycleController {
    registry: Arc<Registry>,
    bus: Bus,
    cfg: OrchestratorConfig,
    started: AtomicBool,
    shutting_down: AtomicBool,
    monitor: tokio::sync::Mutex<Option<MonitorHandle>>,
}

impl LifecycleController {
    /// Creates a controller over the given registry.
    pub fn new(registry: Arc<Registry>, bus: Bus, cfg: OrchestratorConfig) -> Arc<Self> {
        Arc::new(Self {
            registry,
            bus,
            cfg,
            started: AtomicBool::new(false),
            shutting_down: AtomicBool::new(false),
            monitor: tokio::sync::Mutex::new(None),
        })
    }

    /// Starts every registered worker in ascending priority order.
    ///
    /// Returns true iff no required worker ended `Failed`. A no-op returning
    /// true when already started.
    pub async fn start_all(self: &Arc<Self>) -> bool {
        if self.started.load(Ordering::SeqCst) {
            return true;
        }

        let groups = self.registry.priority_groups().await;
        for (priority, records) in groups {
            let mut to_start: Vec<RecordRef> = Vec::with_capacity(records.len());

            for rec in records {
                let (name, state, deps, required) = {
                    let r = rec.read().await;
                    (r.name.clone(), r.state, r.depends_on.clone(), r.required)
                };
                if state == WorkerState::Running {
                    // Registered via the running path; counts as started.
                    continue;
                }

                let mut missing: Vec<String> = Vec::new();
                for dep in &deps {
                    if self.registry.state_of(dep).await != Some(WorkerState::Running) {
                        missing.push(dep.clone());
                    }
                }
                if !missing.is_empty() {
                    let err = StartError::UnmetDependency {
                        missing: missing.clone(),
                    };
                    self.bus.publish(
                        Event::now(EventKind::DependencyUnmet)
                            .with_worker(name.clone())
                            .with_reason(err.to_string()),
                    );
                    if required {
                        error!(worker = %name, missing = ?missing, "required worker has unmet dependencies, aborting startup");
                        {
                            let mut r = rec.write().await;
                            r.state = WorkerState::Failed;
                            r.error = Some(err.to_string());
                        }
                        self.bus
                            .publish(Event::now(EventKind::StartupAborted).with_worker(name));
                        return false;
                    }
                    warn!(worker = %name, missing = ?missing, "skipping optional worker with unmet dependencies");
                    continue;
                }

                to_start.push(rec);
            }

            let mut set = JoinSet::new();
            for rec in to_start {
                set.spawn(start_one(rec, self.bus.clone(), self.cfg.startup_timeout));
            }

            let mut required_failed: Option<String> = None;
            while let Some(res) = set.join_next().await {
                if let Ok((name, required, ok)) = res {
                    if required && !ok && required_failed.is_none() {
                        required_failed = Some(name);
                    }
                }
            }
            if let Some(name) = required_failed {
                error!(worker = %name, priority, "required worker failed to start, aborting startup");
                self.bus
                    .publish(Event::now(EventKind::StartupAborted).with_worker(name));
                return false;
            }
        }

        self.started.store(true, Ordering::SeqCst);
        self.bus.publish(Event::now(EventKind::StartupComplete));
        info!(workers = self.registry.len().await, "startup complete");

        if self.cfg.auto_recovery {
            self.spawn_monitor().await;
        }
        true
    }

    /// Stops everything in descending priority order within bounded time.
    ///
    /// Idempotent: a second call, concurrent or later, is a no-op.
    pub async fn stop_all(&self) {
        if self.shutting_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.bus.publish(Event::now(EventKind::ShutdownRequested));

        // The monitor must not race with the shutdown it is about to see.
        if let Some(monitor) = self.monitor.lock().await.take() {
            monitor.token.cancel();
            let _ = time::timeout(self.cfg.shutdown_timeout, monitor.join).await;
        }

        let groups = self.registry.priority_groups().await;
        for (_priority, records) in groups.into_iter().rev() {
            let mut set = JoinSet::new();
            for rec in records {
                let state = rec.read().await.state;
                if !matches!(state, WorkerState::Running | WorkerState::Starting) {
                    continue;
                }
                set.spawn(stop_one(rec, self.bus.clone(), self.cfg.shutdown_timeout));
            }
            while set.join_next().await.is_some() {}
        }

        self.bus.publish(Event::now(EventKind::ShutdownComplete));
        info!("shutdown complete");
    }

    /// Manually restarts a worker through the shared restart procedure.
    ///
    /// Returns false for unknown names or a failed restart.
    pub async fn restart_worker(&self, name: &str, reason: &str) -> bool {
        match self.registry.get(name).await {
            Some(rec) => self.restart_record(&rec, reason).await,
            None => {
                warn!(worker = %name, "restart requested for unknown worker");
                false
            }
        }
    }

    /// The restart procedure: stop (tolerant), settle, start (bounded).
    ///
    /// `restart_count` is incremented whether or not the attempt succeeds.
    pub(crate) async fn restart_record(&self, rec: &RecordRef, reason: &str) -> bool {
        let (name, worker, prior) = {
            let mut r = rec.write().await;
            r.state = WorkerState::Stopping;
            (r.name.clone(), r.worker.clone(), r.restart_count)
        };
        info!(worker = %name, reason, restarts = prior, "restarting worker");
        self.bus.publish(
            Event::now(EventKind::RestartScheduled)
                .with_worker(name.clone())
                .with_reason(reason.to_string())
                .with_restarts(prior),
        );

        if let Some(w) = &worker {
            match time::timeout(self.cfg.shutdown_timeout, w.stop()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(worker = %name, error = %e, "stop during restart failed, continuing")
                }
                Err(_) => warn!(worker = %name, "stop during restart timed out, continuing"),
            }
        }

        time::sleep(self.cfg.settle_delay).await;
        rec.write().await.state = WorkerState::Starting;

        let outcome: Result<(), StartError> = match &worker {
            Some(w) => match time::timeout(self.cfg.startup_timeout, w.start()).await {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(StartError::Failed {
                    reason: e.to_string(),
                }),
                Err(_) => Err(StartError::Timeout {
                    timeout: self.cfg.startup_timeout,
                }),
            },
            // Externally spawned task with no worker: nothing can respawn it.
            None => Err(StartError::Failed {
                reason: "no start routine for externally spawned task".to_string(),
            }),
        };

        let mut r = rec.write().await;
        r.restart_count += 1;
        let restarts = r.restart_count;
        match outcome {
            Ok(()) => {
                r.state = WorkerState::Running;
                r.started_at = Some(Utc::now());
                r.error = None;
                drop(r);
                info!(worker = %name, restarts, "worker restarted");
                self.bus.publish(
                    Event::now(EventKind::WorkerRestarted)
                        .with_worker(name)
                        .with_restarts(restarts),
                );
                true
            }
            Err(e) => {
                r.state = WorkerState::Failed;
                r.error = Some(e.to_string());
                drop(r);
                warn!(worker = %name, error = %e, restarts, "restart failed");
                self.bus.publish(
                    Event::now(EventKind::RestartFailed)
                        .with_worker(name)
                        .with_reason(e.to_string())
                        .with_restarts(restarts),
                );
                false
            }
        }
    }

    /// Remaining restart budget gate, checked by the monitor.
    pub(crate) fn max_restarts(&self) -> u32 {
        self.cfg.max_restarts
    }

    async fn spawn_monitor(self: &Arc<Self>) {
        let token = CancellationToken::new();
        let monitor = HealthMonitor::new(
            Arc::clone(&self.registry),
            Arc::clone(self),
            self.bus.clone(),
            self.cfg.clone(),
        );
        let join = tokio::spawn(monitor.run(token.clone()));
        *self.monitor.lock().await = Some(MonitorHandle { token, join });
    }
}

/// Starts one record: `Starting` → bounded `start()` → `Running`/`Failed`.
///
/// Returns (name, required, ok) for the group's abort decision.
async fn start_one(rec: RecordRef, bus: Bus, timeout: Duration) -> (String, bool, bool) {
    let (name, worker, required) = {
        let mut r = rec.write().await;
        r.state = WorkerState::Starting;
        r.error = None;
        (r.name.clone(), r.worker.clone(), r.required)
    };
    bus.publish(Event::now(EventKind::WorkerStarting).with_worker(name.clone()));

    let outcome: Result<(), StartError> = match &worker {
        Some(w) => match time::timeout(timeout, w.start()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(StartError::Failed {
                reason: e.to_string(),
            }),
            Err(_) => Err(StartError::Timeout { timeout }),
        },
        // Defensive: register() always supplies a worker.
        None => Ok(()),
    };

    match outcome {
        Ok(()) => {
            {
                let mut r = rec.write().await;
                r.state = WorkerState::Running;
                r.started_at = Some(Utc::now());
                r.error = None;
            }
            info!(worker = %name, "worker started");
            bus.publish(Event::now(EventKind::WorkerStarted).with_worker(name.clone()));
            (name, required, true)
        }
        Err(e) => {
            {
                let mut r = rec.write().await;
                r.state = WorkerState::Failed;
                r.error = Some(e.to_string());
            }
            warn!(worker = %name, error = %e, "worker failed to start");
            bus.publish(
                Event::now(EventKind::StartFailed)
                    .with_worker(name.clone())
                    .with_reason(e.to_string()),
            );
            (name, required, false)
        }
    }
}

/// Stops one record within bounded time.
///
/// Only an error returned by `stop()` itself moves the record to `Failed`; a
/// timeout forces cancellation of the underlying task and still ends in
/// `Stopped`.
async fn stop_one(rec: RecordRef, bus: Bus, timeout: Duration) {
    let (name, worker, handle) = {
        let mut r = rec.write().await;
        r.state = WorkerState::Stopping;
        (r.name.clone(), r.worker.clone(), r.handle.clone())
    };
    bus.publish(Event::now(EventKind::WorkerStopping).with_worker(name.clone()));

    let mut stop_failure: Option<StopError> = None;
    let mut forced = false;

    if let Some(w) = &worker {
        match time::timeout(timeout, w.stop()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                stop_failure = Some(StopError::Failed {
                    reason: e.to_string(),
                })
            }
            // StopError::Timeout is resolved right here by the forced path;
            // it never reaches the record.
            Err(_) => forced = true,
        }
    }
    if let Some(h) = &handle {
        if h.shutdown(timeout).await {
            forced = true;
        }
    }

    let mut r = rec.write().await;
    r.stopped_at = Some(Utc::now());
    match stop_failure {
        Some(err) => {
            let reason = err.to_string();
            r.state = WorkerState::Failed;
            r.error = Some(reason.clone());
            drop(r);
            warn!(worker = %name, error = %reason, "stop failed");
            bus.publish(
                Event::now(EventKind::StopFailed)
                    .with_worker(name)
                    .with_reason(reason),
            );
        }
        None => {
            r.state = WorkerState::Stopped;
            drop(r);
            if forced {
                warn!(worker = %name, "stop exceeded timeout, task forcibly cancelled");
                bus.publish(Event::now(EventKind::StopForced).with_worker(name.clone()));
            }
            bus.publish(Event::now(EventKind::WorkerStopped).with_worker(name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::spec::WorkerSpec;
    use crate::error::WorkerError;
    use crate::workers::{WorkerFn, WorkerRef};
    use std::sync::Mutex;

    fn harness(cfg: OrchestratorConfig) -> (Arc<Registry>, Arc<LifecycleController>) {
        let bus = Bus::new(256);
        let registry = Registry::new(bus.clone());
        let controller = LifecycleController::new(Arc::clone(&registry), bus, cfg);
        (registry, controller)
    }

    fn noop() -> WorkerRef {
        WorkerFn::arc(|| async { Ok(()) }, || async { Ok(()) })
    }

    fn failing_start() -> WorkerRef {
        WorkerFn::arc(
            || async { Err(WorkerError::fail("refused")) },
            || async { Ok(()) },
        )
    }

    /// Worker that appends to a shared log on start/stop, with optional
    /// delays to expose ordering.
    fn recording(
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
        start_delay: Duration,
    ) -> WorkerRef {
        let stop_log = Arc::clone(&log);
        WorkerFn::arc(
            move || {
                let log = Arc::clone(&log);
                async move {
                    log.lock().unwrap().push(format!("start:{name}"));
                    time::sleep(start_delay).await;
                    log.lock().unwrap().push(format!("started:{name}"));
                    Ok(())
                }
            },
            move || {
                let log = Arc::clone(&stop_log);
                async move {
                    log.lock().unwrap().push(format!("stop:{name}"));
                    Ok(())
                }
            },
        )
    }

    async fn state_of(reg: &Registry, name: &str) -> WorkerState {
        reg.state_of(name).await.unwrap()
    }

    #[tokio::test]
    async fn scenario_both_required_workers_run() {
        let (reg, ctrl) = harness(OrchestratorConfig::default());
        reg.register(WorkerSpec::new("a", noop()).with_priority(1))
            .await
            .unwrap();
        reg.register(
            WorkerSpec::new("b", noop())
                .with_priority(2)
                .with_dependencies(["a"]),
        )
        .await
        .unwrap();

        assert!(ctrl.start_all().await);
        assert_eq!(state_of(&reg, "a").await, WorkerState::Running);
        assert_eq!(state_of(&reg, "b").await, WorkerState::Running);
    }

    #[tokio::test]
    async fn scenario_required_failure_aborts_later_groups() {
        let (reg, ctrl) = harness(OrchestratorConfig::default());
        reg.register(WorkerSpec::new("a", failing_start()).with_priority(1))
            .await
            .unwrap();
        reg.register(WorkerSpec::new("b", noop()).with_priority(2))
            .await
            .unwrap();

        assert!(!ctrl.start_all().await);
        assert_eq!(state_of(&reg, "a").await, WorkerState::Failed);
        // b's group was never processed.
        assert_eq!(state_of(&reg, "b").await, WorkerState::Registered);

        let a = reg.get("a").await.unwrap();
        assert!(a.read().await.error.as_deref().unwrap().contains("refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_same_priority_starts_in_parallel() {
        let (reg, ctrl) = harness(OrchestratorConfig::default());
        let log = Arc::new(Mutex::new(Vec::new()));
        let delay = Duration::from_secs(2);
        reg.register(
            WorkerSpec::new("a", recording("a", Arc::clone(&log), delay))
                .with_priority(5)
                .optional(),
        )
        .await
        .unwrap();
        reg.register(
            WorkerSpec::new("b", recording("b", Arc::clone(&log), delay))
                .with_priority(5)
                .optional(),
        )
        .await
        .unwrap();

        let before = time::Instant::now();
        assert!(ctrl.start_all().await);
        let elapsed = before.elapsed();
        // Two 2s starts racing in one group: ~2s total, not ~4s.
        assert!(elapsed >= delay, "elapsed {elapsed:?}");
        assert!(elapsed < delay * 2, "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn lower_priority_fully_starts_before_higher_is_invoked() {
        let (reg, ctrl) = harness(OrchestratorConfig::default());
        let log = Arc::new(Mutex::new(Vec::new()));
        reg.register(
            WorkerSpec::new("w1", recording("w1", Arc::clone(&log), Duration::from_secs(1)))
                .with_priority(1),
        )
        .await
        .unwrap();
        reg.register(
            WorkerSpec::new("w2", recording("w2", Arc::clone(&log), Duration::ZERO))
                .with_priority(2),
        )
        .await
        .unwrap();

        assert!(ctrl.start_all().await);
        let entries = log.lock().unwrap().clone();
        assert_eq!(entries, vec!["start:w1", "started:w1", "start:w2", "started:w2"]);
    }

    #[tokio::test]
    async fn stop_order_is_the_mirror_image() {
        let (reg, ctrl) = harness(OrchestratorConfig::default());
        let log = Arc::new(Mutex::new(Vec::new()));
        reg.register(
            WorkerSpec::new("w1", recording("w1", Arc::clone(&log), Duration::ZERO))
                .with_priority(1),
        )
        .await
        .unwrap();
        reg.register(
            WorkerSpec::new("w2", recording("w2", Arc::clone(&log), Duration::ZERO))
                .with_priority(2),
        )
        .await
        .unwrap();

        assert!(ctrl.start_all().await);
        ctrl.stop_all().await;

        let entries = log.lock().unwrap().clone();
        let stops: Vec<&String> = entries.iter().filter(|e| e.starts_with("stop:")).collect();
        assert_eq!(stops, vec!["stop:w2", "stop:w1"]);
        assert_eq!(state_of(&reg, "w1").await, WorkerState::Stopped);
        assert_eq!(state_of(&reg, "w2").await, WorkerState::Stopped);
    }

    #[tokio::test]
    async fn dependency_gating_holds_back_dependents() {
        let (reg, ctrl) = harness(OrchestratorConfig::default());
        reg.register(WorkerSpec::new("a", failing_start()).with_priority(1))
            .await
            .unwrap();
        reg.register(
            WorkerSpec::new("b", noop())
                .with_priority(2)
                .with_dependencies(["a"]),
        )
        .await
        .unwrap();

        assert!(!ctrl.start_all().await);
        assert_eq!(state_of(&reg, "b").await, WorkerState::Registered);
    }

    #[tokio::test]
    async fn optional_worker_with_unmet_dependency_is_skipped() {
        let (reg, ctrl) = harness(OrchestratorConfig::default());
        reg.register(WorkerSpec::new("a", failing_start()).with_priority(1).optional())
            .await
            .unwrap();
        reg.register(
            WorkerSpec::new("b", noop())
                .with_priority(2)
                .optional()
                .with_dependencies(["a"]),
        )
        .await
        .unwrap();
        reg.register(WorkerSpec::new("c", noop()).with_priority(3))
            .await
            .unwrap();

        // Optional failures are contained; startup still succeeds.
        assert!(ctrl.start_all().await);
        assert_eq!(state_of(&reg, "a").await, WorkerState::Failed);
        assert_eq!(state_of(&reg, "b").await, WorkerState::Registered);
        assert_eq!(state_of(&reg, "c").await, WorkerState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn start_timeout_is_a_failure() {
        let cfg = OrchestratorConfig {
            startup_timeout: Duration::from_secs(1),
            ..OrchestratorConfig::default()
        };
        let (reg, ctrl) = harness(cfg);
        let hanging = WorkerFn::arc(
            || async {
                time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            },
            || async { Ok(()) },
        );
        reg.register(WorkerSpec::new("slow", hanging)).await.unwrap();

        assert!(!ctrl.start_all().await);
        let rec = reg.get("slow").await.unwrap();
        let guard = rec.read().await;
        assert_eq!(guard.state, WorkerState::Failed);
        assert!(guard.error.as_deref().unwrap().contains("timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_hanging_stop_still_ends_stopped() {
        let cfg = OrchestratorConfig {
            shutdown_timeout: Duration::from_secs(2),
            ..OrchestratorConfig::default()
        };
        let (reg, ctrl) = harness(cfg);
        let never_stops = WorkerFn::arc(
            || async { Ok(()) },
            || async {
                time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            },
        );
        reg.register(WorkerSpec::new("stuck", never_stops))
            .await
            .unwrap();

        assert!(ctrl.start_all().await);
        let before = time::Instant::now();
        ctrl.stop_all().await;
        assert!(before.elapsed() < Duration::from_secs(5));
        // Forced cancellation, not a failure.
        assert_eq!(state_of(&reg, "stuck").await, WorkerState::Stopped);
    }

    #[tokio::test]
    async fn stop_error_marks_failed() {
        let (reg, ctrl) = harness(OrchestratorConfig::default());
        let bad_stop = WorkerFn::arc(
            || async { Ok(()) },
            || async { Err(WorkerError::fail("flush failed")) },
        );
        reg.register(WorkerSpec::new("flaky", bad_stop)).await.unwrap();

        assert!(ctrl.start_all().await);
        ctrl.stop_all().await;
        let rec = reg.get("flaky").await.unwrap();
        let guard = rec.read().await;
        assert_eq!(guard.state, WorkerState::Failed);
        assert!(guard.error.as_deref().unwrap().contains("flush failed"));
    }

    #[tokio::test]
    async fn stop_all_is_idempotent() {
        let (reg, ctrl) = harness(OrchestratorConfig::default());
        let stops = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let counter = Arc::clone(&stops);
        let counting = WorkerFn::arc(
            || async { Ok(()) },
            move || {
                let c = Arc::clone(&counter);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            },
        );
        reg.register(WorkerSpec::new("once", counting)).await.unwrap();

        assert!(ctrl.start_all().await);
        ctrl.stop_all().await;
        ctrl.stop_all().await;
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn start_all_is_a_noop_when_already_started() {
        let (reg, ctrl) = harness(OrchestratorConfig {
            auto_recovery: false,
            ..OrchestratorConfig::default()
        });
        let starts = Arc::new(std::sync::atomic::AtomicU32::new(0));
        let counter = Arc::clone(&starts);
        let counting = WorkerFn::arc(
            move || {
                let c = Arc::clone(&counter);
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            },
            || async { Ok(()) },
        );
        reg.register(WorkerSpec::new("once", counting)).await.unwrap();

        assert!(ctrl.start_all().await);
        assert!(ctrl.start_all().await);
        assert_eq!(starts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn restart_unknown_worker_returns_false() {
        let (_reg, ctrl) = harness(OrchestratorConfig::default());
        assert!(!ctrl.restart_worker("ghost", "manual").await);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_restart_cycles_a_running_worker() {
        let cfg = OrchestratorConfig {
            settle_delay: Duration::from_millis(10),
            auto_recovery: false,
            ..OrchestratorConfig::default()
        };
        let (reg, ctrl) = harness(cfg);
        reg.register(WorkerSpec::new("svc", noop())).await.unwrap();
        assert!(ctrl.start_all().await);

        assert!(ctrl.restart_worker("svc", "operator request").await);
        let rec = reg.get("svc").await.unwrap();
        let guard = rec.read().await;
        assert_eq!(guard.state, WorkerState::Running);
        assert_eq!(guard.restart_count, 1);
        assert!(guard.error.is_none());
    }
}
