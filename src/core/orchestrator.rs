//! # Orchestrator: the assembled facade.
//!
//! One constructible object wiring the whole pipeline:
//!
//! ```text
//! Bus ──► listener task ──► SubscriberSet ──► Subscribe impls
//!  │
//!  ├─► Registry ◄── LifecycleController ◄── HealthMonitor
//!  │       ▲
//!  └───────┴── StatusReporter
//! ```
//!
//! Multiple independent instances can coexist (tests rely on this); there is
//! no process-global orchestrator.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use workvisor::{
//!     LogWriter, Orchestrator, OrchestratorConfig, WorkerFn, WorkerSpec,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Orchestrator::builder(OrchestratorConfig::default())
//!     .with_subscriber(Arc::new(LogWriter))
//!     .build();
//!
//! let db = WorkerFn::arc(|| async { Ok(()) }, || async { Ok(()) });
//! orchestrator
//!     .register(WorkerSpec::new("database", db).with_priority(10))
//!     .await?;
//!
//! if !orchestrator.start_all().await {
//!     orchestrator.stop_all().await;
//!     return Err("startup failed".into());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::config::OrchestratorConfig;
use crate::core::controller::LifecycleController;
use crate::core::registry::Registry;
use crate::core::spec::{RunningSpec, WorkerSpec};
use crate::core::status::{StatusReporter, StatusSnapshot};
use crate::error::RegistryError;
use crate::events::{Bus, Event};
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::workers::WorkerRef;

/// Bus→subscribers forwarding task, owned by the orchestrator.
struct ListenerHandle {
    token: CancellationToken,
    join: JoinHandle<()>,
}

/// Builder for [`Orchestrator`].
pub struct OrchestratorBuilder {
    cfg: OrchestratorConfig,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl OrchestratorBuilder {
    /// Adds one subscriber to the event pipeline.
    pub fn with_subscriber(mut self, sub: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(sub);
        self
    }

    /// Adds a batch of subscribers to the event pipeline.
    pub fn with_subscribers<I>(mut self, subs: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Subscribe>>,
    {
        self.subscribers.extend(subs);
        self
    }

    /// Wires bus, registry, controller, and reporter; spawns the subscriber
    /// listener when any subscribers were added.
    pub fn build(self) -> Orchestrator {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let registry = Registry::new(bus.clone());
        let controller =
            LifecycleController::new(Arc::clone(&registry), bus.clone(), self.cfg.clone());
        let reporter = StatusReporter::new(Arc::clone(&registry));

        let listener = if self.subscribers.is_empty() {
            None
        } else {
            Some(spawn_listener(&bus, SubscriberSet::new(self.subscribers)))
        };

        Orchestrator {
            registry,
            controller,
            reporter,
            bus,
            listener,
        }
    }
}

/// Facade over registry, controller, and status reporter.
pub struct Orchestrator {
    registry: Arc<Registry>,
    controller: Arc<LifecycleController>,
    reporter: StatusReporter,
    bus: Bus,
    listener: Option<ListenerHandle>,
}

impl Orchestrator {
    /// Starts building an orchestrator with the given config.
    pub fn builder(cfg: OrchestratorConfig) -> OrchestratorBuilder {
        OrchestratorBuilder {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Builds an orchestrator with no subscribers.
    pub fn new(cfg: OrchestratorConfig) -> Self {
        Self::builder(cfg).build()
    }

    /// Registers a worker; see [`Registry::register`].
    pub async fn register(&self, spec: WorkerSpec) -> Result<(), RegistryError> {
        self.registry.register(spec).await
    }

    /// Registers an already-executing component; see
    /// [`Registry::register_running`].
    pub async fn register_running(&self, spec: RunningSpec) {
        self.registry.register_running(spec).await
    }

    /// Starts everything in priority order; true iff no required worker
    /// failed.
    pub async fn start_all(&self) -> bool {
        self.controller.start_all().await
    }

    /// Stops everything in reverse priority order within bounded time.
    pub async fn stop_all(&self) {
        self.controller.stop_all().await
    }

    /// Manually restarts one worker; false for unknown names or a failed
    /// restart.
    pub async fn restart_worker(&self, name: &str, reason: &str) -> bool {
        self.controller.restart_worker(name, reason).await
    }

    /// Full status snapshot, JSON-ready.
    pub async fn get_status(&self) -> StatusSnapshot {
        self.reporter.get_status().await
    }

    /// True iff every required worker is `Running`.
    pub async fn is_healthy(&self) -> bool {
        self.reporter.is_healthy().await
    }

    /// The underlying worker implementation, if registered.
    pub async fn get_worker(&self, name: &str) -> Option<WorkerRef> {
        self.reporter.get_worker(name).await
    }

    /// Direct subscription to the raw event stream.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// The shared registry, for advanced wiring.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Stops all workers, then drains and joins the subscriber pipeline.
    ///
    /// [`Orchestrator::stop_all`] alone leaves subscribers draining in the
    /// background; use this when delivery of the final events matters.
    pub async fn shutdown(mut self) {
        self.controller.stop_all().await;
        if let Some(listener) = self.listener.take() {
            listener.token.cancel();
            let _ = listener.join.await;
        }
    }
}

fn spawn_listener(bus: &Bus, set: SubscriberSet) -> ListenerHandle {
    let mut rx = bus.subscribe();
    let token = CancellationToken::new();
    let loop_token = token.clone();
    let join = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = loop_token.cancelled() => break,
                res = rx.recv() => match res {
                    Ok(ev) => set.emit(&ev),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "event listener lagged, events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
        // Drain whatever the cancel raced past, then let queues empty.
        while let Ok(ev) = rx.try_recv() {
            set.emit(&ev);
        }
        set.shutdown().await;
    });
    ListenerHandle { token, join }
}
