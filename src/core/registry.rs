//! # Worker registry.
//!
//! Owns the name→record map. Registration validates the dependency graph
//! before committing, so the map never holds a cycle; everything else in the
//! crate (controller, monitor, status reporter) reads records through here.
//!
//! ## Rules
//! - Re-registering an existing name overwrites its record (logged), it does
//!   not fail. Hot-reload and test re-registration rely on this.
//! - Cycle validation is all-or-nothing: a rejected registration leaves the
//!   map exactly as it was.
//! - The map lock is held briefly; records carry their own locks so one
//!   priority group can be mutated concurrently.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;

use crate::core::cycle::check_acyclic;
use crate::core::record::{RecordRef, WorkerRecord, WorkerState};
use crate::core::spec::{RunningSpec, WorkerSpec};
use crate::error::RegistryError;
use crate::events::{Bus, Event, EventKind};
use crate::workers::WorkerRef;

/// Name→record map plus the event bus for registration events.
pub struct Registry {
    records: RwLock<HashMap<String, RecordRef>>,
    bus: Bus,
}

impl Registry {
    /// Creates an empty registry publishing to the given bus.
    pub fn new(bus: Bus) -> Arc<Self> {
        Arc::new(Self {
            records: RwLock::new(HashMap::new()),
            bus,
        })
    }

    /// Registers a worker, or replaces the record under an existing name.
    ///
    /// The proposed dependency graph (existing edges plus this spec's) is
    /// validated first; on a cycle the registration fails and the map is
    /// untouched.
    pub async fn register(&self, spec: WorkerSpec) -> Result<(), RegistryError> {
        let mut records = self.records.write().await;

        let mut edges: HashMap<String, Vec<String>> = HashMap::with_capacity(records.len() + 1);
        for (name, rec) in records.iter() {
            edges.insert(name.clone(), rec.read().await.depends_on.clone());
        }
        edges.insert(spec.name.clone(), spec.depends_on.clone());
        check_acyclic(&edges, &spec.name)?;

        let name = spec.name.clone();
        let overwrite = records
            .insert(
                name.clone(),
                Arc::new(RwLock::new(WorkerRecord::registered(spec))),
            )
            .is_some();
        drop(records);

        let mut ev = Event::now(EventKind::WorkerRegistered).with_worker(name.clone());
        if overwrite {
            warn!(worker = %name, "re-registering existing worker, previous record replaced");
            ev = ev.with_reason("overwrite");
        }
        self.bus.publish(ev);
        Ok(())
    }

    /// Registers a component that is already executing.
    ///
    /// The record is committed directly as `Running` with `started_at` set;
    /// it carries no dependencies, so no cycle check is needed. Overwrite
    /// semantics match [`Registry::register`].
    pub async fn register_running(&self, spec: RunningSpec) {
        let name = spec.name.clone();
        let overwrite = {
            let mut records = self.records.write().await;
            records
                .insert(
                    name.clone(),
                    Arc::new(RwLock::new(WorkerRecord::running(spec))),
                )
                .is_some()
        };

        let mut ev = Event::now(EventKind::WorkerRegistered).with_worker(name.clone());
        if overwrite {
            warn!(worker = %name, "re-registering existing worker, previous record replaced");
            ev = ev.with_reason("overwrite");
        }
        self.bus.publish(ev);
    }

    /// Looks up a record by name.
    pub async fn get(&self, name: &str) -> Option<RecordRef> {
        self.records.read().await.get(name).cloned()
    }

    /// Returns the underlying worker implementation, if any.
    pub async fn worker(&self, name: &str) -> Option<WorkerRef> {
        let rec = self.get(name).await?;
        let guard = rec.read().await;
        guard.worker.clone()
    }

    /// Current state of a record, if registered.
    pub async fn state_of(&self, name: &str) -> Option<WorkerState> {
        let rec = self.get(name).await?;
        let state = rec.read().await.state;
        Some(state)
    }

    /// Sorted list of registered names.
    pub async fn names(&self) -> Vec<String> {
        let records = self.records.read().await;
        let mut names: Vec<String> = records.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered workers.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// True when nothing is registered.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// All records snapshotted for iteration.
    pub async fn all(&self) -> Vec<RecordRef> {
        self.records.read().await.values().cloned().collect()
    }

    /// Records grouped by priority, ascending. Stop paths iterate the
    /// result in reverse.
    pub async fn priority_groups(&self) -> Vec<(i32, Vec<RecordRef>)> {
        let records = self.records.read().await;
        let mut groups: BTreeMap<i32, Vec<RecordRef>> = BTreeMap::new();
        for rec in records.values() {
            let priority = rec.read().await.priority;
            groups.entry(priority).or_default().push(Arc::clone(rec));
        }
        groups.into_iter().collect()
    }

    /// Records carrying a task handle; the health monitor's sweep set.
    pub async fn task_records(&self) -> Vec<RecordRef> {
        let records = self.records.read().await;
        let mut out = Vec::new();
        for rec in records.values() {
            if rec.read().await.handle.is_some() {
                out.push(Arc::clone(rec));
            }
        }
        out
    }
}
