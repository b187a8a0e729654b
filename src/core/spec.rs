//! # Registration specs.
//!
//! Rust has no default arguments, so the two registration entry points take
//! builder-style specs:
//!
//! - [`WorkerSpec`] — the normal path; defaults: priority 50, category
//!   "general", required, no dependencies.
//! - [`RunningSpec`] — the "already running" path for components that begin
//!   executing the moment they are created; defaults: priority 50, category
//!   "general", **not** required. Such records are committed directly as
//!   `Running` so the status reporter and health monitor still see them.

use std::sync::Arc;

use crate::workers::{TaskHandle, WorkerRef};

/// Spec for registering a worker with an explicit lifecycle.
///
/// ## Example
/// ```
/// use workvisor::{WorkerFn, WorkerSpec};
///
/// let worker = WorkerFn::arc(
///     || async { Ok(()) },
///     || async { Ok(()) },
/// );
/// let spec = WorkerSpec::new("library-sync", worker)
///     .with_priority(10)
///     .with_category("sync")
///     .with_dependencies(["database"]);
/// ```
#[derive(Clone)]
pub struct WorkerSpec {
    pub(crate) name: String,
    pub(crate) worker: WorkerRef,
    pub(crate) priority: i32,
    pub(crate) category: String,
    pub(crate) required: bool,
    pub(crate) depends_on: Vec<String>,
    pub(crate) handle: Option<Arc<TaskHandle>>,
}

impl WorkerSpec {
    /// Creates a spec with defaults: priority 50, category "general",
    /// required, no dependencies.
    pub fn new(name: impl Into<String>, worker: WorkerRef) -> Self {
        Self {
            name: name.into(),
            worker,
            priority: 50,
            category: "general".to_string(),
            required: true,
            depends_on: Vec::new(),
            handle: None,
        }
    }

    /// Sets the priority; lower starts earlier and stops later.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the observability category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets whether a startup failure aborts the whole startup.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Marks the worker optional: its failures are contained.
    pub fn optional(self) -> Self {
        self.required(false)
    }

    /// Names that must be `Running` before this worker starts.
    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Attaches a task handle so the health monitor can watch the worker's
    /// underlying task (use [`TaskWorker::handle`](crate::TaskWorker::handle)).
    pub fn with_handle(mut self, handle: Arc<TaskHandle>) -> Self {
        self.handle = Some(handle);
        self
    }

    /// The worker name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Spec for registering a component that is already executing.
#[derive(Clone)]
pub struct RunningSpec {
    pub(crate) name: String,
    pub(crate) handle: Arc<TaskHandle>,
    pub(crate) worker: Option<WorkerRef>,
    pub(crate) priority: i32,
    pub(crate) category: String,
    pub(crate) required: bool,
}

impl RunningSpec {
    /// Creates a spec with defaults: priority 50, category "general",
    /// not required.
    pub fn new(name: impl Into<String>, handle: Arc<TaskHandle>) -> Self {
        Self {
            name: name.into(),
            handle,
            worker: None,
            priority: 50,
            category: "general".to_string(),
            required: false,
        }
    }

    /// Attaches a worker implementation, enabling stop/restart through the
    /// normal capability surface. Without one, the record can be stopped via
    /// its handle but a crash cannot be restarted.
    pub fn with_worker(mut self, worker: WorkerRef) -> Self {
        self.worker = Some(worker);
        self
    }

    /// Sets the priority; lower stops later.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the observability category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets whether this record counts toward `is_healthy()`.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// The worker name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
