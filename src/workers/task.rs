//! # Task-based workers.
//!
//! Some components do not have an explicit start/stop surface: they are a
//! single cancellable task that begins executing the moment it is spawned.
//! Two types unify that shape with the [`Worker`](crate::Worker) contract:
//!
//! - [`TaskHandle`] — a shared, re-installable slot holding the task's
//!   `JoinHandle` and `CancellationToken`. The health monitor probes it for
//!   unexpected completion; shutdown drives it with a bounded
//!   cancel-await-abort sequence.
//! - [`TaskWorker`] — a `Worker` built from a factory closure: `start()`
//!   (re)spawns the task and installs the fresh handle, `stop()` is
//!   cancel-and-await, `status()` is derived from handle state.
//!
//! ## Rules
//! - A `TaskHandle` is shared between the worker and its registry record;
//!   respawning refreshes the slot in place, so the record never goes stale.
//! - Reaping an outcome consumes it: after [`TaskHandle::try_take_outcome`]
//!   returns `Some`, the slot is empty until the next install.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;
use crate::workers::worker::{StatusMap, Worker};

/// Coarse view of a handle slot, used for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleProbe {
    /// No task installed (never spawned, or outcome already reaped).
    Empty,
    /// A task is installed and still executing.
    Running,
    /// A task is installed and has completed; outcome not yet reaped.
    Finished,
}

impl HandleProbe {
    fn as_str(self) -> &'static str {
        match self {
            HandleProbe::Empty => "idle",
            HandleProbe::Running => "running",
            HandleProbe::Finished => "finished",
        }
    }
}

/// Shared handle to a cancellable, awaitable task.
pub struct TaskHandle {
    join: tokio::sync::Mutex<Option<JoinHandle<Result<(), WorkerError>>>>,
    cancel: std::sync::Mutex<CancellationToken>,
}

impl TaskHandle {
    /// Creates an empty handle; a task is installed later via
    /// [`TaskHandle::install`].
    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            join: tokio::sync::Mutex::new(None),
            cancel: std::sync::Mutex::new(CancellationToken::new()),
        })
    }

    /// Wraps an already-spawned task, e.g. one started outside the
    /// orchestrator and registered through the "already running" path.
    pub fn spawned(
        join: JoinHandle<Result<(), WorkerError>>,
        cancel: CancellationToken,
    ) -> Arc<Self> {
        Arc::new(Self {
            join: tokio::sync::Mutex::new(Some(join)),
            cancel: std::sync::Mutex::new(cancel),
        })
    }

    /// Installs a fresh task, aborting any previous one still in the slot.
    pub async fn install(
        &self,
        join: JoinHandle<Result<(), WorkerError>>,
        cancel: CancellationToken,
    ) {
        let mut slot = self.join.lock().await;
        if let Some(old) = slot.take() {
            old.abort();
        }
        *slot = Some(join);
        *self.cancel.lock().expect("cancel lock poisoned") = cancel;
    }

    /// Requests cooperative cancellation of the current task.
    pub fn cancel(&self) {
        self.cancel.lock().expect("cancel lock poisoned").cancel();
    }

    /// Non-blocking view of the slot.
    ///
    /// Reports [`HandleProbe::Running`] while another caller holds the slot
    /// (it is being awaited), which is the conservative answer.
    pub fn probe(&self) -> HandleProbe {
        match self.join.try_lock() {
            Ok(slot) => match slot.as_ref() {
                None => HandleProbe::Empty,
                Some(join) if join.is_finished() => HandleProbe::Finished,
                Some(_) => HandleProbe::Running,
            },
            Err(_) => HandleProbe::Running,
        }
    }

    /// Reaps the outcome of a completed task.
    ///
    /// Returns `None` while the task is still executing or the slot is
    /// empty. A panic inside the task is reported as a failure; a forced
    /// abort as [`WorkerError::Canceled`].
    pub async fn try_take_outcome(&self) -> Option<Result<(), WorkerError>> {
        let join = {
            let mut slot = self.join.lock().await;
            match slot.as_ref() {
                Some(j) if j.is_finished() => slot.take(),
                _ => return None,
            }
        };
        let join = join?;
        Some(match join.await {
            Ok(res) => res,
            Err(e) if e.is_panic() => Err(WorkerError::fail("task panicked")),
            Err(_) => Err(WorkerError::Canceled),
        })
    }

    /// Awaits the current task to completion, unbounded, and clears the
    /// slot. Outer callers apply their own timeout.
    pub async fn wait(&self) {
        let mut slot = self.join.lock().await;
        if let Some(join) = slot.as_mut() {
            let _ = (&mut *join).await;
            *slot = None;
        }
    }

    /// Bounded shutdown: cancel, await up to `timeout`, then forcibly abort
    /// and swallow the cancellation. Returns true when the abort path was
    /// taken.
    ///
    /// Forced abort takes effect at the task's next yield point; the total
    /// wait is bounded as long as the task is genuinely async.
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.cancel();
        let mut slot = self.join.lock().await;
        let Some(join) = slot.as_mut() else {
            return false;
        };
        let forced = match time::timeout(timeout, &mut *join).await {
            Ok(_) => false,
            Err(_) => {
                join.abort();
                let _ = (&mut *join).await;
                true
            }
        };
        *slot = None;
        forced
    }
}

/// Worker adapter for a single cancellable task.
///
/// The factory closure produces a fresh future per spawn, receiving a
/// `CancellationToken` it should honor for graceful stops.
///
/// ## Example
/// ```no_run
/// use tokio_util::sync::CancellationToken;
/// use workvisor::{TaskWorker, WorkerError};
///
/// let worker = TaskWorker::new(|token: CancellationToken| async move {
///     loop {
///         if token.is_cancelled() {
///             return Ok::<_, WorkerError>(());
///         }
///         tokio::time::sleep(std::time::Duration::from_secs(1)).await;
///     }
/// });
/// let handle = worker.handle(); // goes into the registry record
/// ```
pub struct TaskWorker<F> {
    factory: F,
    handle: Arc<TaskHandle>,
}

impl<F, Fut> TaskWorker<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<(), WorkerError>> + Send + 'static,
{
    /// Creates a new task worker from a factory closure.
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            handle: TaskHandle::empty(),
        }
    }

    /// Creates the worker and returns it as a shared `Arc`.
    pub fn arc(factory: F) -> Arc<Self> {
        Arc::new(Self::new(factory))
    }

    /// The shared handle; register it alongside the worker so the health
    /// monitor can observe the task.
    pub fn handle(&self) -> Arc<TaskHandle> {
        Arc::clone(&self.handle)
    }
}

#[async_trait]
impl<F, Fut> Worker for TaskWorker<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = Result<(), WorkerError>> + Send + 'static,
{
    async fn start(&self) -> Result<(), WorkerError> {
        let token = CancellationToken::new();
        let join = tokio::spawn((self.factory)(token.clone()));
        self.handle.install(join, token).await;
        Ok(())
    }

    async fn stop(&self) -> Result<(), WorkerError> {
        self.handle.cancel();
        self.handle.wait().await;
        Ok(())
    }

    fn status(&self) -> StatusMap {
        let mut map = StatusMap::new();
        map.insert(
            "task_state".into(),
            serde_json::Value::String(self.handle.probe().as_str().into()),
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn outcome_is_none_while_running() {
        let handle = TaskHandle::spawned(
            tokio::spawn(async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }),
            CancellationToken::new(),
        );
        assert_eq!(handle.probe(), HandleProbe::Running);
        assert!(handle.try_take_outcome().await.is_none());
        handle.shutdown(Duration::from_millis(10)).await;
    }

    #[tokio::test]
    async fn reaping_consumes_the_outcome() {
        let handle = TaskHandle::spawned(
            tokio::spawn(async { Err(WorkerError::fail("boom")) }),
            CancellationToken::new(),
        );
        // Let the task finish.
        tokio::task::yield_now().await;
        let outcome = loop {
            if let Some(o) = handle.try_take_outcome().await {
                break o;
            }
            tokio::task::yield_now().await;
        };
        assert!(outcome.is_err());
        assert_eq!(handle.probe(), HandleProbe::Empty);
        assert!(handle.try_take_outcome().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_forces_abort_on_timeout() {
        // Ignores cancellation on purpose.
        let handle = TaskHandle::spawned(
            tokio::spawn(async {
                loop {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                }
            }),
            CancellationToken::new(),
        );
        let forced = handle.shutdown(Duration::from_secs(1)).await;
        assert!(forced);
        assert_eq!(handle.probe(), HandleProbe::Empty);
    }

    #[tokio::test]
    async fn task_worker_respawns_on_start() {
        let worker = TaskWorker::new(|token: CancellationToken| async move {
            token.cancelled().await;
            Ok(())
        });
        let handle = worker.handle();

        worker.start().await.unwrap();
        assert_eq!(handle.probe(), HandleProbe::Running);

        worker.stop().await.unwrap();
        assert_eq!(handle.probe(), HandleProbe::Empty);

        // A second start installs a fresh task into the same shared handle.
        worker.start().await.unwrap();
        assert_eq!(handle.probe(), HandleProbe::Running);
        worker.stop().await.unwrap();
    }

    #[tokio::test]
    async fn panic_is_reported_as_failure() {
        let handle = TaskHandle::spawned(
            tokio::spawn(async { panic!("worker blew up") }),
            CancellationToken::new(),
        );
        let outcome = loop {
            if let Some(o) = handle.try_take_outcome().await {
                break o;
            }
            tokio::task::yield_now().await;
        };
        match outcome {
            Err(WorkerError::Fail { reason }) => assert_eq!(reason, "task panicked"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
