//! Worker capability: the [`Worker`] trait, closure-backed [`WorkerFn`], and
//! the task adapters ([`TaskHandle`], [`TaskWorker`]) that unify single-task
//! components with the explicit start/stop shape.

mod task;
mod worker;
mod worker_fn;

pub use task::{HandleProbe, TaskHandle, TaskWorker};
pub use worker::{StatusMap, Worker, WorkerRef};
pub use worker_fn::WorkerFn;
