//! Core runtime: records, registry, lifecycle control, monitoring, status.

mod controller;
mod cycle;
mod monitor;
mod orchestrator;
mod record;
mod registry;
mod shutdown;
mod spec;
mod status;

pub use controller::LifecycleController;
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
pub use record::{RecordRef, WorkerRecord, WorkerState};
pub use registry::Registry;
pub use shutdown::wait_for_shutdown_signal;
pub use spec::{RunningSpec, WorkerSpec};
pub use status::{StatusReporter, StatusSnapshot, WorkerStatus};
