//! # Global orchestrator configuration.
//!
//! [`OrchestratorConfig`] centralizes every timing bound the runtime honors.
//! All fields are public; the documented defaults are what the rest of the
//! crate assumes when a field is left untouched.
//!
//! ## Field semantics
//! - `startup_timeout`: per-worker bound on `start()`; a timeout is a start
//!   failure.
//! - `shutdown_timeout`: per-worker bound on `stop()` and on awaiting a task
//!   handle; a timeout forces cancellation and is **not** a failure.
//! - `poll_interval`: how often the health monitor sweeps task handles.
//! - `settle_delay`: pause between stop and start during a restart, letting
//!   resources (sockets, file locks) release.
//! - `max_restarts`: auto-recovery attempts per worker before giving up.
//! - `auto_recovery`: whether `start_all()` spawns the health monitor.
//! - `bus_capacity`: event bus ring buffer size (min 1; clamped by the Bus).

use std::time::Duration;

/// Configuration for the orchestrator runtime.
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// Maximum time a single `start()` call may take.
    pub startup_timeout: Duration,

    /// Maximum time a single `stop()` call or handle-await may take before
    /// the underlying task is forcibly cancelled.
    pub shutdown_timeout: Duration,

    /// Interval between health-monitor sweeps over task-based workers.
    pub poll_interval: Duration,

    /// Pause between stopping and restarting a worker during recovery.
    pub settle_delay: Duration,

    /// Upper bound on auto-recovery attempts per worker.
    pub max_restarts: u32,

    /// When true, a successful `start_all()` spawns the health monitor.
    pub auto_recovery: bool,

    /// Capacity of the event bus broadcast ring buffer.
    ///
    /// Slow subscribers lagging behind more than this many events observe
    /// `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl OrchestratorConfig {
    /// Bus capacity clamped to a minimum of 1, so a zero in config can never
    /// construct an invalid channel.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for OrchestratorConfig {
    /// Defaults:
    ///
    /// - `startup_timeout = 30s`
    /// - `shutdown_timeout = 10s`
    /// - `poll_interval = 5s`
    /// - `settle_delay = 500ms`
    /// - `max_restarts = 3`
    /// - `auto_recovery = true`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            startup_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_secs(5),
            settle_delay: Duration::from_millis(500),
            max_restarts: 3,
            auto_recovery: true,
            bus_capacity: 1024,
        }
    }
}
