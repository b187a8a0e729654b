//! Event subscribers: the observability extension point.
//!
//! - [`Subscribe`] — the handler contract.
//! - [`SubscriberSet`] — non-blocking fan-out with panic isolation.
//! - [`LogWriter`] — built-in `tracing` sink.

mod log;
mod set;
mod subscriber;

pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
