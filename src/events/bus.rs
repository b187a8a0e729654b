//! # Event bus for broadcasting lifecycle events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`]. Publishers
//! (the controller, the registry, the health monitor) never block; each
//! subscriber owns an independent receiver over one shared ring buffer.
//!
//! ## Rules
//! - `publish()` returns immediately; events without receivers are dropped.
//! - A receiver only observes events sent after it subscribed.
//! - Slow receivers get `RecvError::Lagged(n)` and skip the `n` oldest items.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for orchestrator events.
///
/// Cheap to clone; internally holds an `Arc`-backed sender.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given ring buffer capacity (clamped to a
    /// minimum of 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active subscribers.
    ///
    /// Never blocks. With no receivers attached the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new independent receiver observing subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn subscriber_receives_published_events() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        bus.publish(Event::now(EventKind::WorkerStarted).with_worker("a"));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::WorkerStarted);
        assert_eq!(ev.worker.as_deref(), Some("a"));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        // Must not panic: broadcast::channel(0) would.
        let _bus = Bus::new(0);
    }
}
