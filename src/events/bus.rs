//! # Event bus for broadcasting routing events.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking event publishing from the producer and consumer sides.
//!
//! ## Architecture
//! ```text
//! Publishers:                           Receivers (any number):
//!   ProducerRunner  ──┐
//!   ConsumerInvoker ──┼──────► Bus ───────► bus.subscribe() ──► tests / LogWriter / metrics
//!   report path     ──┘  (broadcast chan)
//! ```
//!
//! ## Rules
//! - `publish()` never waits; routing code calls it inline.
//! - One ring buffer of `BridgeConfig::bus_capacity` events is shared by every receiver.
//! - A receiver that falls behind sees `RecvError::Lagged(n)` and resumes after the gap.
//! - Events published while nobody listens are discarded.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for routing events.
///
/// Clones share one sender; each subscription publishes through its own clone.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Event>(capacity);
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    ///
    /// If there are no receivers, the event is dropped.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a new receiver that will observe subsequent events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn publish_reaches_receivers_in_order() {
        let bus = Bus::new(4);
        let mut rx = bus.subscribe();

        bus.publish(Event::new(EventKind::Subscribed));
        bus.publish(Event::new(EventKind::Completed));

        let a = rx.recv().await.expect("first event");
        let b = rx.recv().await.expect("second event");
        assert_eq!(a.kind, EventKind::Subscribed);
        assert_eq!(b.kind, EventKind::Completed);
        assert!(a.seq < b.seq);
    }

    #[tokio::test]
    async fn zero_capacity_is_clamped_to_one() {
        let bus = Bus::new(0);
        let mut rx = bus.subscribe();

        bus.publish(Event::new(EventKind::Rethrown));
        let ev = rx.recv().await.expect("single slot holds one event");
        assert_eq!(ev.kind, EventKind::Rethrown);
    }

    #[test]
    fn publish_without_receivers_is_noop() {
        let bus = Bus::new(4);
        bus.publish(Event::new(EventKind::Cancelled));
    }
}
