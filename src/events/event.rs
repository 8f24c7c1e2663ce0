//! # Routing events emitted by the bridge.
//!
//! The [`EventKind`] enum classifies events in three groups:
//! - **Lifecycle events**: subscription start and terminal outcomes
//! - **Fate events**: the single fate assigned to a failure
//!   (`ErrorDelivered`, `UndeliverableReported`, `Rethrown`)
//! - **Diagnostic events**: callback failures returned to a sender, handler panics
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use rxbridge::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ErrorDelivered)
//!     .with_producer("prices")
//!     .with_subscription(7)
//!     .with_reason("domain: feed closed");
//!
//! assert_eq!(ev.kind, EventKind::ErrorDelivered);
//! assert_eq!(ev.producer.as_deref(), Some("prices"));
//! assert_eq!(ev.subscription, Some(7));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::classify::{ClassifiedError, ErrorClass};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of routing events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Lifecycle events ===
    /// Subscriber attached; `on_subscribe` returned.
    ///
    /// Sets:
    /// - `producer`, `subscription`
    Subscribed,

    /// Producer finished and `on_complete` was delivered.
    ///
    /// Sets:
    /// - `producer`, `subscription`
    Completed,

    /// Producer terminated without a terminal event (disposed/cancelled).
    ///
    /// Sets:
    /// - `producer`, `subscription`
    Cancelled,

    // === Fate events ===
    /// Ordinary producer failure delivered to `on_error`.
    ///
    /// Sets:
    /// - `producer`, `subscription`, `class`, `failure`, `reason`
    ErrorDelivered,

    /// Failure wrapped as undeliverable and handed to the ambient handler.
    ///
    /// Sets:
    /// - `producer`, `subscription`, `class`, `failure`, `reason`
    UndeliverableReported,

    /// Failure returned as `Err` to the caller of an attached subscription.
    ///
    /// Sets:
    /// - `producer`, `subscription`, `class`, `failure`, `reason`
    Rethrown,

    // === Diagnostic events ===
    /// A subscriber callback failed; the failure was returned to the immediate caller.
    ///
    /// Sets:
    /// - `producer`, `subscription`, `class`, `failure`, `reason`
    CallbackFailed,

    /// The ambient handler panicked while handling an undeliverable failure.
    ///
    /// Sets:
    /// - `producer`, `subscription`, `failure`, `reason`
    HandlerPanicked,
}

/// Routing event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Producer name, if applicable.
    pub producer: Option<Arc<str>>,
    /// Subscription id, if applicable.
    pub subscription: Option<u64>,
    /// Taxonomy class of the failure, if any.
    pub class: Option<ErrorClass>,
    /// Identity of the failure ([`Failure::id`](crate::Failure::id)), if any.
    pub failure: Option<u64>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            producer: None,
            subscription: None,
            class: None,
            failure: None,
            reason: None,
        }
    }

    /// Attaches a producer name.
    #[inline]
    pub fn with_producer(mut self, producer: impl Into<Arc<str>>) -> Self {
        self.producer = Some(producer.into());
        self
    }

    /// Attaches a subscription id.
    #[inline]
    pub fn with_subscription(mut self, id: u64) -> Self {
        self.subscription = Some(id);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches class, failure identity and reason from a classified failure.
    #[inline]
    pub fn with_error(mut self, err: &ClassifiedError) -> Self {
        self.class = Some(err.class());
        self.failure = Some(err.cause().id());
        self.reason = Some(err.cause().to_string().into());
        self
    }

    /// Returns `true` for the three events that record the fate of a failure.
    #[inline]
    pub fn is_fate(&self) -> bool {
        matches!(
            self.kind,
            EventKind::ErrorDelivered | EventKind::UndeliverableReported | EventKind::Rethrown
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Classifier, Origin};
    use crate::error::Failure;

    #[test]
    fn sequence_is_monotonic() {
        let a = Event::new(EventKind::Subscribed);
        let b = Event::new(EventKind::Subscribed);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn with_error_records_identity() {
        let f = Failure::domain("boom");
        let err = Classifier::default().classified(f.clone(), Origin::ProducerBody);
        let ev = Event::new(EventKind::ErrorDelivered).with_error(&err);
        assert_eq!(ev.failure, Some(f.id()));
        assert_eq!(ev.class, Some(ErrorClass::OrdinaryProducer));
        assert_eq!(ev.reason.as_deref(), Some("domain: boom"));
        assert!(ev.is_fate());
        assert!(!Event::new(EventKind::CallbackFailed).is_fate());
    }
}
