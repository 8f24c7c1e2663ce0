//! Per-subscription routing scope.
//!
//! Bundles what both the producer side and the consumer side need to route a
//! failure: identity (producer name, subscription id), the classifier, the
//! reporter and the event bus.

use std::sync::Arc;

use crate::classify::{ClassifiedError, Classifier, Origin};
use crate::error::Failure;
use crate::events::{Bus, Event, EventKind};
use crate::report::{HandlerContext, UncaughtReporter, Undeliverable};

pub(crate) struct RouteScope {
    pub(crate) producer: Arc<str>,
    pub(crate) subscription: u64,
    classifier: Arc<Classifier>,
    reporter: UncaughtReporter,
    bus: Bus,
}

impl RouteScope {
    pub(crate) fn new(
        producer: Arc<str>,
        subscription: u64,
        classifier: Arc<Classifier>,
        reporter: UncaughtReporter,
        bus: Bus,
    ) -> Self {
        Self {
            producer,
            subscription,
            classifier,
            reporter,
            bus,
        }
    }

    pub(crate) fn classify(&self, cause: Failure, origin: Origin) -> ClassifiedError {
        self.classifier.classified(cause, origin)
    }

    /// Event of `kind` tagged with this scope's producer and subscription.
    pub(crate) fn event(&self, kind: EventKind) -> Event {
        Event::new(kind)
            .with_producer(self.producer.clone())
            .with_subscription(self.subscription)
    }

    pub(crate) fn publish(&self, ev: Event) {
        self.bus.publish(ev);
    }

    /// Wraps `err` as undeliverable and hands it to the ambient handler.
    pub(crate) fn report(&self, err: ClassifiedError) {
        tracing::warn!(
            producer = %self.producer,
            subscription = self.subscription,
            class = err.class().as_label(),
            "reporting undeliverable failure: {}",
            err.cause()
        );
        let ctx = HandlerContext {
            producer: self.producer.clone(),
            subscription: self.subscription,
            origin: err.origin(),
        };
        let reported = self.event(EventKind::UndeliverableReported).with_error(&err);
        let failure = err.cause().id();

        if let Some(panic) = self.reporter.report(&ctx, Undeliverable::new(err)) {
            let mut ev = self
                .event(EventKind::HandlerPanicked)
                .with_reason(panic.message().to_string());
            ev.failure = Some(failure);
            self.publish(ev);
        }
        self.publish(reported);
    }
}
