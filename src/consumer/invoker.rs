//! # ConsumerInvoker: guarded subscriber callbacks.
//!
//! Every call into the subscriber goes through [`ConsumerInvoker`]:
//!
//! ```text
//! invoke_next(v) ──► catch_unwind(subscriber.on_next(v))
//!                        ├─ Ok(())        → Ok(())
//!                        ├─ Err(failure)  ┐
//!                        └─ panic         ┴─► classify(origin = ConsumerCallback)
//!                                             → publish CallbackFailed
//!                                             → Err(ClassifiedError) to the immediate caller
//! ```
//!
//! ## Rules
//! - A callback failure is **never** routed to `on_error` and never reported here;
//!   the caller decides (see [`ProducerContext::send`](crate::ProducerContext::send)
//!   and the runner boundary).
//! - Fatal and ordinary failures take the same path out; the kind only changes
//!   the log level. Fatal failures are therefore always rethrown.
//!
//! **Warning**: `AssertUnwindSafe` is used; a subscriber panicking while holding
//! its own lock may leave that state poisoned.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use crate::channel::Subscription;
use crate::classify::{Callback, ClassifiedError, ErrorKind, Origin};
use crate::consumer::SubscriberRef;
use crate::core::RouteScope;
use crate::error::Failure;
use crate::events::EventKind;

/// Guarded access to a subscriber.
pub(crate) struct ConsumerInvoker<T> {
    subscriber: SubscriberRef<T>,
    scope: Arc<RouteScope>,
}

impl<T: 'static> ConsumerInvoker<T> {
    pub(crate) fn new(subscriber: SubscriberRef<T>, scope: Arc<RouteScope>) -> Self {
        Self { subscriber, scope }
    }

    pub(crate) fn invoke_subscribe(&self, subscription: Subscription) -> Result<(), ClassifiedError> {
        self.guard(Callback::Subscribe, || {
            self.subscriber.on_subscribe(subscription);
            Ok(())
        })
    }

    pub(crate) fn invoke_next(&self, value: T) -> Result<(), ClassifiedError> {
        self.guard(Callback::Next, || self.subscriber.on_next(value))
    }

    pub(crate) fn invoke_error(&self, error: Failure) -> Result<(), ClassifiedError> {
        self.guard(Callback::Error, || self.subscriber.on_error(error))
    }

    pub(crate) fn invoke_complete(&self) -> Result<(), ClassifiedError> {
        self.guard(Callback::Complete, || self.subscriber.on_complete())
    }

    fn guard<F>(&self, callback: Callback, f: F) -> Result<(), ClassifiedError>
    where
        F: FnOnce() -> Result<(), Failure>,
    {
        let res = catch_unwind(AssertUnwindSafe(f))
            .unwrap_or_else(|payload| Err(Failure::from_panic(payload)));

        res.map_err(|cause| {
            let err = self
                .scope
                .classify(cause, Origin::ConsumerCallback(callback));
            match err.kind() {
                ErrorKind::Fatal => tracing::error!(
                    producer = %self.scope.producer,
                    subscription = self.scope.subscription,
                    subscriber = self.subscriber.name(),
                    callback = callback.as_label(),
                    "fatal failure in subscriber callback, rethrowing: {}",
                    err.cause()
                ),
                ErrorKind::Ordinary => tracing::debug!(
                    producer = %self.scope.producer,
                    subscription = self.scope.subscription,
                    subscriber = self.subscriber.name(),
                    callback = callback.as_label(),
                    "subscriber callback failed, rethrowing: {}",
                    err.cause()
                ),
            }
            self.scope
                .publish(self.scope.event(EventKind::CallbackFailed).with_error(&err));
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;
    use crate::consumer::FnSubscriber;
    use crate::error::ErrorCategory;
    use crate::events::Bus;
    use crate::report::UncaughtReporter;

    fn invoker(sub: FnSubscriber<u32>, bus: Bus) -> ConsumerInvoker<u32> {
        let scope = Arc::new(RouteScope::new(
            "invoker".into(),
            9,
            Arc::new(Classifier::default()),
            UncaughtReporter::default(),
            bus,
        ));
        ConsumerInvoker::new(Arc::new(sub), scope)
    }

    #[test]
    fn panic_in_callback_becomes_consumer_failure() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let inv = invoker(FnSubscriber::new(|_: u32| panic!("boom")), bus);

        let err = inv.invoke_next(1).expect_err("panic must be caught");
        assert_eq!(err.origin(), Origin::ConsumerCallback(Callback::Next));
        assert_eq!(err.cause().category(), ErrorCategory::Panic);
        assert_eq!(err.kind(), ErrorKind::Ordinary);

        let ev = rx.try_recv().expect("callback failure event");
        assert_eq!(ev.kind, EventKind::CallbackFailed);
        assert_eq!(ev.subscription, Some(9));
        assert_eq!(ev.failure, Some(err.cause().id()));
    }

    #[test]
    fn fatal_callback_failure_keeps_kind() {
        let inv = invoker(
            FnSubscriber::new(|_: u32| Ok(())).with_complete(|| Err(Failure::out_of_memory("oom"))),
            Bus::new(8),
        );
        let err = inv.invoke_complete().expect_err("failure must be returned");
        assert!(err.is_fatal());
        assert_eq!(err.origin(), Origin::ConsumerCallback(Callback::Complete));
    }

    #[test]
    fn successful_callback_publishes_nothing() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let inv = invoker(FnSubscriber::new(|_: u32| Ok(())), bus);
        assert!(inv.invoke_next(3).is_ok());
        assert!(rx.try_recv().is_err());
    }
}
