//! # Bridge: connects producers to subscribers.
//!
//! The [`Bridge`] owns the event bus, the classifier, the uncaught reporter and the
//! scheduler. Each `subscribe*` call wires one fresh producer run to one
//! subscriber.
//!
//! ## Wiring per subscription
//! ```text
//! subscribe(producer, subscriber)
//!   ├─► id = next subscription id
//!   ├─► Gate(id, CancellationToken)
//!   ├─► RouteScope(producer name, id, classifier, reporter, bus)
//!   ├─► ConsumerInvoker(subscriber, scope)
//!   ├─► DeliveryChannel(gate, invoker)
//!   └─► ProducerRunner(producer, channel, scope)
//!          ├─ subscribe()          → run_attached().await  → Result<RunOutcome, BridgeError>
//!          └─ subscribe_detached() → scheduler.schedule(run_detached()) → ProducerHandle
//! ```
//!
//! ## Attached vs. detached
//! The mode is chosen explicitly per call, never inferred from the call stack:
//! - **Attached** (`subscribe`): the awaiting caller is the synchronous caller;
//!   fatal producer failures and consumer callback failures are returned as `Err`.
//! - **Detached** (`subscribe_detached`): no caller; those failures are reported to
//!   the ambient handler as undeliverable.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use rxbridge::{
//!     Bridge, BridgeConfig, Failure, FnSubscriber, ProducerContext, ProducerError,
//!     ProducerFn, ProducerRef, RunOutcome,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bridge = Bridge::new(BridgeConfig::default());
//!
//!     let producer: ProducerRef<u32> = ProducerFn::arc("ticks", |ctx: ProducerContext<u32>| async move {
//!         ctx.send(1).await?;
//!         ctx.send(2).await?;
//!         Ok::<(), ProducerError>(())
//!     });
//!
//!     let subscriber = FnSubscriber::new(|v: u32| {
//!         println!("tick {v}");
//!         Ok(())
//!     })
//!     .with_error(|e: Failure| {
//!         eprintln!("failed: {e}");
//!         Ok(())
//!     });
//!
//!     let outcome = bridge.subscribe(producer, Arc::new(subscriber)).await?;
//!     assert_eq!(outcome, RunOutcome::Completed);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::{
    channel::{DeliveryChannel, Gate},
    classify::Classifier,
    consumer::{ConsumerInvoker, SubscriberRef},
    core::{BridgeBuilder, BridgeConfig, RouteScope},
    error::BridgeError,
    events::{Bus, Event},
    producer::{ProducerHandle, ProducerRef, ProducerRunner, RunOutcome, Scheduler},
    report::UncaughtReporter,
};

/// Global subscription id counter.
static SUBSCRIPTION_ID: AtomicU64 = AtomicU64::new(1);

/// Connects producers to subscribers under the routing protocol.
pub struct Bridge {
    cfg: BridgeConfig,
    bus: Bus,
    classifier: Arc<Classifier>,
    reporter: UncaughtReporter,
    scheduler: Arc<dyn Scheduler>,
}

impl Bridge {
    /// Creates a bridge with default collaborators (`LogHandler`, `TokioScheduler`).
    pub fn new(cfg: BridgeConfig) -> Self {
        BridgeBuilder::new(cfg).build()
    }

    /// Creates a builder.
    pub fn builder(cfg: BridgeConfig) -> BridgeBuilder {
        BridgeBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: BridgeConfig,
        bus: Bus,
        classifier: Arc<Classifier>,
        reporter: UncaughtReporter,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            cfg,
            bus,
            classifier,
            reporter,
            scheduler,
        }
    }

    /// Configuration this bridge was built with.
    pub fn config(&self) -> &BridgeConfig {
        &self.cfg
    }

    /// Classifier in use.
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Creates a receiver for routing events published after this call.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Event bus (for listeners such as `LogWriter`).
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Runs `producer` for `subscriber` with the caller attached.
    ///
    /// ### Returns
    /// - `Ok(outcome)` when every failure was delivered to `on_error`, reported, or
    ///   there was none.
    /// - `Err(BridgeError)` when a failure's fate is "rethrow to the caller": a
    ///   fatal producer failure, or a subscriber callback failure that reached
    ///   this boundary.
    pub async fn subscribe<T: Send + 'static>(
        &self,
        producer: ProducerRef<T>,
        subscriber: SubscriberRef<T>,
    ) -> Result<RunOutcome, BridgeError> {
        self.runner(producer, subscriber).run_attached().await
    }

    /// Runs `producer` for `subscriber` on the scheduler, with no caller attached.
    ///
    /// Failures that would be rethrown in attached mode are reported to the
    /// ambient handler.
    pub fn subscribe_detached<T: Send + 'static>(
        &self,
        producer: ProducerRef<T>,
        subscriber: SubscriberRef<T>,
    ) -> ProducerHandle {
        let runner = self.runner(producer, subscriber);
        let subscription = runner.subscription();
        let join = self.scheduler.schedule(Box::pin(runner.run_detached()));
        ProducerHandle::new(subscription, join)
    }

    fn runner<T: Send + 'static>(
        &self,
        producer: ProducerRef<T>,
        subscriber: SubscriberRef<T>,
    ) -> ProducerRunner<T> {
        let id = SUBSCRIPTION_ID.fetch_add(1, AtomicOrdering::Relaxed);
        let scope = Arc::new(RouteScope::new(
            Arc::from(producer.name()),
            id,
            self.classifier.clone(),
            self.reporter.clone(),
            self.bus.clone(),
        ));
        let gate = Arc::new(Gate::new(id, CancellationToken::new()));
        let invoker = ConsumerInvoker::new(subscriber, scope.clone());
        let channel = Arc::new(DeliveryChannel::new(gate, invoker));
        ProducerRunner::new(producer, channel, scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::FnSubscriber;
    use crate::error::{ErrorCategory, Failure, ProducerError};
    use crate::events::EventKind;
    use crate::producer::{ProducerContext, ProducerFn};
    use crate::report::CapturingHandler;

    fn counting(name: &'static str) -> ProducerRef<u32> {
        ProducerFn::arc(name, |ctx: ProducerContext<u32>| async move {
            ctx.send(1).await?;
            Ok::<(), ProducerError>(())
        })
    }

    #[tokio::test]
    async fn each_subscribe_gets_a_fresh_subscription() {
        let bridge = Bridge::new(BridgeConfig::default());
        let mut rx = bridge.events();

        let sub: SubscriberRef<u32> = Arc::new(FnSubscriber::new(|_: u32| Ok(())));
        let p = counting("fresh");
        assert_eq!(
            bridge.subscribe(p.clone(), sub.clone()).await.ok(),
            Some(RunOutcome::Completed)
        );
        assert_eq!(
            bridge.subscribe(p, sub).await.ok(),
            Some(RunOutcome::Completed)
        );

        let mut ids = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::Subscribed {
                assert_eq!(ev.producer.as_deref(), Some("fresh"));
                ids.extend(ev.subscription);
            }
        }
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn builder_classifier_overrides_config() {
        let capture = Arc::new(CapturingHandler::new());
        let bridge = Bridge::builder(BridgeConfig::default())
            .with_handler(capture.clone())
            .with_classifier(Classifier::new(Vec::<ErrorCategory>::new()))
            .build();

        // Linkage is no longer fatal: delivered to on_error instead of rethrown.
        let p: ProducerRef<u32> = ProducerFn::arc("linkage", |_ctx: ProducerContext<u32>| async move {
            Err::<(), ProducerError>(Failure::linkage("missing symbol").into())
        });
        let sub = FnSubscriber::new(|_: u32| Ok(())).with_error(|_| Ok(()));

        let outcome = bridge.subscribe(p, Arc::new(sub)).await;
        assert_eq!(outcome.ok(), Some(RunOutcome::ErrorDelivered));
        assert!(capture.is_empty());
    }

    #[tokio::test]
    async fn detached_handle_reports_outcome() {
        let bridge = Bridge::new(BridgeConfig::default());
        let handle = bridge.subscribe_detached(
            counting("detached"),
            Arc::new(FnSubscriber::new(|_: u32| Ok(()))),
        );
        assert_eq!(handle.join().await, RunOutcome::Completed);
    }
}
