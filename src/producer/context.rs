//! # Producer context: the running body's view of the subscription.
//!
//! Suspension points (`send`, `suspend_until`, `cancelled`) all observe disposal
//! before attempting delivery.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::channel::{Delivery, DeliveryChannel};
use crate::error::SendError;

/// Handle given to a producer body.
pub struct ProducerContext<T> {
    channel: Arc<DeliveryChannel<T>>,
}

impl<T> Clone for ProducerContext<T> {
    fn clone(&self) -> Self {
        Self {
            channel: self.channel.clone(),
        }
    }
}

impl<T: Send + 'static> ProducerContext<T> {
    pub(crate) fn new(channel: Arc<DeliveryChannel<T>>) -> Self {
        Self { channel }
    }

    /// Pushes `value` to the subscriber's `on_next`.
    ///
    /// ### Errors
    /// - [`SendError::Closed`]: the subscription is closed; the value was dropped.
    ///   Propagating it with `?` ends the run as a cancellation.
    /// - [`SendError::Consumer`]: `on_next` failed (returned `Err` or panicked).
    ///   The subscription is closed. Propagating it with `?` keeps its consumer
    ///   origin: it is never delivered to `on_error`.
    pub async fn send(&self, value: T) -> Result<(), SendError> {
        if !self.channel.is_open() {
            return Err(SendError::Closed);
        }
        match self.channel.try_deliver_value(value) {
            Ok(Delivery::Delivered) => Ok(()),
            Ok(Delivery::Dropped) => Err(SendError::Closed),
            Err(err) => Err(SendError::Consumer(err)),
        }
    }

    /// Returns `true` once the subscription is closed (disposed or terminated).
    pub fn is_cancelled(&self) -> bool {
        !self.channel.is_open()
    }

    /// Waits until the subscription is closed.
    pub async fn cancelled(&self) {
        self.channel.gate().token().cancelled().await
    }

    /// Cancellation token tied to the subscription.
    pub fn token(&self) -> CancellationToken {
        self.channel.gate().token().clone()
    }

    /// Subscription id.
    pub fn subscription_id(&self) -> u64 {
        self.channel.gate().id()
    }

    /// Suspends until `predicate` holds or the subscription closes.
    ///
    /// This busy-polls: between checks the task only yields to the scheduler, so
    /// a predicate that stays false keeps a worker thread busy. Prefer awaiting a
    /// real notification (or [`cancelled`](Self::cancelled)) for long waits; use
    /// this for conditions expected to flip within a few scheduler turns.
    pub async fn suspend_until<P>(&self, mut predicate: P) -> Result<(), SendError>
    where
        P: FnMut() -> bool,
    {
        loop {
            if self.is_cancelled() {
                return Err(SendError::Closed);
            }
            if predicate() {
                return Ok(());
            }
            tokio::select! {
                biased;
                _ = self.cancelled() => {}
                _ = tokio::task::yield_now() => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::channel::Gate;
    use crate::classify::Classifier;
    use crate::consumer::{ConsumerInvoker, FnSubscriber};
    use crate::core::RouteScope;
    use crate::events::Bus;
    use crate::report::UncaughtReporter;

    fn context() -> ProducerContext<u32> {
        let scope = Arc::new(RouteScope::new(
            "ctx".into(),
            3,
            Arc::new(Classifier::default()),
            UncaughtReporter::default(),
            Bus::new(8),
        ));
        let gate = Arc::new(Gate::new(3, CancellationToken::new()));
        let invoker = ConsumerInvoker::new(Arc::new(FnSubscriber::new(|_: u32| Ok(()))), scope);
        ProducerContext::new(Arc::new(DeliveryChannel::new(gate, invoker)))
    }

    #[tokio::test]
    async fn send_after_dispose_is_closed() {
        let ctx = context();
        assert!(ctx.send(1).await.is_ok());
        ctx.channel.subscription().dispose();
        assert!(ctx.is_cancelled());
        assert!(ctx.token().is_cancelled());
        assert!(matches!(ctx.send(2).await, Err(SendError::Closed)));
    }

    #[tokio::test]
    async fn suspend_until_returns_when_predicate_holds() {
        let ctx = context();
        let polls = AtomicUsize::new(0);
        let res = ctx
            .suspend_until(|| polls.fetch_add(1, Ordering::SeqCst) >= 2)
            .await;
        assert!(res.is_ok());
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn suspend_until_observes_disposal() {
        let ctx = context();
        let sub = ctx.channel.subscription();
        let waiter = {
            let ctx = ctx.clone();
            tokio::spawn(async move { ctx.suspend_until(|| false).await })
        };
        tokio::task::yield_now().await;
        sub.dispose();
        let res = waiter.await.expect("waiter task");
        assert!(matches!(res, Err(SendError::Closed)));
        assert_eq!(ctx.subscription_id(), 3);
    }
}
