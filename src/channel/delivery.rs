//! # DeliveryChannel: gated delivery to the subscriber.
//!
//! ```text
//!                      ┌──────────── Gate (AtomicU8) ────────────┐
//! try_deliver_value ──►│ open?  yes → invoker.invoke_next(v)     │
//!                      │        no  → Dropped (silent)           │
//! try_deliver_error ──►│ close() won? yes → invoker.invoke_error │──► Delivered
//!                      │              no  → Undeliverable        │
//! try_deliver_completion ─ same as error, with invoke_complete   │
//!                      └─────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Terminal delivery is decided by winning the gate's `Open → Closed`
//!   transition, so at most one terminal callback ever runs.
//! - A failing callback closes the gate and returns the failure to the caller.
//! - The gate is an atomic; nothing is locked while a callback runs.

use std::sync::Arc;

use crate::channel::{Gate, Subscription};
use crate::classify::ClassifiedError;
use crate::consumer::ConsumerInvoker;
use crate::error::Failure;

/// Outcome of a value delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// `on_next` ran and returned normally.
    Delivered,
    /// The channel was closed; the value was dropped without invoking anything.
    Dropped,
}

/// Outcome of a terminal (error/completion) delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    /// The terminal callback ran and returned normally.
    Delivered,
    /// The channel was already closed; nothing was invoked.
    Undeliverable,
}

/// Gated delivery path from producer to subscriber.
pub struct DeliveryChannel<T> {
    gate: Arc<Gate>,
    invoker: ConsumerInvoker<T>,
}

impl<T> DeliveryChannel<T> {
    /// Returns `true` while deliveries may still happen.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.gate.is_open()
    }

    /// Closes the channel; returns `true` if this call performed the transition.
    pub fn close(&self) -> bool {
        self.gate.close()
    }

    /// Shared gate.
    pub fn gate(&self) -> &Arc<Gate> {
        &self.gate
    }

    /// A new consumer-facing handle for this channel.
    pub fn subscription(&self) -> Subscription {
        Subscription::new(self.gate.clone())
    }
}

impl<T: 'static> DeliveryChannel<T> {
    pub(crate) fn new(gate: Arc<Gate>, invoker: ConsumerInvoker<T>) -> Self {
        Self { gate, invoker }
    }

    /// Hands the subscription to the subscriber.
    ///
    /// A failing `on_subscribe` closes the channel.
    pub(crate) fn attach(&self) -> Result<(), ClassifiedError> {
        self.invoker
            .invoke_subscribe(self.subscription())
            .inspect_err(|_| {
                self.gate.close();
            })
    }

    /// Delivers a value if the channel is open; drops it silently otherwise.
    pub fn try_deliver_value(&self, value: T) -> Result<Delivery, ClassifiedError> {
        if !self.gate.is_open() {
            return Ok(Delivery::Dropped);
        }
        match self.invoker.invoke_next(value) {
            Ok(()) => Ok(Delivery::Delivered),
            Err(err) => {
                self.gate.close();
                Err(err)
            }
        }
    }

    /// Closes the channel and forwards `error` to `on_error`.
    ///
    /// Returns [`Terminal::Undeliverable`] without invoking anything if the
    /// channel was already closed. A failing `on_error` is returned as `Err`,
    /// never looped back.
    pub fn try_deliver_error(&self, error: Failure) -> Result<Terminal, ClassifiedError> {
        if !self.gate.close() {
            return Ok(Terminal::Undeliverable);
        }
        self.invoker.invoke_error(error).map(|()| Terminal::Delivered)
    }

    /// Closes the channel and invokes `on_complete`.
    pub fn try_deliver_completion(&self) -> Result<Terminal, ClassifiedError> {
        if !self.gate.close() {
            return Ok(Terminal::Undeliverable);
        }
        self.invoker.invoke_complete().map(|()| Terminal::Delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    use crate::classify::{Callback, Classifier, ErrorKind, Origin};
    use crate::consumer::FnSubscriber;
    use crate::core::RouteScope;
    use crate::events::Bus;
    use crate::report::UncaughtReporter;

    fn channel_with(sub: FnSubscriber<u32>) -> DeliveryChannel<u32> {
        let scope = Arc::new(RouteScope::new(
            "test".into(),
            1,
            Arc::new(Classifier::default()),
            UncaughtReporter::default(),
            Bus::new(16),
        ));
        let gate = Arc::new(Gate::new(1, CancellationToken::new()));
        DeliveryChannel::new(gate, ConsumerInvoker::new(Arc::new(sub), scope))
    }

    fn journal() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn recording(log: &Arc<Mutex<Vec<String>>>) -> FnSubscriber<u32> {
        let (n, e, c) = (log.clone(), log.clone(), log.clone());
        FnSubscriber::new(move |v: u32| {
            n.lock().unwrap().push(format!("next:{v}"));
            Ok(())
        })
        .with_error(move |f: Failure| {
            e.lock().unwrap().push(format!("error:{}", f.message()));
            Ok(())
        })
        .with_complete(move || {
            c.lock().unwrap().push("complete".into());
            Ok(())
        })
    }

    #[test]
    fn values_flow_while_open_and_drop_after_close() {
        let log = journal();
        let ch = channel_with(recording(&log));

        assert_eq!(ch.try_deliver_value(1).unwrap(), Delivery::Delivered);
        assert!(ch.close());
        assert_eq!(ch.try_deliver_value(2).unwrap(), Delivery::Dropped);
        assert_eq!(*log.lock().unwrap(), vec!["next:1"]);
    }

    #[test]
    fn only_one_terminal_event() {
        let log = journal();
        let ch = channel_with(recording(&log));

        assert_eq!(
            ch.try_deliver_error(Failure::domain("first")).unwrap(),
            Terminal::Delivered
        );
        assert_eq!(
            ch.try_deliver_error(Failure::domain("second")).unwrap(),
            Terminal::Undeliverable
        );
        assert_eq!(ch.try_deliver_completion().unwrap(), Terminal::Undeliverable);
        assert_eq!(ch.try_deliver_value(3).unwrap(), Delivery::Dropped);
        assert_eq!(*log.lock().unwrap(), vec!["error:first"]);
    }

    #[test]
    fn failing_on_next_closes_and_returns_consumer_error() {
        let ch = channel_with(FnSubscriber::new(|_: u32| Err(Failure::domain("bad value"))));

        let err = ch.try_deliver_value(1).expect_err("consumer failure");
        assert_eq!(err.origin(), Origin::ConsumerCallback(Callback::Next));
        assert_eq!(err.kind(), ErrorKind::Ordinary);
        assert!(!ch.is_open());
        assert!(ch.gate().token().is_cancelled());
    }

    #[test]
    fn panicking_on_next_is_caught() {
        let ch = channel_with(FnSubscriber::new(|_: u32| panic!("subscriber bug")));

        let err = ch.try_deliver_value(1).expect_err("panic becomes failure");
        assert_eq!(err.cause().message(), "subscriber bug");
        assert!(!ch.is_open());
    }

    #[test]
    fn failing_on_error_is_returned_not_looped() {
        let calls = Arc::new(Mutex::new(0));
        let c = calls.clone();
        let ch = channel_with(FnSubscriber::new(|_: u32| Ok(())).with_error(move |_| {
            *c.lock().unwrap() += 1;
            Err(Failure::linkage("handler broke"))
        }));

        let err = ch
            .try_deliver_error(Failure::domain("producer"))
            .expect_err("on_error failure rethrown");
        assert_eq!(err.origin(), Origin::ConsumerCallback(Callback::Error));
        assert!(err.is_fatal());
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn disposal_inside_on_next_does_not_deadlock() {
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let (on_next_slot, on_subscribe_slot) = (slot.clone(), slot.clone());
        let ch = channel_with(
            FnSubscriber::new(move |_: u32| {
                if let Some(s) = on_next_slot.lock().unwrap().as_ref() {
                    s.dispose();
                }
                Ok(())
            })
            .with_subscribe(move |s| {
                *on_subscribe_slot.lock().unwrap() = Some(s);
            }),
        );

        ch.attach().unwrap();
        assert_eq!(ch.try_deliver_value(1).unwrap(), Delivery::Delivered);
        assert!(!ch.is_open());
        assert_eq!(ch.try_deliver_value(2).unwrap(), Delivery::Dropped);
    }
}
