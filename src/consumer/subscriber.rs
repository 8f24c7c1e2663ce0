//! # Subscriber trait and closure-backed subscriber.
//!
//! A [`Subscriber`] receives, in order: one `on_subscribe`, any number of
//! `on_next`, then at most one of `on_error`/`on_complete`.
//!
//! Callbacks are synchronous and may fail by returning `Err(Failure)` or by
//! panicking; both are caught by the bridge and never looped back into
//! `on_error`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use rxbridge::{Failure, FnSubscriber, SubscriberRef};
//!
//! let sub: SubscriberRef<u32> = Arc::new(
//!     FnSubscriber::new(|v: u32| {
//!         println!("got {v}");
//!         Ok(())
//!     })
//!     .with_error(|e: Failure| {
//!         eprintln!("stream failed: {e}");
//!         Ok(())
//!     }),
//! );
//! # drop(sub);
//! ```

use std::sync::Arc;

use crate::channel::Subscription;
use crate::error::{ErrorCategory, Failure};

/// Shared reference to a subscriber.
pub type SubscriberRef<T> = Arc<dyn Subscriber<T>>;

/// Push-based consumer.
///
/// ### Rules
/// - No callback is invoked after `on_error`/`on_complete` or after disposal.
/// - [`Subscription::dispose`] may be called from inside any callback.
/// - A failing callback closes the subscription.
pub trait Subscriber<T>: Send + Sync + 'static {
    /// Receives the subscription handle before any other callback.
    fn on_subscribe(&self, _subscription: Subscription) {}

    /// Receives the next value.
    fn on_next(&self, value: T) -> Result<(), Failure>;

    /// Receives the terminal producer failure.
    fn on_error(&self, error: Failure) -> Result<(), Failure>;

    /// Receives normal completion.
    fn on_complete(&self) -> Result<(), Failure> {
        Ok(())
    }

    /// Returns the subscriber name used in logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

type NextFn<T> = Box<dyn Fn(T) -> Result<(), Failure> + Send + Sync>;
type ErrorFn = Box<dyn Fn(Failure) -> Result<(), Failure> + Send + Sync>;
type CompleteFn = Box<dyn Fn() -> Result<(), Failure> + Send + Sync>;
type SubscribeFn = Box<dyn Fn(Subscription) + Send + Sync>;

/// Closure-backed [`Subscriber`].
///
/// Without an error callback, a delivered failure is answered with a new
/// "on_error not implemented" failure (carrying the original as its source), which
/// the bridge rethrows or reports like any callback failure.
pub struct FnSubscriber<T> {
    name: &'static str,
    next: NextFn<T>,
    error: Option<ErrorFn>,
    complete: Option<CompleteFn>,
    subscribe: Option<SubscribeFn>,
}

impl<T: 'static> FnSubscriber<T> {
    /// Creates a subscriber from an `on_next` closure.
    pub fn new<F>(next: F) -> Self
    where
        F: Fn(T) -> Result<(), Failure> + Send + Sync + 'static,
    {
        Self {
            name: "fn-subscriber",
            next: Box::new(next),
            error: None,
            complete: None,
            subscribe: None,
        }
    }

    /// Sets the `on_error` closure.
    pub fn with_error<F>(mut self, f: F) -> Self
    where
        F: Fn(Failure) -> Result<(), Failure> + Send + Sync + 'static,
    {
        self.error = Some(Box::new(f));
        self
    }

    /// Sets the `on_complete` closure.
    pub fn with_complete<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<(), Failure> + Send + Sync + 'static,
    {
        self.complete = Some(Box::new(f));
        self
    }

    /// Sets the `on_subscribe` closure.
    pub fn with_subscribe<F>(mut self, f: F) -> Self
    where
        F: Fn(Subscription) + Send + Sync + 'static,
    {
        self.subscribe = Some(Box::new(f));
        self
    }

    /// Sets the name used in logs.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<T: 'static> Subscriber<T> for FnSubscriber<T> {
    fn on_subscribe(&self, subscription: Subscription) {
        if let Some(f) = &self.subscribe {
            f(subscription);
        }
    }

    fn on_next(&self, value: T) -> Result<(), Failure> {
        (self.next)(value)
    }

    fn on_error(&self, error: Failure) -> Result<(), Failure> {
        match &self.error {
            Some(f) => f(error),
            None => Err(Failure::with_source(
                ErrorCategory::Domain,
                "on_error not implemented",
                error,
            )),
        }
    }

    fn on_complete(&self) -> Result<(), Failure> {
        match &self.complete {
            Some(f) => f(),
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
