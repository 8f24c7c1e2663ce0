//! # Consumer side: subscriber trait and callback invoker.
//!
//! - [`Subscriber`]: push-based consumer with synchronous, fallible callbacks.
//! - [`FnSubscriber`]: closure-backed subscriber.
//! - [`ConsumerInvoker`]: wraps every callback call, catches failures and panics,
//!   and hands them back to the immediate caller.

mod invoker;
mod subscriber;

pub(crate) use invoker::ConsumerInvoker;
pub use subscriber::{FnSubscriber, Subscriber, SubscriberRef};
