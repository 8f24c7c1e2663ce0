//! # Producer abstraction and closure-backed implementation.
//!
//! A [`Producer`] has a stable [`name`](Producer::name) and an async
//! [`produce`](Producer::produce) method that receives a [`ProducerContext`].
//! Each subscription runs a **fresh** `produce` call, so producers are cold and
//! reusable.
//!
//! [`ProducerFn`] wraps a closure `F: Fn(ProducerContext<T>) -> Fut`, producing a
//! fresh future per subscription. Shared state, if any, goes into an explicit
//! `Arc<...>` captured by the closure.
//!
//! ## Example
//! ```rust
//! use rxbridge::{ProducerContext, ProducerError, ProducerFn, ProducerRef};
//!
//! let numbers: ProducerRef<u32> = ProducerFn::arc("numbers", |ctx: ProducerContext<u32>| async move {
//!     for n in 0..3 {
//!         ctx.send(n).await?;
//!     }
//!     Ok::<(), ProducerError>(())
//! });
//! assert_eq!(numbers.name(), "numbers");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ProducerError;
use crate::producer::ProducerContext;

/// Shared reference to a producer.
pub type ProducerRef<T> = Arc<dyn Producer<T>>;

/// # Asynchronous, cancellable producer of `T` values.
///
/// Implementations should return promptly once `ctx` reports cancellation
/// (`send` returning [`SendError::Closed`](crate::SendError::Closed) is the usual
/// signal; propagating it with `?` ends the run silently).
#[async_trait]
pub trait Producer<T: Send + 'static>: Send + Sync + 'static {
    /// Returns a stable, human-readable producer name.
    fn name(&self) -> &str;

    /// Runs one producer instance for one subscription.
    async fn produce(&self, ctx: ProducerContext<T>) -> Result<(), ProducerError>;
}

/// Function-backed producer.
#[derive(Debug)]
pub struct ProducerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ProducerFn<F> {
    /// Creates a new function-backed producer.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the producer and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<T, F, Fut> Producer<T> for ProducerFn<F>
where
    T: Send + 'static,
    F: Fn(ProducerContext<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ProducerError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn produce(&self, ctx: ProducerContext<T>) -> Result<(), ProducerError> {
        (self.f)(ctx).await
    }
}
