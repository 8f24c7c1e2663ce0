//! # rxbridge
//!
//! **rxbridge** routes failures between a cancellable async producer and a
//! push-based subscriber.
//!
//! Every failure raised on either side receives exactly one fate:
//! - **delivered** to the subscriber's `on_error`,
//! - **reported** to an ambient handler as [`Undeliverable`], or
//! - **rethrown** to the caller of an attached subscription as [`BridgeError`].
//!
//! The fate depends on where the failure arose ([`Origin`]), whether it is fatal
//! or ordinary ([`ErrorKind`], decided by the [`Classifier`]) and whether the
//! subscription was still open at that moment.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌──────────────┐                              ┌──────────────────┐
//!   │   Producer   │  ctx.send(v) / Err(Failure)  │    Subscriber    │
//!   │ (async body) ├───────────────┐      ┌──────►│ on_subscribe     │
//!   └──────┬───────┘               ▼      │       │ on_next          │
//!          │ cancellation   ┌─────────────┴──┐    │ on_error         │
//!          │ token          │ DeliveryChannel│    │ on_complete      │
//!          └───────────────►│  (Gate: CAS    │    └────────┬─────────┘
//!                           │  Open→Closed)  │◄────────────┘ Err / panic
//!                           └───────┬────────┘   (caught, classified,
//!                                   │             channel closed)
//!                                   ▼
//!                     ┌──────────────────────────┐
//!                     │ ProducerRunner / Router  │
//!                     │ classify → assign fate   │
//!                     └──┬───────────┬────────┬──┘
//!                        ▼           ▼        ▼
//!                    on_error   Uncaught   Err(BridgeError)
//!                               Reporter   (attached caller)
//!                                   │
//!                                   ▼
//!                       AmbientExceptionHandler
//! ```
//!
//! ### Routing table
//! ```text
//! origin            kind      channel   fate
//! ───────────────── ───────── ───────── ─────────────────────────────────
//! producer body     ordinary  open      on_error
//! producer body     ordinary  closed    report (undeliverable)
//! producer body     fatal     any       rethrow (attached) / report (detached)
//! consumer callback any       any       rethrow (attached) / report (detached)
//! cancellation      -         -         none (not an error)
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                               |
//! |-------------------|--------------------------------------------------------------|--------------------------------------------------|
//! | **Bridge**        | Wire one producer run to one subscriber, attached or detached| [`Bridge`], [`BridgeBuilder`], [`RunOutcome`]    |
//! | **Producers**     | Cold async bodies with a cancellation-aware context           | [`Producer`], [`ProducerFn`], [`ProducerContext`]|
//! | **Subscribers**   | Push-based consumers; closures or trait impls                | [`Subscriber`], [`FnSubscriber`], [`Subscription`]|
//! | **Classification**| Fatal vs. ordinary, producer vs. consumer origin             | [`Classifier`], [`ClassifiedError`], [`ErrorClass`]|
//! | **Reporting**     | Sink of last resort for undeliverable failures               | [`AmbientExceptionHandler`], [`UncaughtReporter`]|
//! | **Events**        | Broadcast of every routing decision                          | [`Event`], [`EventKind`], [`Bus`]                |
//! | **Configuration** | Centralized settings                                         | [`BridgeConfig`]                                 |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use rxbridge::{
//!     Bridge, BridgeConfig, CapturingHandler, Failure, FnSubscriber, ProducerContext,
//!     ProducerError, ProducerFn, ProducerRef, RunOutcome,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let capture = Arc::new(CapturingHandler::new());
//!     let bridge = Bridge::builder(BridgeConfig::default())
//!         .with_handler(capture.clone())
//!         .build();
//!
//!     // An ordinary failure from the producer body reaches on_error.
//!     let producer: ProducerRef<u32> = ProducerFn::arc("feed", |ctx: ProducerContext<u32>| async move {
//!         ctx.send(1).await?;
//!         Err::<(), ProducerError>(Failure::domain("feed closed").into())
//!     });
//!     let subscriber = FnSubscriber::new(|_v: u32| Ok(()))
//!         .with_error(|e: Failure| {
//!             assert_eq!(e.message(), "feed closed");
//!             Ok(())
//!         });
//!
//!     let outcome = bridge.subscribe(producer, Arc::new(subscriber)).await;
//!     assert_eq!(outcome.ok(), Some(RunOutcome::ErrorDelivered));
//!     assert!(capture.is_empty());
//! }
//! ```
mod channel;
mod classify;
mod consumer;
mod core;
mod error;
mod events;
mod producer;
mod report;

// ---- Public re-exports ----

pub use channel::{ChannelState, Subscription};
pub use classify::{Callback, ClassifiedError, Classifier, DEFAULT_FATAL, ErrorClass, ErrorKind, Origin};
pub use consumer::{FnSubscriber, Subscriber, SubscriberRef};
pub use self::core::{Bridge, BridgeBuilder, BridgeConfig};
pub use error::{BridgeError, ErrorCategory, Failure, ProducerError, SendError};
pub use events::{Bus, Event, EventKind};
pub use producer::{
    BoxRunFuture, Producer, ProducerContext, ProducerFn, ProducerHandle, ProducerRef, RunOutcome,
    Scheduler, TokioScheduler,
};
pub use report::{
    AmbientExceptionHandler, CapturingHandler, HandlerContext, LogHandler, UncaughtReporter,
    Undeliverable,
};

// Optional: expose a simple built-in event logger (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
mod observers;
#[cfg(feature = "logging")]
pub use observers::LogWriter;
