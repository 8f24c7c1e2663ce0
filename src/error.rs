//! Error types used by the bridge, producers and subscribers.
//!
//! This module defines:
//!
//! - [`Failure`]: the unit of failure flowing through the bridge (what a producer
//!   body or a subscriber callback "throws").
//! - [`ErrorCategory`]: the closed set of categories a [`Failure`] belongs to;
//!   the [`Classifier`](crate::Classifier) maps categories to fatal/ordinary.
//! - [`SendError`]: returned by [`ProducerContext::send`](crate::ProducerContext::send).
//! - [`ProducerError`]: what a producer body returns on failure.
//! - [`BridgeError`]: what an attached subscription rethrows to its caller.
//!
//! Every enum provides `as_label` (stable snake_case label for logs/metrics)
//! and `as_message`.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use thiserror::Error;

use crate::classify::{ClassifiedError, ErrorKind, Origin};

/// Global counter handing out failure identities.
static FAILURE_ID: AtomicU64 = AtomicU64::new(1);

/// Category of a [`Failure`].
///
/// The category is the only input of the [`Classifier`](crate::Classifier):
/// whether a failure is fatal is decided by configuration, not by inspecting
/// the concrete error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Application/domain failure.
    Domain,
    /// I/O failure.
    Io,
    /// Operation timed out.
    Timeout,
    /// A panic caught at a producer or callback boundary.
    Panic,
    /// Memory exhaustion.
    OutOfMemory,
    /// Stack exhaustion.
    StackOverflow,
    /// Loading/linking of code or symbols failed.
    Linkage,
    /// Failure of the hosting runtime or virtual machine.
    VirtualMachine,
    /// An internal runtime invariant was broken.
    InvariantViolation,
    /// User-defined category (can be registered as fatal in the classifier).
    Custom(&'static str),
}

impl ErrorCategory {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ErrorCategory::Domain => "domain",
            ErrorCategory::Io => "io",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Panic => "panic",
            ErrorCategory::OutOfMemory => "out_of_memory",
            ErrorCategory::StackOverflow => "stack_overflow",
            ErrorCategory::Linkage => "linkage",
            ErrorCategory::VirtualMachine => "virtual_machine",
            ErrorCategory::InvariantViolation => "invariant_violation",
            ErrorCategory::Custom(name) => name,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

struct FailureInner {
    id: u64,
    category: ErrorCategory,
    message: Cow<'static, str>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

/// # A failure raised by a producer body or a subscriber callback.
///
/// Cheap to clone: clones share the same identity ([`Failure::id`]), so a
/// failure can be followed through the routing protocol and compared with
/// [`Failure::same_as`].
///
/// # Example
/// ```
/// use rxbridge::{ErrorCategory, Failure};
///
/// let err = Failure::domain("invalid order");
/// assert_eq!(err.category(), ErrorCategory::Domain);
/// assert!(err.same_as(&err.clone()));
/// assert!(!err.same_as(&Failure::domain("invalid order")));
/// ```
#[derive(Clone)]
pub struct Failure {
    inner: Arc<FailureInner>,
}

impl Failure {
    /// Creates a failure with the given category and message.
    pub fn new(category: ErrorCategory, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            inner: Arc::new(FailureInner {
                id: FAILURE_ID.fetch_add(1, AtomicOrdering::Relaxed),
                category,
                message: message.into(),
                source: None,
            }),
        }
    }

    /// Creates a failure wrapping an underlying error.
    pub fn with_source<E>(
        category: ErrorCategory,
        message: impl Into<Cow<'static, str>>,
        source: E,
    ) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(FailureInner {
                id: FAILURE_ID.fetch_add(1, AtomicOrdering::Relaxed),
                category,
                message: message.into(),
                source: Some(Box::new(source)),
            }),
        }
    }

    /// Shorthand for an [`ErrorCategory::Domain`] failure.
    pub fn domain(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCategory::Domain, message)
    }

    /// Shorthand for an [`ErrorCategory::Linkage`] failure.
    pub fn linkage(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCategory::Linkage, message)
    }

    /// Shorthand for an [`ErrorCategory::OutOfMemory`] failure.
    pub fn out_of_memory(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCategory::OutOfMemory, message)
    }

    /// Converts a caught panic payload into an [`ErrorCategory::Panic`] failure.
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        Self::new(ErrorCategory::Panic, message)
    }

    /// Process-unique identity shared by all clones of this failure.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Category used for classification.
    pub fn category(&self) -> ErrorCategory {
        self.inner.category
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// Returns `true` if both values are clones of the same failure.
    pub fn same_as(&self, other: &Failure) -> bool {
        self.inner.id == other.inner.id
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.inner.category, self.inner.message)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("id", &self.inner.id)
            .field("category", &self.inner.category)
            .field("message", &self.inner.message)
            .field("source", &self.inner.source)
            .finish()
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// # Errors returned by [`ProducerContext::send`](crate::ProducerContext::send).
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum SendError {
    /// The channel is closed (disposed, terminated or cancelled); the value was dropped.
    #[error("channel closed")]
    Closed,

    /// The subscriber's `on_next` failed; the failure is rethrown to the sender.
    #[error("consumer callback failed: {0}")]
    Consumer(ClassifiedError),
}

impl SendError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SendError::Closed => "send_closed",
            SendError::Consumer(_) => "send_consumer_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SendError::Closed => "channel closed".to_string(),
            SendError::Consumer(err) => format!("consumer failed: {}", err.cause()),
        }
    }
}

/// # Errors returned by a producer body.
///
/// `?` on a [`SendError`] or a [`Failure`] converts into this type.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum ProducerError {
    /// The body failed; routed through the producer-side rules.
    #[error("producer failed: {0}")]
    Failed(Failure),

    /// A send failed; a consumer failure keeps its consumer origin.
    #[error(transparent)]
    Send(#[from] SendError),

    /// The body observed cancellation and stopped (not an error).
    #[error("producer cancelled")]
    Cancelled,
}

impl From<Failure> for ProducerError {
    fn from(failure: Failure) -> Self {
        ProducerError::Failed(failure)
    }
}

impl ProducerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProducerError::Failed(_) => "producer_failed",
            ProducerError::Send(e) => e.as_label(),
            ProducerError::Cancelled => "producer_cancelled",
        }
    }

    /// Indicates whether this outcome is a cancellation rather than a failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            ProducerError::Cancelled | ProducerError::Send(SendError::Closed)
        )
    }
}

/// # Errors rethrown to the caller of an attached subscription.
///
/// Only failures whose fate is "rethrow synchronously" surface here; ordinary
/// producer failures are delivered to `on_error` and undeliverable ones go to the
/// ambient handler.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum BridgeError {
    /// The producer body raised a fatal failure.
    #[error("fatal producer failure: {error}")]
    FatalProducer {
        /// The classified failure.
        error: ClassifiedError,
    },

    /// A subscriber callback failed.
    #[error("consumer callback failure: {error}")]
    ConsumerCallback {
        /// The classified failure.
        error: ClassifiedError,
    },
}

impl BridgeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use rxbridge::{BridgeError, Classifier, Failure, Origin};
    ///
    /// let error = Classifier::default().classified(Failure::linkage("missing symbol"), Origin::ProducerBody);
    /// let err = BridgeError::FatalProducer { error };
    /// assert_eq!(err.as_label(), "bridge_fatal_producer");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            BridgeError::FatalProducer { .. } => "bridge_fatal_producer",
            BridgeError::ConsumerCallback { .. } => "bridge_consumer_callback",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            BridgeError::FatalProducer { error } => format!("fatal: {}", error.cause()),
            BridgeError::ConsumerCallback { error } => {
                format!("{} failed: {}", error.origin(), error.cause())
            }
        }
    }

    /// The classified failure carried by this error.
    pub fn error(&self) -> &ClassifiedError {
        match self {
            BridgeError::FatalProducer { error } | BridgeError::ConsumerCallback { error } => {
                error
            }
        }
    }

    /// The original failure.
    pub fn cause(&self) -> &Failure {
        self.error().cause()
    }
}

impl BridgeError {
    /// Wraps a failure whose fate is "rethrow to the caller".
    ///
    /// Only fatal producer failures and consumer callback failures get that fate;
    /// an ordinary producer failure is delivered or reported and yields `None`.
    pub(crate) fn rethrown(error: ClassifiedError) -> Option<Self> {
        match (error.origin(), error.kind()) {
            (Origin::ProducerBody, ErrorKind::Fatal) => Some(BridgeError::FatalProducer { error }),
            (Origin::ProducerBody, ErrorKind::Ordinary) => None,
            (Origin::ConsumerCallback(_), _) => Some(BridgeError::ConsumerCallback { error }),
        }
    }
}
