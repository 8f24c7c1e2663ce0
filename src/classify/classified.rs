//! Classified failures: cause, kind and origin.

use std::fmt;

use thiserror::Error;

use crate::classify::ErrorKind;
use crate::error::Failure;

/// Subscriber callback in which a consumer-side failure was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Callback {
    /// `on_subscribe`
    Subscribe,
    /// `on_next`
    Next,
    /// `on_error`
    Error,
    /// `on_complete`
    Complete,
}

impl Callback {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Callback::Subscribe => "on_subscribe",
            Callback::Next => "on_next",
            Callback::Error => "on_error",
            Callback::Complete => "on_complete",
        }
    }
}

/// Failure domain a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Raised by the producer body (including cleanup after cancellation).
    ProducerBody,
    /// Raised by a subscriber callback.
    ConsumerCallback(Callback),
}

impl Origin {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Origin::ProducerBody => "producer_body",
            Origin::ConsumerCallback(cb) => cb.as_label(),
        }
    }

    /// Returns `true` for consumer-side origins.
    pub fn is_consumer(&self) -> bool {
        matches!(self, Origin::ConsumerCallback(_))
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Four-way error taxonomy (origin × kind).
///
/// Cancellation is not part of it: it is an outcome
/// ([`RunOutcome::Cancelled`](crate::RunOutcome::Cancelled)), never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    OrdinaryProducer,
    FatalProducer,
    OrdinaryConsumerCallback,
    FatalConsumerCallback,
}

impl ErrorClass {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ErrorClass::OrdinaryProducer => "ordinary_producer",
            ErrorClass::FatalProducer => "fatal_producer",
            ErrorClass::OrdinaryConsumerCallback => "ordinary_consumer_callback",
            ErrorClass::FatalConsumerCallback => "fatal_consumer_callback",
        }
    }
}

/// A failure together with its classification and origin.
///
/// Immutable once built (see [`Classifier::classified`](crate::Classifier::classified)).
#[derive(Error, Debug, Clone)]
#[error("{kind} failure in {origin}: {cause}")]
pub struct ClassifiedError {
    #[source]
    cause: Failure,
    kind: ErrorKind,
    origin: Origin,
}

impl ClassifiedError {
    pub(crate) fn new(cause: Failure, kind: ErrorKind, origin: Origin) -> Self {
        Self {
            cause,
            kind,
            origin,
        }
    }

    /// The original failure.
    pub fn cause(&self) -> &Failure {
        &self.cause
    }

    /// Fatal or ordinary.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Where the failure was raised.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Shorthand for `kind() == ErrorKind::Fatal`.
    pub fn is_fatal(&self) -> bool {
        self.kind == ErrorKind::Fatal
    }

    /// Taxonomy class of this failure.
    pub fn class(&self) -> ErrorClass {
        match (self.origin.is_consumer(), self.kind) {
            (false, ErrorKind::Ordinary) => ErrorClass::OrdinaryProducer,
            (false, ErrorKind::Fatal) => ErrorClass::FatalProducer,
            (true, ErrorKind::Ordinary) => ErrorClass::OrdinaryConsumerCallback,
            (true, ErrorKind::Fatal) => ErrorClass::FatalConsumerCallback,
        }
    }

    /// Unwraps the original failure.
    pub fn into_cause(self) -> Failure {
        self.cause
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;

    #[test]
    fn class_covers_origin_and_kind() {
        let c = Classifier::default();
        let cases = [
            (Failure::domain("a"), Origin::ProducerBody, ErrorClass::OrdinaryProducer),
            (Failure::linkage("b"), Origin::ProducerBody, ErrorClass::FatalProducer),
            (
                Failure::domain("c"),
                Origin::ConsumerCallback(Callback::Next),
                ErrorClass::OrdinaryConsumerCallback,
            ),
            (
                Failure::out_of_memory("d"),
                Origin::ConsumerCallback(Callback::Error),
                ErrorClass::FatalConsumerCallback,
            ),
        ];
        for (failure, origin, class) in cases {
            assert_eq!(c.classified(failure, origin).class(), class);
        }
    }

    #[test]
    fn display_mentions_kind_and_origin() {
        let err = Classifier::default().classified(
            Failure::linkage("missing"),
            Origin::ConsumerCallback(Callback::Complete),
        );
        assert_eq!(
            err.to_string(),
            "fatal failure in on_complete: linkage: missing"
        );
    }
}
