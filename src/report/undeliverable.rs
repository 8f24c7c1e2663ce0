//! Undeliverable envelope.

use std::error::Error as StdError;
use std::fmt;

use crate::classify::{ClassifiedError, ErrorKind, Origin};
use crate::error::Failure;

/// Envelope around a failure that could not be delivered to the subscriber.
///
/// [`source`](StdError::source) and [`cause`](Undeliverable::cause) both expose the
/// original failure.
#[derive(Debug, Clone)]
pub struct Undeliverable {
    error: ClassifiedError,
}

impl Undeliverable {
    /// Wraps a classified failure.
    pub fn new(error: ClassifiedError) -> Self {
        Self { error }
    }

    /// The original failure.
    pub fn cause(&self) -> &Failure {
        self.error.cause()
    }

    /// Fatal or ordinary.
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// Where the failure was raised.
    pub fn origin(&self) -> Origin {
        self.error.origin()
    }

    /// The classified failure.
    pub fn error(&self) -> &ClassifiedError {
        &self.error
    }
}

impl fmt::Display for Undeliverable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "undeliverable failure: {}", self.error)
    }
}

impl StdError for Undeliverable {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.error.cause())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classifier;

    #[test]
    fn source_is_the_original_failure() {
        let f = Failure::domain("lost");
        let env = Undeliverable::new(
            Classifier::default().classified(f.clone(), Origin::ProducerBody),
        );
        assert!(env.cause().same_as(&f));
        assert_eq!(env.kind(), ErrorKind::Ordinary);
        let src = env.source().map(|s| s.to_string());
        assert_eq!(src.as_deref(), Some("domain: lost"));
        assert!(env.to_string().starts_with("undeliverable failure:"));
    }
}
