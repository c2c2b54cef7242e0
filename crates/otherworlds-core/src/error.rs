//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// An illegal argument was supplied at the point of mutation.
    #[error("validation error: {0}")]
    Validation(String),

    /// The operation is inconsistent with the current state of the object.
    #[error("state error: {0}")]
    State(String),

    /// A persisted column could not be decoded.
    #[error("decode error in column {column}: {reason}")]
    Decode {
        /// The storage column that failed to decode.
        column: &'static str,
        /// The underlying decoder message.
        reason: String,
    },

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Shorthand for a `Validation` error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Shorthand for a `State` error.
    pub fn state(message: impl Into<String>) -> Self {
        Self::State(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_names_column() {
        let err = DomainError::Decode {
            column: "vulnerabilities",
            reason: "expected value at line 1 column 1".to_owned(),
        };

        assert_eq!(
            err.to_string(),
            "decode error in column vulnerabilities: expected value at line 1 column 1"
        );
    }

    #[test]
    fn test_shorthand_constructors_pick_the_right_variant() {
        assert!(matches!(
            DomainError::validation("empty name"),
            DomainError::Validation(msg) if msg == "empty name"
        ));
        assert!(matches!(
            DomainError::state("insufficient funds"),
            DomainError::State(msg) if msg == "insufficient funds"
        ));
    }
}
