//! Error types for the Lion policy system.
//!
//! This module defines the error hierarchy used throughout the policy
//! crates. Ordinary "policy not satisfied" outcomes are not errors; they are
//! reported through an evaluation record and only become a [`PolicyError`]
//! when a caller asks for a `Result`.
//!
//! The root error type, `Error`, can wrap any of the subsystem-specific
//! errors, allowing for uniform error handling at the top level.

use thiserror::Error;

/// Root error type for the Lion policy system.
#[derive(Debug, Error)]
pub enum Error {
    /// Policy evaluation and validation errors
    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    /// Rule binding errors
    #[error("Binding error: {0}")]
    Binding(#[from] BindingError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors related to policy evaluation.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// The policy was evaluated and is not satisfied
    #[error("Policy denied: {}", .0.join("; "))]
    Denied(Vec<String>),

    /// The policy references constraints that cannot be evaluated
    #[error("Invalid policy: {}", .0.join("; "))]
    Invalid(Vec<String>),

    /// Failed to evaluate the policy
    #[error("Policy evaluation failed: {0}")]
    EvaluationFailed(String),
}

impl PolicyError {
    /// The problems carried by this error, if any.
    pub fn problems(&self) -> &[String] {
        match self {
            Self::Denied(problems) | Self::Invalid(problems) => problems,
            Self::EvaluationFailed(_) => &[],
        }
    }
}

/// Errors related to rule bindings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    /// The scope string is not a well-formed scope
    #[error("Malformed scope: '{0}'")]
    MalformedScope(String),

    /// The rule key is empty
    #[error("Rule key must not be empty")]
    EmptyRuleKey,
}

/// Result type used throughout the Lion policy crates.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_message_lists_all_problems() {
        let err = PolicyError::Denied(vec!["first".to_string(), "second".to_string()]);
        assert_eq!(err.to_string(), "Policy denied: first; second");
        assert_eq!(err.problems().len(), 2);
    }

    #[test]
    fn test_error_conversion() {
        let error: Error = BindingError::MalformedScope("a..b".to_string()).into();
        assert!(matches!(
            error,
            Error::Binding(BindingError::MalformedScope(ref s)) if s == "a..b"
        ));

        let error: Error = PolicyError::EvaluationFailed("boom".to_string()).into();
        assert!(matches!(error, Error::Policy(PolicyError::EvaluationFailed(_))));
        assert!(error.to_string().starts_with("Policy error:"));
    }
}
