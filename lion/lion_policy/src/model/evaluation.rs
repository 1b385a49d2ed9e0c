//! Policy evaluation model.
//!
//! This module defines the record returned by an evaluation.

use chrono::{DateTime, Utc};
use lion_core::error::{PolicyError, Result};
use lion_core::id::PolicyId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome of a policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationResult {
    /// Every rule of the policy holds.
    Satisfied,

    /// At least one problem was recorded.
    Denied,
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Satisfied => write!(f, "Satisfied"),
            Self::Denied => write!(f, "Denied"),
        }
    }
}

/// A policy evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    /// The ID of the evaluated policy.
    pub policy_uid: PolicyId,

    /// The result of the evaluation.
    pub result: EvaluationResult,

    /// Every problem recorded during the evaluation, in order.
    pub problems: Vec<String>,

    /// When the evaluation was performed.
    pub timestamp: DateTime<Utc>,
}

impl Evaluation {
    /// Create an evaluation record from the collected problems.
    ///
    /// The result is `Satisfied` exactly when `problems` is empty.
    pub fn from_problems(policy_uid: PolicyId, problems: Vec<String>) -> Self {
        let result = if problems.is_empty() {
            EvaluationResult::Satisfied
        } else {
            EvaluationResult::Denied
        };

        Self {
            policy_uid,
            result,
            problems,
            timestamp: Utc::now(),
        }
    }

    /// Check if the policy was satisfied.
    pub fn succeeded(&self) -> bool {
        self.result == EvaluationResult::Satisfied
    }

    /// Check if the policy was denied.
    pub fn failed(&self) -> bool {
        !self.succeeded()
    }

    /// Convert into a `Result`, mapping a denial to [`PolicyError::Denied`].
    pub fn into_result(self) -> Result<()> {
        match self.result {
            EvaluationResult::Satisfied => Ok(()),
            EvaluationResult::Denied => Err(PolicyError::Denied(self.problems).into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lion_core::Error;

    #[test]
    fn test_empty_problems_is_satisfied() {
        let evaluation = Evaluation::from_problems(PolicyId::new(), Vec::new());
        assert!(evaluation.succeeded());
        assert!(evaluation.into_result().is_ok());
    }

    #[test]
    fn test_denial_carries_problems() {
        let evaluation =
            Evaluation::from_problems(PolicyId::new(), vec!["duty not satisfied".to_string()]);
        assert!(evaluation.failed());
        assert_eq!(evaluation.result, EvaluationResult::Denied);

        match evaluation.into_result() {
            Err(Error::Policy(PolicyError::Denied(problems))) => {
                assert_eq!(problems, vec!["duty not satisfied".to_string()]);
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}
