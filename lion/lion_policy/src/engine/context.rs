//! Per-evaluation context.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

use crate::model::ParticipantAgent;

/// State carried through a single policy evaluation.
///
/// A context is created for one evaluation and dropped afterwards; it must
/// never be shared between concurrent evaluations. Registered functions use
/// it to read the participant's claims, to read caller-supplied request
/// data, and to report problems.
pub struct PolicyContext<'a> {
    agent: &'a ParticipantAgent,
    problems: Vec<String>,
    data: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl<'a> PolicyContext<'a> {
    /// Create a new context for the given participant.
    pub fn new(agent: &'a ParticipantAgent) -> Self {
        Self {
            agent,
            problems: Vec::new(),
            data: HashMap::new(),
        }
    }

    /// The participant the policy is evaluated for.
    pub fn agent(&self) -> &'a ParticipantAgent {
        self.agent
    }

    /// Record a problem. Any recorded problem fails the evaluation.
    pub fn report_problem(&mut self, problem: impl Into<String>) {
        self.problems.push(problem.into());
    }

    /// The problems recorded so far.
    pub fn problems(&self) -> &[String] {
        &self.problems
    }

    /// Check if any problem was recorded.
    pub fn has_problems(&self) -> bool {
        !self.problems.is_empty()
    }

    /// Attach a typed value, replacing any previous value of the same type.
    pub fn put_data<T: Any + Send + Sync>(&mut self, value: T) {
        self.data.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Builder form of [`PolicyContext::put_data`].
    pub fn with_data<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.put_data(value);
        self
    }

    /// Get a typed value previously attached with [`PolicyContext::put_data`].
    pub fn data<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.data
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub(crate) fn into_problems(self) -> Vec<String> {
        self.problems
    }
}

impl fmt::Debug for PolicyContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyContext")
            .field("agent", &self.agent)
            .field("problems", &self.problems)
            .field("data_entries", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct RequestedAsset(String);

    #[test]
    fn test_problems_accumulate() {
        let agent = ParticipantAgent::new("did:web:consumer");
        let mut context = PolicyContext::new(&agent);
        assert!(!context.has_problems());

        context.report_problem("first");
        context.report_problem(String::from("second"));
        assert_eq!(context.problems(), &["first".to_string(), "second".to_string()]);
        assert_eq!(context.agent().identity.as_deref(), Some("did:web:consumer"));
    }

    #[test]
    fn test_typed_data() {
        let agent = ParticipantAgent::default();
        let context = PolicyContext::new(&agent).with_data(RequestedAsset("asset-1".to_string()));

        assert_eq!(
            context.data::<RequestedAsset>(),
            Some(&RequestedAsset("asset-1".to_string()))
        );
        assert!(context.data::<u32>().is_none());
    }
}
