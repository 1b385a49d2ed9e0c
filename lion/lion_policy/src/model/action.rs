//! Rule actions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Constraint;

/// The action a rule permits, prohibits or obliges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// The action type, e.g. `use` or `transfer`. Also the rule's binding key.
    pub action_type: String,

    /// A broader action this action is included in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included_in: Option<String>,

    /// A refinement of the action. Carried through unchanged; not evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refinement: Option<Constraint>,
}

impl Action {
    /// Create a new action of the given type.
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            included_in: None,
            refinement: None,
        }
    }

    /// Set the broader action this action is included in.
    pub fn with_included_in(mut self, included_in: impl Into<String>) -> Self {
        self.included_in = Some(included_in.into());
        self
    }

    /// Set the refinement of this action.
    pub fn with_refinement(mut self, refinement: Constraint) -> Self {
        self.refinement = Some(refinement);
        self
    }
}

impl From<&str> for Action {
    fn from(action_type: &str) -> Self {
        Self::new(action_type)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.action_type)
    }
}
