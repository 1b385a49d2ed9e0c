//! The requesting participant.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Literal;

/// The principal a policy is evaluated for.
///
/// Claims and attributes are supplied by the caller and are never
/// interpreted by the engine, only by registered functions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParticipantAgent {
    /// The identity of the participant, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,

    /// Verified claims about the participant.
    #[serde(default)]
    pub claims: HashMap<String, Literal>,

    /// Additional attributes attached by the caller.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl ParticipantAgent {
    /// Create a participant with the given identity.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: Some(identity.into()),
            ..Default::default()
        }
    }

    /// Add a claim.
    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Literal>) -> Self {
        self.claims.insert(key.into(), value.into());
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up a claim.
    pub fn claim(&self, key: &str) -> Option<&Literal> {
        self.claims.get(key)
    }

    /// Look up an attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}
