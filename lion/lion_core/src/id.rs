//! Strongly-typed identifiers for policies and rules.
//!
//! Every policy and every rule inside it carries a UUID-backed identifier.
//! The phantom marker keeps a `RuleId` from being passed where a `PolicyId`
//! is expected, even though both wrap the same UUID type.
//!
//! # Examples
//!
//! ```
//! use lion_core::id::{PolicyId, RuleId};
//! use std::str::FromStr;
//!
//! let policy_id = PolicyId::new();
//! let rule_id = RuleId::new();
//! assert_ne!(policy_id.to_string(), rule_id.to_string());
//!
//! let id_str = "550e8400-e29b-41d4-a716-446655440000";
//! let rule_id = RuleId::from_str(id_str).unwrap();
//! assert_eq!(rule_id.to_string(), id_str);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use uuid::Uuid;

/// A type-safe identifier based on UUID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T> {
    uuid: Uuid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random identifier (UUID v4).
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Create an identifier from a known UUID, e.g. one read back from a
    /// policy document.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            uuid,
            _marker: PhantomData,
        }
    }

    /// Get the underlying UUID.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Create a nil (all zeros) identifier.
    pub fn nil() -> Self {
        Self::from_uuid(Uuid::nil())
    }

    /// Check if this is a nil identifier.
    pub fn is_nil(&self) -> bool {
        self.uuid.is_nil()
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

impl<T> FromStr for Id<T> {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_uuid(Uuid::parse_str(s)?))
    }
}

/// Marker type for policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PolicyMarker;
/// Identifier for a policy.
pub type PolicyId = Id<PolicyMarker>;

/// Marker type for rules (permissions, prohibitions and duties).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleMarker;
/// Identifier for a rule.
pub type RuleId = Id<RuleMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_new_is_unique() {
        let id1 = RuleId::new();
        let id2 = RuleId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_id_from_str() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id = PolicyId::from_str(uuid_str).unwrap();
        assert_eq!(id.to_string(), uuid_str);
        assert!(PolicyId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_id_nil() {
        let nil_id = RuleId::nil();
        assert_eq!(nil_id.to_string(), "00000000-0000-0000-0000-000000000000");
        assert!(nil_id.is_nil());
        assert!(!RuleId::new().is_nil());
    }

    #[test]
    fn test_same_uuid_different_kinds() {
        let uuid = Uuid::new_v4();
        let policy_id = PolicyId::from_uuid(uuid);
        let rule_id = RuleId::from_uuid(uuid);
        assert_eq!(policy_id.uuid(), rule_id.uuid());
    }

    #[test]
    fn test_id_serializes_as_plain_uuid() {
        let id = RuleId::from_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let serialized = serde_json::to_string(&id).unwrap();
        assert_eq!(serialized, "\"550e8400-e29b-41d4-a716-446655440000\"");

        let deserialized: RuleId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(id, deserialized);
    }
}
