//! Policy model.
//!
//! A policy is an immutable tree of permissions, prohibitions and duties
//! plus assignment metadata. It is built once by a construction layer and
//! then only read by the engine and the scope filter.

use lion_core::id::PolicyId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::{Duty, Literal, Permission, Prohibition};

/// The kind of a policy document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyType {
    /// A set of rules with no particular counterparty.
    #[default]
    Set,

    /// A policy offered to potential counterparties.
    Offer,

    /// A policy agreed between parties.
    Contract,
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set => write!(f, "set"),
            Self::Offer => write!(f, "offer"),
            Self::Contract => write!(f, "contract"),
        }
    }
}

/// A policy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Policy {
    /// The unique ID of this policy.
    #[serde(default)]
    pub uid: PolicyId,

    /// The kind of policy.
    #[serde(default)]
    pub policy_type: PolicyType,

    /// The permissions, in document order.
    #[serde(default)]
    pub permissions: Vec<Permission>,

    /// The prohibitions, in document order.
    #[serde(default)]
    pub prohibitions: Vec<Prohibition>,

    /// The obligations, in document order.
    #[serde(default)]
    pub obligations: Vec<Duty>,

    /// The party issuing this policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigner: Option<String>,

    /// The party this policy applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// The asset this policy is about.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// The policy this policy inherits from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits_from: Option<String>,

    /// Profiles the policy conforms to.
    #[serde(default)]
    pub profiles: Vec<String>,

    /// Additional properties not interpreted by the engine.
    #[serde(default)]
    pub extensible_properties: BTreeMap<String, Literal>,
}

impl Policy {
    /// Create a new empty policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy identifier.
    pub fn with_uid(mut self, uid: PolicyId) -> Self {
        self.uid = uid;
        self
    }

    /// Set the policy type.
    pub fn with_type(mut self, policy_type: PolicyType) -> Self {
        self.policy_type = policy_type;
        self
    }

    /// Add a permission.
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    /// Add a prohibition.
    pub fn with_prohibition(mut self, prohibition: Prohibition) -> Self {
        self.prohibitions.push(prohibition);
        self
    }

    /// Add an obligation.
    pub fn with_obligation(mut self, duty: Duty) -> Self {
        self.obligations.push(duty);
        self
    }

    /// Set the assigner.
    pub fn with_assigner(mut self, assigner: impl Into<String>) -> Self {
        self.assigner = Some(assigner.into());
        self
    }

    /// Set the assignee.
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Set the target.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set the policy this policy inherits from.
    pub fn with_inherits_from(mut self, inherits_from: impl Into<String>) -> Self {
        self.inherits_from = Some(inherits_from.into());
        self
    }

    /// Add a profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profiles.push(profile.into());
        self
    }

    /// Set an extensible property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Literal>) -> Self {
        self.extensible_properties.insert(key.into(), value.into());
        self
    }

    /// Check if the policy has no rules of any kind.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty() && self.prohibitions.is_empty() && self.obligations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_policy() {
        let policy = Policy::new();
        assert!(policy.is_empty());
        assert_eq!(policy.policy_type, PolicyType::Set);
    }

    #[test]
    fn test_builder_keeps_order() {
        let policy = Policy::new()
            .with_type(PolicyType::Offer)
            .with_permission(Permission::new("use"))
            .with_permission(Permission::new("transfer"))
            .with_property("note", "internal");

        let actions: Vec<&str> = policy
            .permissions
            .iter()
            .map(|p| p.action.action_type.as_str())
            .collect();
        assert_eq!(actions, vec!["use", "transfer"]);
        assert_eq!(
            policy.extensible_properties.get("note"),
            Some(&Literal::from("internal"))
        );
        assert!(!policy.is_empty());
    }

    #[test]
    fn test_deserialize_minimal_document() {
        let json = r#"{
            "policy_type": "offer",
            "permissions": [
                {
                    "action": { "action_type": "use" },
                    "constraints": [
                        {
                            "atomic": {
                                "left": { "literal": "region" },
                                "operator": "EQ",
                                "right": { "literal": "eu" }
                            }
                        }
                    ]
                }
            ],
            "assigner": "provider"
        }"#;

        let policy: Policy = serde_json::from_str(json).unwrap();
        assert_eq!(policy.policy_type, PolicyType::Offer);
        assert_eq!(policy.permissions.len(), 1);
        assert_eq!(policy.permissions[0].constraints.len(), 1);
        assert_eq!(policy.assigner.as_deref(), Some("provider"));
    }
}
