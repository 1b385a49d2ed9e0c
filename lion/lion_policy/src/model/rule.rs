//! Policy rule model.
//!
//! This module defines the three rule kinds a policy is made of:
//! permissions, prohibitions and duties. They share the [`Rule`] trait,
//! which is what the engine's function registry is generic over.

use lion_core::id::RuleId;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Action, Constraint};

/// The kind of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    /// A permission.
    Permission,

    /// A prohibition.
    Prohibition,

    /// A duty (obligation).
    Duty,
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permission => write!(f, "Permission"),
            Self::Prohibition => write!(f, "Prohibition"),
            Self::Duty => write!(f, "Duty"),
        }
    }
}

/// Common read access to permissions, prohibitions and duties.
pub trait Rule: fmt::Debug + Send + Sync + 'static {
    /// The kind tag of this rule type.
    const RULE_TYPE: RuleType;

    /// The rule identifier.
    fn uid(&self) -> RuleId;

    /// The action of this rule.
    fn action(&self) -> &Action;

    /// The constraints guarding this rule.
    fn constraints(&self) -> &[Constraint];

    /// The party issuing this rule.
    fn assigner(&self) -> Option<&str>;

    /// The party this rule applies to.
    fn assignee(&self) -> Option<&str>;

    /// The asset this rule is about.
    fn target(&self) -> Option<&str>;

    /// Borrow this rule as a [`RuleRef`].
    fn as_rule_ref(&self) -> RuleRef<'_>;

    /// Recover the concrete rule from a [`RuleRef`] of the matching kind.
    fn from_rule_ref(rule: RuleRef<'_>) -> Option<&Self>;
}

/// A borrowed rule of any kind.
#[derive(Debug, Clone, Copy)]
pub enum RuleRef<'a> {
    /// A permission.
    Permission(&'a Permission),

    /// A prohibition.
    Prohibition(&'a Prohibition),

    /// A duty.
    Duty(&'a Duty),
}

impl<'a> RuleRef<'a> {
    /// The kind of the borrowed rule.
    pub fn rule_type(&self) -> RuleType {
        match self {
            Self::Permission(_) => RuleType::Permission,
            Self::Prohibition(_) => RuleType::Prohibition,
            Self::Duty(_) => RuleType::Duty,
        }
    }

    /// The rule identifier.
    pub fn uid(&self) -> RuleId {
        match self {
            Self::Permission(rule) => rule.uid,
            Self::Prohibition(rule) => rule.uid,
            Self::Duty(rule) => rule.uid,
        }
    }

    /// The action of the rule.
    pub fn action(&self) -> &'a Action {
        match self {
            Self::Permission(rule) => &rule.action,
            Self::Prohibition(rule) => &rule.action,
            Self::Duty(rule) => &rule.action,
        }
    }

    /// The constraints of the rule.
    pub fn constraints(&self) -> &'a [Constraint] {
        match self {
            Self::Permission(rule) => &rule.constraints,
            Self::Prohibition(rule) => &rule.constraints,
            Self::Duty(rule) => &rule.constraints,
        }
    }
}

/// Implements the shared builder methods and the [`Rule`] trait for a rule struct.
macro_rules! rule_common {
    ($rule:ident, $variant:ident) => {
        impl $rule {
            /// Create a new unconstrained rule for the given action.
            pub fn new(action: impl Into<Action>) -> Self {
                Self {
                    uid: RuleId::new(),
                    action: action.into(),
                    ..Default::default()
                }
            }

            /// Set the rule identifier.
            pub fn with_uid(mut self, uid: RuleId) -> Self {
                self.uid = uid;
                self
            }

            /// Add a constraint.
            pub fn with_constraint(mut self, constraint: Constraint) -> Self {
                self.constraints.push(constraint);
                self
            }

            /// Add several constraints.
            pub fn with_constraints(
                mut self,
                constraints: impl IntoIterator<Item = Constraint>,
            ) -> Self {
                self.constraints.extend(constraints);
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
        }

        impl Rule for $rule {
            const RULE_TYPE: RuleType = RuleType::$variant;

            fn uid(&self) -> RuleId {
                self.uid
            }

            fn action(&self) -> &Action {
                &self.action
            }

            fn constraints(&self) -> &[Constraint] {
                &self.constraints
            }

            fn assigner(&self) -> Option<&str> {
                self.assigner.as_deref()
            }

            fn assignee(&self) -> Option<&str> {
                self.assignee.as_deref()
            }

            fn target(&self) -> Option<&str> {
                self.target.as_deref()
            }

            fn as_rule_ref(&self) -> RuleRef<'_> {
                RuleRef::$variant(self)
            }

            fn from_rule_ref(rule: RuleRef<'_>) -> Option<&Self> {
                match rule {
                    RuleRef::$variant(rule) => Some(rule),
                    _ => None,
                }
            }
        }

        impl fmt::Display for $rule {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} '{}' ({})", RuleType::$variant, self.uid, self.action)
            }
        }
    };
}

/// A permission: the action is allowed if all constraints hold and all
/// attached duties are satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    /// The rule identifier.
    #[serde(default)]
    pub uid: RuleId,

    /// The permitted action.
    pub action: Action,

    /// The constraints guarding the permission.
    #[serde(default)]
    pub constraints: Vec<Constraint>,

    /// The assigner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigner: Option<String>,

    /// The assignee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// The target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Duties that must also be satisfied for the permission to hold.
    #[serde(default)]
    pub duties: Vec<Duty>,
}

impl Permission {
    /// Attach a duty.
    pub fn with_duty(mut self, duty: Duty) -> Self {
        self.duties.push(duty);
        self
    }
}

/// A prohibition: the policy fails if the prohibition's condition holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prohibition {
    /// The rule identifier.
    #[serde(default)]
    pub uid: RuleId,

    /// The prohibited action.
    pub action: Action,

    /// The constraints guarding the prohibition.
    #[serde(default)]
    pub constraints: Vec<Constraint>,

    /// The assigner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigner: Option<String>,

    /// The assignee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// The target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// A duty: an obligation that must be satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Duty {
    /// The rule identifier.
    #[serde(default)]
    pub uid: RuleId,

    /// The obliged action.
    pub action: Action,

    /// The constraints guarding the duty.
    #[serde(default)]
    pub constraints: Vec<Constraint>,

    /// The assigner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigner: Option<String>,

    /// The assignee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// The target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Duties that become active once this duty is discharged. The engine
    /// does not chain them.
    #[serde(default)]
    pub consequences: Vec<Duty>,
}

impl Duty {
    /// Add a consequence duty.
    pub fn with_consequence(mut self, consequence: Duty) -> Self {
        self.consequences.push(consequence);
        self
    }
}

impl Default for Permission {
    fn default() -> Self {
        Self {
            uid: RuleId::new(),
            action: Action::new(""),
            constraints: Vec::new(),
            assigner: None,
            assignee: None,
            target: None,
            duties: Vec::new(),
        }
    }
}

impl Default for Prohibition {
    fn default() -> Self {
        Self {
            uid: RuleId::new(),
            action: Action::new(""),
            constraints: Vec::new(),
            assigner: None,
            assignee: None,
            target: None,
        }
    }
}

impl Default for Duty {
    fn default() -> Self {
        Self {
            uid: RuleId::new(),
            action: Action::new(""),
            constraints: Vec::new(),
            assigner: None,
            assignee: None,
            target: None,
            consequences: Vec::new(),
        }
    }
}

rule_common!(Permission, Permission);
rule_common!(Prohibition, Prohibition);
rule_common!(Duty, Duty);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Operator;

    #[test]
    fn test_permission_builder() {
        let duty = Duty::new("notify");
        let permission = Permission::new("use")
            .with_assignee("consumer")
            .with_constraint(Constraint::atomic("region", Operator::Eq, "eu"))
            .with_duty(duty.clone());

        assert_eq!(permission.action.action_type, "use");
        assert_eq!(permission.assignee(), Some("consumer"));
        assert_eq!(permission.constraints().len(), 1);
        assert_eq!(permission.duties, vec![duty]);
        assert!(!permission.uid().is_nil());
    }

    #[test]
    fn test_rule_ref_round_trip() {
        let prohibition = Prohibition::new("distribute");
        let rule_ref = prohibition.as_rule_ref();

        assert_eq!(rule_ref.rule_type(), RuleType::Prohibition);
        assert_eq!(rule_ref.uid(), prohibition.uid);
        assert_eq!(rule_ref.action().action_type, "distribute");
        assert!(Prohibition::from_rule_ref(rule_ref).is_some());
        assert!(Permission::from_rule_ref(rule_ref).is_none());
        assert!(Duty::from_rule_ref(rule_ref).is_none());
    }

    #[test]
    fn test_rule_type_constants() {
        assert_eq!(Permission::RULE_TYPE, RuleType::Permission);
        assert_eq!(Prohibition::RULE_TYPE, RuleType::Prohibition);
        assert_eq!(Duty::RULE_TYPE, RuleType::Duty);
    }

    #[test]
    fn test_duty_consequences_are_kept() {
        let duty = Duty::new("delete").with_consequence(Duty::new("report"));
        assert_eq!(duty.consequences.len(), 1);
        assert_eq!(duty.consequences[0].action.action_type, "report");
    }
}
