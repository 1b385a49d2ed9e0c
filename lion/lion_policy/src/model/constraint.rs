//! Policy constraint model.
//!
//! A constraint is either an atomic `left operator right` triple or a
//! multiplicity constraint combining child constraints with AND, OR or
//! XONE (exactly one) semantics.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Expression, Operator};

/// An atomic constraint: `left operator right`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicConstraint {
    /// The left operand; its string form is the dispatch and binding key.
    pub left: Expression,

    /// The operator.
    pub operator: Operator,

    /// The right operand.
    pub right: Expression,
}

impl AtomicConstraint {
    /// Create a new atomic constraint.
    pub fn new(
        left: impl Into<Expression>,
        operator: Operator,
        right: impl Into<Expression>,
    ) -> Self {
        Self {
            left: left.into(),
            operator,
            right: right.into(),
        }
    }

    /// The string form of the left operand.
    pub fn left_key(&self) -> String {
        self.left.to_string()
    }
}

impl fmt::Display for AtomicConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator, self.right)
    }
}

/// A policy constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// A single `left operator right` condition.
    Atomic(AtomicConstraint),

    /// All children must hold.
    And(Vec<Constraint>),

    /// At least one child must hold.
    Or(Vec<Constraint>),

    /// Exactly one child must hold.
    Xone(Vec<Constraint>),
}

impl Constraint {
    /// Create an atomic constraint.
    pub fn atomic(
        left: impl Into<Expression>,
        operator: Operator,
        right: impl Into<Expression>,
    ) -> Self {
        Self::Atomic(AtomicConstraint::new(left, operator, right))
    }

    /// Create an AND constraint.
    pub fn and(constraints: Vec<Constraint>) -> Self {
        Self::And(constraints)
    }

    /// Create an OR constraint.
    pub fn or(constraints: Vec<Constraint>) -> Self {
        Self::Or(constraints)
    }

    /// Create an XONE constraint.
    pub fn xone(constraints: Vec<Constraint>) -> Self {
        Self::Xone(constraints)
    }

    /// Check if this is an atomic constraint.
    pub fn is_atomic(&self) -> bool {
        matches!(self, Self::Atomic(_))
    }

    /// Get the child constraints of a multiplicity constraint.
    pub fn children(&self) -> Option<&[Constraint]> {
        match self {
            Self::Atomic(_) => None,
            Self::And(children) | Self::Or(children) | Self::Xone(children) => Some(children),
        }
    }

    /// Build a multiplicity constraint of the same kind with new children.
    ///
    /// Atomic constraints are returned unchanged.
    pub fn with_children(&self, children: Vec<Constraint>) -> Self {
        match self {
            Self::Atomic(atomic) => Self::Atomic(atomic.clone()),
            Self::And(_) => Self::And(children),
            Self::Or(_) => Self::Or(children),
            Self::Xone(_) => Self::Xone(children),
        }
    }

    /// Collect every atomic constraint in this tree, depth first.
    pub fn atomics(&self) -> Vec<&AtomicConstraint> {
        let mut out = Vec::new();
        self.collect_atomics(&mut out);
        out
    }

    fn collect_atomics<'a>(&'a self, out: &mut Vec<&'a AtomicConstraint>) {
        match self {
            Self::Atomic(atomic) => out.push(atomic),
            Self::And(children) | Self::Or(children) | Self::Xone(children) => {
                for child in children {
                    child.collect_atomics(out);
                }
            }
        }
    }
}

impl From<AtomicConstraint> for Constraint {
    fn from(atomic: AtomicConstraint) -> Self {
        Self::Atomic(atomic)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, children) = match self {
            Self::Atomic(atomic) => return write!(f, "{}", atomic),
            Self::And(children) => ("AND", children),
            Self::Or(children) => ("OR", children),
            Self::Xone(children) => ("XONE", children),
        };

        write!(f, "{}(", name)?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", child)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_eu() -> Constraint {
        Constraint::atomic("region", Operator::Eq, "eu")
    }

    #[test]
    fn test_display() {
        let constraint = Constraint::or(vec![
            region_eu(),
            Constraint::atomic("tier", Operator::Geq, Expression::literal(2)),
        ]);
        assert_eq!(constraint.to_string(), "OR(region EQ eu, tier GEQ 2)");
    }

    #[test]
    fn test_atomics_depth_first() {
        let constraint = Constraint::and(vec![
            region_eu(),
            Constraint::xone(vec![
                Constraint::atomic("purpose", Operator::Eq, "research"),
                Constraint::atomic("tier", Operator::Gt, Expression::literal(1)),
            ]),
        ]);

        let keys: Vec<String> = constraint.atomics().iter().map(|a| a.left_key()).collect();
        assert_eq!(keys, vec!["region", "purpose", "tier"]);
    }

    #[test]
    fn test_with_children_keeps_kind() {
        let xone = Constraint::xone(vec![region_eu(), region_eu()]);
        let rebuilt = xone.with_children(vec![]);
        assert_eq!(rebuilt, Constraint::Xone(vec![]));
        assert_eq!(region_eu().children(), None);
    }
}
