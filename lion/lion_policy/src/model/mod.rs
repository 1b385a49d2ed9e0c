//! Policy models.
//!
//! This module defines the immutable policy tree and the records produced
//! by evaluating it.

pub mod action;
pub mod agent;
pub mod constraint;
pub mod evaluation;
pub mod expression;
pub mod operator;
pub mod policy;
pub mod rule;

pub use action::Action;
pub use agent::ParticipantAgent;
pub use constraint::{AtomicConstraint, Constraint};
pub use evaluation::{Evaluation, EvaluationResult};
pub use expression::{Expression, Literal};
pub use operator::Operator;
pub use policy::{Policy, PolicyType};
pub use rule::{Duty, Permission, Prohibition, Rule, RuleRef, RuleType};
