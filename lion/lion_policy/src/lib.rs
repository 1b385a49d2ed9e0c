//! # Lion Policy
//!
//! `lion_policy` evaluates declarative usage policies and restricts them to
//! usage scopes before they are exposed.
//!
//! Key concepts:
//!
//! 1. **Policy**: A set of permissions, prohibitions and obligations, each
//!    guarded by constraints.
//!
//! 2. **Constraint**: A boolean condition. Atomic constraints compare an
//!    abstract key with a value; AND, OR and XONE combine them.
//!
//! 3. **Policy Evaluation**: Constraint keys get their meaning from functions
//!    registered with the [`PolicyEngine`]; evaluating a policy for a
//!    participant yields an [`Evaluation`] listing every problem found.
//!
//! 4. **Scope Filtering**: A [`ScopeFilter`] consults a
//!    [`RuleBindingRegistry`] to drop every rule and constraint not bound to
//!    a usage scope.

pub mod binding;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod scope;

// Re-export key types and traits for convenience
pub use binding::{InMemoryRuleBindingRegistry, RuleBindingRegistry, ALL_SCOPES};
pub use config::{BindingConfig, BindingEntry, ScopeConfig};
pub use engine::{DynamicAtomicConstraintFunction, PolicyContext, PolicyEngine};
pub use model::{
    Action, AtomicConstraint, Constraint, Duty, Evaluation, EvaluationResult, Expression, Literal,
    Operator, ParticipantAgent, Permission, Policy, PolicyType, Prohibition, Rule, RuleRef,
    RuleType,
};
pub use scope::{ScopeFilter, ScopeFilterable};
