//! Policy evaluation engine.
//!
//! The engine interprets a policy's constraint trees through functions
//! registered per rule type, and combines the results with rule functions
//! and policy validators into an [`Evaluation`](crate::model::Evaluation).

mod constraint;
mod context;
mod evaluator;
mod function;
mod validation;

pub use context::PolicyContext;
pub use evaluator::PolicyEngine;
pub use function::{DynamicAtomicConstraintFunction, PolicyValidator};
