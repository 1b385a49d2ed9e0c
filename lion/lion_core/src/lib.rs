//! # Lion Core
//!
//! `lion_core` provides the building blocks shared by the Lion policy
//! crates: the error hierarchy and strongly-typed identifiers.
//!
//! ## Crate Structure
//!
//! - **error**: Error types for policy evaluation, rule bindings and configuration
//! - **id**: Strongly-typed identifier types for policies and rules

pub mod error;
pub mod id;

// Re-export key types for convenience
pub use error::{BindingError, Error, PolicyError, Result};
pub use id::{Id, PolicyId, RuleId};
