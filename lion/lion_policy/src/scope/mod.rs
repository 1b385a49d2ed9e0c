//! Scope filtering.
//!
//! Prunes a policy down to the rules and constraints bound to a usage
//! scope before the policy leaves the process.

mod filter;

pub use filter::{ScopeFilter, ScopeFilterable};
