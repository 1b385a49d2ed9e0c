//! Rule bindings.
//!
//! A rule binding ties a rule key (an action type or the string form of a
//! constraint's left operand) to a usage scope. The scope filter consults
//! the bindings to decide which parts of a policy are visible in a scope.

mod in_memory;
mod matcher;

pub use in_memory::InMemoryRuleBindingRegistry;
pub use matcher::check_scope;

use std::collections::HashSet;
use std::sync::Arc;

use lion_core::error::Result;
use tracing::warn;

/// Scope binding a rule key in every scope.
pub const ALL_SCOPES: &str = "*";

/// Computes additional scopes for a rule key at query time.
pub type DynamicBinder = Arc<dyn Fn(&str) -> HashSet<String> + Send + Sync>;

/// Trait for rule binding registries.
///
/// Registries are shared between threads; all methods take `&self`.
pub trait RuleBindingRegistry: Send + Sync {
    /// Bind a rule key to a scope.
    ///
    /// # Arguments
    ///
    /// * `rule_key` - The rule key.
    /// * `scope` - The scope, or [`ALL_SCOPES`].
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the binding was recorded.
    /// * `Err` - If the key is empty or the scope malformed.
    fn try_bind(&self, rule_key: &str, scope: &str) -> Result<()>;

    /// Bind a rule key to a scope, ignoring malformed input.
    fn bind(&self, rule_key: &str, scope: &str) {
        if let Err(e) = self.try_bind(rule_key, scope) {
            warn!("Ignoring binding of '{}' to '{}': {}", rule_key, scope, e);
        }
    }

    /// Check whether a rule key is visible in a scope.
    fn is_in_scope(&self, rule_key: &str, scope: &str) -> bool;

    /// All scopes a rule key is bound to, static and dynamic.
    fn bindings(&self, rule_key: &str) -> HashSet<String>;

    /// Register a binder computing extra scopes for any rule key.
    fn dynamic_bind(&self, binder: DynamicBinder);
}
