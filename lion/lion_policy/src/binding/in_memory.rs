//! In-memory rule binding registry.
//!
//! This module provides an in-memory implementation of the rule binding
//! registry.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use lion_core::error::{BindingError, Result};
use parking_lot::RwLock;
use tracing::{debug, trace};

use super::matcher::{check_scope, covers};
use super::{DynamicBinder, RuleBindingRegistry};
use crate::config::{BindingConfig, ScopeConfig};

/// An in-memory rule binding registry.
///
/// Clones share the same bindings.
#[derive(Clone)]
pub struct InMemoryRuleBindingRegistry {
    /// Scopes bound to each rule key.
    bindings: Arc<DashMap<String, HashSet<String>>>,

    /// Binders consulted at query time.
    binders: Arc<RwLock<Vec<DynamicBinder>>>,

    /// Delimiter and wildcard.
    config: ScopeConfig,
}

impl InMemoryRuleBindingRegistry {
    /// Create a new registry with the default scope settings.
    pub fn new() -> Self {
        Self::build(ScopeConfig::default())
    }

    /// Create a new registry with the given scope settings.
    ///
    /// # Returns
    ///
    /// * `Ok(registry)` - An empty registry using the settings.
    /// * `Err(Error::Config)` - If the delimiter or wildcard is invalid.
    pub fn with_config(config: ScopeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ScopeConfig) -> Self {
        Self {
            bindings: Arc::new(DashMap::new()),
            binders: Arc::new(RwLock::new(Vec::new())),
            config,
        }
    }

    /// Create a registry from a binding configuration.
    ///
    /// The configuration is validated first; every binding it lists is
    /// registered.
    pub fn from_config(config: &BindingConfig) -> Result<Self> {
        config.validate()?;

        let registry = Self::build(config.scope.clone());
        for binding in &config.bindings {
            for scope in &binding.scopes {
                registry.try_bind(&binding.rule_key, scope)?;
            }
        }

        debug!(
            "Loaded {} rule bindings from configuration",
            config.bindings.len()
        );
        Ok(registry)
    }

    /// The scope settings of this registry.
    pub fn scope_config(&self) -> &ScopeConfig {
        &self.config
    }

    /// Copy the binder list so no lock is held while binders run.
    fn binders_snapshot(&self) -> Vec<DynamicBinder> {
        self.binders.read().clone()
    }

    fn is_wildcard(&self, scope: &str) -> bool {
        scope == self.config.wildcard
    }

    fn scope_matches(&self, bound: &str, query: &str, query_valid: bool) -> bool {
        // The wildcard matches before the query is checked, so wildcard-bound
        // keys stay visible even for malformed query scopes
        if self.is_wildcard(bound) {
            return true;
        }

        // Binders may hand back malformed scopes; those never match
        query_valid
            && check_scope(bound, &self.config.delimiter).is_ok()
            && covers(bound, query, &self.config.delimiter)
    }
}

impl Default for InMemoryRuleBindingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBindingRegistry for InMemoryRuleBindingRegistry {
    fn try_bind(&self, rule_key: &str, scope: &str) -> Result<()> {
        // Check the key and the scope before touching the map
        if rule_key.is_empty() {
            return Err(BindingError::EmptyRuleKey.into());
        }
        if !self.is_wildcard(scope) {
            check_scope(scope, &self.config.delimiter)?;
        }

        trace!("Binding '{}' to scope '{}'", rule_key, scope);
        self.bindings
            .entry(rule_key.to_string())
            .or_default()
            .insert(scope.to_string());

        Ok(())
    }

    fn is_in_scope(&self, rule_key: &str, scope: &str) -> bool {
        let query_valid = check_scope(scope, &self.config.delimiter).is_ok();

        // Check the static bindings first
        let statically_bound = self
            .bindings
            .get(rule_key)
            .map(|scopes| {
                scopes
                    .iter()
                    .any(|bound| self.scope_matches(bound, scope, query_valid))
            })
            .unwrap_or(false);
        if statically_bound {
            return true;
        }

        // Binders may call back into the registry, so run them unlocked
        self.binders_snapshot().iter().any(|binder| {
            binder(rule_key)
                .iter()
                .any(|bound| self.scope_matches(bound, scope, query_valid))
        })
    }

    fn bindings(&self, rule_key: &str) -> HashSet<String> {
        let mut scopes = self
            .bindings
            .get(rule_key)
            .map(|scopes| scopes.value().clone())
            .unwrap_or_default();

        for binder in self.binders_snapshot() {
            scopes.extend(binder(rule_key));
        }

        scopes
    }

    fn dynamic_bind(&self, binder: DynamicBinder) {
        self.binders.write().push(binder);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ALL_SCOPES;
    use crate::config::BindingEntry;
    use lion_core::Error;
    use std::thread;

    #[test]
    fn test_bind_and_is_in_scope() {
        let registry = InMemoryRuleBindingRegistry::new();
        registry.bind("use", "contract");

        assert!(registry.is_in_scope("use", "contract"));
        assert!(registry.is_in_scope("use", "contract.negotiation"));
        assert!(!registry.is_in_scope("use", "catalog"));
        assert!(!registry.is_in_scope("transfer", "contract"));
    }

    #[test]
    fn test_child_binding_not_visible_in_parent() {
        let registry = InMemoryRuleBindingRegistry::new();
        registry.bind("use", "contract.negotiation");

        assert!(registry.is_in_scope("use", "contract.negotiation.offer"));
        assert!(!registry.is_in_scope("use", "contract"));
    }

    #[test]
    fn test_bindings_are_cumulative() {
        let registry = InMemoryRuleBindingRegistry::new();
        registry.bind("use", "catalog");
        registry.bind("use", "contract");

        assert!(registry.is_in_scope("use", "catalog"));
        assert!(registry.is_in_scope("use", "contract"));
        assert_eq!(registry.bindings("use").len(), 2);
    }

    #[test]
    fn test_wildcard_scope() {
        let registry = InMemoryRuleBindingRegistry::new();
        registry.bind("region", ALL_SCOPES);

        assert!(registry.is_in_scope("region", "catalog"));
        assert!(registry.is_in_scope("region", "contract.negotiation"));
        assert!(registry.is_in_scope("region", "catalog."));
    }

    #[test]
    fn test_malformed_scopes() {
        let registry = InMemoryRuleBindingRegistry::new();
        registry.bind("use", "catalog.");
        assert!(registry.bindings("use").is_empty());

        assert!(matches!(
            registry.try_bind("use", ""),
            Err(Error::Binding(BindingError::MalformedScope(_)))
        ));
        assert!(matches!(
            registry.try_bind("", "catalog"),
            Err(Error::Binding(BindingError::EmptyRuleKey))
        ));

        registry.bind("use", "catalog");
        assert!(!registry.is_in_scope("use", ""));
        assert!(!registry.is_in_scope("use", "catalog."));
        assert!(!registry.is_in_scope("use", ".catalog"));
    }

    #[test]
    fn test_dynamic_binder() {
        let registry = InMemoryRuleBindingRegistry::new();
        registry.dynamic_bind(Arc::new(|rule_key: &str| {
            let mut scopes = HashSet::new();
            if rule_key.starts_with("edc:") {
                scopes.insert("catalog".to_string());
            }
            scopes
        }));

        assert!(registry.is_in_scope("edc:region", "catalog.request"));
        assert!(!registry.is_in_scope("region", "catalog"));
        assert!(registry.bindings("edc:region").contains("catalog"));
    }

    #[test]
    fn test_custom_scope_config() {
        let registry = InMemoryRuleBindingRegistry::with_config(ScopeConfig {
            delimiter: "/".to_string(),
            wildcard: "any".to_string(),
        })
        .unwrap();
        registry.bind("use", "contract");
        registry.bind("region", "any");

        assert!(registry.is_in_scope("use", "contract/negotiation"));
        assert!(!registry.is_in_scope("use", "contract.negotiation"));
        assert!(registry.is_in_scope("region", "catalog"));
    }

    #[test]
    fn test_from_config() {
        let config = BindingConfig::default()
            .with_binding(BindingEntry::new("use", ["catalog", "contract.negotiation"]))
            .with_binding(BindingEntry::new("region", [ALL_SCOPES]));
        let registry = InMemoryRuleBindingRegistry::from_config(&config).unwrap();

        assert!(registry.is_in_scope("use", "catalog"));
        assert!(registry.is_in_scope("use", "contract.negotiation.offer"));
        assert!(!registry.is_in_scope("use", "contract"));
        assert!(registry.is_in_scope("region", "transfer"));
    }

    #[test]
    fn test_clones_share_bindings() {
        let registry = InMemoryRuleBindingRegistry::new();
        let clone = registry.clone();
        clone.bind("use", "catalog");
        assert!(registry.is_in_scope("use", "catalog"));
    }

    #[test]
    fn test_concurrent_bind_and_query() {
        let registry = InMemoryRuleBindingRegistry::new();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                thread::spawn(move || {
                    let key = format!("key{}", i);
                    for j in 0..100 {
                        registry.bind(&key, &format!("scope{}", j));
                        assert!(registry.is_in_scope(&key, &format!("scope{}.child", j)));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        for i in 0..8 {
            assert_eq!(registry.bindings(&format!("key{}", i)).len(), 100);
        }
    }

    #[test]
    fn test_with_config_rejects_invalid_settings() {
        let result = InMemoryRuleBindingRegistry::with_config(ScopeConfig {
            delimiter: String::new(),
            wildcard: "*".to_string(),
        });
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_binder_can_reenter_registry() {
        let registry = InMemoryRuleBindingRegistry::new();
        registry.bind("use", "contract");

        let inner = registry.clone();
        registry.dynamic_bind(Arc::new(move |rule_key: &str| {
            let mut scopes = HashSet::new();
            if rule_key == "use" {
                // Register a further binder and query while being consulted
                inner.dynamic_bind(Arc::new(|_: &str| HashSet::new()));
                if inner.is_in_scope(rule_key, "contract") {
                    scopes.insert("catalog".to_string());
                }
            }
            scopes
        }));

        let worker = registry.clone();
        let handle = thread::spawn(move || {
            (
                worker.is_in_scope("use", "catalog"),
                worker.bindings("use").contains("catalog"),
            )
        });

        let (in_scope, bound) = handle.join().unwrap();
        assert!(in_scope);
        assert!(bound);
        assert!(!registry.is_in_scope("transfer", "catalog"));
    }

    #[test]
    fn test_queries_while_binders_are_added() {
        let registry = InMemoryRuleBindingRegistry::new();
        let inner = registry.clone();
        registry.dynamic_bind(Arc::new(move |rule_key: &str| {
            if rule_key.starts_with("alias:") {
                HashSet::new()
            } else {
                inner.bindings(&format!("alias:{}", rule_key))
            }
        }));
        registry.bind("alias:use", "catalog");

        let writer = {
            let registry = registry.clone();
            thread::spawn(move || {
                for _ in 0..200 {
                    registry.dynamic_bind(Arc::new(|_: &str| HashSet::new()));
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        assert!(registry.is_in_scope("use", "catalog.request"));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
