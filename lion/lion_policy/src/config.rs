//! Binding configuration.
//!
//! Scope settings and static rule bindings can be loaded from TOML:
//!
//! ```toml
//! [scope]
//! delimiter = "."
//! wildcard = "*"
//!
//! [[bindings]]
//! rule_key = "use"
//! scopes = ["catalog", "contract.negotiation"]
//! ```

use std::path::Path;

use lion_core::error::{BindingError, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::binding::check_scope;
use crate::error::toml_error_to_core_error;

/// How scope strings are structured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Separator between scope segments
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Scope binding a rule key everywhere
    #[serde(default = "default_wildcard")]
    pub wildcard: String,
}

fn default_delimiter() -> String {
    ".".to_string()
}

fn default_wildcard() -> String {
    crate::binding::ALL_SCOPES.to_string()
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            wildcard: default_wildcard(),
        }
    }
}

impl ScopeConfig {
    /// Validate the scope settings
    pub fn validate(&self) -> Result<()> {
        if self.delimiter.chars().count() != 1 {
            return Err(Error::Config(format!(
                "Scope delimiter must be a single character, got '{}'",
                self.delimiter
            )));
        }

        if self.wildcard.is_empty() {
            return Err(Error::Config("Scope wildcard cannot be empty".to_string()));
        }

        if self.wildcard.contains(self.delimiter.as_str()) {
            return Err(Error::Config(format!(
                "Scope wildcard '{}' cannot contain the delimiter '{}'",
                self.wildcard, self.delimiter
            )));
        }

        Ok(())
    }
}

/// A rule key and the scopes it is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingEntry {
    /// The rule key (action type or constraint left operand)
    pub rule_key: String,

    /// Scopes the key is bound to
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl BindingEntry {
    /// Create a new binding entry.
    pub fn new<I, S>(rule_key: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rule_key: rule_key.into(),
            scopes: scopes.into_iter().map(Into::into).collect(),
        }
    }
}

/// Binding configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingConfig {
    /// Scope settings
    #[serde(default)]
    pub scope: ScopeConfig,

    /// Static rule bindings
    #[serde(default)]
    pub bindings: Vec<BindingEntry>,
}

impl BindingConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(toml_error_to_core_error)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading binding configuration from {}", path.display());

        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Add a binding entry.
    pub fn with_binding(mut self, binding: BindingEntry) -> Self {
        self.bindings.push(binding);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.scope.validate()?;

        for binding in &self.bindings {
            if binding.rule_key.is_empty() {
                return Err(BindingError::EmptyRuleKey.into());
            }

            for scope in &binding.scopes {
                if scope != &self.scope.wildcard {
                    check_scope(scope, &self.scope.delimiter)?;
                }
            }
        }

        Ok(())
    }
}
