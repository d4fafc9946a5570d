//! # Configuration Capability
//!
//! The rule never reaches for global configuration. The host hands it a
//! [`ConfigSource`] at construction, and the rule asks it for keys scoped to
//! the current sales channel.
//!
//! ## Lookup
//! ```text
//! PluginConfig::resolve(source, context)
//!      │
//!      ▼
//! source.get("JulesCartCouponValueValidation.config.debugMode", Some(sales_channel_id))
//!      │
//!      ├── Ok(Some(value)) → value.as_bool()
//!      ├── Ok(None)        → false (unset)
//!      └── Err(e)          → propagated to the caller
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ConfigError;
use crate::types::SalesChannelContext;
use crate::{CONFIG_DOMAIN, DEBUG_MODE_KEY};

// =============================================================================
// Config Value
// =============================================================================

/// A scalar configuration value as stored by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Null,
}

impl ConfigValue {
    /// Loose truthiness, matching how admin forms store checkbox values.
    ///
    /// `false`, `0`, `0.0`, `""`, `"0"`, `"false"` and `Null` are false;
    /// everything else is true.
    ///
    /// ## Example
    /// ```rust
    /// use coupon_guard_core::config::ConfigValue;
    ///
    /// assert!(ConfigValue::String("1".into()).as_bool());
    /// assert!(!ConfigValue::String("0".into()).as_bool());
    /// assert!(!ConfigValue::Null.as_bool());
    /// ```
    pub fn as_bool(&self) -> bool {
        match self {
            ConfigValue::Bool(b) => *b,
            ConfigValue::Int(i) => *i != 0,
            ConfigValue::Float(f) => *f != 0.0,
            ConfigValue::String(s) => {
                let s = s.trim();
                !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
            }
            ConfigValue::Null => false,
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Int(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

// =============================================================================
// Config Source
// =============================================================================

/// Read access to the host's scoped configuration.
///
/// `scope_id` is the sales channel id; `None` asks for the global value.
/// Implementations decide how scopes fall back to each other.
pub trait ConfigSource {
    fn get(&self, key: &str, scope_id: Option<&str>) -> Result<Option<ConfigValue>, ConfigError>;
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn get(&self, key: &str, scope_id: Option<&str>) -> Result<Option<ConfigValue>, ConfigError> {
        (**self).get(key, scope_id)
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for std::sync::Arc<T> {
    fn get(&self, key: &str, scope_id: Option<&str>) -> Result<Option<ConfigValue>, ConfigError> {
        (**self).get(key, scope_id)
    }
}

/// In-memory config source for embedding and tests.
///
/// A scoped value wins over the global value for the same key.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    global: HashMap<String, ConfigValue>,
    scoped: HashMap<(String, String), ConfigValue>,
}

impl StaticConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a global value.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.global.insert(key.into(), value.into());
        self
    }

    /// Sets a value for one sales channel.
    pub fn set_scoped(
        mut self,
        scope_id: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Self {
        self.scoped.insert((scope_id.into(), key.into()), value.into());
        self
    }
}

impl ConfigSource for StaticConfig {
    fn get(&self, key: &str, scope_id: Option<&str>) -> Result<Option<ConfigValue>, ConfigError> {
        let scoped = scope_id.and_then(|scope| self.scoped.get(&(scope.to_string(), key.to_string())));
        Ok(scoped.or_else(|| self.global.get(key)).cloned())
    }
}

// =============================================================================
// Plugin Config
// =============================================================================

/// Returns the fully qualified key for a plugin option.
///
/// ## Example
/// ```rust
/// use coupon_guard_core::config::plugin_key;
///
/// assert_eq!(plugin_key("debugMode"), "JulesCartCouponValueValidation.config.debugMode");
/// ```
pub fn plugin_key(option: &str) -> String {
    format!("{}{}", CONFIG_DOMAIN, option)
}

/// The plugin's options for one sales channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PluginConfig {
    /// Attach informational cart errors showing the compared values.
    pub debug_mode: bool,
}

impl PluginConfig {
    /// Reads the plugin's options for the context's sales channel.
    pub fn resolve<C: ConfigSource + ?Sized>(
        source: &C,
        context: &SalesChannelContext,
    ) -> Result<Self, ConfigError> {
        let debug_mode = source
            .get(&plugin_key(DEBUG_MODE_KEY), Some(&context.sales_channel_id))?
            .map(|v| v.as_bool())
            .unwrap_or(false);

        Ok(PluginConfig { debug_mode })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
