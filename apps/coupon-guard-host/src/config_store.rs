//! # System Config Store
//!
//! Scoped key/value configuration, the host side of the core
//! [`ConfigSource`] capability.
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Environment Variables (highest priority)                           │
//! │     COUPON_GUARD_DEBUG_MODE=1                                           │
//! │                                                                         │
//! │  2. Sales channel table in the TOML file                               │
//! │     [sales_channel."storefront-de"]                                     │
//! │                                                                         │
//! │  3. Global table in the TOML file                                      │
//! │     [global]                                                            │
//! │                                                                         │
//! │  4. Default (lowest priority)                                          │
//! │     debugMode = false (seeded on install)                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [global]
//! "JulesCartCouponValueValidation.config.debugMode" = false
//!
//! [sales_channel."storefront-de"]
//! JulesCartCouponValueValidation.config.debugMode = true   # dotted keys work too
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use tracing::{debug, info};

use coupon_guard_core::config::{plugin_key, ConfigSource, ConfigValue};
use coupon_guard_core::{ConfigError, DEBUG_MODE_KEY};

use crate::error::{HostError, HostResult};

/// Environment variable overriding the global debug switch.
pub const DEBUG_MODE_ENV: &str = "COUPON_GUARD_DEBUG_MODE";

// =============================================================================
// Store
// =============================================================================

/// Thread-safe scoped configuration store.
///
/// Lookup order: environment overrides, then the sales channel value, then
/// the global value of the same key.
#[derive(Debug, Default)]
pub struct SystemConfigStore {
    overrides: RwLock<HashMap<String, ConfigValue>>,
    global: RwLock<HashMap<String, ConfigValue>>,
    scoped: RwLock<HashMap<String, HashMap<String, ConfigValue>>>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    global: toml::Table,
    #[serde(default)]
    sales_channel: HashMap<String, toml::Table>,
}

impl SystemConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML config document.
    pub fn from_toml_str(contents: &str) -> HostResult<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        let store = SystemConfigStore::new();

        for (key, value) in flatten_table(&file.global, "")? {
            store.set(key, value, None)?;
        }
        for (channel, table) in &file.sales_channel {
            for (key, value) in flatten_table(table, "")? {
                store.set(key, value, Some(channel))?;
            }
        }

        Ok(store)
    }

    /// Loads configuration from a file, then applies environment overrides.
    ///
    /// A missing file yields an empty store.
    pub fn load(path: Option<&Path>) -> HostResult<Self> {
        let store = match path {
            Some(path) if path.exists() => {
                info!(?path, "Loading plugin config from file");
                let contents = std::fs::read_to_string(path)?;
                Self::from_toml_str(&contents)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::new()
            }
            None => Self::new(),
        };

        store.apply_overrides(std::env::var(DEBUG_MODE_ENV).ok().map(|v| (DEBUG_MODE_ENV, v)))?;
        Ok(store)
    }

    /// Applies `(variable, value)` overrides; unknown variables are ignored.
    ///
    /// Overrides win over every scope and are not touched by [`set`] or
    /// [`delete_domain`](Self::delete_domain).
    ///
    /// [`set`]: Self::set
    pub fn apply_overrides<I, K>(&self, vars: I) -> HostResult<()>
    where
        I: IntoIterator<Item = (K, String)>,
        K: AsRef<str>,
    {
        for (name, value) in vars {
            if name.as_ref() == DEBUG_MODE_ENV {
                debug!(value = %value, "Overriding debug mode from environment");
                write_lock(&self.overrides)?.insert(plugin_key(DEBUG_MODE_KEY), ConfigValue::String(value));
            }
        }
        Ok(())
    }

    /// Stores a value globally (`scope_id = None`) or for one sales channel.
    pub fn set(&self, key: impl Into<String>, value: impl Into<ConfigValue>, scope_id: Option<&str>) -> HostResult<()> {
        let (key, value) = (key.into(), value.into());
        match scope_id {
            None => {
                write_lock(&self.global)?.insert(key, value);
            }
            Some(scope) => {
                write_lock(&self.scoped)?
                    .entry(scope.to_string())
                    .or_default()
                    .insert(key, value);
            }
        }
        Ok(())
    }

    /// Whether a value exists for exactly this scope (no fallback).
    pub fn contains(&self, key: &str, scope_id: Option<&str>) -> HostResult<bool> {
        Ok(match scope_id {
            None => read_lock(&self.global)?.contains_key(key),
            Some(scope) => read_lock(&self.scoped)?
                .get(scope)
                .is_some_and(|values| values.contains_key(key)),
        })
    }

    /// Deletes every key starting with `prefix` in all scopes.
    ///
    /// Returns the number of values removed.
    pub fn delete_domain(&self, prefix: &str) -> HostResult<usize> {
        let mut removed = 0;

        let mut global = write_lock(&self.global)?;
        let before = global.len();
        global.retain(|key, _| !key.starts_with(prefix));
        removed += before - global.len();

        let mut scoped = write_lock(&self.scoped)?;
        for values in scoped.values_mut() {
            let before = values.len();
            values.retain(|key, _| !key.starts_with(prefix));
            removed += before - values.len();
        }
        scoped.retain(|_, values| !values.is_empty());

        Ok(removed)
    }
}

impl ConfigSource for SystemConfigStore {
    fn get(&self, key: &str, scope_id: Option<&str>) -> Result<Option<ConfigValue>, ConfigError> {
        let overrides = self
            .overrides
            .read()
            .map_err(|_| ConfigError::Unavailable("override lock poisoned".to_string()))?;
        if let Some(value) = overrides.get(key) {
            return Ok(Some(value.clone()));
        }

        if let Some(scope) = scope_id {
            let scoped = self
                .scoped
                .read()
                .map_err(|_| ConfigError::Unavailable("scoped config lock poisoned".to_string()))?;
            if let Some(value) = scoped.get(scope).and_then(|values| values.get(key)) {
                return Ok(Some(value.clone()));
            }
        }

        let global = self
            .global
            .read()
            .map_err(|_| ConfigError::Unavailable("global config lock poisoned".to_string()))?;
        Ok(global.get(key).cloned())
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> HostResult<std::sync::RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| HostError::Core(ConfigError::Unavailable("config lock poisoned".to_string()).into()))
}

fn write_lock<T>(lock: &RwLock<T>) -> HostResult<std::sync::RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| HostError::Core(ConfigError::Unavailable("config lock poisoned".to_string()).into()))
}

// =============================================================================
// TOML Conversion
// =============================================================================

/// Flattens nested tables into dotted keys.
fn flatten_table(table: &toml::Table, prefix: &str) -> HostResult<Vec<(String, ConfigValue)>> {
    let mut out = Vec::new();
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            toml::Value::Table(child) => out.extend(flatten_table(child, &path)?),
            scalar => out.push((path.clone(), to_config_value(&path, scalar)?)),
        }
    }
    Ok(out)
}

fn to_config_value(key: &str, value: &toml::Value) -> HostResult<ConfigValue> {
    match value {
        toml::Value::Boolean(b) => Ok(ConfigValue::Bool(*b)),
        toml::Value::Integer(i) => Ok(ConfigValue::Int(*i)),
        toml::Value::Float(f) => Ok(ConfigValue::Float(*f)),
        toml::Value::String(s) => Ok(ConfigValue::String(s.clone())),
        other => Err(HostError::InvalidConfig {
            key: key.to_string(),
            reason: format!("unsupported {} value", other.type_str()),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
