//! # Translation Capability
//!
//! Cart error messages are looked up by key and filled with `%name%`
//! placeholders. The host injects a [`Translator`]; [`MessageCatalog`] is the
//! in-memory implementation, loadable from the nested JSON snippet format:
//!
//! ```json
//! {
//!   "cartCouponValueValidation": {
//!     "error": { "cartValueTooLow": "Goods value %cartTotal% is below %couponValue%." }
//!   }
//! }
//! ```

use serde_json::Value;
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Translator
// =============================================================================

/// Message lookup with placeholder substitution.
///
/// `params` pairs a placeholder (including its `%` delimiters) with the
/// already formatted value. Unknown keys translate to the key itself.
pub trait Translator {
    fn trans(&self, key: &str, params: &[(&str, String)]) -> String;
}

impl<T: Translator + ?Sized> Translator for &T {
    fn trans(&self, key: &str, params: &[(&str, String)]) -> String {
        (**self).trans(key, params)
    }
}

impl<T: Translator + ?Sized> Translator for std::sync::Arc<T> {
    fn trans(&self, key: &str, params: &[(&str, String)]) -> String {
        (**self).trans(key, params)
    }
}

/// Replaces every placeholder occurrence in `template`.
pub fn interpolate(template: &str, params: &[(&str, String)]) -> String {
    params
        .iter()
        .fold(template.to_string(), |acc, (placeholder, value)| {
            acc.replace(placeholder, value)
        })
}

// =============================================================================
// Message Catalog
// =============================================================================

/// Flat key → template map.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one template.
    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.messages.insert(key.into(), template.into());
    }

    /// Builder-style [`MessageCatalog::insert`].
    pub fn with(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(key, template);
        self
    }

    /// Parses a nested snippet document; nested object keys are joined
    /// with `.`.
    pub fn from_json(document: &str) -> CoreResult<Self> {
        let value: Value = serde_json::from_str(document).map_err(|e| CoreError::InvalidCatalog {
            reason: e.to_string(),
        })?;
        Self::from_value(&value)
    }

    /// Same as [`MessageCatalog::from_json`] for an already parsed document.
    pub fn from_value(value: &Value) -> CoreResult<Self> {
        let Value::Object(_) = value else {
            return Err(CoreError::InvalidCatalog {
                reason: "top level must be an object".to_string(),
            });
        };

        let mut catalog = MessageCatalog::new();
        flatten(value, String::new(), &mut catalog)?;
        Ok(catalog)
    }

    /// Copies every template from `other`, overriding existing keys.
    pub fn merge(&mut self, other: MessageCatalog) {
        self.messages.extend(other.messages);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn flatten(value: &Value, prefix: String, catalog: &mut MessageCatalog) -> CoreResult<()> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(child, path, catalog)?;
            }
            Ok(())
        }
        Value::String(template) => {
            catalog.insert(prefix, template.clone());
            Ok(())
        }
        other => Err(CoreError::InvalidCatalog {
            reason: format!("{} must be a string or object, found {}", prefix, other),
        }),
    }
}

impl Translator for MessageCatalog {
    fn trans(&self, key: &str, params: &[(&str, String)]) -> String {
        match self.get(key) {
            Some(template) => interpolate(template, params),
            None => key.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
