//! # Cart
//!
//! The transient cart snapshot a processing pass works on.
//!
//! ## Cart Operations Used by Validators
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Read                         Write                                     │
//! │  ────                         ─────                                     │
//! │  filter_type(Promotion)       add_error(CartError)                      │
//! │  line_items()                 remove(id)                                │
//! │  errors()                     mark_modified()                           │
//! │                                                                         │
//! │  The host owns everything else: pricing, promotions, checkout.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{CartError, LineItem, LineItemType};

// =============================================================================
// Error Collection
// =============================================================================

/// Errors attached to a cart, keyed by id in insertion order.
///
/// ## Invariants
/// - Ids are unique: adding an error with an existing id replaces it in place
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCollection {
    errors: Vec<CartError>,
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an error, replacing any error with the same id.
    pub fn add(&mut self, error: CartError) {
        match self.errors.iter_mut().find(|e| e.id == error.id) {
            Some(existing) => *existing = error,
            None => self.errors.push(error),
        }
    }

    pub fn get(&self, id: &str) -> Option<&CartError> {
        self.errors.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether any error prevents order placement.
    pub fn blocks_order(&self) -> bool {
        self.errors.iter().any(|e| e.block_order)
    }

    /// Drops every error that is not persistent.
    ///
    /// Hosts call this at the start of a recalculation pass.
    pub fn retain_persistent(&mut self) {
        self.errors.retain(|e| e.persistent);
    }
}

impl<'a> IntoIterator for &'a ErrorCollection {
    type Item = &'a CartError;
    type IntoIter = std::slice::Iter<'a, CartError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A customer's cart during one processing pass.
///
/// ## Invariants
/// - Line item ids are unique (adding an existing id replaces the item)
/// - Line items keep insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Cart token (UUID v4 for carts created here).
    pub token: String,

    #[serde(default)]
    line_items: Vec<LineItem>,

    #[serde(default)]
    errors: ErrorCollection,

    /// Set when a pass changed the cart and the host should recalculate.
    #[serde(default, skip_serializing)]
    modified: bool,
}

impl Cart {
    /// Creates a new empty cart with a fresh token.
    pub fn new() -> Self {
        Cart::with_token(Uuid::new_v4().to_string())
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Cart {
            token: token.into(),
            line_items: Vec::new(),
            errors: ErrorCollection::new(),
            modified: false,
        }
    }

    /// Adds a line item, replacing any item with the same id.
    pub fn add_line_item(&mut self, item: LineItem) {
        match self.line_items.iter_mut().find(|i| i.id == item.id) {
            Some(existing) => *existing = item,
            None => self.line_items.push(item),
        }
    }

    /// Builder-style [`Cart::add_line_item`].
    pub fn with_line_item(mut self, item: LineItem) -> Self {
        self.add_line_item(item);
        self
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Line items of one type, in cart order.
    pub fn filter_type(&self, item_type: LineItemType) -> impl Iterator<Item = &LineItem> {
        self.line_items.iter().filter(move |i| i.item_type == item_type)
    }

    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.line_items.iter().find(|i| i.id == id)
    }

    /// Removes a line item by id, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<LineItem> {
        let index = self.line_items.iter().position(|i| i.id == id)?;
        Some(self.line_items.remove(index))
    }

    pub fn add_error(&mut self, error: CartError) {
        self.errors.add(error);
    }

    pub fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut ErrorCollection {
        &mut self.errors
    }

    /// Requests another recalculation pass.
    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clears the modified flag before a pass.
    pub fn reset_modified(&mut self) {
        self.modified = false;
    }

    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
