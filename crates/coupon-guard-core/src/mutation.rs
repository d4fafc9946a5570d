//! # Cart Mutations
//!
//! The validator does not touch the cart. It returns the changes it wants as
//! [`CartMutation`] values and [`apply_mutations`] performs them, which keeps
//! rule evaluation testable on a borrowed cart.
//!
//! ```text
//! CouponValueValidator::plan(&cart) ──► Vec<CartMutation> ──► apply_mutations(&mut cart)
//!                                          AddError
//!                                          RemoveLineItem
//!                                          MarkModified
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cart::Cart;
use crate::types::CartError;

/// One intended change to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartMutation {
    /// Attach (or replace, by id) a cart error.
    AddError(CartError),
    /// Remove a line item by id.
    RemoveLineItem { id: String },
    /// Ask the host for another recalculation pass.
    MarkModified,
}

/// Counts of what [`apply_mutations`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppliedMutations {
    pub errors_added: usize,
    pub items_removed: usize,
    /// Removals whose line item was already gone.
    pub removals_skipped: usize,
    pub marked_modified: bool,
}

impl AppliedMutations {
    /// Whether the cart changed at all.
    pub fn changed(&self) -> bool {
        self.errors_added > 0 || self.items_removed > 0 || self.marked_modified
    }
}

/// Applies mutations to the cart in order.
///
/// A removal for an id that is not in the cart is skipped with a warning.
pub fn apply_mutations<I>(cart: &mut Cart, mutations: I) -> AppliedMutations
where
    I: IntoIterator<Item = CartMutation>,
{
    let mut applied = AppliedMutations::default();

    for mutation in mutations {
        match mutation {
            CartMutation::AddError(error) => {
                cart.add_error(error);
                applied.errors_added += 1;
            }
            CartMutation::RemoveLineItem { id } => match cart.remove(&id) {
                Some(_) => applied.items_removed += 1,
                None => {
                    warn!(cart = %cart.token, line_item = %id, "line item already removed");
                    applied.removals_skipped += 1;
                }
            },
            CartMutation::MarkModified => {
                cart.mark_modified();
                applied.marked_modified = true;
            }
        }
    }

    applied
}

// =============================================================================
// Unit Tests
// =============================================================================
