//! # Domain Types
//!
//! The slice of the host's cart model the coupon rule reads and writes.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │ CalculatedPrice │   │   CartError     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  unit_price     │   │  id             │       │
//! │  │  item_type ─────┼─┐ │  quantity       │   │  message        │       │
//! │  │  price ─────────┼─┼►│  total_price    │   │  parameters     │       │
//! │  └─────────────────┘ │ └─────────────────┘   │  level          │       │
//! │                      │                       │  block_order    │       │
//! │  ┌─────────────────┐ │ ┌─────────────────┐   │  persistent     │       │
//! │  │  LineItemType   │◄┘ │ SalesChannel-   │   └─────────────────┘       │
//! │  │  product        │   │ Context         │                             │
//! │  │  custom         │   │  sales_channel  │                             │
//! │  │  promotion ...  │   │                 │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Line Item Type
// =============================================================================

/// The type tag of a line item.
///
/// Serialized with the host's tag strings (`"product"`, `"promotion"`, ...).
/// Tags this crate has no use for deserialize as [`LineItemType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemType {
    /// A catalog product.
    Product,
    /// A custom (manually priced) item.
    Custom,
    /// A discount created by the promotion engine.
    Promotion,
    /// A credit note.
    Credit,
    /// A container grouping other items.
    Container,
    #[serde(other)]
    Other,
}

impl LineItemType {
    /// Whether items of this type count toward the goods value.
    #[inline]
    pub const fn is_goods(&self) -> bool {
        matches!(self, LineItemType::Product | LineItemType::Custom)
    }
}

// =============================================================================
// Calculated Price
// =============================================================================

/// Price of a line item after the host's price calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedPrice {
    pub unit_price: Money,
    pub quantity: i64,
    /// Signed total; promotions carry a negative total.
    pub total_price: Money,
}

impl CalculatedPrice {
    /// Creates a price from a unit price and quantity.
    pub fn new(unit_price: Money, quantity: i64) -> Self {
        CalculatedPrice {
            unit_price,
            quantity,
            total_price: unit_price.multiply_quantity(quantity),
        }
    }

    /// Creates a single-quantity price whose total is `total`.
    ///
    /// Promotion engines price discounts this way.
    pub fn fixed(total: Money) -> Self {
        CalculatedPrice::new(total, 1)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One entry in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub item_type: LineItemType,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
    /// Absent until the host has calculated the item.
    #[serde(default)]
    pub price: Option<CalculatedPrice>,
}

fn default_quantity() -> i64 {
    1
}

impl LineItem {
    /// Creates an unpriced line item.
    pub fn new(id: impl Into<String>, item_type: LineItemType, label: impl Into<String>) -> Self {
        LineItem {
            id: id.into(),
            label: label.into(),
            item_type,
            quantity: 1,
            price: None,
        }
    }

    /// Creates a product line item priced at `unit_price × quantity`.
    pub fn product(id: impl Into<String>, label: impl Into<String>, unit_price: Money, quantity: i64) -> Self {
        LineItem {
            quantity,
            price: Some(CalculatedPrice::new(unit_price, quantity)),
            ..LineItem::new(id, LineItemType::Product, label)
        }
    }

    /// Creates a promotion line item carrying `discount` as a negative total.
    ///
    /// `discount` is the magnitude; the sign is applied here.
    pub fn promotion(id: impl Into<String>, label: impl Into<String>, discount: Money) -> Self {
        LineItem {
            price: Some(CalculatedPrice::fixed(-discount.abs())),
            ..LineItem::new(id, LineItemType::Promotion, label)
        }
    }

    /// Sets the calculated price.
    pub fn with_price(mut self, price: CalculatedPrice) -> Self {
        self.price = Some(price);
        self
    }

    /// Total price, if the item has been calculated.
    #[inline]
    pub fn total_price(&self) -> Option<Money> {
        self.price.map(|p| p.total_price)
    }
}

// =============================================================================
// Sales Channel Context
// =============================================================================

/// The storefront a cart is processed for.
///
/// Only used to scope configuration lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesChannelContext {
    pub sales_channel_id: String,
}

impl SalesChannelContext {
    pub fn new(sales_channel_id: impl Into<String>) -> Self {
        SalesChannelContext {
            sales_channel_id: sales_channel_id.into(),
        }
    }
}

// =============================================================================
// Cart Error (Annotation)
// =============================================================================

/// Severity of a cart error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ErrorLevel {
    /// Diagnostic notice.
    Info,
    /// Problem shown as an error in the storefront.
    Error,
}

/// A message attached to a cart.
///
/// Validators report through these instead of failing: an error with
/// `block_order` set prevents checkout until it is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartError {
    /// Unique within a cart; adding a second error with the same id replaces
    /// the first.
    pub id: String,
    /// Translated, human-readable message.
    pub message: String,
    /// Structured values the message was built from, serialized as decimal
    /// amounts (`{"cartTotal": 20.0}`).
    #[serde(with = "decimal_parameters")]
    #[ts(type = "Record<string, number>")]
    pub parameters: BTreeMap<String, Money>,
    pub level: ErrorLevel,
    /// Prevents order placement while present.
    pub block_order: bool,
    /// Survives the removal of transient errors between recalculation passes.
    pub persistent: bool,
}

impl CartError {
    /// Creates a non-blocking, non-persistent informational error.
    pub fn info(id: impl Into<String>, message: impl Into<String>) -> Self {
        CartError {
            id: id.into(),
            message: message.into(),
            parameters: BTreeMap::new(),
            level: ErrorLevel::Info,
            block_order: false,
            persistent: false,
        }
    }

    /// Creates a blocking, persistent error.
    pub fn blocking(id: impl Into<String>, message: impl Into<String>) -> Self {
        CartError {
            level: ErrorLevel::Error,
            block_order: true,
            persistent: true,
            ..CartError::info(id, message)
        }
    }

    /// Adds a structured parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, value: Money) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Looks up a structured parameter.
    pub fn parameter(&self, name: &str) -> Option<Money> {
        self.parameters.get(name).copied()
    }
}

/// Serde adapter writing parameter amounts in major units.
mod decimal_parameters {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    use crate::money::Money;

    pub fn serialize<S>(parameters: &BTreeMap<String, Money>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(parameters.iter().map(|(name, value)| (name, value.to_decimal())))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<String, Money>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let amounts = BTreeMap::<String, f64>::deserialize(deserializer)?;
        Ok(amounts
            .into_iter()
            .map(|(name, amount)| (name, Money::from_decimal(amount)))
            .collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goods_types() {
        assert!(LineItemType::Product.is_goods());
        assert!(LineItemType::Custom.is_goods());
        assert!(!LineItemType::Promotion.is_goods());
        assert!(!LineItemType::Credit.is_goods());
        assert!(!LineItemType::Other.is_goods());
    }

    #[test]
    fn test_promotion_total_is_negative() {
        let item = LineItem::promotion("promo-1", "Spring voucher", Money::from_cents(2500));
        assert_eq!(item.item_type, LineItemType::Promotion);
        assert_eq!(item.total_price(), Some(Money::from_cents(-2500)));

        // Already-negative input keeps a single sign flip.
        let item = LineItem::promotion("promo-2", "Voucher", Money::from_cents(-2500));
        assert_eq!(item.total_price(), Some(Money::from_cents(-2500)));
    }

    #[test]
    fn test_product_price_multiplies_quantity() {
        let item = LineItem::product("p-1", "Mug", Money::from_cents(750), 4);
        assert_eq!(item.quantity, 4);
        assert_eq!(item.total_price(), Some(Money::from_cents(3000)));
    }

    #[test]
    fn test_line_item_deserializes_host_tags() {
        let item: LineItem = serde_json::from_value(serde_json::json!({
            "id": "abc",
            "type": "promotion",
            "price": { "unitPrice": -1500, "quantity": 1, "totalPrice": -1500 }
        }))
        .unwrap();
        assert_eq!(item.item_type, LineItemType::Promotion);
        assert_eq!(item.quantity, 1);
        assert_eq!(item.total_price(), Some(Money::from_cents(-1500)));

        let item: LineItem =
            serde_json::from_value(serde_json::json!({ "id": "x", "type": "shipping-fee" })).unwrap();
        assert_eq!(item.item_type, LineItemType::Other);
        assert_eq!(item.price, None);
    }

    #[test]
    fn test_cart_error_constructors() {
        let info = CartError::info("a-debug", "hello");
        assert_eq!(info.level, ErrorLevel::Info);
        assert!(!info.block_order);
        assert!(!info.persistent);

        let blocking = CartError::blocking("a-error", "nope")
            .with_parameter("cartTotal", Money::from_cents(2000));
        assert_eq!(blocking.level, ErrorLevel::Error);
        assert!(blocking.block_order);
        assert!(blocking.persistent);
        assert_eq!(blocking.parameter("cartTotal"), Some(Money::from_cents(2000)));
        assert_eq!(blocking.parameter("couponValue"), None);
    }

    #[test]
    fn test_cart_error_parameters_serialize_as_decimals() {
        let error = CartError::blocking("promo-couponValueTooHighError", "too high")
            .with_parameter("cartTotal", Money::from_cents(2000))
            .with_parameter("couponValue", Money::from_cents(2550));

        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(
            json["parameters"],
            serde_json::json!({ "cartTotal": 20.0, "couponValue": 25.5 })
        );
        assert_eq!(json["blockOrder"], serde_json::json!(true));

        let back: CartError = serde_json::from_value(json).unwrap();
        assert_eq!(back, error);
    }
}
