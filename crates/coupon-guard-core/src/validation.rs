//! # Coupon Value Validation
//!
//! Rejects flat-discount coupons that are worth more than the goods in the
//! cart.
//!
//! ## Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart processed                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  any promotion line items? ── no ──► done (no mutations)                │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  goods = Σ total(product | custom, priced only)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each promotion (cart order):                                      │
//! │       ├── unpriced or |total| == 0 ──► skip                            │
//! │       ├── debug mode ──► info errors  <id>-debugCartVal                │
//! │       │                               <id>-debugCouponVal              │
//! │       └── goods < |total| ──► blocking <id>-couponValueTooHighError    │
//! │                               remove promotion                          │
//! │                               mark cart modified                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Equal values pass: only a strictly smaller goods value blocks.
//!
//! ## Usage
//! ```rust
//! use coupon_guard_core::prelude::*;
//!
//! let validator = CouponValueValidator::new(StaticConfig::new(), MessageCatalog::new());
//! let context = SalesChannelContext::new("storefront");
//!
//! let cart = Cart::new()
//!     .with_line_item(LineItem::product("mug", "Mug", Money::from_cents(2000), 1))
//!     .with_line_item(LineItem::promotion("voucher", "Voucher", Money::from_cents(2500)));
//!
//! let cart = validator.validate(cart, &context).unwrap();
//!
//! assert!(cart.get("voucher").is_none());
//! assert!(cart.errors().contains("voucher-couponValueTooHighError"));
//! assert!(cart.is_modified());
//! ```

use tracing::{debug, info};

use crate::cart::Cart;
use crate::config::{ConfigSource, PluginConfig};
use crate::error::CoreResult;
use crate::money::Money;
use crate::mutation::{apply_mutations, AppliedMutations, CartMutation};
use crate::translator::Translator;
use crate::types::{CartError, LineItem, LineItemType, SalesChannelContext};
use crate::{
    DEBUG_CART_VALUE_SUFFIX, DEBUG_COUPON_VALUE_SUFFIX, MSG_CART_VALUE_TOO_LOW,
    MSG_DEBUG_CART_VALUE, MSG_DEBUG_COUPON_VALUE, PARAM_CART_TOTAL, PARAM_COUPON_VALUE,
    TOO_HIGH_ERROR_SUFFIX,
};

// =============================================================================
// Validator
// =============================================================================

/// The coupon value rule, with its configuration and translation injected.
#[derive(Debug, Clone)]
pub struct CouponValueValidator<C, T> {
    config: C,
    translator: T,
}

/// Summary of one [`CouponValueValidator::process`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Promotions with a positive discount that were compared.
    pub promotions_checked: usize,
    /// Promotions removed because the goods value was too low.
    pub promotions_rejected: usize,
    pub applied: AppliedMutations,
}

impl<C: ConfigSource, T: Translator> CouponValueValidator<C, T> {
    pub fn new(config: C, translator: T) -> Self {
        CouponValueValidator { config, translator }
    }

    /// Returns the mutations the rule wants for this cart, without applying
    /// them.
    ///
    /// ## Errors
    /// Only a failing config source; rule violations are mutations.
    pub fn plan(&self, cart: &Cart, context: &SalesChannelContext) -> CoreResult<Vec<CartMutation>> {
        Ok(self.evaluate(cart, context)?.0)
    }

    /// Plans and applies the rule, returning the resulting cart.
    pub fn validate(&self, mut cart: Cart, context: &SalesChannelContext) -> CoreResult<Cart> {
        self.process(&mut cart, context)?;
        Ok(cart)
    }

    /// Plans and applies the rule in place.
    pub fn process(&self, cart: &mut Cart, context: &SalesChannelContext) -> CoreResult<ValidationOutcome> {
        let (mutations, promotions_checked) = self.evaluate(cart, context)?;
        let promotions_rejected = mutations
            .iter()
            .filter(|m| matches!(m, CartMutation::RemoveLineItem { .. }))
            .count();

        let applied = apply_mutations(cart, mutations);

        Ok(ValidationOutcome {
            promotions_checked,
            promotions_rejected,
            applied,
        })
    }

    fn evaluate(&self, cart: &Cart, context: &SalesChannelContext) -> CoreResult<(Vec<CartMutation>, usize)> {
        let PluginConfig { debug_mode } = PluginConfig::resolve(&self.config, context)?;

        let promotions: Vec<&LineItem> = cart.filter_type(LineItemType::Promotion).collect();
        if promotions.is_empty() {
            return Ok((Vec::new(), 0));
        }

        let cart_goods_total = goods_total(cart);
        debug!(
            cart = %cart.token,
            sales_channel = %context.sales_channel_id,
            goods_total = %cart_goods_total,
            promotions = promotions.len(),
            "checking coupon values"
        );

        let mut mutations = Vec::new();
        let mut checked = 0;

        for promotion in promotions {
            let Some(total) = promotion.total_price() else {
                continue;
            };
            let coupon_value = total.abs();
            if !coupon_value.is_positive() {
                continue;
            }
            checked += 1;

            if debug_mode {
                mutations.extend(self.debug_errors(promotion, cart_goods_total, coupon_value));
            }

            if cart_goods_total < coupon_value {
                info!(
                    cart = %cart.token,
                    promotion = %promotion.id,
                    goods_total = %cart_goods_total,
                    coupon_value = %coupon_value,
                    "coupon value exceeds goods value, removing promotion"
                );

                mutations.push(CartMutation::AddError(self.too_high_error(
                    promotion,
                    cart_goods_total,
                    coupon_value,
                )));
                mutations.push(CartMutation::RemoveLineItem {
                    id: promotion.id.clone(),
                });
                mutations.push(CartMutation::MarkModified);
            }
        }

        Ok((mutations, checked))
    }

    fn debug_errors(&self, promotion: &LineItem, cart_total: Money, coupon_value: Money) -> [CartMutation; 2] {
        let cart_message = self.translator.trans(
            MSG_DEBUG_CART_VALUE,
            &[("%cartTotal%", cart_total.format_decimal())],
        );
        let coupon_message = self.translator.trans(
            MSG_DEBUG_COUPON_VALUE,
            &[("%couponValue%", coupon_value.format_decimal())],
        );

        [
            CartMutation::AddError(
                CartError::info(format!("{}{}", promotion.id, DEBUG_CART_VALUE_SUFFIX), cart_message)
                    .with_parameter(PARAM_CART_TOTAL, cart_total),
            ),
            CartMutation::AddError(
                CartError::info(format!("{}{}", promotion.id, DEBUG_COUPON_VALUE_SUFFIX), coupon_message)
                    .with_parameter(PARAM_COUPON_VALUE, coupon_value),
            ),
        ]
    }

    fn too_high_error(&self, promotion: &LineItem, cart_total: Money, coupon_value: Money) -> CartError {
        let message = self.translator.trans(
            MSG_CART_VALUE_TOO_LOW,
            &[
                ("%cartTotal%", cart_total.format_decimal()),
                ("%couponValue%", coupon_value.format_decimal()),
            ],
        );

        CartError::blocking(format!("{}{}", promotion.id, TOO_HIGH_ERROR_SUFFIX), message)
            .with_parameter(PARAM_CART_TOTAL, cart_total)
            .with_parameter(PARAM_COUPON_VALUE, coupon_value)
    }
}

/// Sum of the totals of priced product and custom line items.
///
/// Items without a calculated price contribute nothing.
pub fn goods_total(cart: &Cart) -> Money {
    cart.line_items()
        .iter()
        .filter(|item| item.item_type.is_goods())
        .filter_map(LineItem::total_price)
        .sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{plugin_key, ConfigValue, StaticConfig};
    use crate::error::{ConfigError, CoreError};
    use crate::translator::MessageCatalog;
    use crate::types::{CalculatedPrice, ErrorLevel};
    use crate::DEBUG_MODE_KEY;

    const CHANNEL: &str = "storefront";

    fn catalog() -> MessageCatalog {
        MessageCatalog::new()
            .with(MSG_DEBUG_CART_VALUE, "Goods value: %cartTotal%")
            .with(MSG_DEBUG_COUPON_VALUE, "Coupon value: %couponValue%")
            .with(
                MSG_CART_VALUE_TOO_LOW,
                "Goods value %cartTotal% is below the coupon value %couponValue%.",
            )
    }

    fn validator(debug: bool) -> CouponValueValidator<StaticConfig, MessageCatalog> {
        let config = StaticConfig::new().set_scoped(CHANNEL, plugin_key(DEBUG_MODE_KEY), debug);
        CouponValueValidator::new(config, catalog())
    }

    fn context() -> SalesChannelContext {
        SalesChannelContext::new(CHANNEL)
    }

    fn cart_with(goods_cents: i64, discount_cents: i64) -> Cart {
        Cart::with_token("cart")
            .with_line_item(LineItem::product("mug", "Mug", Money::from_cents(goods_cents), 1))
            .with_line_item(LineItem::promotion("voucher", "Voucher", Money::from_cents(discount_cents)))
    }

    #[test]
    fn test_no_promotions_no_mutations() {
        let cart = Cart::with_token("cart")
            .with_line_item(LineItem::product("mug", "Mug", Money::from_cents(100), 1));

        assert!(validator(true).plan(&cart, &context()).unwrap().is_empty());

        let after = validator(true).validate(cart.clone(), &context()).unwrap();
        assert_eq!(after, cart);
    }

    #[test]
    fn test_coupon_above_goods_value_is_rejected() {
        let cart = validator(false).validate(cart_with(2000, 2500), &context()).unwrap();

        assert!(cart.get("voucher").is_none());
        assert!(cart.get("mug").is_some());
        assert!(cart.is_modified());

        let error = cart.errors().get("voucher-couponValueTooHighError").unwrap();
        assert_eq!(error.level, ErrorLevel::Error);
        assert!(error.block_order);
        assert!(error.persistent);
        assert_eq!(error.parameter("cartTotal"), Some(Money::from_cents(2000)));
        assert_eq!(error.parameter("couponValue"), Some(Money::from_cents(2500)));
        assert_eq!(error.message, "Goods value 20.00 is below the coupon value 25.00.");
        assert_eq!(cart.errors().len(), 1);
    }

    #[test]
    fn test_coupon_below_goods_value_passes() {
        let before = cart_with(2000, 1500);
        let after = validator(false).validate(before.clone(), &context()).unwrap();
        assert_eq!(after, before);
        assert!(!after.is_modified());
    }

    #[test]
    fn test_equal_values_pass() {
        let mutations = validator(false).plan(&cart_with(2000, 2000), &context()).unwrap();
        assert!(mutations.is_empty());
    }

    #[test]
    fn test_one_cent_short_is_rejected() {
        let mutations = validator(false).plan(&cart_with(1999, 2000), &context()).unwrap();
        assert_eq!(mutations.len(), 3);
    }

    #[test]
    fn test_plan_order() {
        let mutations = validator(false).plan(&cart_with(2000, 2500), &context()).unwrap();

        assert!(matches!(&mutations[0], CartMutation::AddError(e) if e.id == "voucher-couponValueTooHighError"));
        assert_eq!(mutations[1], CartMutation::RemoveLineItem { id: "voucher".to_string() });
        assert_eq!(mutations[2], CartMutation::MarkModified);
    }

    #[test]
    fn test_zero_discount_is_ignored() {
        let cart = Cart::with_token("cart")
            .with_line_item(LineItem::promotion("free", "Zero", Money::zero()));

        let after = validator(true).validate(cart.clone(), &context()).unwrap();
        assert_eq!(after, cart);
    }

    #[test]
    fn test_unpriced_promotion_is_skipped() {
        let cart = Cart::with_token("cart")
            .with_line_item(LineItem::new("pending", LineItemType::Promotion, "Pending"));

        let outcome = validator(true).process(&mut cart.clone(), &context()).unwrap();
        assert_eq!(outcome.promotions_checked, 0);
        assert!(!outcome.applied.changed());
    }

    #[test]
    fn test_positive_promotion_total_uses_magnitude() {
        let cart = Cart::with_token("cart")
            .with_line_item(LineItem::product("mug", "Mug", Money::from_cents(1000), 1))
            .with_line_item(
                LineItem::new("odd", LineItemType::Promotion, "Odd sign")
                    .with_price(CalculatedPrice::fixed(Money::from_cents(1500))),
            );

        let cart = validator(false).validate(cart, &context()).unwrap();
        assert!(cart.errors().contains("odd-couponValueTooHighError"));
    }

    #[test]
    fn test_goods_total_counts_products_and_custom_items() {
        let cart = Cart::with_token("cart")
            .with_line_item(LineItem::product("a", "A", Money::from_cents(1000), 2))
            .with_line_item(
                LineItem::new("engraving", LineItemType::Custom, "Engraving")
                    .with_price(CalculatedPrice::new(Money::from_cents(500), 1)),
            )
            .with_line_item(LineItem::new("unpriced", LineItemType::Product, "Unpriced"))
            .with_line_item(
                LineItem::new("credit", LineItemType::Credit, "Credit")
                    .with_price(CalculatedPrice::fixed(Money::from_cents(-300))),
            )
            .with_line_item(LineItem::promotion("voucher", "Voucher", Money::from_cents(400)));

        assert_eq!(goods_total(&cart), Money::from_cents(2500));
    }

    #[test]
    fn test_extreme_totals_saturate() {
        let priced = |id: &str, item_type, cents| {
            LineItem::new(id, item_type, id).with_price(CalculatedPrice::fixed(Money::from_cents(cents)))
        };
        let cart = Cart::with_token("cart")
            .with_line_item(priced("big", LineItemType::Product, i64::MAX))
            .with_line_item(priced("extra", LineItemType::Custom, 1))
            .with_line_item(priced("voucher", LineItemType::Promotion, i64::MIN));

        assert_eq!(goods_total(&cart), Money::from_cents(i64::MAX));

        let cart = validator(true).validate(cart, &context()).unwrap();
        assert!(cart.get("voucher").is_some());
        assert!(!cart.errors().blocks_order());

        let small = Cart::with_token("cart")
            .with_line_item(priced("mug", LineItemType::Product, 100))
            .with_line_item(priced("voucher", LineItemType::Promotion, i64::MIN));
        let small = validator(false).validate(small, &context()).unwrap();
        let error = small.errors().get("voucher-couponValueTooHighError").unwrap();
        assert_eq!(error.parameter("couponValue"), Some(Money::from_cents(i64::MAX)));
    }

    #[test]
    fn test_debug_errors_only_in_debug_mode() {
        let passing = cart_with(2000, 1500);

        let quiet = validator(false).validate(passing.clone(), &context()).unwrap();
        assert!(quiet.errors().is_empty());

        let loud = validator(true).validate(passing, &context()).unwrap();
        assert_eq!(loud.errors().len(), 2);
        assert!(!loud.errors().blocks_order());
        assert!(loud.get("voucher").is_some());

        let cart_value = loud.errors().get("voucher-debugCartVal").unwrap();
        assert_eq!(cart_value.level, ErrorLevel::Info);
        assert!(!cart_value.persistent);
        assert_eq!(cart_value.message, "Goods value: 20.00");
        assert_eq!(cart_value.parameter("cartTotal"), Some(Money::from_cents(2000)));

        let coupon_value = loud.errors().get("voucher-debugCouponVal").unwrap();
        assert_eq!(coupon_value.message, "Coupon value: 15.00");
        assert_eq!(coupon_value.parameter("couponValue"), Some(Money::from_cents(1500)));
    }

    #[test]
    fn test_debug_errors_accompany_rejection() {
        let cart = validator(true).validate(cart_with(2000, 2500), &context()).unwrap();

        let ids: Vec<&str> = cart.errors().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "voucher-debugCartVal",
                "voucher-debugCouponVal",
                "voucher-couponValueTooHighError",
            ]
        );
    }

    #[test]
    fn test_multiple_promotions_evaluated_independently() {
        let cart = Cart::with_token("cart")
            .with_line_item(LineItem::product("mug", "Mug", Money::from_cents(3000), 1))
            .with_line_item(LineItem::promotion("small", "Small", Money::from_cents(1000)))
            .with_line_item(LineItem::promotion("big", "Big", Money::from_cents(5000)))
            .with_line_item(LineItem::promotion("huge", "Huge", Money::from_cents(9000)));

        let mut cart = cart;
        let outcome = validator(false).process(&mut cart, &context()).unwrap();

        assert_eq!(outcome.promotions_checked, 3);
        assert_eq!(outcome.promotions_rejected, 2);
        assert_eq!(outcome.applied.items_removed, 2);
        assert!(cart.get("small").is_some());
        assert!(cart.get("big").is_none());
        assert!(cart.get("huge").is_none());
        assert!(cart.errors().contains("big-couponValueTooHighError"));
        assert!(cart.errors().contains("huge-couponValueTooHighError"));
    }

    #[test]
    fn test_rerun_on_corrected_cart_is_noop() {
        let validator = validator(false);
        let first = validator.validate(cart_with(2000, 2500), &context()).unwrap();

        let mut second = first.clone();
        second.reset_modified();
        let outcome = validator.process(&mut second, &context()).unwrap();

        assert!(!outcome.applied.changed());
        assert_eq!(second.errors(), first.errors());
        assert_eq!(second.line_items(), first.line_items());
    }

    #[test]
    fn test_missing_translation_falls_back_to_key() {
        let validator = CouponValueValidator::new(StaticConfig::new(), MessageCatalog::new());
        let cart = validator.validate(cart_with(2000, 2500), &context()).unwrap();

        let error = cart.errors().get("voucher-couponValueTooHighError").unwrap();
        assert_eq!(error.message, MSG_CART_VALUE_TOO_LOW);
    }

    #[test]
    fn test_string_config_value_enables_debug() {
        let config = StaticConfig::new().set(plugin_key(DEBUG_MODE_KEY), ConfigValue::from("1"));
        let validator = CouponValueValidator::new(config, catalog());

        let cart = validator.validate(cart_with(2000, 1000), &context()).unwrap();
        assert_eq!(cart.errors().len(), 2);
    }

    #[test]
    fn test_config_failure_propagates() {
        struct Offline;
        impl ConfigSource for Offline {
            fn get(&self, _: &str, _: Option<&str>) -> Result<Option<ConfigValue>, ConfigError> {
                Err(ConfigError::Unavailable("offline".to_string()))
            }
        }

        let validator = CouponValueValidator::new(Offline, catalog());
        let result = validator.plan(&cart_with(2000, 2500), &context());
        assert!(matches!(result, Err(CoreError::Config(ConfigError::Unavailable(_)))));
    }
}
