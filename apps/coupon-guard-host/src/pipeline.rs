//! # Cart Pipeline
//!
//! The host's recalculation loop.
//!
//! ## Pass Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pass 1..=max_passes                                                    │
//! │     │                                                                   │
//! │     ├── drop non-persistent cart errors                                 │
//! │     ├── reset modified flag                                             │
//! │     ├── dispatch CartProcessedEvent                                     │
//! │     │                                                                   │
//! │     └── cart modified? ── no ──► done (converged)                       │
//! │                │ yes                                                    │
//! │                └──► next pass                                           │
//! │                                                                         │
//! │  limit reached ──► warn, return the cart as it is                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistent errors (a rejected coupon) survive later passes; debug notices
//! only survive until the next pass.

use tracing::{info, warn};

use coupon_guard_core::{Cart, SalesChannelContext};

use crate::error::HostResult;
use crate::event::EventDispatcher;

/// Upper bound on recalculation passes for one cart.
pub const MAX_PROCESSING_PASSES: usize = 5;

/// What [`CartPipeline::process`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineReport {
    pub passes: usize,
    /// False when the pass limit stopped a cart that kept changing.
    pub converged: bool,
    /// Whether the cart holds an error that blocks checkout.
    pub blocked: bool,
}

/// Runs cart events until the cart stops changing.
#[derive(Debug)]
pub struct CartPipeline {
    dispatcher: EventDispatcher,
    max_passes: usize,
}

impl CartPipeline {
    pub fn new(dispatcher: EventDispatcher) -> Self {
        CartPipeline {
            dispatcher,
            max_passes: MAX_PROCESSING_PASSES,
        }
    }

    /// Overrides the pass limit (minimum 1).
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// Processes the cart in place.
    pub fn process(&self, cart: &mut Cart, context: &SalesChannelContext) -> HostResult<PipelineReport> {
        let mut passes = 0;
        let mut converged = false;

        while passes < self.max_passes {
            passes += 1;
            cart.errors_mut().retain_persistent();
            cart.reset_modified();

            self.dispatcher.dispatch(cart, context)?;

            if !cart.is_modified() {
                converged = true;
                break;
            }
        }

        if !converged {
            warn!(cart = %cart.token, passes, "Cart still modified after pass limit");
        }

        let report = PipelineReport {
            passes,
            converged,
            blocked: cart.errors().blocks_order(),
        };
        info!(
            cart = %cart.token,
            sales_channel = %context.sales_channel_id,
            passes = report.passes,
            blocked = report.blocked,
            "Cart processed"
        );

        Ok(report)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{CartProcessedEvent, CartSubscriber};
    use crate::subscriber::CouponValueSubscriber;
    use coupon_guard_core::config::{plugin_key, StaticConfig};
    use coupon_guard_core::translator::MessageCatalog;
    use coupon_guard_core::{LineItem, Money, DEBUG_MODE_KEY};

    struct AlwaysModifies;

    impl CartSubscriber for AlwaysModifies {
        fn name(&self) -> &str {
            "always_modifies"
        }

        fn on_cart_processed(&self, event: &mut CartProcessedEvent<'_>) -> HostResult<()> {
            event.cart.mark_modified();
            Ok(())
        }
    }

    fn coupon_pipeline(debug: bool) -> CartPipeline {
        let config = StaticConfig::new().set(plugin_key(DEBUG_MODE_KEY), debug);
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(CouponValueSubscriber::new(config, MessageCatalog::new()));
        CartPipeline::new(dispatcher)
    }

    fn cart(goods: i64, discount: i64) -> Cart {
        Cart::with_token("t")
            .with_line_item(LineItem::product("mug", "Mug", Money::from_cents(goods), 1))
            .with_line_item(LineItem::promotion("voucher", "Voucher", Money::from_cents(discount)))
    }

    #[test]
    fn test_valid_cart_converges_in_one_pass() {
        let mut cart = cart(2000, 1500);
        let report = coupon_pipeline(false).process(&mut cart, &SalesChannelContext::new("sc")).unwrap();

        assert_eq!(report, PipelineReport { passes: 1, converged: true, blocked: false });
        assert!(cart.get("voucher").is_some());
    }

    #[test]
    fn test_rejected_coupon_triggers_second_pass() {
        let mut cart = cart(2000, 2500);
        let report = coupon_pipeline(false).process(&mut cart, &SalesChannelContext::new("sc")).unwrap();

        assert_eq!(report, PipelineReport { passes: 2, converged: true, blocked: true });
        assert!(cart.get("voucher").is_none());
        assert!(cart.errors().contains("voucher-couponValueTooHighError"));
        assert_eq!(cart.errors().len(), 1);
    }

    #[test]
    fn test_debug_notices_do_not_outlive_the_pass() {
        let mut cart = cart(2000, 2500);
        coupon_pipeline(true).process(&mut cart, &SalesChannelContext::new("sc")).unwrap();

        // Second pass dropped the transient notices; the promotion is gone so
        // nothing re-adds them.
        assert!(!cart.errors().contains("voucher-debugCartVal"));
        assert!(cart.errors().contains("voucher-couponValueTooHighError"));

        let mut valid = self::cart(2000, 1500);
        coupon_pipeline(true).process(&mut valid, &SalesChannelContext::new("sc")).unwrap();
        assert!(valid.errors().contains("voucher-debugCartVal"));
        assert!(valid.errors().contains("voucher-debugCouponVal"));
    }

    #[test]
    fn test_reprocessing_blocked_cart_is_stable() {
        let pipeline = coupon_pipeline(false);
        let context = SalesChannelContext::new("sc");
        let mut cart = cart(2000, 2500);

        pipeline.process(&mut cart, &context).unwrap();
        let snapshot = cart.clone();
        let report = pipeline.process(&mut cart, &context).unwrap();

        assert_eq!(report.passes, 1);
        assert_eq!(cart, snapshot);
    }

    #[test]
    fn test_pass_limit() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(AlwaysModifies);
        let pipeline = CartPipeline::new(dispatcher).with_max_passes(3);

        let mut cart = Cart::with_token("t");
        let report = pipeline.process(&mut cart, &SalesChannelContext::new("sc")).unwrap();

        assert_eq!(report.passes, 3);
        assert!(!report.converged);
    }
}
