//! # Coupon Value Subscriber
//!
//! Adapts [`CouponValueValidator`] to the host's cart event.

use tracing::{debug, info};

use coupon_guard_core::config::ConfigSource;
use coupon_guard_core::translator::Translator;
use coupon_guard_core::CouponValueValidator;

use crate::error::HostResult;
use crate::event::{CartProcessedEvent, CartSubscriber};

/// Runs the coupon value rule on every processed cart.
#[derive(Debug)]
pub struct CouponValueSubscriber<C, T> {
    validator: CouponValueValidator<C, T>,
}

impl<C, T> CouponValueSubscriber<C, T>
where
    C: ConfigSource,
    T: Translator,
{
    pub fn new(config: C, translator: T) -> Self {
        CouponValueSubscriber {
            validator: CouponValueValidator::new(config, translator),
        }
    }
}

impl<C, T> CartSubscriber for CouponValueSubscriber<C, T>
where
    C: ConfigSource + Send + Sync,
    T: Translator + Send + Sync,
{
    fn name(&self) -> &str {
        "coupon_value"
    }

    fn on_cart_processed(&self, event: &mut CartProcessedEvent<'_>) -> HostResult<()> {
        let outcome = self.validator.process(event.cart, event.context)?;

        if outcome.promotions_rejected > 0 {
            info!(
                cart = %event.cart.token,
                rejected = outcome.promotions_rejected,
                checked = outcome.promotions_checked,
                "Coupons rejected, cart needs recalculation"
            );
        } else {
            debug!(
                cart = %event.cart.token,
                checked = outcome.promotions_checked,
                "Coupon values ok"
            );
        }

        Ok(())
    }
}
