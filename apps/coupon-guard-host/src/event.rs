//! # Cart Events
//!
//! The "cart processed" notification and the dispatcher that delivers it.
//!
//! Subscribers are registered explicitly by the application wiring
//! (see [`crate::CouponGuardApp::new`]); nothing registers itself.
//!
//! ```text
//! CartPipeline ──► EventDispatcher::dispatch(cart, context)
//!                        │
//!                        ├──► subscriber 1 .on_cart_processed(&mut event)
//!                        ├──► subscriber 2 .on_cart_processed(&mut event)
//!                        └──► ...  (registration order, stops at first error)
//! ```

use tracing::trace;

use coupon_guard_core::{Cart, SalesChannelContext};

use crate::error::HostResult;

/// Fired after the host has recalculated a cart.
#[derive(Debug)]
pub struct CartProcessedEvent<'a> {
    pub cart: &'a mut Cart,
    pub context: &'a SalesChannelContext,
}

/// A handler for [`CartProcessedEvent`].
pub trait CartSubscriber: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    fn on_cart_processed(&self, event: &mut CartProcessedEvent<'_>) -> HostResult<()>;
}

/// Delivers cart events to registered subscribers.
#[derive(Default)]
pub struct EventDispatcher {
    subscribers: Vec<Box<dyn CartSubscriber>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber; it runs after those registered before it.
    pub fn subscribe<S: CartSubscriber + 'static>(&mut self, subscriber: S) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Runs every subscriber against the cart.
    pub fn dispatch(&self, cart: &mut Cart, context: &SalesChannelContext) -> HostResult<()> {
        let mut event = CartProcessedEvent { cart, context };
        for subscriber in &self.subscribers {
            trace!(subscriber = subscriber.name(), "dispatching cart processed event");
            subscriber.on_cart_processed(&mut event)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.subscribers.iter().map(|s| s.name()))
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
