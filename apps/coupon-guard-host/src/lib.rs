//! # Coupon Guard Host
//!
//! Reference host wiring for the coupon value rule.
//!
//! ## Module Organization
//! ```text
//! coupon_guard_host/
//! ├── lib.rs           ◄─── You are here (wiring & tracing setup)
//! ├── config_store.rs  ◄─── Scoped system config (TOML + env)
//! ├── snippets.rs      ◄─── Embedded message templates
//! ├── event.rs         ◄─── CartProcessedEvent & dispatcher
//! ├── subscriber.rs    ◄─── Validator as an event subscriber
//! ├── pipeline.rs      ◄─── Recalculation loop
//! ├── lifecycle.rs     ◄─── Install / uninstall hooks
//! └── error.rs         ◄─── HostError
//! ```
//!
//! ## Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Arc<SystemConfigStore> ──┬──► CouponGuardPlugin (install/uninstall)    │
//! │                           │                                             │
//! │                           └──► CouponValueSubscriber ◄── Snippet-       │
//! │                                        │                 Translator     │
//! │                                        ▼                                │
//! │                                 EventDispatcher                         │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                                  CartPipeline                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config_store;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod pipeline;
pub mod snippets;
pub mod subscriber;

use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use config_store::SystemConfigStore;
use event::EventDispatcher;
use lifecycle::CouponGuardPlugin;
use pipeline::CartPipeline;
use snippets::SnippetTranslator;
use subscriber::CouponValueSubscriber;

pub use error::{HostError, HostResult};

/// The assembled host: plugin hooks plus the cart pipeline.
#[derive(Debug)]
pub struct CouponGuardApp {
    pub config: Arc<SystemConfigStore>,
    pub plugin: CouponGuardPlugin,
    pub pipeline: CartPipeline,
}

impl CouponGuardApp {
    /// Wires the plugin and registers its subscriber.
    pub fn new(config: Arc<SystemConfigStore>, translator: SnippetTranslator) -> Self {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(CouponValueSubscriber::new(config.clone(), translator));

        CouponGuardApp {
            plugin: CouponGuardPlugin::new(config.clone()),
            pipeline: CartPipeline::new(dispatcher),
            config,
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=coupon_guard_core=trace` - Trace the rule only
/// - Default: INFO, DEBUG for coupon_guard crates
///
/// Logs go to stderr so stdout stays machine-readable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,coupon_guard_core=debug,coupon_guard_host=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use coupon_guard_core::config::plugin_key;
    use coupon_guard_core::{Cart, LineItem, Money, SalesChannelContext, DEBUG_MODE_KEY};
    use crate::lifecycle::InstallContext;

    #[test]
    fn test_app_rejects_oversized_coupon_in_german() {
        let config = Arc::new(SystemConfigStore::new());
        let app = CouponGuardApp::new(config, SnippetTranslator::for_locale("de-DE").unwrap());
        app.plugin.install(&InstallContext::default()).unwrap();
        assert_eq!(app.pipeline.dispatcher().len(), 1);

        let mut cart = Cart::with_token("t")
            .with_line_item(LineItem::product("mug", "Tasse", Money::from_cents(2000), 1))
            .with_line_item(LineItem::promotion("voucher", "Gutschein", Money::from_cents(2500)));

        let report = app.pipeline.process(&mut cart, &SalesChannelContext::new("sc")).unwrap();

        assert!(report.blocked);
        let error = cart.errors().get("voucher-couponValueTooHighError").unwrap();
        assert_eq!(
            error.message,
            "Der Gutschein konnte nicht eingelöst werden: Sein Wert von 25.00 übersteigt den Warenwert von 20.00 in Ihrem Warenkorb."
        );
    }

    #[test]
    fn test_bundled_demo_files() {
        let config = Arc::new(
            SystemConfigStore::from_toml_str(include_str!("../resources/plugin.toml")).unwrap(),
        );
        let app = CouponGuardApp::new(config, SnippetTranslator::for_locale("en-GB").unwrap());

        let mut cart: Cart = serde_json::from_str(include_str!("../resources/demo-cart.json")).unwrap();
        let report = app
            .pipeline
            .process(&mut cart, &SalesChannelContext::new("storefront-de"))
            .unwrap();

        assert!(report.blocked);
        assert_eq!(report.passes, 2);
        assert!(cart.get("c0ffee01").is_none());
        assert!(cart.errors().contains("c0ffee01-couponValueTooHighError"));
    }

    #[test]
    fn test_app_reads_config_changes_live() {
        let config = Arc::new(SystemConfigStore::new());
        let app = CouponGuardApp::new(config.clone(), SnippetTranslator::for_locale("en-GB").unwrap());
        let context = SalesChannelContext::new("sc");

        let fresh = || {
            Cart::with_token("t")
                .with_line_item(LineItem::product("mug", "Mug", Money::from_cents(2000), 1))
                .with_line_item(LineItem::promotion("voucher", "Voucher", Money::from_cents(500)))
        };

        let mut quiet = fresh();
        app.pipeline.process(&mut quiet, &context).unwrap();
        assert!(quiet.errors().is_empty());

        config.set(plugin_key(DEBUG_MODE_KEY), true, Some("sc")).unwrap();
        let mut loud = fresh();
        app.pipeline.process(&mut loud, &context).unwrap();
        assert_eq!(loud.errors().len(), 2);
    }
}
