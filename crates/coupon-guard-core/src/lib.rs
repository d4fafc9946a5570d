//! # coupon-guard-core: Coupon Value Rule
//!
//! Pure logic for one cart validation rule: a flat-discount coupon must not be
//! worth more than the goods it is applied to.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Coupon Guard Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Host (coupon-guard-host)                     │   │
//! │  │   CartPipeline ──► EventDispatcher ──► CouponValueSubscriber    │   │
//! │  │   SystemConfigStore             SnippetTranslator               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ConfigSource, Translator               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ coupon-guard-core (THIS CRATE) ★                │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌────────────┐ ┌────────────────┐  │   │
//! │  │   │  money   │ │   cart   │ │ validation │ │   mutation     │  │   │
//! │  │   │  Money   │ │   Cart   │ │ CouponValue│ │  CartMutation  │  │   │
//! │  │   │          │ │ LineItem │ │ Validator  │ │  apply         │  │   │
//! │  │   └──────────┘ └──────────┘ └────────────┘ └────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL CONFIG • PURE FUNCTIONS                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic
//! - [`types`] - Line items, prices, sales channel context, cart errors
//! - [`cart`] - Cart and its error collection
//! - [`config`] - Configuration capability and plugin options
//! - [`translator`] - Message lookup capability and catalog
//! - [`validation`] - The coupon value rule
//! - [`mutation`] - Planned cart changes and their applier
//! - [`error`] - Error types

pub mod cart;
pub mod config;
pub mod error;
pub mod money;
pub mod mutation;
pub mod translator;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, ErrorCollection};
pub use error::{ConfigError, CoreError, CoreResult};
pub use money::Money;
pub use mutation::{apply_mutations, AppliedMutations, CartMutation};
pub use types::*;
pub use validation::{CouponValueValidator, ValidationOutcome};

/// Everything an embedding host usually needs.
pub mod prelude {
    pub use crate::cart::{Cart, ErrorCollection};
    pub use crate::config::{ConfigSource, ConfigValue, PluginConfig, StaticConfig};
    pub use crate::error::{ConfigError, CoreError, CoreResult};
    pub use crate::money::Money;
    pub use crate::mutation::{apply_mutations, CartMutation};
    pub use crate::translator::{MessageCatalog, Translator};
    pub use crate::types::{
        CalculatedPrice, CartError, ErrorLevel, LineItem, LineItemType, SalesChannelContext,
    };
    pub use crate::validation::{CouponValueValidator, ValidationOutcome};
}

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of every configuration key the plugin owns.
pub const CONFIG_DOMAIN: &str = "JulesCartCouponValueValidation.config.";

/// Option name of the debug switch, relative to [`CONFIG_DOMAIN`].
pub const DEBUG_MODE_KEY: &str = "debugMode";

/// Suffix of the informational error reporting the goods value.
pub const DEBUG_CART_VALUE_SUFFIX: &str = "-debugCartVal";

/// Suffix of the informational error reporting the coupon value.
pub const DEBUG_COUPON_VALUE_SUFFIX: &str = "-debugCouponVal";

/// Suffix of the blocking error raised for a rejected coupon.
pub const TOO_HIGH_ERROR_SUFFIX: &str = "-couponValueTooHighError";

pub const MSG_DEBUG_CART_VALUE: &str = "cartCouponValueValidation.debug.cartValue";
pub const MSG_DEBUG_COUPON_VALUE: &str = "cartCouponValueValidation.debug.couponValue";
pub const MSG_CART_VALUE_TOO_LOW: &str = "cartCouponValueValidation.error.cartValueTooLow";

/// Parameter name of the goods value in cart errors.
pub const PARAM_CART_TOTAL: &str = "cartTotal";

/// Parameter name of the coupon value in cart errors.
pub const PARAM_COUPON_VALUE: &str = "couponValue";
