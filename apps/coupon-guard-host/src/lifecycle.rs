//! # Plugin Lifecycle
//!
//! Install and uninstall hooks for the coupon value plugin.
//!
//! ```text
//! install   ──► seed debugMode = false (global) if unset
//!
//! uninstall ──► keep_user_data? ── yes ──► leave config as is
//!                     │ no
//!                     └──► delete JulesCartCouponValueValidation.config.* (all scopes)
//! ```

use std::sync::Arc;
use tracing::info;

use coupon_guard_core::config::plugin_key;
use coupon_guard_core::{CONFIG_DOMAIN, DEBUG_MODE_KEY};

use crate::config_store::SystemConfigStore;
use crate::error::HostResult;

/// Passed to [`CouponGuardPlugin::install`].
#[derive(Debug, Clone, Default)]
pub struct InstallContext {
    pub plugin_version: String,
}

/// Passed to [`CouponGuardPlugin::uninstall`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UninstallContext {
    keep_user_data: bool,
}

impl UninstallContext {
    pub fn new(keep_user_data: bool) -> Self {
        UninstallContext { keep_user_data }
    }

    /// Whether the operator asked to keep the plugin's configuration.
    pub fn keep_user_data(&self) -> bool {
        self.keep_user_data
    }
}

/// The plugin as seen by the host's plugin manager.
#[derive(Debug, Clone)]
pub struct CouponGuardPlugin {
    config: Arc<SystemConfigStore>,
}

impl CouponGuardPlugin {
    pub fn new(config: Arc<SystemConfigStore>) -> Self {
        CouponGuardPlugin { config }
    }

    /// Writes the default option values that are not set yet.
    pub fn install(&self, context: &InstallContext) -> HostResult<()> {
        let key = plugin_key(DEBUG_MODE_KEY);
        if !self.config.contains(&key, None)? {
            self.config.set(key, false, None)?;
        }

        info!(version = %context.plugin_version, "Coupon value plugin installed");
        Ok(())
    }

    /// Removes the plugin's configuration unless user data is kept.
    pub fn uninstall(&self, context: &UninstallContext) -> HostResult<()> {
        if context.keep_user_data() {
            info!("Coupon value plugin uninstalled, configuration kept");
            return Ok(());
        }

        let removed = self.config.delete_domain(CONFIG_DOMAIN)?;
        info!(removed, "Coupon value plugin uninstalled, configuration removed");
        Ok(())
    }
}
