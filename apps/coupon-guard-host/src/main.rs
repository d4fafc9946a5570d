//! # check-cart
//!
//! Runs the cart pipeline over a cart snapshot and prints the result.
//!
//! ## Usage
//! ```bash
//! # Check a cart with default configuration
//! cargo run -p coupon-guard-host --bin check-cart -- --cart ./cart.json
//!
//! # Use a config file, a sales channel and German messages
//! cargo run -p coupon-guard-host --bin check-cart -- \
//!     --cart ./cart.json --config ./plugin.toml --sales-channel storefront-de --locale de-DE
//! ```
//!
//! ## Exit Codes
//! - `0`: checkout allowed
//! - `1`: invalid input or configuration
//! - `2`: the cart holds a blocking error

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use coupon_guard_core::{Cart, SalesChannelContext};
use coupon_guard_host::config_store::SystemConfigStore;
use coupon_guard_host::lifecycle::InstallContext;
use coupon_guard_host::snippets::{SnippetTranslator, FALLBACK_LOCALE};
use coupon_guard_host::{init_tracing, CouponGuardApp, HostError, HostResult};

struct Args {
    cart: PathBuf,
    config: Option<PathBuf>,
    sales_channel: String,
    locale: String,
}

fn parse_args() -> HostResult<Args> {
    let args: Vec<String> = std::env::args().collect();

    let mut cart = None;
    let mut config = None;
    let mut sales_channel = String::from("default");
    let mut locale = String::from(FALLBACK_LOCALE);

    let mut i = 1;
    while i < args.len() {
        let value = || {
            args.get(i + 1)
                .cloned()
                .ok_or_else(|| HostError::InvalidArgument(format!("{} needs a value", args[i])))
        };

        match args[i].as_str() {
            "--cart" | "-c" => cart = Some(PathBuf::from(value()?)),
            "--config" => config = Some(PathBuf::from(value()?)),
            "--sales-channel" | "-s" => sales_channel = value()?,
            "--locale" | "-l" => locale = value()?,
            "--help" | "-h" => {
                println!("Usage: check-cart --cart <file> [--config <file>] [--sales-channel <id>] [--locale <locale>]");
                std::process::exit(0);
            }
            other => return Err(HostError::InvalidArgument(format!("Unknown argument: {}", other))),
        }
        i += 2;
    }

    let cart = cart.ok_or_else(|| HostError::InvalidArgument("--cart is required".to_string()))?;

    Ok(Args {
        cart,
        config,
        sales_channel,
        locale,
    })
}

fn run() -> HostResult<bool> {
    let args = parse_args()?;

    let config = Arc::new(SystemConfigStore::load(args.config.as_deref())?);
    let app = CouponGuardApp::new(config, SnippetTranslator::for_locale(&args.locale)?);
    app.plugin.install(&InstallContext {
        plugin_version: env!("CARGO_PKG_VERSION").to_string(),
    })?;

    let contents = std::fs::read_to_string(&args.cart)?;
    let mut cart: Cart = serde_json::from_str(&contents)?;
    let context = SalesChannelContext::new(args.sales_channel);

    info!(path = ?args.cart, line_items = cart.line_items().len(), "Checking cart");
    let report = app.pipeline.process(&mut cart, &context)?;

    println!("{}", serde_json::to_string_pretty(&cart)?);
    Ok(report.blocked)
}

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::from(2),
        Err(e) => {
            error!(error = %e, "check-cart failed");
            ExitCode::FAILURE
        }
    }
}
