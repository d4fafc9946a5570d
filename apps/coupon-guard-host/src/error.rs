//! # Host Error Type
//!
//! Unified error type for the host wiring.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ConfigError (core) ──► CoreError ──┐                                   │
//! │                                      │                                  │
//! │  io::Error   ──────────────────────► HostError ──► check-cart exit 1    │
//! │  toml / serde_json ────────────────┘                                    │
//! │                                                                         │
//! │  A rejected coupon is NOT an error: it is a CartError on the cart.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use coupon_guard_core::CoreError;
use thiserror::Error;

/// Errors raised while wiring or running the host.
#[derive(Debug, Error)]
pub enum HostError {
    /// The rule or one of its capabilities failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Reading a config or cart file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A config file is not valid TOML.
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A cart snapshot is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A config file parsed but holds an unsupported value.
    #[error("Invalid config value for {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    /// Bad command line input.
    #[error("{0}")]
    InvalidArgument(String),
}

/// Convenience type alias for Results with HostError.
pub type HostResult<T> = Result<T, HostError>;
