//! # Error Types
//!
//! Error types for coupon-guard-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  coupon-guard-core (this file)                                         │
//! │  ├── CoreError    - Failures of the rule's collaborators               │
//! │  └── ConfigError  - A config source could not answer                   │
//! │                                                                         │
//! │  coupon-guard-host                                                     │
//! │  └── HostError    - Config files, snippets, CLI input                  │
//! │                                                                         │
//! │  Rule violations are NOT errors: they become CartError annotations     │
//! │  on the cart (see types.rs).                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Failures surfaced by the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The configuration source failed. Propagated as-is; the rule does not
    /// substitute a default for a failing source.
    #[error("Configuration lookup failed: {0}")]
    Config(#[from] ConfigError),

    /// A message catalog document could not be loaded.
    #[error("Invalid message catalog: {reason}")]
    InvalidCatalog { reason: String },
}

// =============================================================================
// Config Error
// =============================================================================

/// Errors returned by a [`ConfigSource`](crate::config::ConfigSource).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The backing store is unavailable.
    #[error("config source unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
