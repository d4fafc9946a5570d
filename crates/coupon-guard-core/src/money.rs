//! # Money Module
//!
//! Provides the `Money` type for monetary values in cart calculations.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Comparing a goods total against a coupon value in floats:              │
//! │    0.1 + 0.2 < 0.3  →  false, but 0.1 + 0.2 == 0.3 is false too  ❌     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    10 + 20 < 30  →  false, 10 + 20 == 30  →  true                       │
//! │    The "equal values pass" boundary is exact                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use coupon_guard_core::money::Money;
//!
//! let goods = Money::from_cents(2000);      // 20.00
//! let discount = Money::from_cents(-2500);  // -25.00 (promotion total)
//!
//! assert!(goods < discount.abs());
//! assert_eq!(discount.abs().format_decimal(), "25.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: promotion line items carry negative totals
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serialized as cents**: `{"totalPrice": -2500}` in cart snapshots
///
/// ## Where Money Flows
/// ```text
/// LineItem.price.total_price ──┬──► goods total (product + custom)
///                              │
///                              └──► |promotion total| = coupon value
///
/// goods total < coupon value ──► blocking CartError
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use coupon_guard_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount (`25.0`) to cents, rounding half away from
    /// zero. Out-of-range values clamp to the i64 bounds.
    #[inline]
    pub fn from_decimal(amount: f64) -> Self {
        Money((amount * 100.0).round() as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the amount in major units, as carried in cart error
    /// parameters (`2500` cents is `25.0`).
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion, always 0-99.
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is strictly greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    ///
    /// Promotion totals are stored negative; this recovers the discount
    /// magnitude. `i64::MIN` saturates to `i64::MAX`.
    ///
    /// ## Example
    /// ```rust
    /// use coupon_guard_core::money::Money;
    ///
    /// let promotion_total = Money::from_cents(-2500);
    /// assert_eq!(promotion_total.abs().cents(), 2500);
    /// ```
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Multiplies money by a quantity, saturating at the i64 bounds.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Formats the amount with two decimals and a `,` thousands separator.
    ///
    /// This is the form interpolated into cart error messages; it carries
    /// no currency symbol because the message templates place it.
    ///
    /// ## Example
    /// ```rust
    /// use coupon_guard_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(2000).format_decimal(), "20.00");
    /// assert_eq!(Money::from_cents(123456789).format_decimal(), "1,234,567.89");
    /// assert_eq!(Money::from_cents(-550).format_decimal(), "-5.50");
    /// ```
    pub fn format_decimal(&self) -> String {
        let digits = self.major().unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}{}.{:02}", sign, grouped, self.minor())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented display; messages use [`Money::format_decimal`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Cart snapshots carry arbitrary i64 totals, so arithmetic saturates
// instead of overflowing.

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

/// Summing an iterator of line totals.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
