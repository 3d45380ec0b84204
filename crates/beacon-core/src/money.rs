//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004                                      │
//! │                                                                         │
//! │  A price preview that rounds base, discount and total independently    │
//! │  can show a total that is one cent off base − discount.                │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Unit price is rounded to cents ONCE, at the boundary.               │
//! │    Everything after that is exact integer math.                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use beacon_core::money::Money;
//!
//! let unit = Money::from_cents(1000); // $10.00
//! let line = unit.multiply_quantity(3);
//! assert_eq!(line.to_string(), "$30.00");
//!
//! // Float amounts only enter through the boundary conversion
//! assert_eq!(Money::from_major(10.555), Some(Money::from_cents(1055)));
//! assert_eq!(Money::from_major(f64::NAN), None);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use ts_rs::TS;

use crate::pricing::DEFAULT_CURRENCY_SYMBOL;
use crate::types::DiscountRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Negative values exist so that degenerate input can be
///   detected (a negative unit price prices to zero), never for display
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Serializes as a bare integer** of cents
///
/// ## Where Money is Used
/// ```text
/// BeaconPrice.price_*_cents ──► unit price ──► base price ──► discount
///                                                  │              │
///                                                  └──► total ◄───┘
///                                                         │
///                                                  Receipt.total_cents
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use beacon_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a floating-point amount in major units to Money.
    ///
    /// This is the ONLY place a float becomes money. The amount is rounded to
    /// the nearest cent (half away from zero on the binary value, so `10.555`,
    /// which is stored as `10.55499…`, becomes 1055 cents).
    ///
    /// ## Returns
    /// * `Some(money)` - finite amount within range
    /// * `None` - NaN, ±infinity, or an amount that does not fit in i64 cents
    ///
    /// ## Example
    /// ```rust
    /// use beacon_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(100.0), Some(Money::from_cents(10_000)));
    /// assert_eq!(Money::from_major(-10.0), Some(Money::from_cents(-1_000)));
    /// assert_eq!(Money::from_major(f64::INFINITY), None);
    /// ```
    pub fn from_major(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }

        let cents = (amount * 100.0).round();
        if cents < i64::MIN as f64 || cents >= i64::MAX as f64 {
            return None;
        }

        // -0.0 rounds to 0 cents as well
        Some(Money(cents as i64))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// Saturates at the i64 bounds instead of overflowing, so an absurd
    /// stepper value can never panic a price preview.
    ///
    /// ## Example
    /// ```rust
    /// use beacon_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(1000); // $10.00
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 3000);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns `rate` of this amount, rounded to the nearest cent.
    ///
    /// ## Rounding
    /// Half away from zero, computed in i128 so it cannot overflow:
    /// `(|amount| * bps + 5000) / 10000`, sign restored afterwards.
    ///
    /// ## Example
    /// ```rust
    /// use beacon_core::money::Money;
    /// use beacon_core::types::DiscountRate;
    ///
    /// let base = Money::from_cents(60_000);               // $600.00
    /// let discount = base.percentage(DiscountRate::from_bps(1500)); // 15%
    /// assert_eq!(discount.cents(), 9_000);                // $90.00
    ///
    /// // $0.25 at 10% = 2.5 cents → 3 cents
    /// assert_eq!(Money::from_cents(25).percentage(DiscountRate::from_bps(1000)).cents(), 3);
    /// ```
    pub fn percentage(&self, rate: DiscountRate) -> Money {
        let magnitude = (self.0 as i128).abs();
        let rounded = (magnitude * rate.bps() as i128 + 5000) / 10000;
        let signed = if self.0 < 0 { -rounded } else { rounded };
        Money(signed as i64)
    }

    /// Formats the amount with the given currency symbol.
    ///
    /// Two decimals, no thousands separators, minus sign directly after the
    /// symbol: `$-10.00`.
    ///
    /// ## Example
    /// ```rust
    /// use beacon_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1050).format_with("€"), "€10.50");
    /// assert_eq!(Money::from_cents(-1000).format_with("$"), "$-10.00");
    /// ```
    pub fn format_with(&self, currency_symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        format!(
            "{}{}{}.{:02}",
            currency_symbol,
            sign,
            magnitude / 100,
            magnitude % 100
        )
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the default currency symbol, matching `format_price`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(DEFAULT_CURRENCY_SYMBOL))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money, Money::from_major(10.99).unwrap());
    }

    #[test]
    fn test_from_major_rounds_to_cents() {
        assert_eq!(Money::from_major(10.0), Some(Money::from_cents(1000)));
        assert_eq!(Money::from_major(10.5), Some(Money::from_cents(1050)));
        assert_eq!(Money::from_major(10.555), Some(Money::from_cents(1055)));
        assert_eq!(Money::from_major(0.1 + 0.2), Some(Money::from_cents(30)));
        assert_eq!(Money::from_major(-0.0), Some(Money::zero()));
    }

    #[test]
    fn test_from_major_rejects_non_finite() {
        assert_eq!(Money::from_major(f64::NAN), None);
        assert_eq!(Money::from_major(f64::INFINITY), None);
        assert_eq!(Money::from_major(f64::NEG_INFINITY), None);
        assert_eq!(Money::from_major(1e300), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "$10.99");
        assert_eq!(Money::from_cents(500).to_string(), "$5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "$-5.50");
        assert_eq!(Money::from_cents(-5).to_string(), "$-0.05");
        assert_eq!(Money::from_cents(0).to_string(), "$0.00");
    }

    #[test]
    fn test_format_with_symbol() {
        assert_eq!(Money::from_cents(1000).format_with("€"), "€10.00");
        assert_eq!(Money::from_cents(1050).format_with("£"), "£10.50");
        assert_eq!(Money::from_cents(123_456_789).format_with("$"), "$1234567.89");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a - b).cents(), 500);
        assert_eq!((b - a).cents(), -500);
    }

    #[test]
    fn test_multiply_quantity_saturates() {
        let huge = Money::from_cents(i64::MAX / 2);
        assert_eq!(huge.multiply_quantity(3).cents(), i64::MAX);
    }

    #[test]
    fn test_percentage_rounding() {
        // 15% of $600.00
        assert_eq!(
            Money::from_cents(60_000).percentage(DiscountRate::from_bps(1500)).cents(),
            9_000
        );
        // 2.5 cents rounds away from zero
        assert_eq!(
            Money::from_cents(25).percentage(DiscountRate::from_bps(1000)).cents(),
            3
        );
        assert_eq!(
            Money::from_cents(-25).percentage(DiscountRate::from_bps(1000)).cents(),
            -3
        );
        // 100% is exact
        assert_eq!(
            Money::from_cents(12_345).percentage(DiscountRate::from_bps(10_000)).cents(),
            12_345
        );
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
        assert_eq!(Money::default(), zero);

        assert!(!Money::from_cents(100).is_negative());
        assert!(Money::from_cents(-100).is_negative());
    }

    #[test]
    fn test_serializes_as_cents() {
        let json = serde_json::to_string(&Money::from_cents(1099)).unwrap();
        assert_eq!(json, "1099");
        let back: Money = serde_json::from_str("1099").unwrap();
        assert_eq!(back, Money::from_cents(1099));
    }
}
