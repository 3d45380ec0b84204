//! # Order Pricing Engine
//!
//! Turns an order quantity, a unit price and an optional customer discount
//! rate into a [`PriceCalculation`].
//!
//! ## Discount Precedence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      select_discount_rate()                             │
//! │                                                                         │
//! │   customer rate > 0 ? ──yes──► Percentage { rate, Customer }            │
//! │          │                                                              │
//! │          no                                                             │
//! │          ▼                                                              │
//! │   quantity >= 5 ?    ──yes──► Percentage { 15%, Promotional }           │
//! │          │                                                              │
//! │          no                                                             │
//! │          ▼                                                              │
//! │       DiscountPolicy::None                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The two mechanisms are mutually exclusive. A customer with a negotiated
//! 10% rate buying 6 units gets 10%, never 25% and never 15%.
//!
//! ## Rounding
//! ```text
//! unit price ──round once──► cents
//! base       = quantity × unit              (exact)
//! discount   = round_half_away(base × bps)  (once)
//! total      = base − discount              (exact)
//! ```
//! Because only the discount is ever rounded, `total == base - discount`
//! holds to the cent for every input.
//!
//! ## Degenerate Input
//! The engine never fails. `quantity <= 0`, a negative unit price or a
//! non-finite float collapses to [`PriceCalculation::zero`], which renders as
//! `$0.00` in a price preview.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::DiscountRate;

// =============================================================================
// Constants
// =============================================================================

/// Minimum quantity that triggers the promotional discount (inclusive).
pub const MIN_QUANTITY_FOR_DISCOUNT: i64 = 5;

/// Promotional discount applied at or above [`MIN_QUANTITY_FOR_DISCOUNT`].
pub const PROMOTIONAL_DISCOUNT: DiscountRate = DiscountRate::from_bps(1500);

/// Currency symbol used when the caller does not pass one.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "$";

// =============================================================================
// Discount Policy
// =============================================================================

/// Where a percentage discount came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum DiscountSource {
    /// Negotiated rate stored on the customer profile.
    Customer,
    /// Quantity-threshold rate.
    Promotional,
}

/// The discount that applies to one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "lowercase")]
#[ts(export)]
pub enum DiscountPolicy {
    None,
    Percentage {
        rate: DiscountRate,
        source: DiscountSource,
    },
}

impl DiscountPolicy {
    /// Returns the effective rate (zero for `None`).
    pub fn rate(&self) -> DiscountRate {
        match self {
            DiscountPolicy::None => DiscountRate::zero(),
            DiscountPolicy::Percentage { rate, .. } => *rate,
        }
    }

    /// Returns the discount source, if any.
    pub fn source(&self) -> Option<DiscountSource> {
        match self {
            DiscountPolicy::None => None,
            DiscountPolicy::Percentage { source, .. } => Some(*source),
        }
    }

    /// True when a non-zero discount applies.
    pub fn is_discount(&self) -> bool {
        !self.rate().is_zero()
    }

    /// Discount amount on `base`, rounded to the cent.
    pub fn discount_on(&self, base: Money) -> Money {
        match self {
            DiscountPolicy::None => Money::zero(),
            DiscountPolicy::Percentage { rate, .. } => base.percentage(*rate),
        }
    }
}

// =============================================================================
// Price Calculation
// =============================================================================

/// Result of pricing one order. Recomputed on every change, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PriceCalculation {
    pub base_price: Money,
    pub discount: Money,
    pub total_price: Money,
    pub discount_applied: bool,
}

impl PriceCalculation {
    /// The result for degenerate input.
    pub const fn zero() -> Self {
        PriceCalculation {
            base_price: Money::zero(),
            discount: Money::zero(),
            total_price: Money::zero(),
            discount_applied: false,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == PriceCalculation::zero()
    }
}

impl Default for PriceCalculation {
    fn default() -> Self {
        PriceCalculation::zero()
    }
}

// =============================================================================
// Engine
// =============================================================================

/// `quantity × unit_price`, or zero for degenerate input.
///
/// ## Example
/// ```rust
/// use beacon_core::money::Money;
/// use beacon_core::pricing::compute_base_price;
///
/// assert_eq!(compute_base_price(3, Money::from_cents(10_000)).cents(), 30_000);
/// assert!(compute_base_price(0, Money::from_cents(10_000)).is_zero());
/// assert!(compute_base_price(5, Money::from_cents(-1_000)).is_zero());
/// ```
pub fn compute_base_price(quantity: i64, unit_price: Money) -> Money {
    if quantity <= 0 || unit_price.is_negative() {
        return Money::zero();
    }
    unit_price.multiply_quantity(quantity)
}

/// Picks the one discount that applies to an order.
///
/// `customer_rate` is the rate from the customer profile; `None` and zero
/// mean "no negotiated rate" and fall through to the quantity rule.
pub fn select_discount_rate(quantity: i64, customer_rate: Option<DiscountRate>) -> DiscountPolicy {
    if let Some(rate) = customer_rate.filter(|rate| !rate.is_zero()) {
        return DiscountPolicy::Percentage {
            rate,
            source: DiscountSource::Customer,
        };
    }

    if quantity >= MIN_QUANTITY_FOR_DISCOUNT {
        return DiscountPolicy::Percentage {
            rate: PROMOTIONAL_DISCOUNT,
            source: DiscountSource::Promotional,
        };
    }

    DiscountPolicy::None
}

/// Prices an order.
///
/// ## Example
/// ```rust
/// use beacon_core::money::Money;
/// use beacon_core::pricing::calculate_price;
/// use beacon_core::types::DiscountRate;
///
/// // Customer rate wins even below the promotional threshold
/// let price = calculate_price(3, Money::from_cents(10_000), Some(DiscountRate::from_bps(2000)));
/// assert_eq!(price.discount.cents(), 6_000);
/// assert_eq!(price.total_price.cents(), 24_000);
/// ```
pub fn calculate_price(
    quantity: i64,
    unit_price: Money,
    customer_rate: Option<DiscountRate>,
) -> PriceCalculation {
    if quantity <= 0 || unit_price.is_negative() {
        return PriceCalculation::zero();
    }

    let base_price = compute_base_price(quantity, unit_price);
    let policy = select_discount_rate(quantity, customer_rate);
    let discount = policy.discount_on(base_price);

    PriceCalculation {
        base_price,
        discount,
        total_price: base_price - discount,
        discount_applied: policy.is_discount(),
    }
}

/// Prices an order from floating-point inputs in major units.
///
/// The unit price is rounded to the cent first. NaN or infinite input gives
/// the zero result; a non-finite customer percentage counts as no rate.
pub fn calculate_price_major(
    quantity: i64,
    unit_price: f64,
    customer_rate_percent: Option<f64>,
) -> PriceCalculation {
    let Some(unit_price) = Money::from_major(unit_price) else {
        return PriceCalculation::zero();
    };
    let customer_rate = customer_rate_percent.map(DiscountRate::from_percentage);
    calculate_price(quantity, unit_price, customer_rate)
}

/// Formats an amount as `symbol` followed by exactly two decimals.
///
/// No thousands separators and no locale handling. A negative amount keeps
/// its minus sign after the symbol. Non-finite amounts format as zero.
///
/// ## Example
/// ```rust
/// use beacon_core::pricing::format_price;
///
/// assert_eq!(format_price(10.555, "$"), "$10.55");
/// assert_eq!(format_price(-10.0, "$"), "$-10.00");
/// assert_eq!(format_price(1234.5, "€"), "€1234.50");
/// ```
pub fn format_price(amount: f64, currency_symbol: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    // -0.0 would otherwise render as "-0.00"
    let amount = if amount == 0.0 { 0.0 } else { amount };
    let formatted = format!("{currency_symbol}{amount:.2}");
    match formatted.strip_suffix("-0.00") {
        Some(prefix) if prefix == currency_symbol => format!("{currency_symbol}0.00"),
        _ => formatted,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
