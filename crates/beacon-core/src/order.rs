//! # Orders
//!
//! Glue between a directory entry, a unit price and the pricing engine.
//!
//! ## Order Flow
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌──────────────────┐   ┌──────────────┐
//! │   User   │──►│ UnitPrice  │──►│ calculate_price  │──►│    Quote     │ preview
//! │ (rate,   │   │ (country + │   │ (pure)           │   └──────────────┘
//! │ address) │   │  variant)  │   └────────┬─────────┘
//! └──────────┘   └────────────┘            │ confirm
//!                                          ▼
//!                                  ┌──────────────┐   ┌──────────────┐
//!                                  │  NewReceipt  │──►│   Receipt    │
//!                                  │ (validated)  │   │ (id, number) │
//!                                  └──────────────┘   └──────────────┘
//! ```
//!
//! Quotes never fail. A `NewReceipt` is only built for a quantity that passes
//! validation, and the repository assigns the id, number and timestamp.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{
    calculate_price, select_discount_rate, DiscountPolicy, DiscountSource, PriceCalculation,
};
use crate::types::{BeaconPrice, DeliveryAddress, PriceVariant, Receipt, User};
use crate::validation::validate_quantity;
use crate::MAX_ORDER_QUANTITY;

// =============================================================================
// Unit Price
// =============================================================================

/// The unit price an order is priced at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UnitPrice {
    pub amount: Money,
    pub currency: String,
    /// False when the country has no price row and the fallback was used.
    pub from_price_table: bool,
}

impl UnitPrice {
    /// Picks the variant column of a country's price row, or the fallback.
    pub fn resolve(
        price: Option<&BeaconPrice>,
        variant: PriceVariant,
        fallback: Money,
        fallback_currency: &str,
    ) -> Self {
        match price {
            Some(row) => UnitPrice {
                amount: row.price_for(variant),
                currency: row.currency.clone(),
                from_price_table: true,
            },
            None => UnitPrice {
                amount: fallback,
                currency: fallback_currency.to_string(),
                from_price_table: false,
            },
        }
    }
}

// =============================================================================
// Quote
// =============================================================================

/// Amounts of a quote rendered for display.
///
/// Every string carries the configured display symbol, whatever the
/// currency. Clients that need the currency read `Quote::currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FormattedPrice {
    pub unit_price: String,
    pub base_price: String,
    pub discount: String,
    pub total_price: String,
}

/// A price preview for one user and quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Quote {
    pub user_id: i64,
    pub quantity: i64,
    pub variant: PriceVariant,
    pub currency: String,
    pub unit_price: Money,
    pub pricing: PriceCalculation,
    /// Which rule produced the discount, if one applied.
    pub discount_source: Option<DiscountSource>,
    /// Effective discount in basis points (0 when none).
    pub discount_rate_bps: u32,
    pub formatted: FormattedPrice,
}

impl Quote {
    /// Prices `quantity` beacons for `user`. Never fails.
    ///
    /// `currency_symbol` is the display symbol from configuration. It is
    /// used as-is for every currency, so a DKK quote still renders as
    /// `$75.00` with `currency == "DKK"`.
    pub fn new(
        user: &User,
        quantity: i64,
        variant: PriceVariant,
        unit_price: &UnitPrice,
        currency_symbol: &str,
    ) -> Self {
        let customer_rate = user.discount_rate();
        let pricing = calculate_price(quantity, unit_price.amount, customer_rate);
        // Degenerate orders carry no discount, whatever the policy would be
        let policy = if pricing.discount_applied {
            select_discount_rate(quantity, customer_rate)
        } else {
            DiscountPolicy::None
        };

        Quote {
            user_id: user.id,
            quantity,
            variant,
            currency: unit_price.currency.clone(),
            unit_price: unit_price.amount,
            pricing,
            discount_source: policy.source(),
            discount_rate_bps: policy.rate().bps(),
            formatted: FormattedPrice {
                unit_price: unit_price.amount.format_with(currency_symbol),
                base_price: pricing.base_price.format_with(currency_symbol),
                discount: pricing.discount.format_with(currency_symbol),
                total_price: pricing.total_price.format_with(currency_symbol),
            },
        }
    }
}

// =============================================================================
// New Receipt
// =============================================================================

/// A priced, validated order waiting for an id and a receipt number.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReceipt {
    pub user_id: i64,
    pub user_name: String,
    pub country_id: String,
    pub quantity: i64,
    pub currency: String,
    pub unit_price: Money,
    pub pricing: PriceCalculation,
    pub delivery_address: DeliveryAddress,
}

impl NewReceipt {
    /// Prices a confirmed order.
    ///
    /// The delivery address defaults to the user's own address.
    ///
    /// ## Errors
    /// - `QuantityTooLarge` above [`MAX_ORDER_QUANTITY`]
    /// - `Validation` for a zero or negative quantity
    pub fn for_order(
        user: &User,
        quantity: i64,
        unit_price: &UnitPrice,
        delivery_address: Option<DeliveryAddress>,
    ) -> CoreResult<Self> {
        if quantity > MAX_ORDER_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ORDER_QUANTITY,
            });
        }
        validate_quantity(quantity)?;

        let pricing = calculate_price(quantity, unit_price.amount, user.discount_rate());

        Ok(NewReceipt {
            user_id: user.id,
            user_name: user.full_name.clone(),
            country_id: user.country_id.clone(),
            quantity,
            currency: unit_price.currency.clone(),
            unit_price: unit_price.amount,
            pricing,
            delivery_address: delivery_address.unwrap_or_else(|| user.delivery_address()),
        })
    }

    /// Completes the receipt with the values assigned at storage time.
    pub fn into_receipt(
        self,
        id: String,
        receipt_number: String,
        created_at: DateTime<Utc>,
    ) -> Receipt {
        Receipt {
            id,
            receipt_number,
            user_id: self.user_id,
            user_name: self.user_name,
            quantity: self.quantity,
            currency: self.currency,
            unit_price_cents: self.unit_price.cents(),
            base_price_cents: self.pricing.base_price.cents(),
            discount_cents: self.pricing.discount.cents(),
            total_cents: self.pricing.total_price.cents(),
            discount_applied: self.pricing.discount_applied,
            delivery_address: self.delivery_address,
            created_at,
        }
    }
}

// =============================================================================
// Receipt Number
// =============================================================================

/// Formats a receipt number: `YYYYMMDD-CC-NNNN`.
///
/// ## Example
/// ```rust
/// use beacon_core::order::receipt_number;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(receipt_number(date, "dk", 7), "20240309-DK-0007");
/// ```
pub fn receipt_number(date: NaiveDate, country_id: &str, sequence: i64) -> String {
    let country = match country_id.trim() {
        "" => "XX".to_string(),
        code => code.to_ascii_uppercase(),
    };
    format!("{}-{}-{:04}", date.format("%Y%m%d"), country, sequence)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::fixtures;

    fn user_with_rate(rate: Option<f64>) -> User {
        let mut user = fixtures::sample_users().remove(0);
        user.discount_percent = rate;
        user
    }

    fn unit(cents: i64) -> UnitPrice {
        UnitPrice {
            amount: Money::from_cents(cents),
            currency: "USD".to_string(),
            from_price_table: true,
        }
    }

    #[test]
    fn test_unit_price_resolve() {
        let prices = fixtures::sample_prices();
        let dk = prices.iter().find(|p| p.country_id == "dk");

        let resolved = UnitPrice::resolve(
            dk,
            PriceVariant::Variant1,
            Money::from_cents(1000),
            "USD",
        );
        assert_eq!(resolved.currency, "DKK");
        assert_eq!(resolved.amount, dk.unwrap().price_for(PriceVariant::Variant1));
        assert!(resolved.from_price_table);

        let fallback = UnitPrice::resolve(
            None,
            PriceVariant::Variant2,
            Money::from_cents(1000),
            "USD",
        );
        assert_eq!(fallback.amount.cents(), 1000);
        assert_eq!(fallback.currency, "USD");
        assert!(!fallback.from_price_table);
    }

    #[test]
    fn test_quote_promotional() {
        let quote = Quote::new(
            &user_with_rate(None),
            6,
            PriceVariant::Control,
            &unit(10_000),
            "$",
        );
        assert_eq!(quote.pricing.total_price.cents(), 51_000);
        assert_eq!(quote.discount_source, Some(DiscountSource::Promotional));
        assert_eq!(quote.discount_rate_bps, 1500);
        assert_eq!(quote.formatted.total_price, "$510.00");
        assert_eq!(quote.formatted.discount, "$90.00");
    }

    #[test]
    fn test_quote_customer_rate() {
        let quote = Quote::new(
            &user_with_rate(Some(20.0)),
            3,
            PriceVariant::Control,
            &unit(10_000),
            "$",
        );
        assert_eq!(quote.pricing.discount.cents(), 6_000);
        assert_eq!(quote.discount_source, Some(DiscountSource::Customer));
        assert_eq!(quote.discount_rate_bps, 2000);
    }

    #[test]
    fn test_quote_formats_with_display_symbol_for_any_currency() {
        let dkk = UnitPrice {
            amount: Money::from_cents(7_500),
            currency: "DKK".to_string(),
            from_price_table: true,
        };

        let quote = Quote::new(&user_with_rate(None), 2, PriceVariant::Control, &dkk, "$");
        assert_eq!(quote.currency, "DKK");
        assert_eq!(quote.formatted.unit_price, "$75.00");
        assert_eq!(quote.formatted.total_price, "$150.00");

        let quote = Quote::new(&user_with_rate(None), 2, PriceVariant::Control, &dkk, "kr ");
        assert_eq!(quote.formatted.total_price, "kr 150.00");
    }

    #[test]
    fn test_quote_is_fail_soft() {
        let quote = Quote::new(
            &user_with_rate(Some(20.0)),
            0,
            PriceVariant::Control,
            &unit(10_000),
            "$",
        );
        assert!(quote.pricing.is_zero());
        assert_eq!(quote.discount_source, None);
        assert_eq!(quote.discount_rate_bps, 0);
        assert_eq!(quote.formatted.total_price, "$0.00");
    }

    #[test]
    fn test_new_receipt_uses_user_address() {
        let user = user_with_rate(None);
        let receipt = NewReceipt::for_order(&user, 5, &unit(10_000), None).unwrap();
        assert_eq!(receipt.delivery_address, user.delivery_address());
        assert_eq!(receipt.pricing.total_price.cents(), 42_500);
        assert_eq!(receipt.user_name, user.full_name);
    }

    #[test]
    fn test_new_receipt_rejects_bad_quantities() {
        let user = user_with_rate(None);
        assert!(matches!(
            NewReceipt::for_order(&user, 0, &unit(10_000), None),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
        assert!(matches!(
            NewReceipt::for_order(&user, 1000, &unit(10_000), None),
            Err(CoreError::QuantityTooLarge { requested: 1000, max: 999 })
        ));
    }

    #[test]
    fn test_into_receipt_snapshots_pricing() {
        let user = user_with_rate(Some(10.0));
        let delivery = DeliveryAddress {
            name: "Front desk".to_string(),
            ..user.delivery_address()
        };
        let draft = NewReceipt::for_order(&user, 6, &unit(10_000), Some(delivery.clone())).unwrap();
        let receipt = draft.into_receipt(
            "550e8400-e29b-41d4-a716-446655440000".to_string(),
            "20240101-CA-0001".to_string(),
            Utc::now(),
        );

        assert_eq!(receipt.base_price_cents, 60_000);
        assert_eq!(receipt.discount_cents, 6_000);
        assert_eq!(receipt.total_cents, 54_000);
        assert!(receipt.discount_applied);
        assert_eq!(receipt.delivery_address, delivery);
        assert_eq!(receipt.pricing().total_price, receipt.total());
    }

    #[test]
    fn test_receipt_number_format() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(receipt_number(date, "us", 12), "20251231-US-0012");
        assert_eq!(receipt_number(date, "", 1), "20251231-XX-0001");
        assert_eq!(receipt_number(date, "au", 12_345), "20251231-AU-12345");
    }
}
