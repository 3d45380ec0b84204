//! # Domain Types
//!
//! Core domain types used throughout Beacon Orders.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │   BeaconPrice   │   │     Receipt     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  country_id     │   │  id (UUID)      │       │
//! │  │  full_name      │   │  currency       │   │  receipt_number │       │
//! │  │  address fields │   │  price_*_cents  │   │  user snapshot  │       │
//! │  │  discount %     │   │  (3 variants)   │   │  totals (cents) │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DiscountRate   │   │  PriceVariant   │   │ DeliveryAddress │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Control        │   │  name, address  │       │
//! │  │  1500 = 15%     │   │  Variant1/2     │   │  postal, city   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Shapes
//! `User` and `BeaconPrice` keep the snake_case field names the mobile client
//! already sends; `DeliveryAddress` and `Receipt` are camelCase for the same
//! reason.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::pricing::PriceCalculation;

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1500 bps = 15%. Always within `0..=10000`,
/// which is what keeps `discount <= base price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// 100%.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a rate from basis points, clamped to 100%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > Self::MAX_BPS {
            DiscountRate(Self::MAX_BPS)
        } else {
            DiscountRate(bps)
        }
    }

    /// Creates a rate from a percentage as stored on a customer profile.
    ///
    /// Non-finite and non-positive input is "no rate"; anything above 100 is
    /// clamped to 100.
    ///
    /// ## Example
    /// ```rust
    /// use beacon_core::types::DiscountRate;
    ///
    /// assert_eq!(DiscountRate::from_percentage(20.0).bps(), 2000);
    /// assert_eq!(DiscountRate::from_percentage(12.5).bps(), 1250);
    /// assert!(DiscountRate::from_percentage(f64::NAN).is_zero());
    /// assert_eq!(DiscountRate::from_percentage(150.0).bps(), 10_000);
    /// ```
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return DiscountRate::zero();
        }
        if pct >= 100.0 {
            return DiscountRate(Self::MAX_BPS);
        }
        DiscountRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero rate.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// User
// =============================================================================

/// A customer in the user directory.
///
/// Optional fields stay optional here; they are resolved to defaults in one
/// place only (`DeliveryAddress::from_user`, `User::discount_rate`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    /// Numeric directory key.
    pub id: i64,

    /// Display name, also used as the delivery recipient.
    pub full_name: String,

    pub address1: Option<String>,
    pub address2: Option<String>,

    /// Postal code as text. Older records carry it as a JSON number.
    #[serde(default, deserialize_with = "deserialize_postal_code")]
    pub postal_code: Option<String>,

    pub city: Option<String>,
    pub country_name: String,

    /// ISO 3166-1 alpha-2, lower case ("dk", "us").
    pub country_id: String,

    pub organisation_id: Option<i64>,

    /// Negotiated discount percentage (0-100). Absent or 0 means none.
    #[serde(default)]
    pub discount_percent: Option<f64>,
}

impl User {
    /// Returns the negotiated discount rate, if the customer has one.
    ///
    /// `None` and `Some(0)` both collapse to `None` here.
    pub fn discount_rate(&self) -> Option<DiscountRate> {
        self.discount_percent
            .map(DiscountRate::from_percentage)
            .filter(|rate| !rate.is_zero())
    }

    /// Returns the user's address as a delivery address.
    pub fn delivery_address(&self) -> DeliveryAddress {
        DeliveryAddress::from_user(self)
    }
}

/// Payload for creating a user (the directory assigns the id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewUser {
    pub full_name: String,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default, deserialize_with = "deserialize_postal_code")]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    pub country_name: String,
    pub country_id: String,
    #[serde(default)]
    pub organisation_id: Option<i64>,
    #[serde(default)]
    pub discount_percent: Option<f64>,
}

impl NewUser {
    /// Builds the stored user once an id has been assigned.
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            full_name: self.full_name,
            address1: self.address1,
            address2: self.address2,
            postal_code: self.postal_code,
            city: self.city,
            country_name: self.country_name,
            country_id: self.country_id,
            organisation_id: self.organisation_id,
            discount_percent: self.discount_percent,
        }
    }
}

/// Partial update. Only fields that are present are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub address2: Option<String>,
    #[serde(default, deserialize_with = "deserialize_postal_code")]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub country_id: Option<String>,
    #[serde(default)]
    pub organisation_id: Option<i64>,
    #[serde(default)]
    pub discount_percent: Option<f64>,
}

impl UserUpdate {
    /// Returns true when the update carries no fields.
    pub fn is_empty(&self) -> bool {
        *self == UserUpdate::default()
    }

    /// Applies the present fields onto `user`.
    pub fn apply_to(self, user: &mut User) {
        if let Some(full_name) = self.full_name {
            user.full_name = full_name;
        }
        if let Some(address1) = self.address1 {
            user.address1 = Some(address1);
        }
        if let Some(address2) = self.address2 {
            user.address2 = Some(address2);
        }
        if let Some(postal_code) = self.postal_code {
            user.postal_code = Some(postal_code);
        }
        if let Some(city) = self.city {
            user.city = Some(city);
        }
        if let Some(country_name) = self.country_name {
            user.country_name = country_name;
        }
        if let Some(country_id) = self.country_id {
            user.country_id = country_id;
        }
        if let Some(organisation_id) = self.organisation_id {
            user.organisation_id = Some(organisation_id);
        }
        if let Some(discount_percent) = self.discount_percent {
            user.discount_percent = Some(discount_percent);
        }
    }
}

/// Accepts a postal code given either as a string or as a number.
fn deserialize_postal_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPostalCode {
        Text(String),
        Number(i64),
    }

    Ok(
        Option::<RawPostalCode>::deserialize(deserializer)?.map(|raw| match raw {
            RawPostalCode::Text(text) => text,
            RawPostalCode::Number(number) => number.to_string(),
        }),
    )
}

// =============================================================================
// Delivery Address
// =============================================================================

/// Where a confirmed order is shipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeliveryAddress {
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    pub postal_code: String,
    pub city: String,
    pub country: String,
}

impl DeliveryAddress {
    /// Resolves a delivery address from a directory entry.
    ///
    /// This is the single place where absent user fields become empty
    /// strings. An empty `address2` is dropped.
    pub fn from_user(user: &User) -> Self {
        DeliveryAddress {
            name: user.full_name.clone(),
            address: user.address1.clone().unwrap_or_default(),
            address2: user.address2.clone().filter(|line| !line.trim().is_empty()),
            postal_code: user.postal_code.clone().unwrap_or_default(),
            city: user.city.clone().unwrap_or_default(),
            country: user.country_name.clone(),
        }
    }

    /// Returns true when every line a courier needs is filled in.
    pub fn is_complete(&self) -> bool {
        [&self.name, &self.address, &self.postal_code, &self.city, &self.country]
            .iter()
            .all(|field| !field.trim().is_empty())
    }
}

// =============================================================================
// Price Variant
// =============================================================================

/// Pricing experiment variant a customer is assigned to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PriceVariant {
    #[default]
    Control,
    Variant1,
    Variant2,
}

impl PriceVariant {
    pub const ALL: [PriceVariant; 3] = [
        PriceVariant::Control,
        PriceVariant::Variant1,
        PriceVariant::Variant2,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            PriceVariant::Control => "control",
            PriceVariant::Variant1 => "variant1",
            PriceVariant::Variant2 => "variant2",
        }
    }
}

impl fmt::Display for PriceVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceVariant {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "control" => Ok(PriceVariant::Control),
            "variant1" => Ok(PriceVariant::Variant1),
            "variant2" => Ok(PriceVariant::Variant2),
            _ => Err(ValidationError::NotAllowed {
                field: "variant".to_string(),
                allowed: PriceVariant::ALL
                    .iter()
                    .map(|variant| variant.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Beacon Price
// =============================================================================

/// Unit price of one beacon in a country, per experiment variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BeaconPrice {
    pub country_id: String,
    /// ISO 4217 code ("USD", "DKK").
    pub currency: String,
    pub price_control_cents: i64,
    pub price_variant1_cents: i64,
    pub price_variant2_cents: i64,
}

impl BeaconPrice {
    /// Returns the unit price for a variant.
    pub fn price_for(&self, variant: PriceVariant) -> Money {
        let cents = match variant {
            PriceVariant::Control => self.price_control_cents,
            PriceVariant::Variant1 => self.price_variant1_cents,
            PriceVariant::Variant2 => self.price_variant2_cents,
        };
        Money::from_cents(cents)
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// A confirmed order. Append-only: receipts are listed and deleted, never edited.
///
/// Uses the snapshot pattern: the user's name, the unit price, the pricing
/// result and the delivery address are frozen at confirmation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Receipt {
    /// UUID v4.
    pub id: String,
    /// Human-readable number: `YYYYMMDD-CC-NNNN`.
    pub receipt_number: String,
    pub user_id: i64,
    /// Name at time of order (frozen).
    pub user_name: String,
    /// Number of beacons ordered.
    pub quantity: i64,
    pub currency: String,
    pub unit_price_cents: i64,
    pub base_price_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub discount_applied: bool,
    pub delivery_address: DeliveryAddress,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Receipt {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Rebuilds the pricing result stored on this receipt.
    pub fn pricing(&self) -> PriceCalculation {
        PriceCalculation {
            base_price: Money::from_cents(self.base_price_cents),
            discount: Money::from_cents(self.discount_cents),
            total_price: Money::from_cents(self.total_cents),
            discount_applied: self.discount_applied,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
