//! # beacon-core: Pure Business Logic for Beacon Orders
//!
//! This crate is the **heart** of the beacon ordering backend. It contains the
//! order pricing engine and the domain types around it as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Beacon Orders Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Mobile App (React Native)                    │   │
//! │  │   Users ──► Beacon Quantity ──► Delivery ──► Order Overview     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP/JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    beacon-api (axum)                            │   │
//! │  │    /api/users, /api/quote, /api/receipts, /api/prices           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ beacon-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │   User    │  │   Money   │  │ Discount  │  │   rules   │  │   │
//! │  │   │  Receipt  │  │  format   │  │  Policy   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 beacon-db (Database Layer)                      │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`pricing`] - The order pricing engine (discount precedence, rounding)
//! - [`money`] - Money type with integer arithmetic
//! - [`types`] - Domain types (User, DeliveryAddress, BeaconPrice, Receipt)
//! - [`order`] - Quotes and receipt drafts built from a user and a unit price
//! - [`validation`] - Caller-side input validation
//! - [`fixtures`] - Sample users and prices, passed explicitly to whoever seeds
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use beacon_core::money::Money;
//! use beacon_core::pricing::calculate_price;
//!
//! // 6 beacons at $100.00 each qualify for the 15% promotional discount
//! let price = calculate_price(6, Money::from_cents(10_000), None);
//!
//! assert_eq!(price.base_price.cents(), 60_000);
//! assert_eq!(price.discount.cents(), 9_000);
//! assert_eq!(price.total_price.cents(), 51_000);
//! assert!(price.discount_applied);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod fixtures;
pub mod money;
pub mod order;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use order::{NewReceipt, Quote, UnitPrice};
pub use pricing::{DiscountPolicy, DiscountSource, PriceCalculation};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum beacons allowed in a single order.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Only enforced when an order is confirmed; price previews stay fail-soft.
pub const MAX_ORDER_QUANTITY: i64 = 999;
