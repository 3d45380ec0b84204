//! # Validation Module
//!
//! Input validation for requests that reach the order service.
//!
//! ## Where Validation Lives
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Mobile app                                                   │
//! │  └── Stepper bounds, required form fields                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler                                                 │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  └── NOT NULL / CHECK constraints                                      │
//! │                                                                         │
//! │  The pricing engine is NOT a layer: it prices anything, fail-soft.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use beacon_core::validation::{validate_full_name, validate_quantity};
//!
//! validate_full_name("Karmen Fadel").unwrap();
//! validate_quantity(6).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::{NewUser, User, UserUpdate};
use crate::MAX_ORDER_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted full name.
pub const MAX_NAME_LENGTH: usize = 200;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a user's full name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use beacon_core::validation::validate_full_name;
///
/// assert!(validate_full_name("Ada Okuneva").is_ok());
/// assert!(validate_full_name("   ").is_err());
/// ```
pub fn validate_full_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "full_name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "full_name".to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates a country id: exactly two ASCII letters ("dk", "US").
pub fn validate_country_id(country_id: &str) -> ValidationResult<()> {
    let country_id = country_id.trim();

    if country_id.is_empty() {
        return Err(ValidationError::Required {
            field: "country_id".to_string(),
        });
    }

    if country_id.len() != 2 || !country_id.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "country_id".to_string(),
            reason: "must be a two-letter country code".to_string(),
        });
    }

    Ok(())
}

/// Normalises a country id to the lower-case form stored in the directory.
pub fn normalize_country_id(country_id: &str) -> String {
    country_id.trim().to_ascii_lowercase()
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an order quantity at confirmation time.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ORDER_QUANTITY (999)
///
/// Price previews do not call this; a zero quantity there simply prices
/// to `$0.00`.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ORDER_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ORDER_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a customer discount percentage.
///
/// ## Rules
/// - Must be a finite number
/// - Must be between 0 and 100 inclusive
///
/// ## Example
/// ```rust
/// use beacon_core::validation::validate_discount_percent;
///
/// assert!(validate_discount_percent(12.5).is_ok());
/// assert!(validate_discount_percent(0.0).is_ok());
/// assert!(validate_discount_percent(100.5).is_err());
/// assert!(validate_discount_percent(f64::NAN).is_err());
/// ```
pub fn validate_discount_percent(pct: f64) -> ValidationResult<()> {
    if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
        return Err(ValidationError::OutOfRange {
            field: "discount_percent".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Example
/// ```rust
/// use beacon_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Parses a user id taken from a URL path.
///
/// ## Example
/// ```rust
/// use beacon_core::validation::parse_user_id;
///
/// assert_eq!(parse_user_id("42").unwrap(), 42);
/// assert!(parse_user_id("abc").is_err());
/// ```
pub fn parse_user_id(raw: &str) -> ValidationResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "must be a number".to_string(),
        })
}

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use beacon_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Payload Validators
// =============================================================================

/// Validates a create-user payload.
pub fn validate_new_user(user: &NewUser) -> ValidationResult<()> {
    validate_user_fields(
        &user.full_name,
        &user.country_id,
        &user.country_name,
        user.discount_percent,
    )
}

/// Validates a complete user record, as sent to the bulk initialize endpoint.
///
/// Same rules as [`validate_new_user`], plus a positive id.
pub fn validate_user(user: &User) -> ValidationResult<()> {
    if user.id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "id".to_string(),
        });
    }
    validate_user_fields(
        &user.full_name,
        &user.country_id,
        &user.country_name,
        user.discount_percent,
    )
}

fn validate_user_fields(
    full_name: &str,
    country_id: &str,
    country_name: &str,
    discount_percent: Option<f64>,
) -> ValidationResult<()> {
    validate_full_name(full_name)?;
    validate_country_id(country_id)?;
    if country_name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "country_name".to_string(),
        });
    }
    if let Some(pct) = discount_percent {
        validate_discount_percent(pct)?;
    }
    Ok(())
}

/// Validates the fields present in a partial update.
pub fn validate_user_update(update: &UserUpdate) -> ValidationResult<()> {
    if let Some(name) = &update.full_name {
        validate_full_name(name)?;
    }
    if let Some(country_id) = &update.country_id {
        validate_country_id(country_id)?;
    }
    if let Some(pct) = update.discount_percent {
        validate_discount_percent(pct)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
