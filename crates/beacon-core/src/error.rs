//! # Error Types
//!
//! Domain-specific error types for beacon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  beacon-core errors (this file)                                        │
//! │  ├── CoreError        - Lookups and order rules                        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  beacon-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  beacon-api errors (in app)                                            │
//! │  └── ApiError         - What the mobile client sees (JSON)             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → HTTP response          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pricing engine itself has no error type: degenerate input prices to
//! zero. Everything here is raised by callers around it.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No user with this id in the directory.
    #[error("User not found: {0}")]
    UserNotFound(i64),

    /// No unit price row for a country.
    #[error("No beacon price for country: {0}")]
    PriceNotFound(String),

    /// Receipt id does not exist.
    #[error("Receipt not found: {0}")]
    ReceiptNotFound(String),

    /// Order quantity exceeds the confirmation limit.
    ///
    /// ## When This Occurs
    /// Confirming an order, never while previewing a price:
    /// ```text
    /// Stepper (qty: 1200) ──► quote ──► $-amount shown (fail-soft)
    ///                             │
    ///                             ▼
    ///                        confirm order
    ///                             │
    ///                             ▼
    ///      QuantityTooLarge { requested: 1200, max: 999 }
    /// ```
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the request layer before an order is priced or stored.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, non-numeric id).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1200,
            max: 999,
        };
        assert_eq!(err.to_string(), "Quantity 1200 exceeds maximum allowed (999)");
        assert_eq!(CoreError::UserNotFound(42).to_string(), "User not found: 42");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "full_name".to_string(),
        };
        assert_eq!(err.to_string(), "full_name is required");

        let err = ValidationError::NotAllowed {
            field: "variant".to_string(),
            allowed: vec!["control".to_string(), "variant1".to_string()],
        };
        assert_eq!(
            err.to_string(),
            r#"variant must be one of: ["control", "variant1"]"#
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
