//! # Error Types
//!
//! Domain-specific error types for ledgersg-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ledgersg-core errors (this file)                                      │
//! │  ├── CoreError        - Engine boundary failures                       │
//! │  └── ValidationError  - Caller-side input checks                       │
//! │                                                                         │
//! │  NOT errors:                                                            │
//! │  ├── blank fields     → treated as zero                                │
//! │  ├── unknown tax code → treated as 0%                                  │
//! │  └── server mismatch  → ReconciliationResult.discrepancies             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field and raw text in the message
//! 3. Errors are enum variants, never String

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised at the engine boundary.
///
/// The engine tolerates partial input from a live-typing form. Only text
/// that cannot be a number and numbers too large for the decimal type are
/// rejected.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A numeric field contained text that is not a decimal number.
    ///
    /// ## When This Occurs
    /// ```text
    /// quantity = "12a"   → InvalidInput { field: "quantity", value: "12a" }
    /// quantity = ""      → OK, treated as 0
    /// quantity = "  3 "  → OK, treated as 3
    /// ```
    #[error("Invalid {field}: '{value}' is not a decimal number")]
    InvalidInput { field: String, value: String },

    /// An intermediate product exceeded the range of the decimal type.
    #[error("Arithmetic overflow while computing {context}")]
    Overflow { context: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    pub(crate) fn invalid_input(field: &str, value: &str) -> Self {
        CoreError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub(crate) fn overflow(context: &str) -> Self {
        CoreError::Overflow {
            context: context.to_string(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Produced by [`crate::validation`] for callers that want to block
/// submission of an obviously wrong line. The engine never raises these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: Decimal,
        max: Decimal,
    },

    /// Invalid format (e.g. "abc" in a numeric field).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Tax code is not one of the IRAS codes the engine knows.
    #[error("Unknown tax code '{code}'")]
    UnknownTaxCode { code: String },
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
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_messages() {
        let err = CoreError::invalid_input("quantity", "12a");
        assert_eq!(
            err.to_string(),
            "Invalid quantity: '12a' is not a decimal number"
        );

        let err = CoreError::overflow("line subtotal");
        assert_eq!(
            err.to_string(),
            "Arithmetic overflow while computing line subtotal"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::OutOfRange {
            field: "discount_pct".to_string(),
            min: dec!(0),
            max: dec!(100),
        };
        assert_eq!(err.to_string(), "discount_pct must be between 0 and 100");

        let err = ValidationError::UnknownTaxCode {
            code: "XX".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown tax code 'XX'");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
