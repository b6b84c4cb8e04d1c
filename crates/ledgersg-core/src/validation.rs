//! # Validation Module
//!
//! Optional submit-time checks for invoice lines.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  While typing:  gst::compute_line_gst                                  │
//! │  ├── Blank → 0, unknown code → 0%, negative discount → surcharge       │
//! │  └── Never blocks the live preview                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  On submit:     THIS MODULE (caller opts in)                           │
//! │  ├── quantity / unit price required and not negative                   │
//! │  ├── discount within 0–100                                             │
//! │  └── tax code must be a known IRAS code                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Server:        compliance engine (authoritative)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The live preview never calls into this module; [`compute_validated_line`]
//! is the submit-time path that does.
//!
//! ## Usage
//! ```rust
//! use ledgersg_core::types::InvoiceLineInput;
//! use ledgersg_core::validation::validate_line;
//!
//! let line = InvoiceLineInput::new("2", "49.90", "5", "SR", false);
//! assert!(validate_line(&line).is_ok());
//!
//! let bad = InvoiceLineInput::new("2", "49.90", "150", "SR", false);
//! assert!(validate_line(&bad).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::{CoreResult, ValidationError};
use crate::gst::calculate_line;
use crate::money::parse_decimal;
use crate::types::{InvoiceLineInput, LineAmounts, LineGstResult, TaxCode};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

fn parse_field(field: &str, raw: &str) -> ValidationResult<Decimal> {
    parse_decimal(field, raw).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a decimal number".to_string(),
    })
}

fn required_non_negative(field: &str, raw: &str) -> ValidationResult<Decimal> {
    if raw.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let value = parse_field(field, raw)?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(value)
}

/// Validates a quantity: present, numeric, not negative. Zero is allowed.
pub fn validate_quantity(raw: &str) -> ValidationResult<Decimal> {
    required_non_negative("quantity", raw)
}

/// Validates a unit price: present, numeric, not negative.
///
/// ## Example
/// ```rust
/// use ledgersg_core::validation::validate_unit_price;
///
/// assert!(validate_unit_price("0").is_ok());      // Free item
/// assert!(validate_unit_price("").is_err());      // Required
/// assert!(validate_unit_price("-1.00").is_err()); // Use a credit note
/// ```
pub fn validate_unit_price(raw: &str) -> ValidationResult<Decimal> {
    required_non_negative("unit_price", raw)
}

/// Validates a discount percentage.
///
/// ## Rules
/// - Blank means no discount
/// - Must be between 0 and 100 inclusive (the engine accepts anything)
pub fn validate_discount_pct(raw: &str) -> ValidationResult<Decimal> {
    let value = parse_field("discount_pct", raw)?;

    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "discount_pct".to_string(),
            min: Decimal::ZERO,
            max: Decimal::ONE_HUNDRED,
        });
    }

    Ok(value)
}

// =============================================================================
// Tax Code Validator
// =============================================================================

/// Validates a tax code: required and one of the seven IRAS codes.
pub fn validate_tax_code(raw: &str) -> ValidationResult<TaxCode> {
    if raw.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "tax_code".to_string(),
        });
    }
    raw.parse()
}

// =============================================================================
// Line Validator
// =============================================================================

/// Validates a whole line, returning its parsed amounts on success.
///
/// Fields are checked in form order and the first failure is returned.
pub fn validate_line(line: &InvoiceLineInput) -> ValidationResult<LineAmounts> {
    Ok(LineAmounts {
        quantity: validate_quantity(&line.quantity)?,
        unit_price: validate_unit_price(&line.unit_price)?,
        discount_pct: validate_discount_pct(&line.discount_pct)?,
        tax_code: Some(validate_tax_code(&line.tax_code)?),
        is_bcrs_deposit: line.is_bcrs_deposit,
    })
}

/// Validates a line and then calculates it.
///
/// Validation failures surface as [`crate::CoreError::Validation`], so a
/// submit handler deals with a single error type.
pub fn compute_validated_line(line: &InvoiceLineInput) -> CoreResult<LineGstResult> {
    let amounts = validate_line(line)?;
    calculate_line(&amounts)
}

// =============================================================================
// Unit Tests
// =============================================================================
