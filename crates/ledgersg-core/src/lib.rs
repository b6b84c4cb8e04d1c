//! # ledgersg-core: GST Calculation Engine for LedgerSG
//!
//! Client-side preview of Singapore GST on invoice lines, with pure
//! functions and zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        LedgerSG Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Invoice Form (web)                           │   │
//! │  │    Line editor ──► Live totals ──► Submit ──► Compare           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ts-rs generated types                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ledgersg-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │    gst    │  │ reconcile │  │ validation│  │   │
//! │  │   │  Money    │  │  lines    │  │  client   │  │  submit   │  │   │
//! │  │   │  4dp/2dp  │  │  totals   │  │  vs server│  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │          Compliance Engine (server, authoritative)              │   │
//! │  │     its {subtotal, gst_amount, total_amount} feed reconcile()   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Tax codes, line inputs/results, totals, reconciliation
//! - [`money`] - Fixed-scale decimal amounts (no floating point!)
//! - [`gst`] - Line GST, invoice totals, GST-inclusive extraction
//! - [`reconcile`] - Client vs server totals within a 1-cent tolerance
//! - [`validation`] - Optional submit-time checks
//! - [`config`] - The one rounding/precision policy
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output, safe from any thread
//! 2. **Decimal Money**: `rust_decimal`, 4dp internal, 2dp display, half-up
//! 3. **Permissive Preview**: blank is zero, unknown tax code is 0%
//! 4. **Explicit Errors**: only non-numeric text and overflow are errors
//!
//! ## Example Usage
//!
//! ```rust
//! use ledgersg_core::{compute_from_lines, InvoiceLineInput};
//!
//! let calc = compute_from_lines(&[
//!     InvoiceLineInput::new("1", "1.50", "0", "SR", false), // beverage
//!     InvoiceLineInput::new("1", "0.10", "0", "SR", true),  // BCRS deposit
//! ])
//! .unwrap();
//!
//! assert_eq!(calc.totals.display_subtotal.to_string(), "1.50");
//! assert_eq!(calc.totals.display_gst.to_string(), "0.14");
//! assert_eq!(calc.totals.display_bcrs.to_string(), "0.10");
//! assert_eq!(calc.totals.display_total.to_string(), "1.74");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod gst;
pub mod money;
pub mod reconcile;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use gst::{
    aggregate_totals, calculate_line, compute_from_lines, compute_line_gst,
    extract_inclusive_gst, rate_percentage_label,
};
pub use money::{format_currency, format_currency_str, DisplayAmount, Money};
pub use reconcile::reconcile;
pub use types::*;
pub use validation::compute_validated_line;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Fractional digits of every internal amount.
pub const INTERNAL_SCALE: u32 = config::ENGINE.internal_scale;

/// Fractional digits of every display amount.
pub const DISPLAY_SCALE: u32 = config::ENGINE.display_scale;

/// Maximum client/server difference accepted by [`reconcile`] (S$0.01).
pub const RECONCILIATION_TOLERANCE: rust_decimal::Decimal =
    config::ENGINE.reconciliation_tolerance;

/// Prefix of formatted currency strings.
pub const CURRENCY_PREFIX: &str = config::ENGINE.currency_prefix;
