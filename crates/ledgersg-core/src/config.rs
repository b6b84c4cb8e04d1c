//! # Engine Configuration
//!
//! The arithmetic policy every calculation in this crate shares.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  const ENGINE: EngineConfig                                             │
//! │    internal_scale 4 ──► Money          rounding  half-up                │
//! │    display_scale  2 ──► DisplayAmount  tolerance 0.01 ──► reconcile     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fixed at compile time and read-only for the life of the process, so no
//! call can observe a different rounding mode than another.

use rust_decimal::{Decimal, RoundingStrategy};

/// Precision, rounding and tolerance policy for GST previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Fractional digits carried by every internal amount (NUMERIC(10,4)).
    pub internal_scale: u32,

    /// Fractional digits shown to users and filed with IRAS.
    pub display_scale: u32,

    /// Tie-break for both scales. Round-half-up, never banker's rounding.
    pub rounding: RoundingStrategy,

    /// Singapore standard GST rate (9%).
    pub standard_rate: Decimal,

    /// Largest client/server difference accepted by reconciliation.
    pub reconciliation_tolerance: Decimal,

    /// Prefix used by [`crate::money::format_currency`].
    pub currency_prefix: &'static str,
}

/// The one engine configuration.
pub const ENGINE: EngineConfig = EngineConfig {
    internal_scale: 4,
    display_scale: 2,
    rounding: RoundingStrategy::MidpointAwayFromZero,
    // 0.09
    standard_rate: Decimal::from_parts(9, 0, 0, false, 2),
    // 0.01
    reconciliation_tolerance: Decimal::from_parts(1, 0, 0, false, 2),
    currency_prefix: "S$",
};

impl Default for EngineConfig {
    fn default() -> Self {
        ENGINE
    }
}
