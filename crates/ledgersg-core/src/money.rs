//! # Money Module
//!
//! Fixed-scale decimal amounts for GST arithmetic.
//!
//! ## Two Scales, One Source of Truth
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal with explicit scale                         │
//! │                                                                         │
//! │    Money          4dp   2.9997    ← summed, compared, never re-derived │
//! │      │                                                                  │
//! │      ▼ round half-up                                                    │
//! │    DisplayAmount  2dp   3.00      ← shown to the user, never summed    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ledgersg_core::money::{DisplayAmount, Money};
//! use rust_decimal::Decimal;
//! use std::str::FromStr;
//!
//! let gst = Money::round(Decimal::from_str("2.99970").unwrap()).unwrap();
//! assert_eq!(gst.to_string(), "2.9997");
//! assert_eq!(DisplayAmount::from(gst).to_string(), "3.00");
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::config::ENGINE;
use crate::error::{CoreError, CoreResult};

// =============================================================================
// Rounding & Parsing
// =============================================================================

/// Rounds half-up to `scale` places and pins the scale, so `1000` becomes
/// `1000.0000` rather than staying `1000`.
///
/// A value too large to carry `scale` fractional digits comes back with a
/// smaller scale; [`round_half_up`] turns that into `None`.
fn rescaled(value: Decimal, scale: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(scale, ENGINE.rounding);
    rounded.rescale(scale);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

/// [`rescaled`], or `None` when the result cannot hold exactly `scale` places.
pub(crate) fn round_half_up(value: Decimal, scale: u32) -> Option<Decimal> {
    let rounded = rescaled(value, scale);
    (rounded.scale() == scale).then_some(rounded)
}

/// Parses a raw form value into a decimal.
///
/// ## Rules
/// - Blank or whitespace-only text is zero (the user is mid-keystroke)
/// - A trailing point (`"2."`) is read as the integer before it
/// - Plain (`"12.50"`) and scientific (`"1.25e1"`) notation are accepted
/// - Anything else is [`CoreError::InvalidInput`]
///
/// ## Example
/// ```rust
/// use ledgersg_core::money::parse_decimal;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_decimal("quantity", "").unwrap(), Decimal::ZERO);
/// assert_eq!(parse_decimal("quantity", " 2.5 ").unwrap().to_string(), "2.5");
/// assert!(parse_decimal("quantity", "two").is_err());
/// ```
pub fn parse_decimal(field: &str, raw: &str) -> CoreResult<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let trimmed = match trimmed.strip_suffix('.') {
        Some(head) if !head.is_empty() => head,
        _ => trimmed,
    };

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| CoreError::invalid_input(field, raw))
}

// =============================================================================
// Money (internal, 4dp)
// =============================================================================

/// An amount at internal precision: always exactly 4 fractional digits.
///
/// ## Design Decisions
/// - **Private field**: the only way in is [`Money::round`], so the scale
///   invariant cannot be broken by a caller
/// - **Checked arithmetic only**: sums that would overflow or drop below 4dp
///   return `None` instead of panicking or losing digits
/// - **Signed**: negative quantities and surcharges propagate untouched
/// - **Serialized as text**: `"1090.0000"`, the shape the UI already reads
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  qty × price × (1 − disc) ──round4──► line_subtotal ──► gst_amount     │
/// │                                             │               │           │
/// │                                             └──────┬────────┘           │
/// │                                                    ▼                    │
/// │                                  InvoiceTotals (Σ of 4dp values)        │
/// │                                                    │                    │
/// │                                                    ▼                    │
/// │                                  reconcile() against server totals     │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Zero at internal precision (`0.0000`).
    pub const ZERO: Money = Money(Decimal::from_parts(0, 0, 0, false, 4));

    /// Rounds any decimal half-up to 4 places.
    ///
    /// This is the single entry point for internal amounts. Values beyond
    /// roughly 7.9 × 10²⁴ cannot carry 4 places and fail with
    /// [`CoreError::Overflow`].
    pub fn round(value: Decimal) -> CoreResult<Self> {
        round_half_up(value, ENGINE.internal_scale)
            .map(Money)
            .ok_or_else(|| CoreError::overflow("4dp amount"))
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the 2dp display twin of this amount.
    #[inline]
    pub fn to_display(&self) -> DisplayAmount {
        DisplayAmount::from(*self)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Adds two amounts; `None` when the sum cannot stay at 4dp.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).and_then(Money::exact)
    }

    /// Subtracts two amounts; `None` when the difference cannot stay at 4dp.
    pub fn checked_sub(self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).and_then(Money::exact)
    }

    // Two 4dp operands give a 4dp result unless rust_decimal had to shed
    // digits to fit the mantissa.
    fn exact(value: Decimal) -> Option<Money> {
        (value.scale() == ENGINE.internal_scale).then_some(Money(value))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Default money is zero at 4dp, not a bare `0`.
impl Default for Money {
    fn default() -> Self {
        Money::ZERO
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::round(value).map_err(D::Error::custom)
    }
}

// =============================================================================
// DisplayAmount (presentation, 2dp)
// =============================================================================

/// An amount rounded for people: always exactly 2 fractional digits.
///
/// Derived from a [`Money`] and never added to another `DisplayAmount`.
/// Summing rounded cents is exactly the drift the 4dp layer exists to avoid,
/// so this type has no arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct DisplayAmount(#[ts(type = "string")] Decimal);

impl DisplayAmount {
    /// Zero at display precision (`0.00`).
    pub const ZERO: DisplayAmount = DisplayAmount(Decimal::from_parts(0, 0, 0, false, 2));

    /// Rounds any decimal half-up to 2 places.
    pub fn round(value: Decimal) -> CoreResult<Self> {
        round_half_up(value, ENGINE.display_scale)
            .map(DisplayAmount)
            .ok_or_else(|| CoreError::overflow("2dp amount"))
    }

    /// Returns the underlying decimal.
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }
}

/// Anything that fits at 4dp fits at 2dp.
impl From<Money> for DisplayAmount {
    fn from(money: Money) -> Self {
        DisplayAmount(rescaled(money.value(), ENGINE.display_scale))
    }
}

impl From<DisplayAmount> for Decimal {
    fn from(amount: DisplayAmount) -> Self {
        amount.0
    }
}

impl Default for DisplayAmount {
    fn default() -> Self {
        DisplayAmount::ZERO
    }
}

impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for DisplayAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DisplayAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        DisplayAmount::round(value).map_err(D::Error::custom)
    }
}

// =============================================================================
// Currency Formatting
// =============================================================================

/// Formats an amount as Singapore dollars, e.g. `S$ 1090.00`.
///
/// ## Example
/// ```rust
/// use ledgersg_core::money::format_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let value = Decimal::from_str("1000.999").unwrap();
/// assert_eq!(format_currency(value), "S$ 1001.00");
/// ```
pub fn format_currency(value: impl Into<Decimal>) -> String {
    // Precision pads values too large to hold 2dp internally.
    format!(
        "{} {:.2}",
        ENGINE.currency_prefix,
        rescaled(value.into(), ENGINE.display_scale)
    )
}

/// Formats raw text as Singapore dollars. Blank text renders `S$ 0.00`.
pub fn format_currency_str(raw: &str) -> CoreResult<String> {
    parse_decimal("amount", raw).map(format_currency)
}

// =============================================================================
// Unit Tests
// =============================================================================
