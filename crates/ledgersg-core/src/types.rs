//! # Domain Types
//!
//! Value types flowing through the GST engine.
//!
//! ## Type Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐  parse  ┌──────────────┐  calculate_line          │
//! │  │ InvoiceLineInput │ ──────► │ LineAmounts  │ ───────────────┐        │
//! │  │  raw form text   │         │  decimals    │                │        │
//! │  └──────────────────┘         └──────────────┘                ▼        │
//! │                                                      ┌───────────────┐  │
//! │  ┌──────────────────┐   reconcile   ┌────────────┐   │ LineGstResult │  │
//! │  │ ServerTotals     │ ────────────► │ Reconcil-  │   └───────┬───────┘  │
//! │  │ (compliance eng.)│       ▲       │ iation-    │           │ aggregate│
//! │  └──────────────────┘       │       │ Result     │           ▼          │
//! │                             └────── └────────────┘ ◄─ InvoiceTotals     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every type here is an immutable value: engine functions build new ones,
//! they never patch an existing one.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::config::ENGINE;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::gst::resolve_tax_code;
use crate::money::{parse_decimal, DisplayAmount, Money};

// =============================================================================
// Tax Code
// =============================================================================

/// IRAS GST treatment of a line.
///
/// ## Rates
/// ```text
/// ┌──────┬──────────────────────────┬──────┐
/// │ Code │ Treatment                │ Rate │
/// ├──────┼──────────────────────────┼──────┤
/// │ SR   │ Standard-rated supply    │  9%  │
/// │ ZR   │ Zero-rated supply        │  0%  │
/// │ ES   │ Exempt supply            │  0%  │
/// │ OS   │ Out-of-scope supply      │  0%  │
/// │ TX   │ Taxable purchase         │  9%  │
/// │ BL   │ Blocked input tax        │  9%  │
/// │ RS   │ Reverse charge           │  9%  │
/// └──────┴──────────────────────────┴──────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TaxCode {
    #[serde(rename = "SR")]
    StandardRated,
    #[serde(rename = "ZR")]
    ZeroRated,
    #[serde(rename = "ES")]
    Exempt,
    #[serde(rename = "OS")]
    OutOfScope,
    #[serde(rename = "TX")]
    TaxablePurchase,
    #[serde(rename = "BL")]
    BlockedInputTax,
    #[serde(rename = "RS")]
    ReverseCharge,
}

impl TaxCode {
    /// Every code, in the order the invoice form lists them.
    pub const ALL: [TaxCode; 7] = [
        TaxCode::StandardRated,
        TaxCode::ZeroRated,
        TaxCode::Exempt,
        TaxCode::OutOfScope,
        TaxCode::TaxablePurchase,
        TaxCode::BlockedInputTax,
        TaxCode::ReverseCharge,
    ];

    /// The two-letter IRAS code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TaxCode::StandardRated => "SR",
            TaxCode::ZeroRated => "ZR",
            TaxCode::Exempt => "ES",
            TaxCode::OutOfScope => "OS",
            TaxCode::TaxablePurchase => "TX",
            TaxCode::BlockedInputTax => "BL",
            TaxCode::ReverseCharge => "RS",
        }
    }

    /// Human-readable label for pickers and reports.
    pub const fn description(&self) -> &'static str {
        match self {
            TaxCode::StandardRated => "Standard-Rated Supply",
            TaxCode::ZeroRated => "Zero-Rated Supply",
            TaxCode::Exempt => "Exempt Supply",
            TaxCode::OutOfScope => "Out of Scope Supply",
            TaxCode::TaxablePurchase => "Taxable Purchase",
            TaxCode::BlockedInputTax => "Blocked Input Tax",
            TaxCode::ReverseCharge => "Reverse Charge",
        }
    }

    /// GST rate as a fraction (`0.09` for 9%).
    pub const fn rate(&self) -> Decimal {
        match self {
            TaxCode::StandardRated
            | TaxCode::TaxablePurchase
            | TaxCode::BlockedInputTax
            | TaxCode::ReverseCharge => ENGINE.standard_rate,
            TaxCode::ZeroRated | TaxCode::Exempt | TaxCode::OutOfScope => Decimal::ZERO,
        }
    }

    /// Whole-number percentage for labels: `"9%"` or `"0%"`.
    pub fn percentage_label(&self) -> String {
        let percent = (self.rate() * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, ENGINE.rounding)
            .normalize();
        format!("{percent}%")
    }

    /// True for ZR, ES and OS.
    pub fn is_zero_rated(&self) -> bool {
        self.rate().is_zero()
    }

    /// Exact-match lookup used by the engine: `None` for anything else.
    ///
    /// `"sr"` and `" SR"` are not codes. They get 0% here, the same as on
    /// the server, so the preview never charges GST the server would not.
    pub fn lookup(code: &str) -> Option<TaxCode> {
        TaxCode::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == code)
    }

    // -------------------------------------------------------------------------
    // GST F5 treatment
    // -------------------------------------------------------------------------

    /// Used on purchases (input side).
    pub const fn is_input(&self) -> bool {
        matches!(
            self,
            TaxCode::TaxablePurchase | TaxCode::BlockedInputTax | TaxCode::ReverseCharge
        )
    }

    /// Used on supplies (output side). Reverse charge is both: the buyer
    /// accounts for the supplier's output tax.
    pub const fn is_output(&self) -> bool {
        matches!(
            self,
            TaxCode::StandardRated
                | TaxCode::ZeroRated
                | TaxCode::Exempt
                | TaxCode::OutOfScope
                | TaxCode::ReverseCharge
        )
    }

    /// Whether attributable input tax may be claimed in Box 7.
    pub const fn is_claimable(&self) -> bool {
        matches!(
            self,
            TaxCode::StandardRated
                | TaxCode::ZeroRated
                | TaxCode::TaxablePurchase
                | TaxCode::ReverseCharge
        )
    }

    pub const fn is_reverse_charge(&self) -> bool {
        matches!(self, TaxCode::ReverseCharge)
    }

    /// F5 box receiving the supply value.
    ///
    /// ```text
    /// Box 1  standard-rated supplies     Box 5  taxable purchases
    /// Box 2  zero-rated supplies         Box 6  output tax
    /// Box 3  exempt supplies             Box 7  input tax claimed
    /// Box 14 reverse charge supplies
    /// ```
    pub const fn f5_supply_box(&self) -> Option<u8> {
        match self {
            TaxCode::StandardRated => Some(1),
            TaxCode::ZeroRated => Some(2),
            TaxCode::Exempt => Some(3),
            TaxCode::ReverseCharge => Some(14),
            TaxCode::OutOfScope | TaxCode::TaxablePurchase | TaxCode::BlockedInputTax => None,
        }
    }

    /// F5 box receiving the purchase value.
    pub const fn f5_purchase_box(&self) -> Option<u8> {
        match self {
            TaxCode::TaxablePurchase | TaxCode::ReverseCharge => Some(5),
            _ => None,
        }
    }

    /// F5 box receiving the GST amount.
    pub const fn f5_tax_box(&self) -> Option<u8> {
        match self {
            TaxCode::StandardRated | TaxCode::ReverseCharge => Some(6),
            TaxCode::TaxablePurchase => Some(7),
            _ => None,
        }
    }
}

impl fmt::Display for TaxCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient parse for user-facing pickers: trims and ignores case.
///
/// The engine itself uses the exact [`TaxCode::lookup`].
impl FromStr for TaxCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaxCode::lookup(&s.trim().to_ascii_uppercase()).ok_or_else(|| {
            ValidationError::UnknownTaxCode {
                code: s.to_string(),
            }
        })
    }
}

// =============================================================================
// Invoice Line Input
// =============================================================================

/// One invoice line exactly as the form holds it: raw text.
///
/// ## Why Strings?
/// The form is live-typed. A quantity of `""` or `"2."` is normal while the
/// user is still typing, and going through a float would lose cents. Fields
/// missing from the JSON default to blank, which the engine reads as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct InvoiceLineInput {
    /// Quantity; may be fractional (e.g. `"2.5"` hours).
    pub quantity: String,

    /// Unit price before GST.
    pub unit_price: String,

    /// Discount percentage. Not clamped: `"-10"` is a 10% surcharge.
    pub discount_pct: String,

    /// IRAS tax code; unknown codes are charged 0%.
    pub tax_code: String,

    /// Beverage Container Return Scheme deposit (never subject to GST).
    pub is_bcrs_deposit: bool,
}

impl InvoiceLineInput {
    /// Convenience constructor mirroring the form's field order.
    pub fn new(
        quantity: impl Into<String>,
        unit_price: impl Into<String>,
        discount_pct: impl Into<String>,
        tax_code: impl Into<String>,
        is_bcrs_deposit: bool,
    ) -> Self {
        InvoiceLineInput {
            quantity: quantity.into(),
            unit_price: unit_price.into(),
            discount_pct: discount_pct.into(),
            tax_code: tax_code.into(),
            is_bcrs_deposit,
        }
    }

    /// Parses every numeric field and resolves the tax code.
    ///
    /// Blank numbers become zero and an unknown code becomes `None`; only
    /// non-numeric text fails.
    pub fn parse(&self) -> CoreResult<LineAmounts> {
        Ok(LineAmounts {
            quantity: parse_decimal("quantity", &self.quantity)?,
            unit_price: parse_decimal("unit_price", &self.unit_price)?,
            discount_pct: parse_decimal("discount_pct", &self.discount_pct)?,
            tax_code: resolve_tax_code(&self.tax_code),
            is_bcrs_deposit: self.is_bcrs_deposit,
        })
    }
}

/// A line after its text has been parsed into decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineAmounts {
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub discount_pct: Decimal,
    /// `None` when the code was blank or unrecognized.
    pub tax_code: Option<TaxCode>,
    pub is_bcrs_deposit: bool,
}

// =============================================================================
// Line GST Result
// =============================================================================

/// The GST breakdown of one line.
///
/// ## Invariants
/// - `line_total = line_subtotal + gst_amount`
/// - `display_*` are the 2dp rounding of the matching 4dp field
/// - BCRS lines have `gst_amount = 0`
///
/// Output only: there is no `Deserialize`, so every value comes from
/// [`LineGstResult::new`] and the invariants hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct LineGstResult {
    /// Net before GST (4dp).
    pub line_subtotal: Money,
    /// GST component (4dp).
    pub gst_amount: Money,
    /// Gross including GST (4dp).
    pub line_total: Money,
    pub display_subtotal: DisplayAmount,
    pub display_gst: DisplayAmount,
    pub display_total: DisplayAmount,
    /// Echo of the input BCRS flag.
    pub is_bcrs_exempt: bool,
}

impl LineGstResult {
    /// Builds a result from its subtotal and GST, deriving everything else.
    ///
    /// Fails with [`CoreError::Overflow`] when the total cannot stay at 4dp.
    pub fn new(line_subtotal: Money, gst_amount: Money, is_bcrs_exempt: bool) -> CoreResult<Self> {
        let line_total = line_subtotal
            .checked_add(gst_amount)
            .ok_or_else(|| CoreError::overflow("line total"))?;
        Ok(LineGstResult {
            line_subtotal,
            gst_amount,
            line_total,
            display_subtotal: line_subtotal.to_display(),
            display_gst: gst_amount.to_display(),
            display_total: line_total.to_display(),
            is_bcrs_exempt,
        })
    }
}

// =============================================================================
// Invoice Totals
// =============================================================================

/// Invoice-level sums over a set of [`LineGstResult`]s.
///
/// `subtotal` and `gst_amount` cover GST-bearing lines only; BCRS deposits
/// are collected separately in `bcrs_deposit_total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct InvoiceTotals {
    pub subtotal: Money,
    pub gst_amount: Money,
    pub bcrs_deposit_total: Money,
    /// Always `subtotal + gst_amount + bcrs_deposit_total`.
    pub total_amount: Money,
    pub display_subtotal: DisplayAmount,
    pub display_gst: DisplayAmount,
    pub display_bcrs: DisplayAmount,
    pub display_total: DisplayAmount,
}

impl InvoiceTotals {
    /// Builds totals from the three independent sums.
    pub fn new(subtotal: Money, gst_amount: Money, bcrs_deposit_total: Money) -> CoreResult<Self> {
        let total_amount = subtotal
            .checked_add(gst_amount)
            .and_then(|sum| sum.checked_add(bcrs_deposit_total))
            .ok_or_else(|| CoreError::overflow("invoice total"))?;
        Ok(InvoiceTotals {
            subtotal,
            gst_amount,
            bcrs_deposit_total,
            total_amount,
            display_subtotal: subtotal.to_display(),
            display_gst: gst_amount.to_display(),
            display_bcrs: bcrs_deposit_total.to_display(),
            display_total: total_amount.to_display(),
        })
    }
}

/// Empty invoice: every total is `0.0000` / `0.00`.
impl Default for InvoiceTotals {
    fn default() -> Self {
        InvoiceTotals {
            subtotal: Money::ZERO,
            gst_amount: Money::ZERO,
            bcrs_deposit_total: Money::ZERO,
            total_amount: Money::ZERO,
            display_subtotal: DisplayAmount::ZERO,
            display_gst: DisplayAmount::ZERO,
            display_bcrs: DisplayAmount::ZERO,
            display_total: DisplayAmount::ZERO,
        }
    }
}

/// Per-line results plus totals from one batch calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceCalculation {
    /// One result per input line, in input order.
    pub line_results: Vec<LineGstResult>,
    pub totals: InvoiceTotals,
}

// =============================================================================
// Reconciliation
// =============================================================================

/// The server-computed triple from the compliance engine.
///
/// Values keep the scale the server sent, so `"999.98"` is echoed back as
/// `999.98` in discrepancy messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ServerTotals {
    #[ts(as = "String")]
    pub subtotal: Decimal,
    #[ts(as = "String")]
    pub gst_amount: Decimal,
    #[ts(as = "String")]
    pub total_amount: Decimal,
}

impl ServerTotals {
    /// Parses the server's decimal strings.
    ///
    /// Unlike form input, a blank server value is not zero: the server
    /// always sends all three fields, so blank means a broken response.
    pub fn from_strs(
        subtotal: &str,
        gst_amount: &str,
        total_amount: &str,
    ) -> CoreResult<Self> {
        fn field(name: &str, raw: &str) -> CoreResult<Decimal> {
            Decimal::from_str(raw.trim()).map_err(|_| CoreError::invalid_input(name, raw))
        }

        Ok(ServerTotals {
            subtotal: field("subtotal", subtotal)?,
            gst_amount: field("gst_amount", gst_amount)?,
            total_amount: field("total_amount", total_amount)?,
        })
    }
}

/// Client totals viewed as if a server had sent them.
impl From<&InvoiceTotals> for ServerTotals {
    fn from(totals: &InvoiceTotals) -> Self {
        ServerTotals {
            subtotal: totals.subtotal.value(),
            gst_amount: totals.gst_amount.value(),
            total_amount: totals.total_amount.value(),
        }
    }
}

/// Which total a discrepancy is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TotalsField {
    Subtotal,
    GstAmount,
    TotalAmount,
}

impl TotalsField {
    /// Checked in this order; discrepancies are reported in this order.
    pub const ALL: [TotalsField; 3] = [
        TotalsField::Subtotal,
        TotalsField::GstAmount,
        TotalsField::TotalAmount,
    ];

    /// Label used in discrepancy messages.
    pub const fn label(&self) -> &'static str {
        match self {
            TotalsField::Subtotal => "Subtotal",
            TotalsField::GstAmount => "GST",
            TotalsField::TotalAmount => "Total",
        }
    }
}

/// One total that differs from the server by more than the tolerance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct FieldDiscrepancy {
    pub field: TotalsField,
    /// Client value at display precision.
    pub client: DisplayAmount,
    /// Server value as sent.
    #[ts(as = "String")]
    pub server: Decimal,
    /// `|client (4dp) − server|`.
    #[ts(as = "String")]
    pub difference: Decimal,
}

impl FieldDiscrepancy {
    /// `"Subtotal mismatch: client=1000.00, server=999.98"`.
    pub fn message(&self) -> String {
        format!(
            "{} mismatch: client={}, server={}",
            self.field.label(),
            self.client,
            self.server
        )
    }
}

/// Outcome of comparing client totals with the compliance engine's.
///
/// A report, not an error: the caller decides whether to block, log or
/// re-sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct ReconciliationResult {
    /// True iff `discrepancies` is empty.
    pub valid: bool,
    /// One human-readable message per mismatched field.
    pub discrepancies: Vec<String>,
    /// The same mismatches as structured data.
    pub fields: Vec<FieldDiscrepancy>,
}

impl ReconciliationResult {
    pub fn from_fields(fields: Vec<FieldDiscrepancy>) -> Self {
        ReconciliationResult {
            valid: fields.is_empty(),
            discrepancies: fields.iter().map(FieldDiscrepancy::message).collect(),
            fields,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
