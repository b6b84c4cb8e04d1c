//! # GST Engine
//!
//! Line-level GST, invoice totals and GST-inclusive extraction.
//!
//! ## Calculation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     One Line (calculate_line)                           │
//! │                                                                         │
//! │  base      = quantity × unit_price                                      │
//! │  subtotal  = round4( base × (1 − discount_pct / 100) )   ← ONLY rounding│
//! │  rate      = 0 if BCRS deposit, else rate(tax_code), unknown → 0       │
//! │  gst       = rate = 0 ? 0 : round4( subtotal × rate )                  │
//! │  total     = subtotal + gst                                             │
//! │  display_* = round2( each of the above )                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//!                                  │
//!                                  ▼
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Whole Invoice (aggregate_totals)                      │
//! │                                                                         │
//! │  GST lines:   Σ subtotal, Σ gst      (4dp sums, per IRAS: sum line GST,│
//! │  BCRS lines:  Σ subtotal              don't recompute GST on totals)   │
//! │  total      = subtotal + gst + bcrs                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This is a PREVIEW. The server-side compliance engine is authoritative;
//! [`crate::reconcile`] checks the two agree.
//!
//! ## Example
//! ```rust
//! use ledgersg_core::gst::compute_line_gst;
//!
//! let line = compute_line_gst("10", "100", "0", "SR", false).unwrap();
//! assert_eq!(line.line_subtotal.to_string(), "1000.0000");
//! assert_eq!(line.gst_amount.to_string(), "90.0000");
//! assert_eq!(line.display_total.to_string(), "1090.00");
//! ```

use rust_decimal::Decimal;
use tracing::{debug, trace, warn};

use crate::error::{CoreError, CoreResult};
use crate::money::{parse_decimal, Money};
use crate::types::{
    InvoiceCalculation, InvoiceLineInput, InvoiceTotals, LineAmounts, LineGstResult, TaxCode,
};

// =============================================================================
// Tax Code Resolution
// =============================================================================

/// Resolves a raw tax code, falling back to `None` (0%) when unrecognized.
pub(crate) fn resolve_tax_code(raw: &str) -> Option<TaxCode> {
    let code = TaxCode::lookup(raw);
    if code.is_none() && !raw.trim().is_empty() {
        warn!(code = raw, "Unrecognized tax code, charging 0% GST");
    }
    code
}

/// The rate actually charged on a line.
///
/// BCRS deposits are never subject to GST, whatever their nominal code.
pub fn effective_rate(tax_code: Option<TaxCode>, is_bcrs_deposit: bool) -> Decimal {
    if is_bcrs_deposit {
        return Decimal::ZERO;
    }
    tax_code.map_or(Decimal::ZERO, |code| code.rate())
}

/// Display percentage for a raw tax code; `"0%"` when unrecognized.
///
/// ## Example
/// ```rust
/// use ledgersg_core::gst::rate_percentage_label;
///
/// assert_eq!(rate_percentage_label("SR"), "9%");
/// assert_eq!(rate_percentage_label("ZR"), "0%");
/// assert_eq!(rate_percentage_label("INVALID"), "0%");
/// ```
pub fn rate_percentage_label(tax_code: &str) -> String {
    TaxCode::lookup(tax_code)
        .map(|code| code.percentage_label())
        .unwrap_or_else(|| "0%".to_string())
}

// =============================================================================
// Line Calculation
// =============================================================================

/// Computes the GST breakdown of one parsed line.
///
/// Inputs are not range-checked: a negative discount is a surcharge and a
/// negative quantity gives a negative line (credit). Only amounts too large
/// to carry 4 decimal places fail, with [`CoreError::Overflow`].
pub fn calculate_line(line: &LineAmounts) -> CoreResult<LineGstResult> {
    let base = line
        .quantity
        .checked_mul(line.unit_price)
        .ok_or_else(|| CoreError::overflow("line base amount"))?;
    let factor = Decimal::ONE - line.discount_pct / Decimal::ONE_HUNDRED;
    let line_subtotal = Money::round(
        base.checked_mul(factor)
            .ok_or_else(|| CoreError::overflow("line subtotal"))?,
    )?;

    let rate = effective_rate(line.tax_code, line.is_bcrs_deposit);
    let gst_amount = if rate.is_zero() {
        Money::ZERO
    } else {
        Money::round(
            line_subtotal
                .value()
                .checked_mul(rate)
                .ok_or_else(|| CoreError::overflow("line GST"))?,
        )?
    };

    let result = LineGstResult::new(line_subtotal, gst_amount, line.is_bcrs_deposit)?;
    trace!(
        subtotal = %result.line_subtotal,
        gst = %result.gst_amount,
        bcrs = result.is_bcrs_exempt,
        "Calculated line GST"
    );
    Ok(result)
}

/// Computes one line's GST straight from form text.
///
/// ## Arguments
/// * `quantity`, `unit_price`, `discount_pct` - decimal text; blank is zero
/// * `tax_code` - IRAS code (`"SR"`, `"ZR"`, ...); unknown codes are 0%
/// * `is_bcrs_deposit` - BCRS deposit lines are never charged GST
///
/// ## User Workflow
/// ```text
/// User types "33.33" into Unit Price
///      │
///      ▼
/// compute_line_gst("1", "33.33", "0", "SR", false) ← THIS FUNCTION
///      │
///      ▼
/// gst_amount 2.9997 (kept) / display_gst 3.00 (shown)
/// ```
pub fn compute_line_gst(
    quantity: &str,
    unit_price: &str,
    discount_pct: &str,
    tax_code: &str,
    is_bcrs_deposit: bool,
) -> CoreResult<LineGstResult> {
    let line = InvoiceLineInput::new(quantity, unit_price, discount_pct, tax_code, is_bcrs_deposit)
        .parse()?;
    calculate_line(&line)
}

// =============================================================================
// Invoice Aggregation
// =============================================================================

/// Sums line results into invoice totals.
///
/// Sums the 4dp fields, never the 2dp display fields; display totals are
/// rounded once at the end. An empty slice gives all-zero totals. A sum that
/// cannot stay at 4dp fails with [`CoreError::Overflow`].
pub fn aggregate_totals(lines: &[LineGstResult]) -> CoreResult<InvoiceTotals> {
    fn add(sum: Money, amount: Money, context: &str) -> CoreResult<Money> {
        sum.checked_add(amount)
            .ok_or_else(|| CoreError::overflow(context))
    }

    let mut subtotal = Money::ZERO;
    let mut gst_amount = Money::ZERO;
    let mut bcrs_deposit_total = Money::ZERO;

    for line in lines {
        if line.is_bcrs_exempt {
            bcrs_deposit_total =
                add(bcrs_deposit_total, line.line_subtotal, "BCRS deposit total")?;
        } else {
            subtotal = add(subtotal, line.line_subtotal, "invoice subtotal")?;
            gst_amount = add(gst_amount, line.gst_amount, "invoice GST")?;
        }
    }

    let totals = InvoiceTotals::new(subtotal, gst_amount, bcrs_deposit_total)?;
    debug!(
        lines = lines.len(),
        subtotal = %totals.subtotal,
        gst = %totals.gst_amount,
        bcrs = %totals.bcrs_deposit_total,
        total = %totals.total_amount,
        "Aggregated invoice totals"
    );
    Ok(totals)
}

/// Calculates every line, in order, then the invoice totals.
///
/// No line is skipped or merged; `line_results[i]` belongs to `lines[i]`.
pub fn compute_from_lines(lines: &[InvoiceLineInput]) -> CoreResult<InvoiceCalculation> {
    let line_results = lines
        .iter()
        .map(|input| input.parse().and_then(|line| calculate_line(&line)))
        .collect::<CoreResult<Vec<_>>>()?;
    let totals = aggregate_totals(&line_results)?;

    Ok(InvoiceCalculation {
        line_results,
        totals,
    })
}

// =============================================================================
// GST-Inclusive Prices
// =============================================================================

/// Share of a GST-inclusive price that is GST: `rate / (1 + rate)`.
///
/// 9/109 at the standard rate, zero for ZR/ES/OS.
pub fn gst_fraction(tax_code: TaxCode) -> Decimal {
    let rate = tax_code.rate();
    rate / (Decimal::ONE + rate)
}

/// Splits a GST-inclusive gross amount into net and GST.
///
/// `line_total` is the gross rounded to 4dp, `gst_amount` is
/// `round4(gross × rate / (1 + rate))` and `line_subtotal` is the remainder,
/// so the three always add up. BCRS deposits and zero/unknown codes carry no
/// GST.
///
/// ## Example
/// ```rust
/// use ledgersg_core::gst::extract_inclusive_gst;
///
/// let line = extract_inclusive_gst("109", "SR", false).unwrap();
/// assert_eq!(line.line_subtotal.to_string(), "100.0000");
/// assert_eq!(line.gst_amount.to_string(), "9.0000");
/// ```
pub fn extract_inclusive_gst(
    gross_amount: &str,
    tax_code: &str,
    is_bcrs_deposit: bool,
) -> CoreResult<LineGstResult> {
    let gross = parse_decimal("gross_amount", gross_amount)?;
    let rate = effective_rate(resolve_tax_code(tax_code), is_bcrs_deposit);
    let line_total = Money::round(gross)?;

    let gst_amount = if rate.is_zero() {
        Money::ZERO
    } else {
        Money::round(
            gross
                .checked_mul(rate)
                .and_then(|tax| tax.checked_div(Decimal::ONE + rate))
                .ok_or_else(|| CoreError::overflow("inclusive GST"))?,
        )?
    };
    let line_subtotal = line_total
        .checked_sub(gst_amount)
        .ok_or_else(|| CoreError::overflow("inclusive net amount"))?;

    LineGstResult::new(line_subtotal, gst_amount, is_bcrs_deposit)
}

// =============================================================================
// Unit Tests
// =============================================================================
