//! # Reconciliation
//!
//! Cross-checks the client preview against the compliance engine's totals.
//!
//! ```text
//! ┌───────────────────────┐                  ┌───────────────────────┐
//! │ InvoiceTotals (4dp)   │                  │ ServerTotals (as sent)│
//! │  subtotal             │ ── |Δ| ≤ 0.01? ──│  subtotal             │
//! │  gst_amount           │ ── |Δ| ≤ 0.01? ──│  gst_amount           │
//! │  total_amount         │ ── |Δ| ≤ 0.01? ──│  total_amount         │
//! └───────────────────────┘                  └───────────────────────┘
//!                 │
//!                 ▼
//!   ReconciliationResult { valid, discrepancies, fields }
//! ```
//!
//! Mismatches are reported, never raised. Whether to block submission,
//! log, or prompt a re-sync is the caller's call.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::ENGINE;
use crate::types::{
    FieldDiscrepancy, InvoiceTotals, ReconciliationResult, ServerTotals, TotalsField,
};

/// Compares client totals with the server's, field by field.
///
/// A field is a discrepancy when `|client − server|` is strictly greater than
/// [`crate::RECONCILIATION_TOLERANCE`]; exactly one cent apart still passes.
/// The client side of the comparison is the 4dp value, the client side of
/// the message is its 2dp display twin.
///
/// ## Example
/// ```rust
/// use ledgersg_core::gst::compute_from_lines;
/// use ledgersg_core::reconcile::reconcile;
/// use ledgersg_core::types::{InvoiceLineInput, ServerTotals};
///
/// let calc = compute_from_lines(&[InvoiceLineInput::new("10", "100", "0", "SR", false)]).unwrap();
/// let server = ServerTotals::from_strs("999.98", "90.00", "1090.00").unwrap();
///
/// let result = reconcile(&calc.totals, &server);
/// assert!(!result.valid);
/// assert_eq!(result.discrepancies, vec!["Subtotal mismatch: client=1000.00, server=999.98"]);
/// ```
pub fn reconcile(client: &InvoiceTotals, server: &ServerTotals) -> ReconciliationResult {
    let fields: Vec<FieldDiscrepancy> = TotalsField::ALL
        .into_iter()
        .filter_map(|field| compare_field(field, client, server))
        .collect();

    let result = ReconciliationResult::from_fields(fields);
    debug!(
        valid = result.valid,
        discrepancies = result.discrepancies.len(),
        "Reconciled GST totals against server"
    );
    result
}

fn compare_field(
    field: TotalsField,
    client: &InvoiceTotals,
    server: &ServerTotals,
) -> Option<FieldDiscrepancy> {
    let (client_value, server_value) = match field {
        TotalsField::Subtotal => (client.subtotal, server.subtotal),
        TotalsField::GstAmount => (client.gst_amount, server.gst_amount),
        TotalsField::TotalAmount => (client.total_amount, server.total_amount),
    };

    // A difference too large to represent is certainly outside tolerance.
    let difference = client_value
        .value()
        .checked_sub(server_value)
        .map_or(Decimal::MAX, |delta| delta.abs());
    if difference <= ENGINE.reconciliation_tolerance {
        return None;
    }

    let discrepancy = FieldDiscrepancy {
        field,
        client: client_value.to_display(),
        server: server_value,
        difference,
    };
    warn!(
        field = field.label(),
        client = %discrepancy.client,
        server = %discrepancy.server,
        difference = %difference,
        "GST total differs from compliance engine"
    );
    Some(discrepancy)
}

// =============================================================================
// Unit Tests
// =============================================================================
