//! End-to-end invoice scenarios through the public API.
//!
//! Run with `RUST_LOG=ledgersg_core=trace` to see the engine's tracing output.

use ledgersg_core::{
    compute_from_lines, compute_line_gst, extract_inclusive_gst, format_currency,
    format_currency_str, rate_percentage_label, reconcile, InvoiceLineInput, Money,
    ServerTotals, TaxCode, CURRENCY_PREFIX, DISPLAY_SCALE, INTERNAL_SCALE,
    RECONCILIATION_TOLERANCE,
};
use rust_decimal_macros::dec;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sr(quantity: &str, unit_price: &str) -> InvoiceLineInput {
    InvoiceLineInput::new(quantity, unit_price, "0", "SR", false)
}

#[test]
fn test_crate_constants() {
    assert_eq!(INTERNAL_SCALE, 4);
    assert_eq!(DISPLAY_SCALE, 2);
    assert_eq!(RECONCILIATION_TOLERANCE, dec!(0.01));
    assert_eq!(CURRENCY_PREFIX, "S$");
}

#[test]
fn test_consulting_invoice() {
    init_tracing();

    let line = compute_line_gst("10", "100", "0", "SR", false).unwrap();
    assert_eq!(line.line_subtotal.to_string(), "1000.0000");
    assert_eq!(line.gst_amount.to_string(), "90.0000");
    assert_eq!(line.line_total.to_string(), "1090.0000");
    assert_eq!(format_currency(line.display_total), "S$ 1090.00");
}

#[test]
fn test_rounding_keeps_four_places_internally() {
    let line = compute_line_gst("1", "33.33", "0", "SR", false).unwrap();
    assert_eq!(line.gst_amount.to_string(), "2.9997");
    assert_eq!(line.display_gst.to_string(), "3.00");
}

#[test]
fn test_bcrs_deposit_line() {
    let line = compute_line_gst("100", "0.10", "0", "SR", true).unwrap();
    assert_eq!(line.line_subtotal.to_string(), "10.0000");
    assert_eq!(line.gst_amount.to_string(), "0.0000");
    assert!(line.is_bcrs_exempt);
}

#[test]
fn test_beverage_with_container_deposit() {
    init_tracing();

    let calc = compute_from_lines(&[
        sr("1", "1.50"),
        InvoiceLineInput::new("1", "0.10", "0", "SR", true),
    ])
    .unwrap();

    assert_eq!(calc.totals.subtotal.to_string(), "1.5000");
    assert_eq!(calc.totals.gst_amount.to_string(), "0.1350");
    assert_eq!(calc.totals.bcrs_deposit_total.to_string(), "0.1000");
    assert_eq!(calc.totals.total_amount.to_string(), "1.7350");

    assert_eq!(calc.totals.display_subtotal.to_string(), "1.50");
    assert_eq!(calc.totals.display_gst.to_string(), "0.14");
    assert_eq!(calc.totals.display_bcrs.to_string(), "0.10");
    assert_eq!(calc.totals.display_total.to_string(), "1.74");
}

#[test]
fn test_empty_invoice() {
    let calc = compute_from_lines(&[]).unwrap();
    assert!(calc.line_results.is_empty());
    assert_eq!(calc.totals.subtotal, Money::ZERO);
    assert_eq!(calc.totals.display_total.to_string(), "0.00");
}

#[test]
fn test_iras_zero_rated_export() {
    // Export of goods: zero-rated, no GST but still a taxable supply.
    let line = compute_line_gst("1", "10000", "0", "ZR", false).unwrap();
    assert_eq!(line.gst_amount.to_string(), "0.0000");
    assert_eq!(line.line_total.to_string(), "10000.0000");
    assert_eq!(rate_percentage_label("ZR"), "0%");
}

#[test]
fn test_iras_exempt_financial_service() {
    let line = compute_line_gst("1", "5000", "0", "ES", false).unwrap();
    assert_eq!(line.gst_amount.to_string(), "0.0000");
    assert_eq!(line.line_total.to_string(), "5000.0000");
}

#[test]
fn test_iras_mixed_supply_invoice() {
    let calc = compute_from_lines(&[
        sr("2", "250"),
        InvoiceLineInput::new("1", "800", "0", "ZR", false),
        InvoiceLineInput::new("1", "200", "0", "ES", false),
        InvoiceLineInput::new("4", "0.10", "0", "SR", true),
    ])
    .unwrap();

    assert_eq!(calc.line_results.len(), 4);
    assert_eq!(calc.totals.subtotal.to_string(), "1500.0000");
    assert_eq!(calc.totals.gst_amount.to_string(), "45.0000");
    assert_eq!(calc.totals.bcrs_deposit_total.to_string(), "0.4000");
    assert_eq!(calc.totals.total_amount.to_string(), "1545.4000");
}

#[test]
fn test_server_agrees_with_preview() {
    let calc = compute_from_lines(&[sr("10", "100"), sr("1", "33.33")]).unwrap();
    let server = ServerTotals::from_strs("1033.33", "93.00", "1126.33").unwrap();

    // 4dp client values are 1033.3300 / 92.9997 / 1126.3297, all within a cent.
    let result = reconcile(&calc.totals, &server);
    assert!(result.valid, "{:?}", result.discrepancies);
}

#[test]
fn test_server_subtotal_off_by_two_cents() {
    init_tracing();

    let calc = compute_from_lines(&[sr("10", "100")]).unwrap();
    let server = ServerTotals::from_strs("999.98", "90.00", "1090.00").unwrap();

    let result = reconcile(&calc.totals, &server);
    assert!(!result.valid);
    assert_eq!(result.discrepancies.len(), 1);
    assert!(result.discrepancies[0].contains("Subtotal mismatch"));
}

#[test]
fn test_server_totals_from_json_response() {
    let calc = compute_from_lines(&[sr("5", "50")]).unwrap();
    let server: ServerTotals = serde_json::from_str(
        r#"{"subtotal":"250.00","gst_amount":"22.50","total_amount":"272.50"}"#,
    )
    .unwrap();

    assert!(reconcile(&calc.totals, &server).valid);
}

#[test]
fn test_inclusive_price_round_trips_to_line() {
    // S$109 shelf price, GST-inclusive.
    let extracted = extract_inclusive_gst("109.00", "SR", false).unwrap();
    let recomputed = compute_line_gst("1", "100", "0", "SR", false).unwrap();

    assert_eq!(extracted.line_subtotal, recomputed.line_subtotal);
    assert_eq!(extracted.gst_amount, recomputed.gst_amount);
    assert_eq!(extracted.line_total, recomputed.line_total);
}

#[test]
fn test_currency_formatting() {
    assert_eq!(format_currency(dec!(1234.5)), "S$ 1234.50");
    assert_eq!(format_currency(dec!(2.9997)), "S$ 3.00");
    assert_eq!(format_currency(dec!(0.005)), "S$ 0.01");
    assert_eq!(format_currency_str("").unwrap(), "S$ 0.00");
    assert!(format_currency_str("abc").is_err());
}

#[test]
fn test_every_code_has_a_label() {
    for code in TaxCode::ALL {
        let label = rate_percentage_label(code.as_str());
        assert!(label == "9%" || label == "0%", "{code}: {label}");
        assert!(!code.description().is_empty());
    }
}

#[test]
fn test_results_serialize_as_fixed_scale_strings() {
    let calc = compute_from_lines(&[sr("1", "33.33")]).unwrap();
    let json = serde_json::to_value(&calc).unwrap();

    let line = &json["lineResults"][0];
    assert_eq!(line["gst_amount"], "2.9997");
    assert_eq!(line["display_gst"], "3.00");
    assert_eq!(json["totals"]["display_total"], "36.33");
}
