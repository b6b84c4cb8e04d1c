//! Property-based tests for the GST engine.

use ledgersg_core::{
    aggregate_totals, compute_from_lines, compute_line_gst, format_currency, reconcile,
    InvoiceLineInput, InvoiceTotals, Money, ServerTotals, TaxCode, RECONCILIATION_TOLERANCE,
};
use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

// =============================================================================
// Strategies
// =============================================================================

/// Quantities up to 10,000 with up to 3 fractional digits.
fn quantity() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|units| Decimal::new(units, 3))
}

/// Unit prices up to 1,000,000.0000.
fn unit_price() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000_000).prop_map(|units| Decimal::new(units, 4))
}

/// Discounts 0.00 to 100.00.
fn discount() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|units| Decimal::new(units, 2))
}

fn tax_code() -> impl Strategy<Value = TaxCode> {
    prop::sample::select(TaxCode::ALL.to_vec())
}

fn line_input() -> impl Strategy<Value = InvoiceLineInput> {
    (quantity(), unit_price(), discount(), tax_code(), any::<bool>()).prop_map(
        |(q, p, d, code, bcrs)| {
            InvoiceLineInput::new(q.to_string(), p.to_string(), d.to_string(), code.as_str(), bcrs)
        },
    )
}

fn round4(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
}

fn sum<'a>(amounts: impl Iterator<Item = &'a Money>) -> Money {
    amounts.fold(Money::ZERO, |acc, amount| acc.checked_add(*amount).unwrap())
}

fn add(a: Money, b: Money) -> Money {
    a.checked_add(b).unwrap()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn engine_tax_code_match_is_exact(code in "[A-Za-z ]{1,4}", q in quantity(), p in unit_price()) {
        let result = compute_line_gst(&q.to_string(), &p.to_string(), "0", &code, false).unwrap();
        let charged = TaxCode::ALL
            .iter()
            .any(|known| known.as_str() == code && !known.is_zero_rated());

        if !charged {
            prop_assert!(result.gst_amount.is_zero());
        }
    }

    #[test]
    fn large_batches_error_instead_of_panicking(
        lines in prop::collection::vec((1i64..=7, any::<bool>()), 2..6),
    ) {
        // Each line is n × 10²⁴, which fits at 4dp; many of the sums do not.
        let inputs: Vec<_> = lines
            .iter()
            .map(|(n, bcrs)| {
                InvoiceLineInput::new(format!("{n}000000000000000000000000"), "1", "0", "ZR", *bcrs)
            })
            .collect();

        match compute_from_lines(&inputs) {
            Ok(calc) => {
                prop_assert_eq!(calc.totals.subtotal.value().scale(), 4);
                prop_assert_eq!(calc.totals.total_amount.value().scale(), 4);
            }
            Err(err) => {
                let is_overflow = matches!(err, ledgersg_core::CoreError::Overflow { .. });
                prop_assert!(is_overflow);
            }
        }
    }

    #[test]
    fn standard_rate_matches_formula(q in quantity(), p in unit_price(), d in discount()) {
        let result = compute_line_gst(&q.to_string(), &p.to_string(), &d.to_string(), "SR", false)
            .unwrap();

        let subtotal = round4(q * p * (Decimal::ONE - d / Decimal::ONE_HUNDRED));
        prop_assert_eq!(result.line_subtotal.value(), subtotal);
        prop_assert_eq!(result.gst_amount.value(), round4(subtotal * dec!(0.09)));
        prop_assert_eq!(result.line_total, add(result.line_subtotal, result.gst_amount));
    }

    #[test]
    fn bcrs_lines_never_carry_gst(input in line_input()) {
        let input = InvoiceLineInput { is_bcrs_deposit: true, ..input };
        let calc = compute_from_lines(&[input]).unwrap();
        let line = &calc.line_results[0];

        prop_assert!(line.gst_amount.is_zero());
        prop_assert_eq!(line.line_total, line.line_subtotal);
        prop_assert!(calc.totals.subtotal.is_zero());
        prop_assert_eq!(calc.totals.bcrs_deposit_total, line.line_subtotal);
    }

    #[test]
    fn zero_rated_codes_never_carry_gst(q in quantity(), p in unit_price(), d in discount()) {
        for code in ["ZR", "ES", "OS", "UNKNOWN"] {
            let result = compute_line_gst(&q.to_string(), &p.to_string(), &d.to_string(), code, false)
                .unwrap();
            prop_assert!(result.gst_amount.is_zero());
            prop_assert_eq!(result.line_total, result.line_subtotal);
        }
    }

    #[test]
    fn display_fields_are_two_place_roundings(input in line_input()) {
        let calc = compute_from_lines(&[input]).unwrap();
        let line = &calc.line_results[0];

        prop_assert_eq!(line.line_subtotal.value().scale(), 4);
        prop_assert_eq!(line.display_subtotal.value().scale(), 2);
        prop_assert_eq!(line.display_total, line.line_total.to_display());
    }

    #[test]
    fn totals_are_additive(lines in prop::collection::vec(line_input(), 0..12)) {
        let calc = compute_from_lines(&lines).unwrap();
        let totals = &calc.totals;

        let gst_lines = calc.line_results.iter().filter(|l| !l.is_bcrs_exempt);
        let subtotal = sum(gst_lines.clone().map(|l| &l.line_subtotal));
        let gst = sum(gst_lines.map(|l| &l.gst_amount));
        let bcrs = sum(
            calc.line_results
                .iter()
                .filter(|l| l.is_bcrs_exempt)
                .map(|l| &l.line_subtotal),
        );

        prop_assert_eq!(totals.subtotal, subtotal);
        prop_assert_eq!(totals.gst_amount, gst);
        prop_assert_eq!(totals.bcrs_deposit_total, bcrs);
        prop_assert_eq!(totals.total_amount, add(add(subtotal, gst), bcrs));
        prop_assert_eq!(totals.total_amount.value().scale(), 4);
    }

    #[test]
    fn batch_matches_split_batches(
        head in prop::collection::vec(line_input(), 0..6),
        tail in prop::collection::vec(line_input(), 0..6),
    ) {
        let all: Vec<_> = head.iter().chain(tail.iter()).cloned().collect();
        let whole = compute_from_lines(&all).unwrap();
        let left = compute_from_lines(&head).unwrap();
        let right = compute_from_lines(&tail).unwrap();

        let mut joined = left.line_results.clone();
        joined.extend(right.line_results.iter().cloned());
        prop_assert_eq!(&whole.line_results, &joined);
        prop_assert_eq!(&whole.totals, &aggregate_totals(&joined).unwrap());
        prop_assert_eq!(
            whole.totals.total_amount,
            add(left.totals.total_amount, right.totals.total_amount)
        );
    }

    #[test]
    fn format_currency_is_idempotent(units in -1_000_000_000_000_000i64..1_000_000_000_000_000, scale in 0u32..8) {
        let value = Decimal::new(units, scale);
        let once = format_currency(value);
        let amount = once.trim_start_matches("S$ ").parse::<Decimal>().unwrap();

        prop_assert_eq!(format_currency(amount), once);
    }

    #[test]
    fn totals_reconcile_with_themselves(lines in prop::collection::vec(line_input(), 0..8)) {
        let calc = compute_from_lines(&lines).unwrap();
        let result = reconcile(&calc.totals, &ServerTotals::from(&calc.totals));

        prop_assert!(result.valid);
        prop_assert!(result.discrepancies.is_empty());
    }

    #[test]
    fn reconciliation_is_symmetric(
        a in prop::collection::vec(line_input(), 0..4),
        b in prop::collection::vec(line_input(), 0..4),
    ) {
        let a = compute_from_lines(&a).unwrap().totals;
        let b = compute_from_lines(&b).unwrap().totals;

        prop_assert_eq!(
            reconcile(&a, &ServerTotals::from(&b)).valid,
            reconcile(&b, &ServerTotals::from(&a)).valid
        );
    }

    #[test]
    fn tolerance_is_inclusive(cents in -1_000_000i64..1_000_000, offset in 0i64..=200) {
        // offset is in 1/10,000ths of a dollar.
        let base = Money::round(Decimal::new(cents, 2)).unwrap();
        let client = InvoiceTotals::new(base, Money::ZERO, Money::ZERO).unwrap();
        let drift = Decimal::new(offset, 4);
        let server = ServerTotals {
            subtotal: base.value() + drift,
            gst_amount: Decimal::ZERO,
            total_amount: base.value(),
        };

        let result = reconcile(&client, &server);
        prop_assert_eq!(result.valid, drift <= RECONCILIATION_TOLERANCE);
    }
}
