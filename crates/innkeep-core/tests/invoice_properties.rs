//! Property tests for the invoice engine.
//!
//! Generated line items stay inside the validated input domain; every
//! property must hold for any such invoice.

use innkeep_core::gst::{summarize, SupplyType};
use innkeep_core::invoice::{calculate_invoice_total, calculate_line_item, InvoiceCalculator};
use innkeep_core::money::{round_money, Money};
use innkeep_core::types::{LineItem, TaxMode};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn quantity() -> impl Strategy<Value = Decimal> {
    // 0.01 ..= 500.00
    (1i64..=50_000).prop_map(|n| Decimal::new(n, 2))
}

fn unit_price() -> impl Strategy<Value = Decimal> {
    // 0.000 ..= 99,999.999
    (0i64..=99_999_999).prop_map(|n| Decimal::new(n, 3))
}

fn percentage() -> impl Strategy<Value = Decimal> {
    // 0.00 ..= 100.00
    (0i64..=10_000).prop_map(|n| Decimal::new(n, 2))
}

fn tax_mode() -> impl Strategy<Value = TaxMode> {
    prop_oneof![4 => Just(TaxMode::Standard), 1 => Just(TaxMode::NoTax)]
}

fn line_item() -> impl Strategy<Value = LineItem> {
    (
        quantity(),
        unit_price(),
        percentage(),
        any::<bool>(),
        percentage(),
        tax_mode(),
    )
        .prop_map(|(qty, price, tax, inclusive, discount, mode)| {
            LineItem::new(qty, price)
                .with_tax(tax, inclusive)
                .with_discount(discount)
                .with_tax_mode(mode)
        })
}

fn invoice() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(line_item(), 0..12)
}

proptest! {
    #[test]
    fn final_amount_is_exact_combination(item in line_item()) {
        let line = calculate_line_item(&item).unwrap();
        prop_assert_eq!(
            line.final_amount,
            line.line_total - line.discount_amount + line.tax_amount
        );
    }

    #[test]
    fn amounts_are_never_negative(item in line_item()) {
        let line = calculate_line_item(&item).unwrap();
        prop_assert!(!line.tax_amount.is_negative());
        prop_assert!(!line.discount_amount.is_negative());
        prop_assert!(!line.taxable_value().is_negative());
        prop_assert!(!line.final_amount.is_negative());
    }

    #[test]
    fn discount_never_exceeds_line_total(item in line_item()) {
        let line = calculate_line_item(&item).unwrap();
        prop_assert!(line.discount_amount <= line.line_total);
    }

    #[test]
    fn inclusive_line_splits_gross_exactly(item in line_item()) {
        let rate = item.tax_rate;
        let item = item.with_tax_mode(TaxMode::Standard).with_tax(rate, true);
        let line = calculate_line_item(&item).unwrap();
        let gross = Money::from_decimal(item.quantity * item.unit_price);
        prop_assert_eq!(line.line_total + line.tax_amount, gross);
    }

    #[test]
    fn exclusive_line_total_is_rounded_raw(item in line_item()) {
        let rate = item.tax_rate;
        let item = item.with_tax(rate, false);
        let line = calculate_line_item(&item).unwrap();
        prop_assert_eq!(line.line_total.amount(), round_money(item.quantity * item.unit_price));
    }

    #[test]
    fn untaxed_invoice_has_no_tax(items in invoice()) {
        let totals = InvoiceCalculator::new()
            .with_tax_mode(TaxMode::NoTax)
            .calculate(&items)
            .unwrap();
        prop_assert!(totals.total_tax.is_zero());
        for (item, line) in items.iter().zip(&totals.line_items) {
            prop_assert!(line.tax_amount.is_zero());
            prop_assert_eq!(line.tax_rate, Decimal::ZERO);
            prop_assert_eq!(line.line_total.amount(), round_money(item.quantity * item.unit_price));
        }
    }

    #[test]
    fn totals_are_sums_of_lines(items in invoice()) {
        let totals = calculate_invoice_total(&items).unwrap();

        prop_assert_eq!(totals.line_items.len(), items.len());
        prop_assert_eq!(
            totals.subtotal,
            totals.line_items.iter().map(|l| l.line_total).sum::<Money>()
        );
        prop_assert_eq!(
            totals.total_discount,
            totals.line_items.iter().map(|l| l.discount_amount).sum::<Money>()
        );
        prop_assert_eq!(
            totals.total_tax,
            totals.line_items.iter().map(|l| l.tax_amount).sum::<Money>()
        );
        prop_assert_eq!(
            totals.total_amount,
            totals.subtotal - totals.total_discount + totals.total_tax
        );
        prop_assert_eq!(totals.sum_of_final_amounts(), totals.total_amount);
        prop_assert!(totals.reconciles());
    }

    #[test]
    fn lines_match_standalone_calculation(items in invoice()) {
        let totals = calculate_invoice_total(&items).unwrap();
        for (item, line) in items.iter().zip(&totals.line_items) {
            prop_assert_eq!(&calculate_line_item(item).unwrap(), line);
        }
    }

    #[test]
    fn calculation_is_deterministic(items in invoice()) {
        let first = calculate_invoice_total(&items).unwrap();
        let second = calculate_invoice_total(&items).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn gst_components_sum_to_tax(items in invoice(), inter in any::<bool>()) {
        let supply = if inter { SupplyType::InterState } else { SupplyType::IntraState };
        let totals = calculate_invoice_total(&items).unwrap();
        let summary = summarize(&totals, supply);

        prop_assert_eq!(summary.total_tax, totals.total_tax);
        prop_assert_eq!(summary.breakdown.total(), totals.total_tax);
        prop_assert_eq!(
            summary.slabs.iter().map(|s| s.tax_amount).sum::<Money>(),
            totals.total_tax
        );
        prop_assert_eq!(
            summary.slabs.iter().map(|s| s.taxable_value).sum::<Money>(),
            totals.taxable_value()
        );
        for slab in &summary.slabs {
            prop_assert_eq!(slab.breakdown.total(), slab.tax_amount);
        }
    }
}
