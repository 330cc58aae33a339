//! Plain-text rendering of a calculated invoice.
//!
//! ```text
//! Hotel Sagar  (GSTIN 29ABCDE1234F1Z5)
//! Invoice INV-2041 · A. Rao · 2024-03-18
//!
//!  #       Line total     Discount          Tax        Final
//!  1          ₹7,000         ₹700         ₹756       ₹7,056
//!  ...
//! ```
//!
//! Every amount comes straight from the engine output; this module only
//! formats.

use std::fmt::Write;

use innkeep_core::{CurrencyFormat, GstSummary, Money, SupplyType};

use crate::config::BillingConfig;
use crate::document::InvoicePreview;

const AMOUNT_WIDTH: usize = 14;

/// Renders the preview as a text table.
pub fn render_text(preview: &InvoicePreview, config: &BillingConfig) -> String {
    let fmt = config.currency.format();
    let mut out = String::new();

    render_header(&mut out, preview, config);
    render_lines(&mut out, preview, &fmt);
    render_totals(&mut out, preview, &fmt);
    render_gst(&mut out, &preview.gst, &fmt);

    out
}

fn render_header(out: &mut String, preview: &InvoicePreview, config: &BillingConfig) {
    match &config.hotel.gstin {
        Some(gstin) => {
            let _ = writeln!(out, "{}  (GSTIN {})", config.hotel.name, gstin);
        }
        None => {
            let _ = writeln!(out, "{}", config.hotel.name);
        }
    }

    let parts: Vec<String> = [
        preview.number.as_ref().map(|n| format!("Invoice {}", n)),
        preview.guest.clone(),
        preview.issued_on.map(|d| d.format("%Y-%m-%d").to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    if !parts.is_empty() {
        let _ = writeln!(out, "{}", parts.join(" · "));
    }
    out.push('\n');
}

fn render_lines(out: &mut String, preview: &InvoicePreview, fmt: &CurrencyFormat) {
    let _ = writeln!(
        out,
        "{:>3} {:>w$} {:>w$} {:>w$} {:>w$}",
        "#",
        "Line total",
        "Discount",
        "Tax",
        "Final",
        w = AMOUNT_WIDTH
    );

    if preview.totals.is_empty() {
        let _ = writeln!(out, "    (no line items)");
    }

    for (i, line) in preview.totals.line_items.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3} {} {} {} {}",
            i + 1,
            cell(fmt, line.line_total),
            cell(fmt, line.discount_amount),
            cell(fmt, line.tax_amount),
            cell(fmt, line.final_amount),
        );
    }
    out.push('\n');
}

fn render_totals(out: &mut String, preview: &InvoicePreview, fmt: &CurrencyFormat) {
    let totals = &preview.totals;
    for (label, amount) in [
        ("Subtotal", totals.subtotal),
        ("Discount", totals.total_discount),
        ("Tax", totals.total_tax),
        ("Total", totals.total_amount),
    ] {
        let _ = writeln!(out, "{:<12}{}", label, cell(fmt, amount));
    }
}

fn render_gst(out: &mut String, gst: &GstSummary, fmt: &CurrencyFormat) {
    if gst.total_tax.is_zero() {
        return;
    }

    out.push('\n');
    let _ = writeln!(out, "GST ({})", gst.supply_type);

    for slab in &gst.slabs {
        if slab.tax_amount.is_zero() {
            continue;
        }
        let _ = write!(
            out,
            "  {:>6}% on {}",
            slab.rate,
            fmt.format_money(slab.taxable_value)
        );
        match gst.supply_type {
            SupplyType::IntraState => {
                let _ = writeln!(
                    out,
                    "  CGST {}  SGST {}",
                    fmt.format_money(slab.breakdown.cgst),
                    fmt.format_money(slab.breakdown.sgst)
                );
            }
            SupplyType::InterState => {
                let _ = writeln!(out, "  IGST {}", fmt.format_money(slab.breakdown.igst));
            }
        }
    }
}

fn cell(fmt: &CurrencyFormat, amount: Money) -> String {
    format!("{:>w$}", fmt.format_money(amount), w = AMOUNT_WIDTH)
}
