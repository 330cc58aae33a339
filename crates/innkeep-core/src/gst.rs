//! # GST Summary
//!
//! Splits the engine's tax into GST components for the invoice footer.
//!
//! ## Component Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Supply within the hotel's state      Supply to another state           │
//! │  ────────────────────────────────     ───────────────────────           │
//! │  CGST = round(tax / 2)                IGST = tax                        │
//! │  SGST = tax - CGST                                                      │
//! │                                                                         │
//! │  CGST + SGST + IGST == tax, to the paisa, always.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The summary is built from [`InvoiceTotals`] only. It groups lines by the
//! rate the engine applied and never recomputes a line amount.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::InvoiceTotals;

// =============================================================================
// Supply Type
// =============================================================================

/// Where the supply is made relative to the hotel's registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SupplyType {
    /// Same state: tax is split into CGST and SGST.
    #[default]
    IntraState,
    /// Different state: tax is charged as IGST.
    InterState,
}

impl fmt::Display for SupplyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupplyType::IntraState => write!(f, "intra_state"),
            SupplyType::InterState => write!(f, "inter_state"),
        }
    }
}

impl FromStr for SupplyType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "intra_state" | "intra" | "local" => Ok(SupplyType::IntraState),
            "inter_state" | "inter" | "interstate" => Ok(SupplyType::InterState),
            other => Err(ValidationError::InvalidFormat {
                field: "supply_type".to_string(),
                reason: format!(
                    "unknown supply type '{}', expected intra_state or inter_state",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Breakdown
// =============================================================================

/// GST components of a tax amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GstBreakdown {
    pub cgst: Money,
    pub sgst: Money,
    pub igst: Money,
}

impl GstBreakdown {
    /// Splits `tax` into components for the given supply type.
    ///
    /// ## Example
    /// ```rust
    /// use innkeep_core::gst::{GstBreakdown, SupplyType};
    /// use innkeep_core::money::Money;
    ///
    /// let split = GstBreakdown::split(Money::from_minor(2161), SupplyType::IntraState);
    /// assert_eq!(split.cgst.to_string(), "10.81");
    /// assert_eq!(split.sgst.to_string(), "10.80");
    /// assert_eq!(split.total(), Money::from_minor(2161));
    /// ```
    pub fn split(tax: Money, supply: SupplyType) -> Self {
        match supply {
            SupplyType::IntraState => {
                let cgst = tax.half();
                GstBreakdown {
                    cgst,
                    sgst: tax - cgst,
                    igst: Money::zero(),
                }
            }
            SupplyType::InterState => GstBreakdown {
                cgst: Money::zero(),
                sgst: Money::zero(),
                igst: tax,
            },
        }
    }

    /// CGST + SGST + IGST.
    pub fn total(&self) -> Money {
        self.cgst + self.sgst + self.igst
    }
}

// =============================================================================
// Summary
// =============================================================================

/// All lines taxed at one rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GstSlab {
    /// Applied rate in percent (0 for untaxed lines).
    #[ts(type = "string")]
    pub rate: Decimal,
    /// Σ(line_total - discount_amount) of the slab's lines.
    pub taxable_value: Money,
    /// Σ tax_amount of the slab's lines.
    pub tax_amount: Money,
    /// Components of `tax_amount`.
    pub breakdown: GstBreakdown,
}

/// Rate-wise GST table plus the invoice-level component split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GstSummary {
    pub supply_type: SupplyType,
    /// One slab per distinct applied rate, ascending.
    pub slabs: Vec<GstSlab>,
    /// Σ taxable value over all lines.
    pub taxable_value: Money,
    /// Equal to the invoice's `total_tax`.
    pub total_tax: Money,
    /// Split of `total_tax`. Slab splits are rounded independently and may
    /// differ from this by a paisa per slab.
    pub breakdown: GstBreakdown,
}

/// Builds the GST summary of a calculated invoice.
///
/// ## Example
/// ```rust
/// use innkeep_core::gst::{summarize, SupplyType};
/// use innkeep_core::invoice::calculate_invoice_total;
/// use innkeep_core::types::LineItem;
/// use rust_decimal::Decimal;
///
/// let room = LineItem::new(Decimal::from(2), Decimal::from(100))
///     .with_tax(Decimal::from(12), false)
///     .with_discount(Decimal::from(10));
/// let totals = calculate_invoice_total(&[room]).unwrap();
///
/// let summary = summarize(&totals, SupplyType::IntraState);
/// assert_eq!(summary.slabs.len(), 1);
/// assert_eq!(summary.breakdown.cgst.to_string(), "10.80");
/// ```
pub fn summarize(totals: &InvoiceTotals, supply: SupplyType) -> GstSummary {
    let mut by_rate: BTreeMap<Decimal, (Money, Money)> = BTreeMap::new();

    for line in &totals.line_items {
        let entry = by_rate
            .entry(line.tax_rate.normalize())
            .or_insert((Money::zero(), Money::zero()));
        entry.0 += line.taxable_value();
        entry.1 += line.tax_amount;
    }

    let slabs = by_rate
        .into_iter()
        .map(|(rate, (taxable_value, tax_amount))| GstSlab {
            rate,
            taxable_value,
            tax_amount,
            breakdown: GstBreakdown::split(tax_amount, supply),
        })
        .collect();

    GstSummary {
        supply_type: supply,
        slabs,
        taxable_value: totals.taxable_value(),
        total_tax: totals.total_tax,
        breakdown: GstBreakdown::split(totals.total_tax, supply),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
