//! # Domain Types
//!
//! Input and output types of the invoice calculation engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUT                            OUTPUT                                │
//! │  ┌─────────────────┐             ┌──────────────────────┐              │
//! │  │    LineItem     │  ──────►    │   LineItemResult     │  (per line)  │
//! │  │  ─────────────  │   engine    │  ──────────────────  │              │
//! │  │  quantity       │             │  line_total          │              │
//! │  │  unit_price     │             │  discount_amount     │              │
//! │  │  tax_rate       │             │  tax_amount          │              │
//! │  │  tax_inclusive  │             │  final_amount        │              │
//! │  │  discount_rate  │             └──────────┬───────────┘              │
//! │  │  tax_mode       │                        │ Σ                        │
//! │  └─────────────────┘             ┌──────────▼───────────┐              │
//! │                                  │   InvoiceTotals      │  (aggregate) │
//! │  ┌─────────────────┐             │  subtotal            │              │
//! │  │    TaxMode      │             │  total_discount      │              │
//! │  │  Standard       │             │  total_tax           │              │
//! │  │  NoTax ("none") │             │  total_amount        │              │
//! │  └─────────────────┘             └──────────────────────┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every input field is required. Callers that want a default say so
//! explicitly, e.g. through [`LineItem::new`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::RECONCILIATION_TOLERANCE_PER_LINE;

// =============================================================================
// Tax Mode
// =============================================================================

/// Whether tax applies at all.
///
/// `NoTax` is used for quotes and estimates where tax does not apply yet.
/// It can be set per line or for the whole invoice; a line is untaxed if
/// either says so.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxMode {
    /// Use the line's `tax_rate` and `tax_inclusive` flag.
    #[default]
    Standard,
    /// Tax is forced to zero and nothing is extracted from the price.
    #[serde(rename = "none")]
    NoTax,
}

impl TaxMode {
    /// Combines an invoice-level mode with a line-level mode.
    #[inline]
    pub fn combine(self, other: TaxMode) -> TaxMode {
        if self == TaxMode::NoTax || other == TaxMode::NoTax {
            TaxMode::NoTax
        } else {
            TaxMode::Standard
        }
    }

    /// Returns true if tax is calculated under this mode.
    #[inline]
    pub fn is_taxed(&self) -> bool {
        matches!(self, TaxMode::Standard)
    }
}

impl fmt::Display for TaxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxMode::Standard => write!(f, "standard"),
            TaxMode::NoTax => write!(f, "none"),
        }
    }
}

impl FromStr for TaxMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" | "taxed" => Ok(TaxMode::Standard),
            "none" | "no_tax" | "exempt" => Ok(TaxMode::NoTax),
            other => Err(ValidationError::InvalidFormat {
                field: "tax_mode".to_string(),
                reason: format!("unknown tax mode '{}', expected standard or none", other),
            }),
        }
    }
}

// =============================================================================
// Line Item (input)
// =============================================================================

/// A single billable row on an invoice (a room night, a food order).
///
/// Amounts and rates are plain decimals here; the engine validates them and
/// produces rounded [`Money`] outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Count of units. Must be > 0; fractions allowed (half-day charges).
    #[ts(type = "string")]
    pub quantity: Decimal,

    /// Price per unit. Must be >= 0. Any precision.
    #[ts(type = "string")]
    pub unit_price: Decimal,

    /// Tax percentage, 0 to 100.
    #[ts(type = "string")]
    pub tax_rate: Decimal,

    /// Whether `unit_price × quantity` already contains the tax.
    pub tax_inclusive: bool,

    /// Discount percentage, 0 to 100, applied to the tax-exclusive base.
    #[ts(type = "string")]
    pub discount_rate: Decimal,

    /// Per-line tax mode.
    pub tax_mode: TaxMode,
}

impl LineItem {
    /// Creates an untaxed-rate, undiscounted, tax-exclusive line.
    ///
    /// ## Example
    /// ```rust
    /// use innkeep_core::types::LineItem;
    /// use rust_decimal::Decimal;
    ///
    /// let room = LineItem::new(Decimal::from(2), Decimal::from(100))
    ///     .with_tax(Decimal::from(12), false)
    ///     .with_discount(Decimal::from(10));
    /// assert!(!room.tax_inclusive);
    /// ```
    pub fn new(quantity: Decimal, unit_price: Decimal) -> Self {
        LineItem {
            quantity,
            unit_price,
            tax_rate: Decimal::ZERO,
            tax_inclusive: false,
            discount_rate: Decimal::ZERO,
            tax_mode: TaxMode::Standard,
        }
    }

    /// Sets the tax rate and whether the price already includes it.
    pub fn with_tax(mut self, tax_rate: Decimal, tax_inclusive: bool) -> Self {
        self.tax_rate = tax_rate;
        self.tax_inclusive = tax_inclusive;
        self
    }

    /// Sets the discount percentage.
    pub fn with_discount(mut self, discount_rate: Decimal) -> Self {
        self.discount_rate = discount_rate;
        self
    }

    /// Sets the per-line tax mode.
    pub fn with_tax_mode(mut self, tax_mode: TaxMode) -> Self {
        self.tax_mode = tax_mode;
        self
    }

    /// `quantity × unit_price`, unrounded. `None` if it overflows.
    #[inline]
    pub fn raw_amount(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.unit_price)
    }
}

// =============================================================================
// Line Item Result (output)
// =============================================================================

/// The resolved amounts of one line, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemResult {
    /// Base after removing embedded tax (if inclusive), before discount.
    pub line_total: Money,

    /// Discount subtracted from `line_total`.
    pub discount_amount: Money,

    /// Tax attributed to the line.
    pub tax_amount: Money,

    /// `line_total - discount_amount + tax_amount`.
    pub final_amount: Money,

    /// Rate actually applied: the line's `tax_rate`, or 0 when untaxed.
    #[ts(type = "string")]
    pub tax_rate: Decimal,
}

impl LineItemResult {
    /// The value tax was (or would be) charged on: `line_total - discount_amount`.
    #[inline]
    pub fn taxable_value(&self) -> Money {
        self.line_total - self.discount_amount
    }
}

// =============================================================================
// Invoice Totals (output)
// =============================================================================

/// The full breakdown of one invoice.
///
/// Produced by exactly one engine call; consumers (persistence, UI table,
/// PDF, email) read these fields and never re-derive them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceTotals {
    /// Σ line_total.
    pub subtotal: Money,

    /// Σ discount_amount.
    pub total_discount: Money,

    /// Σ tax_amount.
    pub total_tax: Money,

    /// subtotal - total_discount + total_tax.
    pub total_amount: Money,

    /// One result per input line, same order.
    pub line_items: Vec<LineItemResult>,
}

impl InvoiceTotals {
    /// Totals of an invoice with no lines.
    pub fn empty() -> Self {
        InvoiceTotals {
            subtotal: Money::zero(),
            total_discount: Money::zero(),
            total_tax: Money::zero(),
            total_amount: Money::zero(),
            line_items: Vec::new(),
        }
    }

    /// Number of lines on the invoice.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_items.len()
    }

    /// Returns true if the invoice has no lines.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// `subtotal - total_discount`.
    pub fn taxable_value(&self) -> Money {
        self.subtotal - self.total_discount
    }

    /// Σ final_amount over the lines.
    pub fn sum_of_final_amounts(&self) -> Money {
        self.line_items.iter().map(|line| line.final_amount).sum()
    }

    /// Checks that the per-line finals add up to `total_amount`.
    ///
    /// Allows 0.02 per line for independent per-line rounding.
    pub fn reconciles(&self) -> bool {
        let drift = (self.sum_of_final_amounts() - self.total_amount).abs();
        let tolerance = RECONCILIATION_TOLERANCE_PER_LINE * Decimal::from(self.line_count());
        drift.amount() <= tolerance
    }
}

impl Default for InvoiceTotals {
    fn default() -> Self {
        InvoiceTotals::empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tax_mode_default() {
        assert_eq!(TaxMode::default(), TaxMode::Standard);
    }

    #[test]
    fn test_tax_mode_combine() {
        assert_eq!(TaxMode::Standard.combine(TaxMode::Standard), TaxMode::Standard);
        assert_eq!(TaxMode::Standard.combine(TaxMode::NoTax), TaxMode::NoTax);
        assert_eq!(TaxMode::NoTax.combine(TaxMode::Standard), TaxMode::NoTax);
        assert!(!TaxMode::NoTax.is_taxed());
    }

    #[test]
    fn test_tax_mode_parsing() {
        assert_eq!("standard".parse::<TaxMode>().unwrap(), TaxMode::Standard);
        assert_eq!("NONE".parse::<TaxMode>().unwrap(), TaxMode::NoTax);
        assert_eq!("exempt".parse::<TaxMode>().unwrap(), TaxMode::NoTax);
        assert!("vat".parse::<TaxMode>().is_err());
        assert_eq!(TaxMode::NoTax.to_string(), "none");
    }

    #[test]
    fn test_tax_mode_serde_names() {
        assert_eq!(serde_json::to_string(&TaxMode::NoTax).unwrap(), "\"none\"");
        assert_eq!(
            serde_json::to_string(&TaxMode::Standard).unwrap(),
            "\"standard\""
        );
    }

    #[test]
    fn test_line_item_builder() {
        let item = LineItem::new(dec!(2), dec!(100))
            .with_tax(dec!(12), true)
            .with_discount(dec!(10))
            .with_tax_mode(TaxMode::NoTax);
        assert_eq!(item.raw_amount(), Some(dec!(200)));
        assert_eq!(item.tax_rate, dec!(12));
        assert!(item.tax_inclusive);
        assert_eq!(item.discount_rate, dec!(10));
        assert_eq!(item.tax_mode, TaxMode::NoTax);
    }

    #[test]
    fn test_line_item_requires_every_field() {
        let missing_mode = r#"{
            "quantity": "1", "unit_price": "100", "tax_rate": "12",
            "tax_inclusive": false, "discount_rate": "0"
        }"#;
        assert!(serde_json::from_str::<LineItem>(missing_mode).is_err());

        let complete = r#"{
            "quantity": 1, "unit_price": "100.50", "tax_rate": 12,
            "tax_inclusive": false, "discount_rate": "0", "tax_mode": "none"
        }"#;
        let item: LineItem = serde_json::from_str(complete).unwrap();
        assert_eq!(item.unit_price, dec!(100.50));
        assert_eq!(item.tax_mode, TaxMode::NoTax);
    }

    #[test]
    fn test_empty_totals() {
        let totals = InvoiceTotals::empty();
        assert!(totals.is_empty());
        assert!(totals.total_amount.is_zero());
        assert!(totals.reconciles());
        assert_eq!(totals, InvoiceTotals::default());
    }
}
