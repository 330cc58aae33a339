//! # Invoice Calculation Engine
//!
//! Turns an ordered list of [`LineItem`]s into a rounded, reconciled
//! [`InvoiceTotals`] breakdown.
//!
//! ## Per-Line Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  raw = quantity × unit_price                                            │
//! │                                                                         │
//! │  TAX MODE none         INCLUSIVE                  EXCLUSIVE             │
//! │  ─────────────         ─────────                  ─────────             │
//! │  line_total = raw      tax = raw × r / (100 + r)  line_total = raw      │
//! │  tax = 0               line_total = raw - tax                           │
//! │                                                                         │
//! │  discount = line_total × d / 100     (never touches the tax portion)    │
//! │                                                                         │
//! │                                       base = line_total - discount      │
//! │                                       tax  = base × r / 100             │
//! │                                                                         │
//! │  final = line_total - discount + tax                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inclusive lines extract tax from the pre-discount amount while exclusive
//! lines tax the post-discount base. The asymmetry is existing billing
//! behaviour and is kept as-is.
//!
//! ## Rounding
//! Every component is rounded half away from zero to 2 places *before* it
//! is combined, so `final_amount` is exactly `line_total - discount_amount +
//! tax_amount` and the invoice totals are exact sums of the lines.
//!
//! ## Example
//! ```rust
//! use innkeep_core::invoice::calculate_invoice_total;
//! use innkeep_core::types::LineItem;
//! use rust_decimal::Decimal;
//!
//! let room = LineItem::new(Decimal::from(2), Decimal::from(100))
//!     .with_tax(Decimal::from(12), false)
//!     .with_discount(Decimal::from(10));
//!
//! let totals = calculate_invoice_total(&[room]).unwrap();
//! assert_eq!(totals.total_amount.to_string(), "201.60");
//! ```

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::observer::{CalculationEvent, CalculationObserver};
use crate::types::{InvoiceTotals, LineItem, LineItemResult, TaxMode};
use crate::validation::{validate_line_item, validate_line_items};

// =============================================================================
// Free Functions
// =============================================================================

/// Calculates one line with the default calculator.
///
/// ## Errors
/// `CoreError::InvalidInput` when `quantity <= 0`, `unit_price < 0`, or a
/// rate is outside `[0, 100]`.
pub fn calculate_line_item(item: &LineItem) -> CoreResult<LineItemResult> {
    InvoiceCalculator::default().calculate_line(item)
}

/// Calculates a whole invoice with the default calculator.
///
/// Empty input yields zero totals. Any invalid line fails the whole call.
pub fn calculate_invoice_total(items: &[LineItem]) -> CoreResult<InvoiceTotals> {
    InvoiceCalculator::default().calculate(items)
}

// =============================================================================
// Invoice Calculator
// =============================================================================

/// Engine entry point carrying invoice-level settings.
///
/// Holds no mutable state; one calculator can be shared across request
/// handlers and threads.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use innkeep_core::invoice::InvoiceCalculator;
/// use innkeep_core::observer::TracingObserver;
/// use innkeep_core::types::{LineItem, TaxMode};
/// use rust_decimal::Decimal;
///
/// let quote = InvoiceCalculator::new()
///     .with_tax_mode(TaxMode::NoTax)
///     .with_observer(Arc::new(TracingObserver));
///
/// let item = LineItem::new(Decimal::ONE, Decimal::from(5000))
///     .with_tax(Decimal::from(18), false);
/// let totals = quote.calculate(&[item]).unwrap();
/// assert!(totals.total_tax.is_zero());
/// ```
#[derive(Clone, Default)]
pub struct InvoiceCalculator {
    tax_mode: TaxMode,
    observer: Option<Arc<dyn CalculationObserver>>,
}

impl InvoiceCalculator {
    /// Creates a calculator with standard tax and no observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the invoice-level tax mode.
    pub fn with_tax_mode(mut self, tax_mode: TaxMode) -> Self {
        self.tax_mode = tax_mode;
        self
    }

    /// Attaches an observer.
    pub fn with_observer(mut self, observer: Arc<dyn CalculationObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Returns the invoice-level tax mode.
    pub fn tax_mode(&self) -> TaxMode {
        self.tax_mode
    }

    /// Calculates a single line.
    pub fn calculate_line(&self, item: &LineItem) -> CoreResult<LineItemResult> {
        if let Err(err) = validate_line_item(item, None) {
            return Err(self.reject(err.into()));
        }

        Ok(resolve_line(item, self.tax_mode.combine(item.tax_mode)))
    }

    /// Calculates every line and the aggregate totals.
    ///
    /// All lines are validated before any is calculated, so a failure never
    /// leaves partial output behind.
    pub fn calculate(&self, items: &[LineItem]) -> CoreResult<InvoiceTotals> {
        if let Err(err) = validate_line_items(items) {
            return Err(self.reject(err.into()));
        }

        let mut totals = InvoiceTotals::empty();
        totals.line_items.reserve(items.len());

        for item in items {
            let line = resolve_line(item, self.tax_mode.combine(item.tax_mode));
            totals.subtotal += line.line_total;
            totals.total_discount += line.discount_amount;
            totals.total_tax += line.tax_amount;
            totals.line_items.push(line);
        }

        totals.total_amount = Money::from_decimal(
            (totals.subtotal - totals.total_discount + totals.total_tax).amount(),
        );

        debug!(
            lines = totals.line_count(),
            tax_mode = %self.tax_mode,
            subtotal = %totals.subtotal,
            total_discount = %totals.total_discount,
            total_tax = %totals.total_tax,
            total_amount = %totals.total_amount,
            "Calculated invoice totals"
        );

        if let Some(observer) = &self.observer {
            observer.on_calculated(&CalculationEvent {
                tax_mode: self.tax_mode,
                totals: &totals,
            });
        }

        Ok(totals)
    }

    fn reject(&self, err: CoreError) -> CoreError {
        warn!(field = err.validation().field(), %err, "Rejected invoice input");
        if let Some(observer) = &self.observer {
            observer.on_rejected(&err);
        }
        err
    }
}

impl fmt::Debug for InvoiceCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvoiceCalculator")
            .field("tax_mode", &self.tax_mode)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

// =============================================================================
// Line Resolution
// =============================================================================

/// Resolves one validated line under its effective tax mode.
fn resolve_line(item: &LineItem, tax_mode: TaxMode) -> LineItemResult {
    // Validation has bounded quantity × unit_price
    let raw = item.quantity * item.unit_price;
    let gross = Money::from_decimal(raw);

    if !tax_mode.is_taxed() {
        let discount_amount = gross.percent(item.discount_rate);
        return LineItemResult {
            line_total: gross,
            discount_amount,
            tax_amount: Money::zero(),
            final_amount: gross - discount_amount,
            tax_rate: Decimal::ZERO,
        };
    }

    let (line_total, discount_amount, tax_amount) = if item.tax_inclusive {
        let tax_amount =
            Money::from_decimal(raw * item.tax_rate / (Decimal::ONE_HUNDRED + item.tax_rate));
        let line_total = gross - tax_amount;
        let discount_amount = line_total.percent(item.discount_rate);
        (line_total, discount_amount, tax_amount)
    } else {
        let line_total = gross;
        let discount_amount = line_total.percent(item.discount_rate);
        let tax_amount = (line_total - discount_amount).percent(item.tax_rate);
        (line_total, discount_amount, tax_amount)
    };

    LineItemResult {
        line_total,
        discount_amount,
        tax_amount,
        final_amount: line_total - discount_amount + tax_amount,
        tax_rate: item.tax_rate,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    fn exclusive(qty: Decimal, price: Decimal, tax: Decimal, discount: Decimal) -> LineItem {
        LineItem::new(qty, price)
            .with_tax(tax, false)
            .with_discount(discount)
    }

    fn inclusive(qty: Decimal, price: Decimal, tax: Decimal, discount: Decimal) -> LineItem {
        LineItem::new(qty, price)
            .with_tax(tax, true)
            .with_discount(discount)
    }

    #[test]
    fn test_tax_inclusive_extraction() {
        // 112 including 12% → 100 + 12
        let line = calculate_line_item(&inclusive(dec!(1), dec!(112), dec!(12), dec!(0))).unwrap();
        assert_eq!(line.tax_amount.amount(), dec!(12.00));
        assert_eq!(line.line_total.amount(), dec!(100.00));
        assert_eq!(line.discount_amount.amount(), dec!(0.00));
        assert_eq!(line.final_amount.amount(), dec!(112.00));
    }

    #[test]
    fn test_tax_exclusive_with_discount() {
        let line = calculate_line_item(&exclusive(dec!(2), dec!(100), dec!(12), dec!(10))).unwrap();
        assert_eq!(line.line_total.amount(), dec!(200.00));
        assert_eq!(line.discount_amount.amount(), dec!(20.00));
        assert_eq!(line.taxable_value().amount(), dec!(180.00));
        assert_eq!(line.tax_amount.amount(), dec!(21.60));
        assert_eq!(line.final_amount.amount(), dec!(201.60));
        assert_eq!(line.tax_rate, dec!(12));
    }

    #[test]
    fn test_inclusive_discount_does_not_reduce_tax() {
        // Tax is extracted before the discount and stays at 12.00
        let line = calculate_line_item(&inclusive(dec!(1), dec!(112), dec!(12), dec!(10))).unwrap();
        assert_eq!(line.tax_amount.amount(), dec!(12.00));
        assert_eq!(line.line_total.amount(), dec!(100.00));
        assert_eq!(line.discount_amount.amount(), dec!(10.00));
        assert_eq!(line.final_amount.amount(), dec!(102.00));
    }

    #[test]
    fn test_inclusive_line_keeps_gross_price() {
        // 3 nights at 4,999 including 18%: tax is rounded, the gross is not lost
        let line = calculate_line_item(&inclusive(dec!(3), dec!(4999), dec!(18), dec!(0))).unwrap();
        assert_eq!(line.tax_amount.amount(), dec!(2287.68));
        assert_eq!(line.line_total.amount(), dec!(12709.32));
        assert_eq!(line.final_amount.amount(), dec!(14997.00));
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 1.25 × 10% = 0.125 → 0.13
        let line = calculate_line_item(&exclusive(dec!(1), dec!(1.25), dec!(10), dec!(0))).unwrap();
        assert_eq!(line.tax_amount.amount(), dec!(0.13));
        assert_eq!(line.final_amount.amount(), dec!(1.38));
    }

    #[test]
    fn test_fractional_quantity() {
        // Half-day late checkout
        let line = calculate_line_item(&exclusive(dec!(0.5), dec!(3000), dec!(12), dec!(0))).unwrap();
        assert_eq!(line.line_total.amount(), dec!(1500.00));
        assert_eq!(line.tax_amount.amount(), dec!(180.00));
        assert_eq!(line.final_amount.amount(), dec!(1680.00));
    }

    #[test]
    fn test_full_discount() {
        let line = calculate_line_item(&exclusive(dec!(1), dec!(800), dec!(18), dec!(100))).unwrap();
        assert_eq!(line.discount_amount.amount(), dec!(800.00));
        assert!(line.tax_amount.is_zero());
        assert!(line.final_amount.is_zero());
    }

    #[test]
    fn test_no_tax_mode_per_line() {
        for inclusive_flag in [true, false] {
            let item = LineItem::new(dec!(2), dec!(112))
                .with_tax(dec!(28), inclusive_flag)
                .with_discount(dec!(5))
                .with_tax_mode(TaxMode::NoTax);
            let line = calculate_line_item(&item).unwrap();
            assert_eq!(line.tax_amount.amount(), Decimal::ZERO);
            assert_eq!(line.line_total.amount(), dec!(224.00));
            assert_eq!(line.discount_amount.amount(), dec!(11.20));
            assert_eq!(line.final_amount.amount(), dec!(212.80));
            assert_eq!(line.tax_rate, Decimal::ZERO);
        }
    }

    #[test]
    fn test_no_tax_mode_invoice_level() {
        let items = vec![
            exclusive(dec!(1), dec!(100), dec!(12), dec!(0)),
            inclusive(dec!(1), dec!(112), dec!(12), dec!(0)),
        ];
        let totals = InvoiceCalculator::new()
            .with_tax_mode(TaxMode::NoTax)
            .calculate(&items)
            .unwrap();

        assert!(totals.total_tax.is_zero());
        assert_eq!(totals.subtotal.amount(), dec!(212.00));
        assert_eq!(totals.total_amount.amount(), dec!(212.00));
    }

    #[test]
    fn test_invoice_totals() {
        let items = vec![
            exclusive(dec!(2), dec!(100), dec!(12), dec!(10)),
            inclusive(dec!(1), dec!(112), dec!(12), dec!(0)),
            exclusive(dec!(3), dec!(45.50), dec!(5), dec!(0)),
        ];
        let totals = calculate_invoice_total(&items).unwrap();

        assert_eq!(totals.line_count(), 3);
        assert_eq!(totals.subtotal.amount(), dec!(436.50)); // 200 + 100 + 136.50
        assert_eq!(totals.total_discount.amount(), dec!(20.00));
        assert_eq!(totals.total_tax.amount(), dec!(40.43)); // 21.60 + 12 + 6.83
        assert_eq!(totals.total_amount.amount(), dec!(456.93));
        assert_eq!(totals.sum_of_final_amounts(), totals.total_amount);
        assert!(totals.reconciles());

        // Order is preserved
        assert_eq!(totals.line_items[0].final_amount.amount(), dec!(201.60));
        assert_eq!(totals.line_items[1].final_amount.amount(), dec!(112.00));
        assert_eq!(totals.line_items[2].final_amount.amount(), dec!(143.33));
    }

    #[test]
    fn test_empty_invoice() {
        let totals = calculate_invoice_total(&[]).unwrap();
        assert!(totals.line_items.is_empty());
        assert!(totals.subtotal.is_zero());
        assert!(totals.total_discount.is_zero());
        assert!(totals.total_tax.is_zero());
        assert!(totals.total_amount.is_zero());
    }

    #[test]
    fn test_invalid_quantity_rejected() {
        let err = calculate_line_item(&exclusive(dec!(0), dec!(100), dec!(12), dec!(0))).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidInput(ValidationError::MustBePositive {
                field: "quantity".to_string()
            })
        );
    }

    #[test]
    fn test_invalid_tax_rate_not_clamped() {
        let err = calculate_line_item(&exclusive(dec!(1), dec!(100), dec!(150), dec!(0))).unwrap_err();
        assert!(matches!(
            err.validation(),
            ValidationError::OutOfRange { value, .. } if *value == dec!(150)
        ));
    }

    #[test]
    fn test_invalid_line_fails_whole_invoice() {
        let items = vec![
            exclusive(dec!(1), dec!(100), dec!(12), dec!(0)),
            exclusive(dec!(1), dec!(-5), dec!(12), dec!(0)),
        ];
        let err = calculate_invoice_total(&items).unwrap_err();
        assert_eq!(err.validation().field(), "line_items[1].unit_price");
    }

    #[test]
    fn test_deterministic() {
        let items = vec![
            exclusive(dec!(2), dec!(99.99), dec!(18), dec!(7.5)),
            inclusive(dec!(1.5), dec!(1234.56), dec!(12), dec!(3)),
        ];
        let first = calculate_invoice_total(&items).unwrap();
        let second = calculate_invoice_total(&items).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[derive(Default)]
    struct RecordingObserver {
        calculated: Mutex<Vec<(usize, Money)>>,
        rejected: Mutex<Vec<String>>,
    }

    impl CalculationObserver for RecordingObserver {
        fn on_calculated(&self, event: &CalculationEvent<'_>) {
            self.calculated
                .lock()
                .unwrap()
                .push((event.line_count(), event.totals.total_amount));
        }

        fn on_rejected(&self, error: &CoreError) {
            self.rejected
                .lock()
                .unwrap()
                .push(error.validation().field().to_string());
        }
    }

    #[test]
    fn test_observer_notified() {
        let observer = Arc::new(RecordingObserver::default());
        let calculator = InvoiceCalculator::new().with_observer(observer.clone());

        calculator
            .calculate(&[exclusive(dec!(2), dec!(100), dec!(12), dec!(10))])
            .unwrap();
        calculator
            .calculate(&[exclusive(dec!(1), dec!(100), dec!(12), dec!(101))])
            .unwrap_err();

        let calculated = observer.calculated.lock().unwrap();
        assert_eq!(calculated.as_slice(), &[(1, Money::from_minor(20160))]);
        let rejected = observer.rejected.lock().unwrap();
        assert_eq!(rejected.as_slice(), &["line_items[0].discount_rate".to_string()]);
    }

    #[test]
    fn test_calculator_debug_hides_observer() {
        let calculator = InvoiceCalculator::new().with_tax_mode(TaxMode::NoTax);
        let debug = format!("{:?}", calculator);
        assert!(debug.contains("NoTax"));
        assert!(debug.contains("observer: false"));
    }
}
