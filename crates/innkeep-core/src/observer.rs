//! # Calculation Observers
//!
//! Hook for metrics and audit logging around engine calls.
//!
//! Observers are injected into an [`InvoiceCalculator`](crate::invoice::InvoiceCalculator)
//! by the caller; the engine keeps no global collector. They see results
//! after the fact and cannot change them.
//!
//! ```text
//! API route ──► InvoiceCalculator::calculate()
//!                    │
//!                    ├── Ok  ──► observer.on_calculated(&event)
//!                    └── Err ──► observer.on_rejected(&error)
//! ```

use tracing::{info, warn};

use crate::error::CoreError;
use crate::types::{InvoiceTotals, TaxMode};

/// What an observer is told about a successful invoice calculation.
#[derive(Debug, Clone, Copy)]
pub struct CalculationEvent<'a> {
    /// Invoice-level tax mode the calculator ran with.
    pub tax_mode: TaxMode,
    /// The computed breakdown.
    pub totals: &'a InvoiceTotals,
}

impl CalculationEvent<'_> {
    /// Number of lines calculated.
    pub fn line_count(&self) -> usize {
        self.totals.line_count()
    }
}

/// Receives notifications from the calculation engine.
///
/// Both methods default to no-ops so implementors only override what they
/// record. Implementations must be cheap and must not panic.
pub trait CalculationObserver: Send + Sync {
    /// Called after an invoice was calculated successfully.
    fn on_calculated(&self, _event: &CalculationEvent<'_>) {}

    /// Called when input was rejected.
    fn on_rejected(&self, _error: &CoreError) {}
}

/// Observer that writes every event to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl CalculationObserver for TracingObserver {
    fn on_calculated(&self, event: &CalculationEvent<'_>) {
        info!(
            lines = event.line_count(),
            tax_mode = %event.tax_mode,
            subtotal = %event.totals.subtotal,
            total_tax = %event.totals.total_tax,
            total_amount = %event.totals.total_amount,
            "Invoice calculated"
        );
    }

    fn on_rejected(&self, error: &CoreError) {
        warn!(field = error.validation().field(), %error, "Invoice rejected");
    }
}
