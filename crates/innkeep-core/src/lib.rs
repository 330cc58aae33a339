//! # innkeep-core: Invoice Calculation Engine for Innkeep
//!
//! This crate turns an invoice's line items into a fully reconciled monetary
//! breakdown: per-line discount, tax and final amount, plus invoice totals.
//! Every invoice screen, PDF and email renders numbers produced here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Innkeep Back-Office Billing                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │             Invoice form / API routes / invoice-preview         │   │
//! │  │    parse request ──► Vec<LineItem> ──► render / persist        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ innkeep-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │validation │─►│  invoice  │─►│    gst    │  │  format   │  │   │
//! │  │   │  bounds   │  │ per-line  │  │ CGST/SGST │  │  ₹1,500   │  │   │
//! │  │   │  checks   │  │  + totals │  │   IGST    │  │ ₹1,00,000 │  │   │
//! │  │   └───────────┘  └─────┬─────┘  └───────────┘  └───────────┘  │   │
//! │  │                        │ observer (injected)                   │   │
//! │  │   money: Decimal, 2 dp, half away from zero                    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • PURE FUNCTIONS                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Line items, per-line results, invoice totals
//! - [`money`] - Money type and the single rounding rule
//! - [`invoice`] - The calculation engine
//! - [`validation`] - Input bounds, checked before any math
//! - [`gst`] - CGST/SGST/IGST summary of a calculated invoice
//! - [`format`] - Display formatting of amounts
//! - [`observer`] - Metrics/audit hook injected by the caller
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use innkeep_core::{calculate_invoice_total, format_currency, LineItem};
//! use rust_decimal::Decimal;
//!
//! // 2 nights at 100, 12% tax on top, 10% discount
//! let room = LineItem::new(Decimal::from(2), Decimal::from(100))
//!     .with_tax(Decimal::from(12), false)
//!     .with_discount(Decimal::from(10));
//!
//! let totals = calculate_invoice_total(&[room]).unwrap();
//!
//! assert_eq!(totals.total_amount.to_string(), "201.60");
//! assert_eq!(format_currency(totals.total_amount.amount()), "₹201.60");
//! ```

use rust_decimal::Decimal;

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod format;
pub mod gst;
pub mod invoice;
pub mod money;
pub mod observer;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use format::{format_currency, CurrencyFormat, DigitGrouping};
pub use gst::{summarize, GstBreakdown, GstSlab, GstSummary, SupplyType};
pub use invoice::{calculate_invoice_total, calculate_line_item, InvoiceCalculator};
pub use money::Money;
pub use observer::{CalculationEvent, CalculationObserver, TracingObserver};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest `quantity × unit_price` a single line may carry (10^15).
///
/// Keeps every intermediate product well inside `Decimal`'s 96-bit range.
pub const MAX_LINE_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Allowed drift between Σ final amounts and the invoice total, per line (0.02).
pub const RECONCILIATION_TOLERANCE_PER_LINE: Decimal = Decimal::from_parts(2, 0, 0, false, 2);
