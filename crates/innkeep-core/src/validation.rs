//! # Validation Module
//!
//! Input validation for the invoice calculation engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Invoice form (web UI)                                        │
//! │  ├── Basic format checks (empty, numeric)                              │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: API route (deserialization into LineItem)                    │
//! │  ├── Type validation: every field present, decimals parse              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: THIS MODULE, run by the engine before any math               │
//! │  ├── quantity > 0, unit_price >= 0                                     │
//! │  ├── tax_rate, discount_rate within [0, 100]                           │
//! │  └── quantity × unit_price fits the engine's range                     │
//! │                                                                         │
//! │  Out-of-range values are rejected, never clamped.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use innkeep_core::types::LineItem;
//! use innkeep_core::validation::validate_line_item;
//! use rust_decimal::Decimal;
//!
//! let item = LineItem::new(Decimal::ZERO, Decimal::from(100));
//! let err = validate_line_item(&item, Some(3)).unwrap_err();
//! assert_eq!(err.field(), "line_items[3].quantity");
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::LineItem;
use crate::MAX_LINE_AMOUNT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Builds the field path reported in errors.
///
/// `field_path(Some(2), "quantity")` → `line_items[2].quantity`
pub fn field_path(index: Option<usize>, field: &str) -> String {
    match index {
        Some(i) => format!("line_items[{}].{}", i, field),
        None => field.to_string(),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity: must be strictly positive.
///
/// ## Example
/// ```rust
/// use innkeep_core::validation::validate_quantity;
/// use rust_decimal::Decimal;
///
/// assert!(validate_quantity("quantity", Decimal::new(5, 1)).is_ok()); // 0.5
/// assert!(validate_quantity("quantity", Decimal::ZERO).is_err());
/// ```
pub fn validate_quantity(field: &str, qty: Decimal) -> ValidationResult<()> {
    if qty <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price: must be non-negative.
///
/// Zero is allowed (complimentary items).
pub fn validate_unit_price(field: &str, price: Decimal) -> ValidationResult<()> {
    if price < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a percentage (tax or discount rate) within `[0, 100]`.
///
/// ## Example
/// ```rust
/// use innkeep_core::validation::validate_percentage;
/// use rust_decimal::Decimal;
///
/// assert!(validate_percentage("tax_rate", Decimal::from(18)).is_ok());
/// assert!(validate_percentage("tax_rate", Decimal::from(100)).is_ok());
/// assert!(validate_percentage("tax_rate", Decimal::from(150)).is_err());
/// ```
pub fn validate_percentage(field: &str, rate: Decimal) -> ValidationResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: Decimal::ZERO,
            max: Decimal::ONE_HUNDRED,
            value: rate,
        });
    }

    Ok(())
}

// =============================================================================
// Line Item Validator
// =============================================================================

/// Validates every invariant of a line item.
///
/// `index` is the line's position on the invoice, used to build field paths;
/// pass `None` when validating a single standalone line.
///
/// ## Rules
/// - `quantity > 0`
/// - `unit_price >= 0`
/// - `0 <= tax_rate <= 100`
/// - `0 <= discount_rate <= 100`
/// - `quantity × unit_price <= MAX_LINE_AMOUNT`
///
/// Rate bounds are checked even when the line's tax mode is `none`.
pub fn validate_line_item(item: &LineItem, index: Option<usize>) -> ValidationResult<()> {
    validate_quantity(&field_path(index, "quantity"), item.quantity)?;
    validate_unit_price(&field_path(index, "unit_price"), item.unit_price)?;
    validate_percentage(&field_path(index, "tax_rate"), item.tax_rate)?;
    validate_percentage(&field_path(index, "discount_rate"), item.discount_rate)?;

    match item.raw_amount() {
        Some(raw) if raw <= MAX_LINE_AMOUNT => Ok(()),
        _ => Err(ValidationError::TooLarge {
            field: field_path(index, "unit_price"),
            max: MAX_LINE_AMOUNT,
        }),
    }
}

/// Validates a batch of line items, stopping at the first failure.
pub fn validate_line_items(items: &[LineItem]) -> ValidationResult<()> {
    items
        .iter()
        .enumerate()
        .try_for_each(|(i, item)| validate_line_item(item, Some(i)))
}

// =============================================================================
// Unit Tests
// =============================================================================
