//! # Error Types
//!
//! Domain-specific error types for innkeep-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  innkeep-core errors (this file)                                       │
//! │  ├── CoreError        - What the engine returns (InvalidInput)         │
//! │  └── ValidationError  - Which field broke which rule                   │
//! │                                                                         │
//! │  invoice-preview errors (app)                                          │
//! │  └── PreviewError     - Config, I/O, JSON, and wrapped CoreError       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → API route / form message          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the field path in messages (`line_items[2].quantity`)
//! 3. Errors are enum variants, never String
//! 4. The engine has exactly one failure kind: invalid input

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by the calculation engine.
///
/// The engine never performs I/O, so the only way a calculation can fail is
/// a line item that violates its invariants. Nothing is clamped and no
/// partial result is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A line item (or other engine input) failed validation.
    ///
    /// ## User Workflow
    /// ```text
    /// Invoice form: qty = 0
    ///      │
    ///      ▼
    /// calculate_invoice_total()
    ///      │
    ///      ▼
    /// InvalidInput(MustBePositive { field: "line_items[0].quantity" })
    ///      │
    ///      ▼
    /// Form shows: "line_items[0].quantity must be positive"
    /// ```
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
}

impl CoreError {
    /// Returns the underlying validation failure.
    pub fn validation(&self) -> &ValidationError {
        match self {
            CoreError::InvalidInput(err) => err,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// `field` is a path the caller can map back to a form control.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly greater than zero.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Numeric value is outside an inclusive range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        min: Decimal,
        max: Decimal,
        value: Decimal,
    },

    /// Value is too large for the engine to calculate with.
    #[error("{field} is too large (maximum {max})")]
    TooLarge { field: String, max: Decimal },

    /// Invalid format (e.g., unknown tax mode name).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Returns the field path this error refers to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::MustBePositive { field }
            | ValidationError::MustNotBeNegative { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::TooLarge { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
