//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │    1.005.toFixed(2) = "1.00"         ❌ (1.005 is really 1.00499...)    │
//! │                                                                         │
//! │  OUR SOLUTION: Decimal + ONE rounding rule                              │
//! │    Intermediate math is exact (rust_decimal, 28 digits)                 │
//! │    Every stored amount is rounded half-away-from-zero to 2 places       │
//! │    1.005 → 1.01, 0.125 → 0.13, -0.125 → -0.13                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use innkeep_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let price = Money::from_minor(1099); // 10.99
//! let total = price + Money::from_minor(500);
//! assert_eq!(total.amount(), Decimal::new(1599, 2));
//!
//! // Anything with more precision is rounded on the way in
//! let tax = Money::from_decimal(Decimal::new(125, 3)); // 0.125
//! assert_eq!(tax, Money::from_minor(13));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

/// Number of fractional digits every monetary amount carries.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// The single rounding rule used for every monetary amount.
pub const MONEY_ROUNDING: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

/// Rounds a decimal to 2 places, half away from zero, at scale 2.
///
/// ## Example
/// ```rust
/// use innkeep_core::money::round_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_money(Decimal::new(1005, 3)).to_string(), "1.01");
/// assert_eq!(round_money(Decimal::from(7)).to_string(), "7.00");
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, MONEY_ROUNDING);
    rounded.rescale(MONEY_DECIMAL_PLACES);
    rounded
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount with exactly two fractional digits.
///
/// ## Design Decisions
/// - **Decimal (signed)**: exact base-10 arithmetic, negative values allowed
///   for intermediate differences
/// - **Always rounded**: every constructor goes through [`round_money`], so
///   sums of `Money` never need re-rounding
/// - **Serialized as a string** (`"201.60"`): JSON numbers are binary floats
///   on the JavaScript side
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  LineItem (raw decimals) ──► engine ──► LineItemResult (Money fields)  │
/// │                                              │                          │
/// │                                              ▼                          │
/// │                                  InvoiceTotals (Money fields)           │
/// │                                              │                          │
/// │              ┌───────────────┬───────────────┴──────────┐              │
/// │              ▼               ▼                          ▼              │
/// │         persisted        UI table               PDF / email            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(from = "Decimal")]
#[ts(export)]
pub struct Money(#[ts(type = "string")] Decimal);

impl Money {
    /// Creates Money from any decimal, rounding half away from zero.
    pub fn from_decimal(value: Decimal) -> Self {
        Money(round_money(value))
    }

    /// Creates Money from minor units (paise, cents).
    ///
    /// ## Example
    /// ```rust
    /// use innkeep_core::money::Money;
    ///
    /// assert_eq!(Money::from_minor(11200).to_string(), "112.00");
    /// ```
    pub fn from_minor(minor: i64) -> Self {
        Money(Decimal::new(minor, MONEY_DECIMAL_PLACES))
    }

    /// Returns zero money value.
    pub fn zero() -> Self {
        Money(Decimal::new(0, MONEY_DECIMAL_PLACES))
    }

    /// Returns the underlying decimal amount (scale 2).
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns the absolute value.
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Returns `rate` percent of this amount, rounded.
    ///
    /// ## Example
    /// ```rust
    /// use innkeep_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let base = Money::from_minor(18000);     // 180.00
    /// let tax = base.percent(Decimal::from(12)); // 12%
    /// assert_eq!(tax, Money::from_minor(2160)); // 21.60
    /// ```
    pub fn percent(&self, rate: Decimal) -> Money {
        Money::from_decimal(self.0 * rate / Decimal::ONE_HUNDRED)
    }

    /// Halves the amount, rounding half away from zero.
    ///
    /// `x.half() + (x - x.half()) == x` always holds, which is what
    /// component tax splits rely on.
    pub fn half(&self) -> Money {
        Money::from_decimal(self.0 / Decimal::TWO)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal with two places (`1234.50`).
///
/// Currency symbols and digit grouping are a display concern, see
/// [`crate::format::CurrencyFormat`].
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money::from_decimal(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
