//! # Currency Formatting
//!
//! Display-only rendering of engine amounts for the UI table, PDF and email.
//! Nothing here feeds back into a calculation.
//!
//! ```text
//! amount        Indian (default)     Western
//! ──────        ────────────────     ───────
//! 0             ₹0                   ₹0
//! 1500          ₹1,500               ₹1,500
//! 1234.5        ₹1,234.50            ₹1,234.50
//! 1234567.891   ₹12,34,567.89        ₹1,234,567.89
//! -250.75       -₹250.75             -₹250.75
//! ```

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::{round_money, Money};

/// Symbol used when none is configured.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// How integer digits are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitGrouping {
    /// Thousands, then pairs: 12,34,567.
    #[default]
    Indian,
    /// Thousands throughout: 1,234,567.
    Western,
}

impl fmt::Display for DigitGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigitGrouping::Indian => write!(f, "indian"),
            DigitGrouping::Western => write!(f, "western"),
        }
    }
}

impl FromStr for DigitGrouping {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "indian" | "en-in" | "lakh" => Ok(DigitGrouping::Indian),
            "western" | "en-us" | "international" => Ok(DigitGrouping::Western),
            other => Err(ValidationError::InvalidFormat {
                field: "digit_grouping".to_string(),
                reason: format!("unknown grouping '{}', expected indian or western", other),
            }),
        }
    }
}

/// Currency symbol plus digit grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub grouping: DigitGrouping,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            grouping: DigitGrouping::Indian,
        }
    }
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>, grouping: DigitGrouping) -> Self {
        CurrencyFormat {
            symbol: symbol.into(),
            grouping,
        }
    }

    /// Formats an amount.
    ///
    /// Whole amounts drop the fraction; anything else shows exactly two
    /// digits after rounding half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use innkeep_core::format::CurrencyFormat;
    /// use rust_decimal::Decimal;
    ///
    /// let inr = CurrencyFormat::default();
    /// assert_eq!(inr.format(Decimal::ZERO), "₹0");
    /// assert_eq!(inr.format(Decimal::new(12345, 1)), "₹1,234.50");
    /// ```
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = round_money(amount);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        let fixed = format!("{:.2}", rounded.abs());
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let whole = group_digits(whole, self.grouping);

        if fraction.bytes().all(|b| b == b'0') {
            format!("{}{}{}", sign, self.symbol, whole)
        } else {
            format!("{}{}{}.{}", sign, self.symbol, whole, fraction)
        }
    }

    /// Formats an engine amount.
    pub fn format_money(&self, money: Money) -> String {
        self.format(money.amount())
    }
}

/// Formats with the default symbol and Indian grouping.
///
/// ```rust
/// use innkeep_core::format::format_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_currency(Decimal::from(150000)), "₹1,50,000");
/// ```
pub fn format_currency(amount: Decimal) -> String {
    CurrencyFormat::default().format(amount)
}

fn group_digits(digits: &str, grouping: DigitGrouping) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let size = match grouping {
        DigitGrouping::Indian => 2,
        DigitGrouping::Western => 3,
    };

    let mut groups = Vec::new();
    let mut end = head.len();
    while end > size {
        groups.push(&head[end - size..end]);
        end -= size;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}
