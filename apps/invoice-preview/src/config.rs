//! # Billing Configuration
//!
//! Settings the preview needs around the engine: who issues the invoice,
//! how amounts are displayed, and the invoice-level tax defaults.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                              │
//! │     --no-tax, --inter-state                                            │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     INNKEEP_TAX_MODE=none                                              │
//! │     INNKEEP_SUPPLY_TYPE=inter_state                                    │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/innkeep/billing.toml (Linux)                             │
//! │     ~/Library/Application Support/com.innkeep.billing/billing.toml     │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     ₹ with Indian grouping, standard tax, intra-state supply           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # billing.toml
//! [hotel]
//! name = "Hotel Sagar"
//! gstin = "29ABCDE1234F1Z5"
//!
//! [currency]
//! code = "INR"
//! symbol = "₹"
//! grouping = "indian"   # indian | western
//!
//! [tax]
//! mode = "standard"     # standard | none
//! supply_type = "intra_state"
//! ```

use std::path::{Path, PathBuf};

use innkeep_core::{CurrencyFormat, DigitGrouping, SupplyType, TaxMode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{PreviewError, PreviewResult};

/// Length of a GSTIN.
const GSTIN_LEN: usize = 15;

// =============================================================================
// Hotel
// =============================================================================

/// The business issuing invoices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelConfig {
    /// Name printed in the invoice header.
    #[serde(default = "default_hotel_name")]
    pub name: String,

    /// GST registration number, if registered.
    #[serde(default)]
    pub gstin: Option<String>,
}

fn default_hotel_name() -> String {
    "Innkeep Hotel".to_string()
}

impl Default for HotelConfig {
    fn default() -> Self {
        HotelConfig {
            name: default_hotel_name(),
            gstin: None,
        }
    }
}

// =============================================================================
// Currency
// =============================================================================

/// Display currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySettings {
    /// ISO 4217 code, shown in JSON output.
    #[serde(default = "default_currency_code")]
    pub code: String,

    /// Symbol prefixed to formatted amounts.
    #[serde(default = "default_currency_symbol")]
    pub symbol: String,

    #[serde(default)]
    pub grouping: DigitGrouping,
}

fn default_currency_code() -> String {
    "INR".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            code: default_currency_code(),
            symbol: default_currency_symbol(),
            grouping: DigitGrouping::default(),
        }
    }
}

impl CurrencySettings {
    /// The formatter for these settings.
    pub fn format(&self) -> CurrencyFormat {
        CurrencyFormat::new(self.symbol.clone(), self.grouping)
    }
}

// =============================================================================
// Tax
// =============================================================================

/// Invoice-level tax defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TaxSettings {
    #[serde(default)]
    pub mode: TaxMode,

    #[serde(default)]
    pub supply_type: SupplyType,
}

// =============================================================================
// Billing Configuration
// =============================================================================

/// Complete preview configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default)]
    pub hotel: HotelConfig,

    #[serde(default)]
    pub currency: CurrencySettings,

    #[serde(default)]
    pub tax: TaxSettings,
}

impl BillingConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (billing.toml)
    /// 3. Environment variables
    ///
    /// An explicitly given path must exist; the default path is optional.
    pub fn load(config_path: Option<PathBuf>) -> PreviewResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> PreviewResult<Self> {
        info!(?path, "Loading billing config from file");
        let contents = std::fs::read_to_string(path).map_err(|e| PreviewError::io(path, e))?;
        Self::from_toml(&contents)
    }

    /// Parses a billing.toml document. Missing sections take defaults.
    pub fn from_toml(contents: &str) -> PreviewResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> PreviewResult<()> {
        if self.hotel.name.trim().is_empty() {
            return Err(PreviewError::Config("hotel.name must not be empty".into()));
        }

        if let Some(ref gstin) = self.hotel.gstin {
            if gstin.len() != GSTIN_LEN || !gstin.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(PreviewError::Config(format!(
                    "hotel.gstin must be {} alphanumeric characters, got '{}'",
                    GSTIN_LEN, gstin
                )));
            }
        }

        if self.currency.symbol.is_empty() {
            return Err(PreviewError::Config("currency.symbol must not be empty".into()));
        }

        let code = &self.currency.code;
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(PreviewError::Config(format!(
                "currency.code must be a 3-letter ISO code, got '{}'",
                code
            )));
        }

        Ok(())
    }

    /// Applies `INNKEEP_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("INNKEEP_HOTEL_NAME") {
            debug!(name = %name, "Overriding hotel name from environment");
            self.hotel.name = name;
        }

        if let Some(symbol) = lookup("INNKEEP_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }

        if let Some(grouping) = lookup("INNKEEP_DIGIT_GROUPING") {
            match grouping.parse() {
                Ok(parsed) => self.currency.grouping = parsed,
                Err(_) => warn!(grouping = %grouping, "Unknown digit grouping in environment"),
            }
        }

        if let Some(mode) = lookup("INNKEEP_TAX_MODE") {
            match mode.parse() {
                Ok(parsed) => {
                    debug!(mode = %mode, "Overriding tax mode from environment");
                    self.tax.mode = parsed;
                }
                Err(_) => warn!(mode = %mode, "Unknown tax mode in environment"),
            }
        }

        if let Some(supply) = lookup("INNKEEP_SUPPLY_TYPE") {
            match supply.parse() {
                Ok(parsed) => self.tax.supply_type = parsed,
                Err(_) => warn!(supply = %supply, "Unknown supply type in environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "innkeep", "billing")
            .map(|dirs| dirs.config_dir().join("billing.toml"))
    }
}
