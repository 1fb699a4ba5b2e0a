//! # Shop Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--data-dir`)
//! 2. Environment variables (`PAHANA_*`)
//! 3. Defaults (this file)
//!
//! ## Environment Variables
//! ```text
//! PAHANA_DATA_DIR            where cart.json, wishlist.json, lastOrder.json live
//! PAHANA_STORE_NAME          shown in command output
//! PAHANA_CURRENCY_SYMBOL     prefix for amounts          (default "Rs.")
//! PAHANA_INVOICE_TITLE       heading of invoice PDFs     (default "BOOKSTORE INVOICE")
//! PAHANA_TAX_RATE            percent, e.g. "0.8"         (default 0.8)
//! PAHANA_SHIPPING_STANDARD   decimal amount              (default 350.00)
//! PAHANA_SHIPPING_EXPRESS    decimal amount              (default 150.00)
//! PAHANA_SHIPPING_OVERNIGHT  decimal amount              (default 500.00)
//! ```

use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;
use pahana_core::validation::{validate_price_cents, validate_tax_rate_bps};
use pahana_core::{Money, PricingPolicy, ShippingRates, TaxRate, DEFAULT_SHIPPING_RATES, TAX_RATE};
use pahana_invoice::InvoiceLayout;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STORE_NAME: &str = "Pahana Bookshop";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "Rs.";
pub const DEFAULT_INVOICE_TITLE: &str = "BOOKSTORE INVOICE";

/// Application configuration.
///
/// Read-only after startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopConfig {
    /// Directory holding the persisted stores, invoices and order payloads.
    pub data_dir: PathBuf,

    pub store_name: String,

    /// Prefix for displayed amounts, e.g. `Rs.`
    pub currency_symbol: String,

    pub invoice_title: String,

    /// Tax rate and shipping table used for every total.
    pub pricing: PricingPolicy,
}

impl ShopConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let data_dir = match lookup("PAHANA_DATA_DIR") {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_data_dir()?,
        };

        let tax_rate = match lookup("PAHANA_TAX_RATE") {
            Some(value) => parse_tax_rate("PAHANA_TAX_RATE", &value)?,
            None => TAX_RATE,
        };

        let shipping = ShippingRates {
            standard: amount_or(&lookup, "PAHANA_SHIPPING_STANDARD", DEFAULT_SHIPPING_RATES.standard)?,
            express: amount_or(&lookup, "PAHANA_SHIPPING_EXPRESS", DEFAULT_SHIPPING_RATES.express)?,
            overnight: amount_or(&lookup, "PAHANA_SHIPPING_OVERNIGHT", DEFAULT_SHIPPING_RATES.overnight)?,
        };

        Ok(ShopConfig {
            data_dir,
            store_name: lookup("PAHANA_STORE_NAME").unwrap_or_else(|| DEFAULT_STORE_NAME.to_string()),
            currency_symbol: lookup("PAHANA_CURRENCY_SYMBOL")
                .unwrap_or_else(|| DEFAULT_CURRENCY_SYMBOL.to_string()),
            invoice_title: lookup("PAHANA_INVOICE_TITLE")
                .unwrap_or_else(|| DEFAULT_INVOICE_TITLE.to_string()),
            pricing: PricingPolicy { tax_rate, shipping },
        })
    }

    /// Replaces the data directory, e.g. from `--data-dir`.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn invoice_dir(&self) -> PathBuf {
        self.data_dir.join("invoices")
    }

    /// Where submitted checkout payloads are kept, one file per order.
    pub fn orders_dir(&self) -> PathBuf {
        self.data_dir.join("orders")
    }

    pub fn invoice_layout(&self) -> InvoiceLayout {
        InvoiceLayout::default().with_title(&self.invoice_title)
    }

    /// Formats an amount with the configured currency symbol.
    pub fn money(&self, amount: Money) -> String {
        amount.format_with(&self.currency_symbol)
    }
}

/// Determines the data directory based on the platform.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/lk.pahana.bookshop`
/// - **Windows**: `%APPDATA%\pahana\bookshop\data`
/// - **Linux**: `~/.local/share/bookshop`
fn default_data_dir() -> Result<PathBuf, ConfigError> {
    let dirs = ProjectDirs::from("lk", "pahana", "bookshop").ok_or(ConfigError::NoDataDir)?;
    Ok(dirs.data_dir().to_path_buf())
}

/// A percentage with at most two decimals is a whole number of basis
/// points: "0.8" is 80 bps.
fn parse_tax_rate(key: &str, value: &str) -> Result<TaxRate, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        key: key.to_string(),
        reason,
    };

    let hundredths = Money::parse_decimal(value).map_err(|e| invalid(e.to_string()))?;
    let bps = u32::try_from(hundredths.cents())
        .map_err(|_| invalid("tax rate must not be negative".to_string()))?;
    validate_tax_rate_bps(bps).map_err(|e| invalid(e.to_string()))?;
    Ok(TaxRate::from_bps(bps))
}

fn amount_or(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Money,
) -> Result<Money, ConfigError> {
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    let invalid = |reason: String| ConfigError::InvalidValue {
        key: key.to_string(),
        reason,
    };

    let amount = Money::parse_decimal(&value).map_err(|e| invalid(e.to_string()))?;
    validate_price_cents(amount.cents()).map_err(|e| invalid(e.to_string()))?;
    Ok(amount)
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Could not determine the app data directory; set PAHANA_DATA_DIR")]
    NoDataDir,
}

// =============================================================================
// Unit Tests
// =============================================================================
