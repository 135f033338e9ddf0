//! Storefront configuration

use std::{fs, path::Path};

use jiff::tz::Offset;
use rusty_money::{
    Money,
    iso::{BRL, Currency},
};
use serde::Deserialize;
use thiserror::Error;

use crate::pricing::{Price, PriceParseError, parse_currency, parse_price};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the configuration file
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse config YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid currency or delivery fee
    #[error("invalid price: {0}")]
    Price(#[from] PriceParseError),

    /// The delivery fee is not in the configured currency
    #[error("delivery fee is in {found}, but the store uses {expected}")]
    CurrencyMismatch {
        /// Configured currency code
        expected: &'static str,

        /// Delivery fee currency code
        found: &'static str,
    },

    /// The UTC offset is out of range
    #[error("invalid UTC offset: {0}")]
    Offset(#[from] jiff::Error),

    /// A reporting window was set to zero
    #[error("{0} must be at least 1")]
    EmptyWindow(&'static str),
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    store_name: String,
    currency: String,
    delivery_fee: String,
    utc_offset_hours: i8,
    daily_window: usize,
    monthly_window: usize,
    top_items: usize,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            store_name: DEFAULT_STORE_NAME.to_string(),
            currency: "BRL".to_string(),
            delivery_fee: "3.00 BRL".to_string(),
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            daily_window: DEFAULT_DAILY_WINDOW,
            monthly_window: DEFAULT_MONTHLY_WINDOW,
            top_items: DEFAULT_TOP_ITEMS,
        }
    }
}

const DEFAULT_STORE_NAME: &str = "Na Brasa Burguer";
const DEFAULT_DELIVERY_FEE_MINOR: i64 = 3_00;
const DEFAULT_UTC_OFFSET_HOURS: i8 = -3;
const DEFAULT_DAILY_WINDOW: usize = 30;
const DEFAULT_MONTHLY_WINDOW: usize = 12;
const DEFAULT_TOP_ITEMS: usize = 5;

/// Merchant-level settings. None of these are editable by customers.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    store_name: String,
    currency: &'static Currency,
    delivery_fee: Price,
    utc_offset: Offset,
    daily_window: usize,
    monthly_window: usize,
    top_items: usize,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            store_name: DEFAULT_STORE_NAME.to_string(),
            currency: BRL,
            delivery_fee: Money::from_minor(DEFAULT_DELIVERY_FEE_MINOR, BRL),
            utc_offset: Offset::constant(DEFAULT_UTC_OFFSET_HOURS),
            daily_window: DEFAULT_DAILY_WINDOW,
            monthly_window: DEFAULT_MONTHLY_WINDOW,
            top_items: DEFAULT_TOP_ITEMS,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml(&contents)
    }

    /// Parse configuration from YAML. Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, contains unknown keys, or any
    /// value is out of range.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_norway::from_str(yaml)?;

        let currency = parse_currency(&file.currency)?;
        let delivery_fee = parse_price(&file.delivery_fee)?;

        if delivery_fee.currency() != currency {
            return Err(ConfigError::CurrencyMismatch {
                expected: currency.iso_alpha_code,
                found: delivery_fee.currency().iso_alpha_code,
            });
        }

        for (name, value) in [
            ("daily_window", file.daily_window),
            ("monthly_window", file.monthly_window),
            ("top_items", file.top_items),
        ] {
            if value == 0 {
                return Err(ConfigError::EmptyWindow(name));
            }
        }

        Ok(Self {
            store_name: file.store_name,
            currency,
            delivery_fee,
            utc_offset: Offset::from_hours(file.utc_offset_hours)?,
            daily_window: file.daily_window,
            monthly_window: file.monthly_window,
            top_items: file.top_items,
        })
    }

    /// Restaurant name shown in order messages.
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Currency the store prices in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Fixed fee added to delivery orders.
    pub fn delivery_fee(&self) -> Price {
        self.delivery_fee
    }

    /// Offset used to turn order timestamps into calendar dates.
    pub fn utc_offset(&self) -> Offset {
        self.utc_offset
    }

    /// Number of days in the daily revenue series.
    pub fn daily_window(&self) -> usize {
        self.daily_window
    }

    /// Number of months in the monthly revenue series.
    pub fn monthly_window(&self) -> usize {
        self.monthly_window
    }

    /// Number of best sellers reported.
    pub fn top_items(&self) -> usize {
        self.top_items
    }
}
