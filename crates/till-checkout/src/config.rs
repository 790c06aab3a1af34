//! # Store Configuration
//!
//! Settings that shape every transaction: tax policy, currency display,
//! quantity limits and receipt layout.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TILL_STORE_NAME="Warung Maju"                                      │
//! │     TILL_TAX_RATE=11                                                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/till-pos/till.toml (Linux)                               │
//! │     ~/Library/Application Support/com.till.pos/till.toml (macOS)       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Rupiah, 10% tax, 999 per line, 32-column paper                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Warung Maju"
//! address = ["Jl. Merdeka 1", "Bandung"]
//! footer = "Terima kasih!"
//!
//! [currency]
//! symbol = "Rp"
//! decimals = 0
//! thousands_separator = "."
//!
//! [checkout]
//! tax_rate_bps = 1000        # 10%
//! max_item_quantity = 999
//! low_stock_threshold = 5
//!
//! [receipt]
//! paper_width = 32
//! phone_country_code = "62"
//!
//! [catalog]
//! path = "catalog.toml"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use till_core::money::CurrencyFormat;
use till_core::receipt::ReceiptHeader;
use till_core::validation::validate_tax_rate_bps;
use till_core::{CoreError, Money, TaxRate, DEFAULT_LOW_STOCK_THRESHOLD, MAX_ITEM_QUANTITY};

// =============================================================================
// Config Error
// =============================================================================

/// Errors while loading configuration or catalog files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid TOML for the expected shape.
    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be written as TOML.
    #[error("Could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is present but unacceptable.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Catalog entries were rejected by the inventory.
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CoreError),

    /// No platform config directory could be determined.
    #[error("No config path available")]
    NoConfigPath,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// Store identity printed on receipts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreInfo {
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default)]
    pub address: Vec<String>,

    #[serde(default)]
    pub footer: Option<String>,
}

fn default_store_name() -> String {
    "Till POS Store".to_string()
}

impl Default for StoreInfo {
    fn default() -> Self {
        StoreInfo {
            name: default_store_name(),
            address: Vec::new(),
            footer: Some("Thank you!".to_string()),
        }
    }
}

/// How amounts are displayed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySettings {
    #[serde(default = "default_currency_symbol")]
    pub symbol: String,

    /// Decimal places in the minor unit (0 for IDR, 2 for USD).
    #[serde(default)]
    pub decimals: u8,

    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: Option<char>,
}

fn default_currency_symbol() -> String {
    "Rp".to_string()
}

fn default_thousands_separator() -> Option<char> {
    Some('.')
}

impl Default for CurrencySettings {
    fn default() -> Self {
        CurrencySettings {
            symbol: default_currency_symbol(),
            decimals: 0,
            thousands_separator: default_thousands_separator(),
        }
    }
}

/// Transaction rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// Tax rate in basis points, applied after the discount.
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    /// Ceiling for lines whose stock is not tracked.
    #[serde(default = "default_max_item_quantity")]
    pub max_item_quantity: i64,

    /// Tracked products at or below this level are reported as low.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
}

fn default_tax_rate_bps() -> u32 {
    1000
}

fn default_max_item_quantity() -> i64 {
    MAX_ITEM_QUANTITY
}

fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            tax_rate_bps: default_tax_rate_bps(),
            max_item_quantity: default_max_item_quantity(),
            low_stock_threshold: default_low_stock_threshold(),
        }
    }
}

/// Receipt printing and sharing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptSettings {
    /// Paper width in characters (typically 32, 42, or 48).
    #[serde(default = "default_paper_width")]
    pub paper_width: usize,

    /// Replaces the leading 0 of local phone numbers in share links.
    #[serde(default = "default_country_code")]
    pub phone_country_code: String,
}

fn default_paper_width() -> usize {
    32
}

fn default_country_code() -> String {
    "62".to_string()
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        ReceiptSettings {
            paper_width: default_paper_width(),
            phone_country_code: default_country_code(),
        }
    }
}

/// Where the product catalog lives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Relative paths resolve against the working directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Store Config
// =============================================================================

/// Complete store configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub store: StoreInfo,

    #[serde(default)]
    pub currency: CurrencySettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,

    #[serde(default)]
    pub receipt: ReceiptSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl StoreConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the platform config dir)
    /// 3. `TILL_*` environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading store config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document. Missing sections and fields take defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Store config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(ConfigError::Invalid("store name must not be empty".into()));
        }

        if self.currency.decimals > 4 {
            return Err(ConfigError::Invalid(format!(
                "currency decimals must be at most 4, got {}",
                self.currency.decimals
            )));
        }

        validate_tax_rate_bps(self.checkout.tax_rate_bps)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if self.checkout.max_item_quantity < 1 {
            return Err(ConfigError::Invalid(
                "max_item_quantity must be at least 1".into(),
            ));
        }

        if self.checkout.low_stock_threshold < 0 {
            return Err(ConfigError::Invalid(
                "low_stock_threshold must not be negative".into(),
            ));
        }

        if !(24..=80).contains(&self.receipt.paper_width) {
            return Err(ConfigError::Invalid(format!(
                "paper_width must be between 24 and 80, got {}",
                self.receipt.paper_width
            )));
        }

        let code = &self.receipt.phone_country_code;
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::Invalid(format!(
                "phone_country_code must be digits only, got '{}'",
                code
            )));
        }

        Ok(())
    }

    /// Applies `TILL_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    ///
    /// ## Keys
    /// - `TILL_STORE_NAME`
    /// - `TILL_TAX_RATE` (percent, e.g. "11" or "8.25")
    /// - `TILL_CURRENCY_SYMBOL`, `TILL_CURRENCY_DECIMALS`
    /// - `TILL_MAX_ITEM_QUANTITY`, `TILL_LOW_STOCK_THRESHOLD`
    /// - `TILL_PAPER_WIDTH`, `TILL_PHONE_COUNTRY_CODE`
    /// - `TILL_CATALOG`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(name) = lookup("TILL_STORE_NAME") {
            debug!(store_name = %name, "Overriding store name from environment");
            self.store.name = name;
        }

        if let Some(rate) = lookup("TILL_TAX_RATE") {
            match rate.trim().parse::<f64>() {
                Ok(pct) => {
                    self.checkout.tax_rate_bps = TaxRate::from_percentage(pct).bps();
                    debug!(bps = self.checkout.tax_rate_bps, "Overriding tax rate from environment");
                }
                Err(_) => warn!(rate = %rate, "Ignoring unparseable TILL_TAX_RATE"),
            }
        }

        if let Some(symbol) = lookup("TILL_CURRENCY_SYMBOL") {
            self.currency.symbol = symbol;
        }

        if let Some(decimals) = lookup("TILL_CURRENCY_DECIMALS") {
            if let Ok(d) = decimals.trim().parse::<u8>() {
                self.currency.decimals = d;
            }
        }

        if let Some(max) = lookup("TILL_MAX_ITEM_QUANTITY") {
            if let Ok(m) = max.trim().parse::<i64>() {
                self.checkout.max_item_quantity = m;
            }
        }

        if let Some(threshold) = lookup("TILL_LOW_STOCK_THRESHOLD") {
            if let Ok(t) = threshold.trim().parse::<i64>() {
                self.checkout.low_stock_threshold = t;
            }
        }

        if let Some(width) = lookup("TILL_PAPER_WIDTH") {
            if let Ok(w) = width.trim().parse::<usize>() {
                self.receipt.paper_width = w;
            }
        }

        if let Some(code) = lookup("TILL_PHONE_COUNTRY_CODE") {
            self.receipt.phone_country_code = code.trim().to_string();
        }

        if let Some(path) = lookup("TILL_CATALOG") {
            debug!(catalog = %path, "Overriding catalog path from environment");
            self.catalog.path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "till", "pos")
            .map(|dirs| dirs.config_dir().join("till.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The store's tax policy.
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.checkout.tax_rate_bps)
    }

    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat {
            symbol: self.currency.symbol.clone(),
            decimals: self.currency.decimals,
            thousands_separator: self.currency.thousands_separator,
        }
    }

    /// Formats an amount as a currency string.
    ///
    /// ```rust
    /// use till_checkout::config::StoreConfig;
    /// use till_core::Money;
    ///
    /// let config = StoreConfig::default();
    /// assert_eq!(config.format_currency(Money::from_minor(99_900)), "Rp99.900");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        self.currency_format().format(amount)
    }

    /// Header for printed and shared receipts.
    pub fn receipt_header(&self) -> ReceiptHeader {
        ReceiptHeader {
            store_name: self.store.name.clone(),
            address: self.store.address.clone(),
            footer: self.store.footer.clone(),
            currency: self.currency_format(),
        }
    }

    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tax_rate().bps(), 1000);
        assert_eq!(config.checkout.max_item_quantity, 999);
        assert_eq!(config.receipt.paper_width, 32);
    }

    #[test]
    fn test_partial_toml_takes_defaults() {
        let config = StoreConfig::from_toml_str(
            r#"
            [store]
            name = "Warung Maju"

            [checkout]
            tax_rate_bps = 1100
            "#,
        )
        .unwrap();

        assert_eq!(config.store.name, "Warung Maju");
        assert_eq!(config.tax_rate().bps(), 1100);
        assert_eq!(config.checkout.low_stock_threshold, 5);
        assert_eq!(config.currency.symbol, "Rp");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TILL_STORE_NAME", "Toko Baru"),
            ("TILL_TAX_RATE", "11"),
            ("TILL_PAPER_WIDTH", "48"),
            ("TILL_CATALOG", "/tmp/catalog.toml"),
        ]
        .into_iter()
        .collect();

        let mut config = StoreConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.store.name, "Toko Baru");
        assert_eq!(config.checkout.tax_rate_bps, 1100);
        assert_eq!(config.receipt.paper_width, 48);
        assert_eq!(config.catalog_path(), Some(Path::new("/tmp/catalog.toml")));
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = StoreConfig::default();
        config.apply_overrides(|key| match key {
            "TILL_TAX_RATE" => Some("ten".to_string()),
            "TILL_PAPER_WIDTH" => Some("wide".to_string()),
            _ => None,
        });
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_validation() {
        let mut config = StoreConfig::default();
        config.checkout.tax_rate_bps = 12_000;
        assert!(config.validate().is_err());

        let mut config = StoreConfig::default();
        config.receipt.paper_width = 10;
        assert!(config.validate().is_err());

        let mut config = StoreConfig::default();
        config.receipt.phone_country_code = "+62".to_string();
        assert!(config.validate().is_err());

        let mut config = StoreConfig::default();
        config.store.name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_format_currency() {
        let mut config = StoreConfig::default();
        assert_eq!(config.format_currency(Money::from_minor(111_000)), "Rp111.000");

        config.currency = CurrencySettings {
            symbol: "$".to_string(),
            decimals: 2,
            thousands_separator: None,
        };
        assert_eq!(config.format_currency(Money::from_minor(1234)), "$12.34");
        assert_eq!(config.format_currency(Money::from_minor(-1234)), "-$12.34");
    }

    #[test]
    fn test_toml_round_trip_sections() {
        let config = StoreConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("[checkout]"));

        let parsed = StoreConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_save_then_load() {
        let dir = std::env::temp_dir().join(format!("till-pos-save-{}", std::process::id()));
        let path = dir.join("nested").join("till.toml");

        let mut config = StoreConfig::default();
        config.store.name = "Warung Sari".into();
        config.checkout.tax_rate_bps = 1100;

        assert_eq!(config.save(Some(path.clone())).unwrap(), path);
        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded = StoreConfig::from_toml_str(&contents).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join("till-pos-missing-config.toml");
        let config = StoreConfig::load(Some(path)).unwrap();
        assert_eq!(config.store.name, StoreConfig::default().store.name);
    }
}
