//! # Catalog File
//!
//! Products and bundles loaded from TOML at startup.
//!
//! ```toml
//! [[products]]
//! id = "kopi"
//! sku = "KOPI-01"
//! name = "Kopi Susu"
//! price = 18000
//! stock = 24
//! category = "Minuman"
//!
//! [[bundles]]
//! id = "paket-sarapan"
//! name = "Paket Sarapan"
//! price = 30000
//! components = [
//!     { product_id = "roti", quantity = 1 },
//!     { product_id = "kopi", quantity = 1 },
//! ]
//! ```
//!
//! Prices are in minor units. Omitting `stock` means the product is not
//! stock-tracked.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use till_core::inventory::Inventory;
use till_core::{Bundle, Product};

use crate::config::ConfigResult;

/// Raw catalog contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub products: Vec<Product>,

    #[serde(default)]
    pub bundles: Vec<Bundle>,
}

impl Catalog {
    /// Reads and parses a catalog file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&contents)?;
        info!(
            ?path,
            products = catalog.products.len(),
            bundles = catalog.bundles.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates every entry and builds the inventory.
    pub fn into_inventory(self) -> ConfigResult<Inventory> {
        Ok(Inventory::from_catalog(self.products, self.bundles)?)
    }
}
