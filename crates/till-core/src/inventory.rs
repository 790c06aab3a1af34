//! # Inventory
//!
//! In-memory catalog of products and bundles with their stock.
//!
//! ## Stock Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  restock / adjust_stock ──► products[id].stock                          │
//! │                                   │                                     │
//! │          ┌────────────────────────┼──────────────────────┐              │
//! │          ▼                        ▼                      ▼              │
//! │  line_for_product()      bundle_availability()     low_stock()          │
//! │  (ceiling = stock)       (min floor(stock/qty))    (≤ threshold)        │
//! │                                                                         │
//! │  commit_sale(receipt lines)                                             │
//! │    1. expand bundles into component demand                              │
//! │    2. check every product has enough                                    │
//! │    3. only then deduct, all at once                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products and bundles share one id space, so a ledger line id always names
//! exactly one of them.

use std::collections::BTreeMap;

use crate::bundle::{self, StockLookup};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::ledger::{LineItem, LineKind};
use crate::money::Money;
use crate::receipt::ReceiptLine;
use crate::types::{Bundle, Product, StockLevel};
use crate::validation::{
    validate_name, validate_price, validate_quantity, validate_search_query, validate_sku,
    validate_stock,
};

/// Products and bundles on sale in the store.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    products: BTreeMap<String, Product>,
    bundles: BTreeMap<String, Bundle>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an inventory from catalog entries. Products are loaded first so
    /// bundles can reference them.
    pub fn from_catalog(products: Vec<Product>, bundles: Vec<Bundle>) -> CoreResult<Self> {
        let mut inventory = Inventory::new();
        for product in products {
            inventory.add_product(product)?;
        }
        for bundle in bundles {
            inventory.add_bundle(bundle)?;
        }
        Ok(inventory)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Adds a product after validating it.
    pub fn add_product(&mut self, product: Product) -> CoreResult<()> {
        validate_sku(&product.sku)?;
        validate_name("name", &product.name)?;
        validate_price(product.price)?;
        if let Some(stock) = product.stock {
            validate_stock(stock)?;
        }
        self.ensure_free_id(&product.id)?;

        if self.products.values().any(|p| p.sku == product.sku) {
            return Err(ValidationError::Duplicate {
                field: "sku".to_string(),
                value: product.sku,
            }
            .into());
        }

        self.products.insert(product.id.clone(), product);
        Ok(())
    }

    /// Adds a bundle. Every component must name a known product.
    pub fn add_bundle(&mut self, bundle: Bundle) -> CoreResult<()> {
        validate_name("name", &bundle.name)?;
        validate_price(bundle.price)?;
        self.ensure_free_id(&bundle.id)?;

        if bundle.components.is_empty() {
            return Err(ValidationError::Required {
                field: "components".to_string(),
            }
            .into());
        }
        for component in &bundle.components {
            validate_quantity(component.quantity)?;
            if !self.products.contains_key(&component.product_id) {
                return Err(CoreError::ProductNotFound(component.product_id.clone()));
            }
        }

        self.bundles.insert(bundle.id.clone(), bundle);
        Ok(())
    }

    fn ensure_free_id(&self, id: &str) -> CoreResult<()> {
        if id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "id".to_string(),
            }
            .into());
        }
        if self.products.contains_key(id) || self.bundles.contains_key(id) {
            return Err(ValidationError::Duplicate {
                field: "id".to_string(),
                value: id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Looks up a product, active or not.
    pub fn product(&self, id: &str) -> CoreResult<&Product> {
        self.products
            .get(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    fn product_mut(&mut self, id: &str) -> CoreResult<&mut Product> {
        self.products
            .get_mut(id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))
    }

    pub fn bundle(&self, id: &str) -> CoreResult<&Bundle> {
        self.bundles
            .get(id)
            .ok_or_else(|| CoreError::BundleNotFound(id.to_string()))
    }

    /// All products ordered by id.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// All bundles ordered by id.
    pub fn bundles(&self) -> impl Iterator<Item = &Bundle> {
        self.bundles.values()
    }

    /// Changes a product's price. Lines already in a cart keep their price.
    pub fn set_price(&mut self, id: &str, price: Money) -> CoreResult<()> {
        validate_price(price)?;
        self.product_mut(id)?.price = price;
        Ok(())
    }

    /// Takes a product off sale. It stays in the catalog for reports.
    pub fn deactivate_product(&mut self, id: &str) -> CoreResult<()> {
        self.product_mut(id)?.active = false;
        Ok(())
    }

    /// Active products whose name or SKU contains `query`, case-insensitively.
    /// A blank query lists every active product.
    pub fn search(&self, query: &str) -> CoreResult<Vec<&Product>> {
        let needle = validate_search_query(query)?.to_lowercase();
        Ok(self
            .products
            .values()
            .filter(|p| p.active)
            .filter(|p| {
                p.name.to_lowercase().contains(&needle) || p.sku.to_lowercase().contains(&needle)
            })
            .collect())
    }

    // =========================================================================
    // Stock
    // =========================================================================

    /// Receives `qty` units. An untracked product starts being tracked.
    ///
    /// Returns the new stock level.
    pub fn restock(&mut self, id: &str, qty: i64) -> CoreResult<i64> {
        validate_quantity(qty)?;
        let product = self.product_mut(id)?;
        let stock = product.stock.unwrap_or(0).max(0) + qty;
        validate_stock(stock)?;
        product.stock = Some(stock);
        Ok(stock)
    }

    /// Corrects a tracked stock count by `delta` (stock-take, breakage).
    ///
    /// Returns the new stock level.
    pub fn adjust_stock(&mut self, id: &str, delta: i64) -> CoreResult<i64> {
        let product = self.product_mut(id)?;
        let Some(current) = product.stock else {
            return Err(ValidationError::InvalidFormat {
                field: "stock".to_string(),
                reason: format!("{} is not stock-tracked", product.sku),
            }
            .into());
        };

        let stock = current.saturating_add(delta);
        if stock < 0 {
            return Err(CoreError::InsufficientStock {
                sku: product.sku.clone(),
                available: current,
                requested: delta.saturating_neg(),
            });
        }
        validate_stock(stock)?;
        product.stock = Some(stock);
        Ok(stock)
    }

    /// Tracked, active products at or below `threshold`, scarcest first.
    pub fn low_stock(&self, threshold: i64) -> Vec<&Product> {
        let mut low: Vec<&Product> = self
            .products
            .values()
            .filter(|p| p.active)
            .filter(|p| matches!(p.stock, Some(n) if n <= threshold))
            .collect();
        low.sort_by_key(|p| (p.stock.unwrap_or(0), p.name.clone()));
        low
    }

    /// How many of a bundle can be sold right now.
    pub fn bundle_availability(&self, id: &str) -> CoreResult<StockLevel> {
        Ok(bundle::availability(self.bundle(id)?, self))
    }

    // =========================================================================
    // Ledger Lines
    // =========================================================================

    /// Builds a ledger line for an active product, capped at its stock.
    pub fn line_for_product(&self, id: &str) -> CoreResult<LineItem> {
        let product = self.product(id)?;
        if !product.active {
            return Err(CoreError::ProductNotFound(id.to_string()));
        }
        Ok(LineItem::from_product(product))
    }

    /// Builds a ledger line for a bundle, capped at its availability.
    pub fn line_for_bundle(&self, id: &str) -> CoreResult<LineItem> {
        let bundle = self.bundle(id)?;
        Ok(LineItem::from_bundle(bundle, bundle::availability(bundle, self)))
    }

    /// Builds a line for whichever product or bundle has this id.
    pub fn line_for(&self, id: &str) -> CoreResult<LineItem> {
        if self.bundles.contains_key(id) {
            self.line_for_bundle(id)
        } else {
            self.line_for_product(id)
        }
    }

    /// Builds a line whose ceiling leaves room for the other lines of `cart`.
    ///
    /// A unit line and a bundle line can draw on the same product; the
    /// ceiling counts only the stock the rest of the cart does not already
    /// need. Lines for unknown items are ignored.
    pub fn line_for_cart(&self, id: &str, cart: &[LineItem]) -> CoreResult<LineItem> {
        let held = self.cart_demand(cart.iter().filter(|line| line.id != id));
        let remaining = Remaining {
            inventory: self,
            held: &held,
        };

        if let Some(bundle) = self.bundles.get(id) {
            return Ok(LineItem::from_bundle(
                bundle,
                bundle::availability(bundle, &remaining),
            ));
        }

        let line = self.line_for_product(id)?;
        Ok(match remaining.stock_level(id).and_then(|level| level.ceiling()) {
            Some(max) => line.with_max_quantity(max),
            None => line,
        })
    }

    fn cart_demand<'a>(&self, lines: impl Iterator<Item = &'a LineItem>) -> BTreeMap<String, i64> {
        let mut demand: BTreeMap<String, i64> = BTreeMap::new();
        for line in lines {
            match line.kind {
                LineKind::Unit => {
                    *demand.entry(line.id.clone()).or_insert(0) += line.quantity;
                }
                LineKind::Bundle => {
                    let Some(bundle) = self.bundles.get(&line.id) else {
                        continue;
                    };
                    for (product_id, qty) in bundle::component_demand(bundle, line.quantity) {
                        *demand.entry(product_id).or_insert(0) += qty;
                    }
                }
            }
        }
        demand
    }

    // =========================================================================
    // Sale
    // =========================================================================

    /// Units of each product a set of sold lines consumes.
    pub fn stock_demand(&self, lines: &[ReceiptLine]) -> CoreResult<BTreeMap<String, i64>> {
        let mut demand: BTreeMap<String, i64> = BTreeMap::new();
        for line in lines {
            match line.kind {
                LineKind::Unit => {
                    self.product(&line.item_id)?;
                    *demand.entry(line.item_id.clone()).or_insert(0) += line.quantity;
                }
                LineKind::Bundle => {
                    let bundle = self.bundle(&line.item_id)?;
                    for (product_id, qty) in bundle::component_demand(bundle, line.quantity) {
                        *demand.entry(product_id).or_insert(0) += qty;
                    }
                }
            }
        }
        Ok(demand)
    }

    /// Fails with [`CoreError::InsufficientStock`] if any tracked product
    /// cannot cover what `lines` consume.
    pub fn check_sale(&self, lines: &[ReceiptLine]) -> CoreResult<()> {
        for (product_id, requested) in self.stock_demand(lines)? {
            let product = self.product(&product_id)?;
            if !product.can_sell(requested) {
                return Err(CoreError::InsufficientStock {
                    sku: product.sku.clone(),
                    available: product.stock.unwrap_or(0),
                    requested,
                });
            }
        }
        Ok(())
    }

    /// Deducts stock for a completed sale. Either every deduction happens or
    /// none does.
    pub fn commit_sale(&mut self, lines: &[ReceiptLine]) -> CoreResult<()> {
        self.check_sale(lines)?;
        for (product_id, qty) in self.stock_demand(lines)? {
            let product = self.product_mut(&product_id)?;
            if let Some(stock) = product.stock.as_mut() {
                *stock -= qty;
            }
        }
        Ok(())
    }
}

/// Stock left over once part of it is held by other cart lines.
struct Remaining<'a> {
    inventory: &'a Inventory,
    held: &'a BTreeMap<String, i64>,
}

impl StockLookup for Remaining<'_> {
    fn stock_level(&self, product_id: &str) -> Option<StockLevel> {
        let level = self.inventory.stock_level(product_id)?;
        let held = self.held.get(product_id).copied().unwrap_or(0);
        Some(match level {
            StockLevel::Tracked(n) => StockLevel::Tracked(n.saturating_sub(held).max(0)),
            StockLevel::Untracked => StockLevel::Untracked,
        })
    }
}

impl StockLookup for Inventory {
    fn stock_level(&self, product_id: &str) -> Option<StockLevel> {
        self.products
            .get(product_id)
            .filter(|p| p.active)
            .map(Product::stock_level)
    }
}
