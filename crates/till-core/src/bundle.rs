//! # Bundle Resolution
//!
//! A bundle is sold as a single opaque line, but it is backed by real unit
//! products. How many bundles can be sold is limited by the scarcest
//! component:
//!
//! ```text
//! availability = min over components of floor(component_stock / component_qty)
//!
//! Paket Sarapan = roti ×1 + kopi ×2
//!   roti stock 7  → 7 / 1 = 7
//!   kopi stock 5  → 5 / 2 = 2
//!   availability  = 2
//! ```
//!
//! Untracked components never constrain. A missing component or an empty
//! component list means the bundle cannot be sold.

use std::collections::BTreeMap;

use crate::types::{Bundle, StockLevel};

/// Read access to product stock.
///
/// Implemented by [`crate::inventory::Inventory`]; tests use a plain map.
pub trait StockLookup {
    /// Stock level of a product, or `None` if the product is unknown.
    fn stock_level(&self, product_id: &str) -> Option<StockLevel>;
}

impl StockLookup for BTreeMap<String, i64> {
    fn stock_level(&self, product_id: &str) -> Option<StockLevel> {
        self.get(product_id).map(|n| StockLevel::Tracked(*n))
    }
}

/// How many of `bundle` can be sold with the current stock.
pub fn availability(bundle: &Bundle, stock: &impl StockLookup) -> StockLevel {
    if bundle.components.is_empty() {
        return StockLevel::Tracked(0);
    }

    let mut limit: Option<i64> = None;
    for component in &bundle.components {
        if component.quantity <= 0 {
            return StockLevel::Tracked(0);
        }

        let feasible = match stock.stock_level(&component.product_id) {
            None => 0,
            Some(StockLevel::Untracked) => continue,
            Some(StockLevel::Tracked(n)) => n.max(0) / component.quantity,
        };
        limit = Some(limit.map_or(feasible, |l| l.min(feasible)));
    }

    match limit {
        Some(n) => StockLevel::Tracked(n),
        None => StockLevel::Untracked,
    }
}

/// Units of each product consumed by selling `bundle_qty` bundles.
///
/// Components naming the same product are merged.
pub fn component_demand(bundle: &Bundle, bundle_qty: i64) -> BTreeMap<String, i64> {
    let mut demand = BTreeMap::new();
    for component in &bundle.components {
        *demand.entry(component.product_id.clone()).or_insert(0) += component.quantity * bundle_qty;
    }
    demand
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn sarapan() -> Bundle {
        Bundle::new("paket", "Paket Sarapan", Money::from_minor(30_000))
            .with_component("roti", 1)
            .with_component("kopi", 2)
    }

    fn stock(entries: &[(&str, i64)]) -> BTreeMap<String, i64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_availability_is_scarcest_component() {
        let levels = stock(&[("roti", 7), ("kopi", 5)]);
        assert_eq!(availability(&sarapan(), &levels), StockLevel::Tracked(2));
    }

    #[test]
    fn test_availability_floors() {
        let levels = stock(&[("roti", 7), ("kopi", 1)]);
        assert_eq!(availability(&sarapan(), &levels), StockLevel::Tracked(0));
    }

    #[test]
    fn test_missing_component_blocks_bundle() {
        let levels = stock(&[("roti", 7)]);
        assert_eq!(availability(&sarapan(), &levels), StockLevel::Tracked(0));
    }

    #[test]
    fn test_empty_bundle_is_unavailable() {
        let empty = Bundle::new("kosong", "Kosong", Money::zero());
        assert_eq!(availability(&empty, &stock(&[])), StockLevel::Tracked(0));
    }

    #[test]
    fn test_negative_stock_counts_as_zero() {
        let levels = stock(&[("roti", -3), ("kopi", 10)]);
        assert_eq!(availability(&sarapan(), &levels), StockLevel::Tracked(0));
    }

    struct AllUntracked;

    impl StockLookup for AllUntracked {
        fn stock_level(&self, _product_id: &str) -> Option<StockLevel> {
            Some(StockLevel::Untracked)
        }
    }

    #[test]
    fn test_untracked_components_do_not_constrain() {
        assert_eq!(availability(&sarapan(), &AllUntracked), StockLevel::Untracked);
    }

    #[test]
    fn test_component_demand_merges_duplicates() {
        let bundle = sarapan().with_component("roti", 1);
        let demand = component_demand(&bundle, 3);
        assert_eq!(demand.get("roti"), Some(&6));
        assert_eq!(demand.get("kopi"), Some(&6));
    }
}
