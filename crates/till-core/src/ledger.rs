//! # Cart Ledger
//!
//! The working list of line items for the active transaction.
//!
//! ## Ledger Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ledger Operations                                    │
//! │                                                                         │
//! │  Cashier Action          Ledger Call              Effect                │
//! │  ──────────────          ───────────              ──────                │
//! │                                                                         │
//! │  Tap product ───────────► add(item) ────────────► insert qty 1, or     │
//! │                                                   +1 up to ceiling      │
//! │                                                                         │
//! │  Type quantity ─────────► update_quantity(id,n) ─► n ≤ 0: remove        │
//! │                                                   else clamp [1, max]   │
//! │                                                                         │
//! │  Tap remove ────────────► remove(id) ───────────► delete (no-op if     │
//! │                                                   absent)               │
//! │                                                                         │
//! │  Cancel sale ───────────► clear() ──────────────► empty                 │
//! │                                                                         │
//! │  NOTE: none of these return an error. Bad input is clamped or ignored. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by `id`
//! - Every present item has `1 <= quantity <= ceiling`
//! - Insertion order is preserved

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Bundle, Product, StockLevel};
use crate::MAX_ITEM_QUANTITY;

// =============================================================================
// Line Item
// =============================================================================

/// Whether a line is a unit product or an opaque bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    #[default]
    Unit,
    Bundle,
}

/// A line in the ledger.
///
/// ## Price Freezing
/// `unit_price` and `name` are captured when the line is built. Changing the
/// catalog afterwards does not change what is already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product or bundle id.
    pub id: String,

    /// Display name at time of adding (frozen).
    pub name: String,

    /// Unit price at time of adding (frozen).
    pub unit_price: Money,

    /// Quantity in the ledger.
    pub quantity: i64,

    /// Unit product or bundle.
    pub kind: LineKind,

    /// Stock ceiling. `None` falls back to the ledger's default maximum.
    pub max_quantity: Option<i64>,
}

impl LineItem {
    /// Creates a unit line with quantity 1 and no ceiling of its own.
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit_price: Money) -> Self {
        LineItem {
            id: id.into(),
            name: name.into(),
            unit_price,
            quantity: 1,
            kind: LineKind::Unit,
            max_quantity: None,
        }
    }

    /// Sets a stock ceiling.
    pub fn with_max_quantity(mut self, max: i64) -> Self {
        self.max_quantity = Some(max.max(0));
        self
    }

    /// Marks the line as a bundle.
    pub fn as_bundle(mut self) -> Self {
        self.kind = LineKind::Bundle;
        self
    }

    /// Builds a line from a catalog product, using its stock as the ceiling.
    pub fn from_product(product: &Product) -> Self {
        let line = LineItem::new(product.id.clone(), product.name.clone(), product.price);
        with_level(line, product.stock_level())
    }

    /// Builds a bundle line; `availability` comes from [`crate::bundle::availability`].
    pub fn from_bundle(bundle: &Bundle, availability: StockLevel) -> Self {
        let line = LineItem::new(bundle.id.clone(), bundle.name.clone(), bundle.price).as_bundle();
        with_level(line, availability)
    }

    /// Line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// True for bundle lines.
    pub fn is_bundle(&self) -> bool {
        self.kind == LineKind::Bundle
    }

    /// True when the stock ceiling is zero.
    pub fn is_out_of_stock(&self) -> bool {
        self.max_quantity == Some(0)
    }

    /// The highest quantity this line may hold: its stock ceiling, never
    /// above the store maximum.
    pub fn ceiling(&self, default_max: i64) -> i64 {
        self.max_quantity.map_or(default_max, |max| max.min(default_max))
    }
}

fn with_level(line: LineItem, level: StockLevel) -> LineItem {
    match level.ceiling() {
        Some(max) => line.with_max_quantity(max),
        None => line,
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// What [`Ledger::add`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// New line inserted with quantity 1.
    Inserted,
    /// Existing line went up by one.
    Incremented { quantity: i64 },
    /// Existing line is already at its ceiling; nothing changed.
    AtLimit { quantity: i64 },
    /// Stock ceiling is zero; nothing changed.
    OutOfStock,
}

/// What [`Ledger::update_quantity`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Quantity set as requested.
    Set { quantity: i64 },
    /// Requested quantity was above the ceiling and was clamped.
    Clamped { requested: i64, applied: i64 },
    /// Requested quantity was ≤ 0, so the line was removed.
    Removed,
    /// No line with that id.
    Missing,
}

// =============================================================================
// Ledger
// =============================================================================

/// Ordered collection of line items, unique by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    items: Vec<LineItem>,
    default_max: i64,
}

impl Default for Ledger {
    fn default() -> Self {
        Ledger::new()
    }
}

impl Ledger {
    /// Creates an empty ledger with the crate default ceiling ([`MAX_ITEM_QUANTITY`]).
    pub fn new() -> Self {
        Ledger::with_default_max(MAX_ITEM_QUANTITY)
    }

    /// Creates an empty ledger whose lines without a stock ceiling stop at `default_max`.
    pub fn with_default_max(default_max: i64) -> Self {
        Ledger {
            items: Vec::new(),
            default_max: default_max.max(1),
        }
    }

    /// Adds one unit of `item`.
    ///
    /// - Id already present: quantity +1, bounded by the ceiling. The stored
    ///   ceiling is refreshed from `item`, so a restock between taps counts
    ///   and a line above a lowered ceiling is brought down to it.
    /// - Otherwise: inserted with quantity 1.
    /// - Ceiling of zero: nothing happens.
    ///
    /// ```rust
    /// use till_core::ledger::{AddOutcome, Ledger, LineItem};
    /// use till_core::money::Money;
    ///
    /// let mut ledger = Ledger::new();
    /// let teh = LineItem::new("teh", "Es Teh", Money::from_minor(5_000)).with_max_quantity(2);
    ///
    /// assert_eq!(ledger.add(teh.clone()), AddOutcome::Inserted);
    /// assert_eq!(ledger.add(teh.clone()), AddOutcome::Incremented { quantity: 2 });
    /// assert_eq!(ledger.add(teh), AddOutcome::AtLimit { quantity: 2 });
    /// assert_eq!(ledger.len(), 1);
    /// ```
    pub fn add(&mut self, item: LineItem) -> AddOutcome {
        if item.is_out_of_stock() {
            return AddOutcome::OutOfStock;
        }

        let ceiling = item.ceiling(self.default_max);
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.max_quantity = item.max_quantity;
            if existing.quantity >= ceiling {
                existing.quantity = ceiling.max(1);
                return AddOutcome::AtLimit {
                    quantity: existing.quantity,
                };
            }
            existing.quantity += 1;
            return AddOutcome::Incremented {
                quantity: existing.quantity,
            };
        }

        self.items.push(LineItem { quantity: 1, ..item });
        AddOutcome::Inserted
    }

    /// Sets the quantity of a line.
    ///
    /// `qty <= 0` removes the line; anything else is clamped to `[1, ceiling]`.
    pub fn update_quantity(&mut self, id: &str, qty: i64) -> UpdateOutcome {
        if qty <= 0 {
            return if self.remove(id) {
                UpdateOutcome::Removed
            } else {
                UpdateOutcome::Missing
            };
        }

        let default_max = self.default_max;
        let Some(item) = self.items.iter_mut().find(|i| i.id == id) else {
            return UpdateOutcome::Missing;
        };

        let ceiling = item.ceiling(default_max).max(1);
        let applied = qty.min(ceiling);
        item.quantity = applied;

        if applied == qty {
            UpdateOutcome::Set { quantity: applied }
        } else {
            UpdateOutcome::Clamped {
                requested: qty,
                applied,
            }
        }
    }

    /// Replaces a line's stock ceiling without touching its quantity.
    /// Returns whether the line exists.
    pub fn set_max_quantity(&mut self, id: &str, max: Option<i64>) -> bool {
        match self.items.iter_mut().find(|i| i.id == id) {
            Some(item) => {
                item.max_quantity = max.map(|m| m.max(0));
                true
            }
            None => false,
        }
    }

    /// Removes a line. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != initial_len
    }

    /// Empties the ledger.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Lines in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Looks up a line by id.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there are no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Σ unit_price × quantity.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// The ceiling used for lines without a stock ceiling.
    pub fn default_max(&self) -> i64 {
        self.default_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nasi() -> LineItem {
        LineItem::new("nasi", "Nasi Goreng", Money::from_minor(75_000))
    }

    fn kopi() -> LineItem {
        LineItem::new("kopi", "Kopi Susu", Money::from_minor(18_000))
    }

    #[test]
    fn test_subtotal_example() {
        let mut ledger = Ledger::new();
        ledger.add(nasi());
        ledger.add(kopi());
        ledger.add(kopi());

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.subtotal().minor(), 111_000);
        assert_eq!(ledger.total_quantity(), 3);
    }

    #[test]
    fn test_subtotal_independent_of_insertion_order() {
        let mut a = Ledger::new();
        a.add(nasi());
        a.add(kopi());
        a.update_quantity("kopi", 2);

        let mut b = Ledger::new();
        b.add(kopi());
        b.add(kopi());
        b.add(nasi());

        assert_eq!(a.subtotal(), b.subtotal());
        assert_eq!(a.items()[0].id, "nasi");
        assert_eq!(b.items()[0].id, "kopi");
    }

    #[test]
    fn test_add_existing_never_duplicates() {
        let mut ledger = Ledger::new();
        for _ in 0..5 {
            ledger.add(kopi());
        }
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.get("kopi").map(|i| i.quantity), Some(5));
    }

    #[test]
    fn test_add_caps_at_default_max() {
        let mut ledger = Ledger::with_default_max(3);
        for _ in 0..10 {
            ledger.add(kopi());
        }
        assert_eq!(ledger.get("kopi").map(|i| i.quantity), Some(3));
        assert_eq!(ledger.add(kopi()), AddOutcome::AtLimit { quantity: 3 });
    }

    #[test]
    fn test_add_out_of_stock_is_ignored() {
        let mut ledger = Ledger::new();
        let outcome = ledger.add(kopi().with_max_quantity(0));
        assert_eq!(outcome, AddOutcome::OutOfStock);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_add_refreshes_ceiling() {
        let mut ledger = Ledger::new();
        ledger.add(kopi().with_max_quantity(1));
        assert_eq!(
            ledger.add(kopi().with_max_quantity(1)),
            AddOutcome::AtLimit { quantity: 1 }
        );

        // Restocked between taps
        assert_eq!(
            ledger.add(kopi().with_max_quantity(5)),
            AddOutcome::Incremented { quantity: 2 }
        );
    }

    #[test]
    fn test_add_lowered_ceiling_clamps_quantity() {
        let mut ledger = Ledger::new();
        for _ in 0..5 {
            ledger.add(kopi().with_max_quantity(5));
        }
        assert_eq!(ledger.get("kopi").map(|i| i.quantity), Some(5));

        // Stock sold elsewhere between taps
        assert_eq!(
            ledger.add(kopi().with_max_quantity(2)),
            AddOutcome::AtLimit { quantity: 2 }
        );
        let line = ledger.get("kopi").unwrap();
        assert_eq!(line.quantity, 2);
        assert!(line.quantity <= line.ceiling(ledger.default_max()));
    }

    #[test]
    fn test_stock_ceiling_never_exceeds_store_max() {
        let gold = Product::new("gold", "GOLD-01", "Emas", Money::from_minor(20_000))
            .with_stock(1_000_000_000_000_000);
        let mut ledger = Ledger::with_default_max(999);
        ledger.add(LineItem::from_product(&gold));

        assert_eq!(
            ledger.update_quantity("gold", 1_000_000_000_000_000),
            UpdateOutcome::Clamped {
                requested: 1_000_000_000_000_000,
                applied: 999
            }
        );
        assert_eq!(ledger.subtotal().minor(), 20_000 * 999);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut ledger = Ledger::new();
        ledger.add(nasi());
        ledger.add(kopi());

        let before = ledger.len();
        assert_eq!(ledger.update_quantity("kopi", 0), UpdateOutcome::Removed);
        assert_eq!(ledger.len(), before - 1);
        assert!(ledger.get("kopi").is_none());
    }

    #[test]
    fn test_update_quantity_negative_removes() {
        let mut ledger = Ledger::new();
        ledger.add(kopi());
        assert_eq!(ledger.update_quantity("kopi", -3), UpdateOutcome::Removed);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_update_quantity_clamps_to_ceiling() {
        let mut ledger = Ledger::new();
        ledger.add(kopi().with_max_quantity(4));

        assert_eq!(
            ledger.update_quantity("kopi", 10),
            UpdateOutcome::Clamped {
                requested: 10,
                applied: 4
            }
        );
        assert_eq!(ledger.update_quantity("kopi", 2), UpdateOutcome::Set { quantity: 2 });
        assert_eq!(ledger.get("kopi").map(|i| i.quantity), Some(2));
    }

    #[test]
    fn test_set_max_quantity_then_update_clamps() {
        let mut ledger = Ledger::new();
        ledger.add(kopi().with_max_quantity(5));
        ledger.update_quantity("kopi", 4);

        assert!(ledger.set_max_quantity("kopi", Some(2)));
        assert_eq!(ledger.get("kopi").map(|i| i.quantity), Some(4));
        assert_eq!(
            ledger.update_quantity("kopi", 4),
            UpdateOutcome::Clamped {
                requested: 4,
                applied: 2
            }
        );
        assert!(!ledger.set_max_quantity("teh", None));
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut ledger = Ledger::new();
        ledger.add(kopi());
        assert_eq!(ledger.update_quantity("teh", 2), UpdateOutcome::Missing);
        assert_eq!(ledger.update_quantity("teh", 0), UpdateOutcome::Missing);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut ledger = Ledger::new();
        ledger.add(kopi());
        assert!(!ledger.remove("teh"));
        assert!(ledger.remove("kopi"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut ledger = Ledger::new();
        ledger.add(nasi());
        ledger.add(kopi());
        ledger.clear();
        assert!(ledger.is_empty());
        assert!(ledger.subtotal().is_zero());
    }

    #[test]
    fn test_from_product_uses_stock_as_ceiling() {
        let product = Product::new("kopi", "KOPI-01", "Kopi Susu", Money::from_minor(18_000)).with_stock(2);
        let line = LineItem::from_product(&product);
        assert_eq!(line.max_quantity, Some(2));
        assert_eq!(line.kind, LineKind::Unit);

        let untracked = Product::new("air", "AIR-01", "Air Mineral", Money::from_minor(4_000));
        assert_eq!(LineItem::from_product(&untracked).max_quantity, None);
    }

    #[test]
    fn test_from_bundle_is_opaque_line() {
        let bundle = Bundle::new("paket", "Paket Sarapan", Money::from_minor(30_000))
            .with_component("roti", 1)
            .with_component("kopi", 1);
        let line = LineItem::from_bundle(&bundle, StockLevel::Tracked(3));

        assert!(line.is_bundle());
        assert_eq!(line.max_quantity, Some(3));
        assert_eq!(line.unit_price.minor(), 30_000);
    }
}
