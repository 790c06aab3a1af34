//! # Domain Types
//!
//! Core domain types used throughout Till POS.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Bundle      │   │ BundleComponent │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, sku        │   │  id, name       │   │  product_id     │       │
//! │  │  name, price    │   │  price          │◄──│  quantity       │       │
//! │  │  stock (opt)    │   │  components     │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  DiscountRate   │   │ PaymentMethod   │       │
//! │  │  bps (u32)      │   │  bps, 0..=10000 │   │  Cash / Card /  │       │
//! │  │  1000 = 10%     │   │  clamped        │   │  Qris           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 1000 bps = 10%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for configuration input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round().max(0.0) as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// Whole-transaction percentage discount, in basis points.
///
/// Always within 0%..=100%: every constructor clamps, so an out-of-range
/// value coming from a form can never produce a negative total or a
/// surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Upper bound: 100% in basis points.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a discount from basis points, clamped to 100%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > Self::MAX_BPS {
            DiscountRate(Self::MAX_BPS)
        } else {
            DiscountRate(bps)
        }
    }

    /// Creates a discount from a whole percentage, clamped to [0, 100].
    ///
    /// ```rust
    /// use till_core::types::DiscountRate;
    ///
    /// assert_eq!(DiscountRate::from_percent(10).bps(), 1000);
    /// assert_eq!(DiscountRate::from_percent(-5).bps(), 0);
    /// assert_eq!(DiscountRate::from_percent(150).bps(), 10_000);
    /// ```
    pub fn from_percent(pct: i64) -> Self {
        let clamped = pct.clamp(0, 100) as u32;
        DiscountRate(clamped * 100)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the whole-percent part of the rate.
    #[inline]
    pub const fn percent(&self) -> u32 {
        self.0 / 100
    }

    /// No discount.
    #[inline]
    pub const fn none() -> Self {
        DiscountRate(0)
    }

    /// Checks if no discount applies.
    #[inline]
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::none()
    }
}

// =============================================================================
// Stock Level
// =============================================================================

/// How much of something can be sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    /// Inventory is not tracked; there is no ceiling.
    Untracked,
    /// Units currently on hand.
    Tracked(i64),
}

impl StockLevel {
    /// Returns the ceiling this level imposes, if any. Negative stock counts as zero.
    pub fn ceiling(&self) -> Option<i64> {
        match self {
            StockLevel::Untracked => None,
            StockLevel::Tracked(n) => Some((*n).max(0)),
        }
    }

    /// True when nothing can be sold.
    pub fn is_out_of_stock(&self) -> bool {
        self.ceiling() == Some(0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A unit product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier.
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Unit price in minor units.
    pub price: Money,

    /// Units on hand. `None` means inventory is not tracked.
    #[serde(default)]
    pub stock: Option<i64>,

    /// Optional shelf category ("Minuman", "Makanan", ...).
    #[serde(default)]
    pub category: Option<String>,

    /// Whether product is active (soft delete).
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Creates an active, untracked product.
    pub fn new(id: impl Into<String>, sku: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        Product {
            id: id.into(),
            sku: sku.into(),
            name: name.into(),
            price,
            stock: None,
            category: None,
            active: true,
        }
    }

    /// Sets the tracked stock level.
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Sets the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Returns the stock level.
    pub fn stock_level(&self) -> StockLevel {
        match self.stock {
            Some(n) => StockLevel::Tracked(n),
            None => StockLevel::Untracked,
        }
    }

    /// Checks if `quantity` units can be sold.
    pub fn can_sell(&self, quantity: i64) -> bool {
        match self.stock {
            None => true,
            Some(stock) => stock >= quantity,
        }
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// One constituent of a bundle: `quantity` units of `product_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BundleComponent {
    pub product_id: String,
    pub quantity: i64,
}

/// A composite pseudo-product: a fixed set of unit products sold as one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Bundle {
    /// Unique identifier (must not collide with a product id).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Bundle price in minor units.
    pub price: Money,

    /// Constituent products.
    pub components: Vec<BundleComponent>,
}

impl Bundle {
    /// Creates a bundle with no components.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        Bundle {
            id: id.into(),
            name: name.into(),
            price,
            components: Vec::new(),
        }
    }

    /// Adds a component.
    pub fn with_component(mut self, product_id: impl Into<String>, quantity: i64) -> Self {
        self.components.push(BundleComponent {
            product_id: product_id.into(),
            quantity,
        });
        self
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash; the cashier enters the tendered amount.
    #[default]
    Cash,
    /// Card on an external terminal.
    Card,
    /// QR code e-wallet payment.
    Qris,
}

impl PaymentMethod {
    /// True when the cashier must enter what the customer handed over.
    ///
    /// Card and QR payments always settle the exact total.
    pub fn requires_tender(&self) -> bool {
        matches!(self, PaymentMethod::Cash)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Qris => write!(f, "qris"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" | "tunai" => Ok(PaymentMethod::Cash),
            "card" | "debit" | "credit" => Ok(PaymentMethod::Card),
            "qris" | "qr" | "ewallet" => Ok(PaymentMethod::Qris),
            _ => Err(ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: "must be one of: cash, card, qris".to_string(),
            }),
        }
    }
}
