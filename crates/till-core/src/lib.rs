//! # till-core: Pure Business Logic for Till POS
//!
//! This crate is the **heart** of Till POS. It contains the transaction
//! engine (cart ledger, totals, bundles, receipts) and the bookkeeping the
//! back-office screens rely on (stock, cashiers, sales reports), all as pure
//! code with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Till POS Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Front end (apps/register)                       │   │
//! │  │    Catalog ──► Cart ──► Tender ──► Receipt / Share              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 till-checkout (CheckoutService)                 │   │
//! │  │    add_to_cart, set_discount, checkout, dashboard, etc.         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌───────────────────┐ │   │
//! │  │   │  ledger  │ │  totals  │ │  bundle  │ │     session       │ │   │
//! │  │   │ LineItem │ │  Totals  │ │ StockLvl │ │ CheckoutSession   │ │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └───────────────────┘ │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌───────────────────┐ │   │
//! │  │   │ receipt  │ │inventory │ │ cashier  │ │ report / share    │ │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └───────────────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO CLOCK                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Domain types (Product, Bundle, rates, payment methods)
//! - [`ledger`] - The cart ledger of the active transaction
//! - [`totals`] - Subtotal / discount / tax / total derivation
//! - [`bundle`] - Bundle availability from component stock
//! - [`session`] - Ledger + payment state for one transaction
//! - [`receipt`] - Immutable receipt snapshot and text rendering
//! - [`inventory`] - In-memory product / bundle catalog with stock
//! - [`cashier`] - Cashier profiles
//! - [`report`] - Dashboard and analytics metrics over receipts
//! - [`share`] - Messaging deep links for receipts
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::ledger::LineItem;
//! use till_core::money::Money;
//! use till_core::session::CheckoutSession;
//! use till_core::types::TaxRate;
//!
//! let mut session = CheckoutSession::new(TaxRate::zero());
//! session.add(LineItem::new("kopi", "Kopi Susu", Money::from_minor(18_000)));
//! session.add(LineItem::new("kopi", "Kopi Susu", Money::from_minor(18_000)));
//! session.set_discount_percent(10);
//!
//! assert_eq!(session.totals().total.minor(), 32_400);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bundle;
pub mod cashier;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod money;
pub mod receipt;
pub mod report;
pub mod session;
pub mod share;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default maximum quantity of a single line in the ledger.
///
/// ## Business Reason
/// Used when a line carries no stock ceiling of its own. Prevents accidental
/// over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest price a catalog entry may carry, in minor units.
pub const MAX_PRICE: i64 = 1_000_000_000_000;

/// Highest stock count a product may hold.
pub const MAX_STOCK: i64 = 1_000_000_000;

/// Stock level at or below which a tracked product is reported as low.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;
