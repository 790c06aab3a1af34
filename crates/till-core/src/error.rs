//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  till-checkout errors (separate crate)                                 │
//! │  ├── ConfigError      - Config / catalog file problems                 │
//! │  └── ServiceError     - What the front end sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → Front end          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ledger mutations never produce an error: out-of-range input is clamped or
//! ignored there. Errors only come from catalog, cashier and checkout
//! operations.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found (or is inactive).
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Bundle cannot be found.
    #[error("Bundle not found: {0}")]
    BundleNotFound(String),

    /// Not enough stock to sell the requested quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout (2 × "Paket Sarapan" = 2 × [roti ×1, kopi ×1])
    ///      │
    ///      ▼
    /// Stock check: kopi available=1, needed=2
    ///      │
    ///      ▼
    /// InsufficientStock { sku: "KOPI-01", available: 1, requested: 2 }
    /// ```
    #[error("Insufficient stock for {sku}: available {available}, requested {requested}")]
    InsufficientStock {
        sku: String,
        available: i64,
        requested: i64,
    },

    /// Checkout attempted with nothing in the ledger.
    #[error("Cart is empty")]
    EmptyCart,

    /// Checkout attempted before the customer has paid the full total.
    #[error("Payment incomplete: total {total}, tendered {tendered}")]
    PaymentIncomplete { total: Money, tendered: Money },

    /// Cashier id is unknown.
    #[error("Cashier not found: {0}")]
    CashierNotFound(String),

    /// Cashier exists but has been deactivated.
    #[error("Cashier {0} is inactive")]
    CashierInactive(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate SKU).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
