//! # Service Error Type
//!
//! Unified error type for checkout service operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Front end                     Checkout Service                         │
//! │  ─────────                     ────────────────                         │
//! │                                                                         │
//! │  service.checkout(cashier)                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Result<Receipt, ServiceError>                                   │  │
//! │  │         │                                                        │  │
//! │  │  Cart empty? ────── CoreError::EmptyCart ─────────┐             │  │
//! │  │         │                                          │             │  │
//! │  │  Underpaid? ─────── CoreError::PaymentIncomplete ──┼─► Service   │  │
//! │  │         │                                          │   Error ───►│  │
//! │  │  Out of stock? ──── CoreError::InsufficientStock ──┘             │  │
//! │  │         │                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  match err.code {                                                       │
//! │    ErrorCode::PaymentError => show_tender_screen(err.message),          │
//! │    ErrorCode::InsufficientStock => show_stock_warning(err.message),     │
//! │    ...                                                                  │
//! │  }                                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! Errors serialize with a machine-readable `code` and a human-readable
//! `message`, so any front end (terminal, web view, IPC) can present them.

use serde::Serialize;
use till_core::CoreError;

use crate::config::ConfigError;

/// Error returned from checkout service operations.
///
/// ```json
/// {
///   "code": "PAYMENT_ERROR",
///   "message": "Payment incomplete: Rp49.900 still owed"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for service responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Product, bundle, cashier or receipt not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Business rule rejected the operation
    BusinessLogic,

    /// Internal failure (poisoned lock, serialization)
    Internal,

    /// Cart operation failed
    CartError,

    /// Insufficient stock
    InsufficientStock,

    /// Payment incomplete
    PaymentError,

    /// Configuration or catalog could not be loaded
    ConfigError,
}

impl ServiceError {
    /// Creates a new service error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ServiceError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ServiceError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::Internal, message)
    }

    /// Creates a cart error.
    pub fn cart(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::CartError, message)
    }
}

/// Converts core errors to service errors.
impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ServiceError::not_found("Product", &id),
            CoreError::BundleNotFound(id) => ServiceError::not_found("Bundle", &id),
            CoreError::CashierNotFound(id) => ServiceError::not_found("Cashier", &id),
            CoreError::InsufficientStock {
                sku,
                available,
                requested,
            } => ServiceError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    sku, available, requested
                ),
            ),
            CoreError::EmptyCart => ServiceError::cart("Cart is empty"),
            CoreError::PaymentIncomplete { total, tendered } => ServiceError::new(
                ErrorCode::PaymentError,
                format!(
                    "Payment incomplete: {} still owed",
                    (total - tendered).minor()
                ),
            ),
            CoreError::CashierInactive(name) => ServiceError::new(
                ErrorCode::BusinessLogic,
                format!("Cashier {} is inactive", name),
            ),
            CoreError::Validation(e) => ServiceError::validation(e.to_string()),
        }
    }
}

/// Converts configuration errors to service errors.
impl From<ConfigError> for ServiceError {
    fn from(err: ConfigError) -> Self {
        tracing::error!("Configuration error: {}", err);
        ServiceError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Serialization failed: {}", err);
        ServiceError::internal("Serialization failed")
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ServiceError {}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
