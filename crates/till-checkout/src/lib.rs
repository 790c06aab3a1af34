//! # till-checkout: Checkout Service for Till POS
//!
//! Stateful register backend: holds the active checkout session, stock,
//! cashiers and completed receipts, and exposes them as plain method calls
//! returning `Result<T, ServiceError>`.
//!
//! ## Module Organization
//! ```text
//! till_checkout/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── service.rs      ◄─── CheckoutService: cart, payment, checkout, reports
//! ├── state.rs        ◄─── Shared<T>: Arc<Mutex<T>> with poison handling
//! ├── journal.rs      ◄─── Completed receipts and receipt numbering
//! ├── config.rs       ◄─── StoreConfig (TOML + TILL_* env)
//! ├── catalog.rs      ◄─── Product / bundle catalog file
//! └── error.rs        ◄─── ServiceError { code, message }
//! ```
//!
//! ## Example
//! ```rust
//! use till_checkout::{Catalog, CheckoutService, StoreConfig};
//! use till_core::cashier::CashierRole;
//! use till_core::PaymentMethod;
//!
//! let catalog = Catalog::from_toml_str(r#"
//!     [[products]]
//!     id = "kopi"
//!     sku = "KOPI-01"
//!     name = "Kopi Susu"
//!     price = 18000
//! "#).unwrap();
//!
//! let service = CheckoutService::new(StoreConfig::default(), catalog.into_inventory().unwrap());
//! let sari = service.register_cashier("Sari", None, CashierRole::Cashier).unwrap();
//!
//! service.add_to_cart("kopi").unwrap();
//! service.set_payment_method(PaymentMethod::Qris).unwrap();
//! let receipt = service.checkout(&sari.id).unwrap();
//!
//! // 18.000 + 10% tax
//! assert_eq!(receipt.total().minor(), 19_800);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod journal;
pub mod service;
pub mod state;

pub use catalog::Catalog;
pub use config::{ConfigError, StoreConfig};
pub use error::{ErrorCode, ServiceError, ServiceResult};
pub use journal::ReceiptJournal;
pub use service::{CartView, CheckoutService, PaymentView, StockView};
