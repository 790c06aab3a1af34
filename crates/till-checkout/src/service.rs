//! # Checkout Service
//!
//! The operations a register front end calls. Owns the active checkout
//! session, the inventory, the cashier registry and the receipt journal.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  checkout(cashier_id)                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. cashiers.require_active(id) ────────────► CashierRef                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  2. lock session                                                        │
//! │     ├── session.prepare_receipt() ──────────► EmptyCart?                │
//! │     │                                        PaymentIncomplete?         │
//! │     ├── inventory.commit_sale(lines) ───────► InsufficientStock?        │
//! │     │        (all-or-nothing)                                           │
//! │     ├── journal.append(receipt)                                         │
//! │     └── session.clear()                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Receipt                                                                │
//! │                                                                         │
//! │  Any failure leaves the cart, payment and stock exactly as they were.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use till_core::cashier::{Cashier, CashierRegistry, CashierRole};
use till_core::inventory::Inventory;
use till_core::ledger::{AddOutcome, LineItem, UpdateOutcome};
use till_core::receipt::{self, Receipt};
use till_core::report::{self, CashierSales, DailyRevenue, SalesSummary};
use till_core::session::CheckoutSession;
use till_core::share;
use till_core::totals::{PaymentStatus, Totals};
use till_core::validation::validate_tender;
use till_core::{Money, PaymentMethod, Product};

use crate::config::StoreConfig;
use crate::error::{ErrorCode, ServiceError, ServiceResult};
use crate::journal::ReceiptJournal;
use crate::state::Shared;

// =============================================================================
// Views
// =============================================================================

/// Payment side of the tender screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub method: PaymentMethod,
    pub discount_percent: u32,
    pub tendered: Money,
    pub amount_paid: Money,
    /// Negative while money is still owed.
    pub change: Money,
    pub status: PaymentStatus,
}

/// Cart response including items, totals and payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<LineItem>,
    pub totals: Totals,
    pub payment: PaymentView,
}

impl From<&CheckoutSession> for CartView {
    fn from(session: &CheckoutSession) -> Self {
        let totals = session.totals();
        let payment = session.payment();
        CartView {
            items: session.ledger().items().to_vec(),
            totals,
            payment: PaymentView {
                method: payment.method,
                discount_percent: payment.discount.percent(),
                tendered: payment.tendered,
                amount_paid: payment.amount_paid(totals.total),
                change: payment.change(totals.total),
                status: payment.status(totals.total),
            },
        }
    }
}

/// A product with what can currently be sold of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockView {
    pub id: String,
    pub sku: String,
    pub name: String,
    /// `None` when stock is not tracked.
    pub stock: Option<i64>,
}

impl From<&Product> for StockView {
    fn from(product: &Product) -> Self {
        StockView {
            id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            stock: product.stock,
        }
    }
}

// =============================================================================
// Service
// =============================================================================

/// Register backend. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    config: StoreConfig,
    session: Shared<CheckoutSession>,
    journal: Shared<ReceiptJournal>,
    inventory: Shared<Inventory>,
    cashiers: Shared<CashierRegistry>,
}

impl CheckoutService {
    /// Creates a service with an empty session and journal.
    pub fn new(config: StoreConfig, inventory: Inventory) -> Self {
        let session = CheckoutSession::with_max_quantity(
            config.tax_rate(),
            config.checkout.max_item_quantity,
        );
        info!(
            store = %config.store.name,
            tax_bps = config.checkout.tax_rate_bps,
            "Checkout service ready"
        );

        CheckoutService {
            config,
            session: Shared::new(session),
            journal: Shared::new(ReceiptJournal::new()),
            inventory: Shared::new(inventory),
            cashiers: Shared::new(CashierRegistry::new()),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Writes the running configuration to `path` (or the platform config
    /// file) so the next start picks it up. Returns where it was written.
    pub fn save_config(&self, path: Option<PathBuf>) -> ServiceResult<PathBuf> {
        debug!(?path, "save_config");
        Ok(self.config.save(path)?)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Gets the current cart contents.
    pub fn cart(&self) -> ServiceResult<CartView> {
        debug!("cart");
        self.session.with(|session| CartView::from(session))
    }

    /// Adds one unit of a product or bundle.
    ///
    /// ## Behavior
    /// - Price and name are frozen at this moment
    /// - Already in cart: quantity +1, capped at stock (or the store maximum)
    /// - Stock already needed by other lines, such as a bundle's components,
    ///   is not available to this one
    /// - Out of stock: rejected with `INSUFFICIENT_STOCK`
    pub fn add_to_cart(&self, item_id: &str) -> ServiceResult<CartView> {
        debug!(item_id = %item_id, "add_to_cart");

        self.session.with_mut(|session| -> ServiceResult<CartView> {
            let line = self
                .inventory
                .with(|inv| inv.line_for_cart(item_id, session.ledger().items()))??;
            if line.is_out_of_stock() {
                warn!(item_id = %item_id, "Rejected add: out of stock");
                return Err(ServiceError::new(
                    ErrorCode::InsufficientStock,
                    format!("{} is out of stock", line.name),
                ));
            }

            match session.add(line) {
                AddOutcome::AtLimit { quantity } => {
                    warn!(item_id = %item_id, quantity, "Line already at its limit");
                }
                outcome => debug!(item_id = %item_id, ?outcome, "Line added"),
            }
            Ok(CartView::from(&*session))
        })?
    }

    /// Sets the quantity of a cart line.
    ///
    /// ## Behavior
    /// - Quantity ≤ 0: removes the line
    /// - Quantity above the line's limit: clamped, where the limit leaves
    ///   room for stock the rest of the cart already needs
    /// - Unknown line: no change
    pub fn update_quantity(&self, item_id: &str, quantity: i64) -> ServiceResult<CartView> {
        debug!(item_id = %item_id, quantity, "update_quantity");

        self.session.with_mut(|session| -> ServiceResult<CartView> {
            let fresh = self
                .inventory
                .with(|inv| inv.line_for_cart(item_id, session.ledger().items()))?;
            if let Ok(line) = fresh {
                session.set_max_quantity(item_id, line.max_quantity);
            }

            match session.update_quantity(item_id, quantity) {
                UpdateOutcome::Clamped { requested, applied } => {
                    warn!(item_id = %item_id, requested, applied, "Quantity clamped");
                }
                UpdateOutcome::Missing => debug!(item_id = %item_id, "Line not in cart"),
                _ => {}
            }
            Ok(CartView::from(&*session))
        })?
    }

    /// Removes a line. Removing an absent line is not an error.
    pub fn remove_from_cart(&self, item_id: &str) -> ServiceResult<CartView> {
        debug!(item_id = %item_id, "remove_from_cart");
        self.session.with_mut(|session| {
            session.remove(item_id);
            CartView::from(&*session)
        })
    }

    /// Abandons the current transaction.
    pub fn clear_cart(&self) -> ServiceResult<CartView> {
        debug!("clear_cart");
        self.session.with_mut(|session| {
            session.clear();
            CartView::from(&*session)
        })
    }

    // =========================================================================
    // Payment
    // =========================================================================

    /// Sets the whole-transaction discount. Values outside 0..=100 are clamped.
    pub fn set_discount(&self, percent: i64) -> ServiceResult<CartView> {
        debug!(percent, "set_discount");
        self.session.with_mut(|session| {
            let applied = session.set_discount_percent(percent);
            if i64::from(applied.percent()) != percent {
                warn!(requested = percent, applied = applied.percent(), "Discount clamped");
            }
            CartView::from(&*session)
        })
    }

    pub fn set_payment_method(&self, method: PaymentMethod) -> ServiceResult<CartView> {
        debug!(%method, "set_payment_method");
        self.session.with_mut(|session| {
            session.set_payment_method(method);
            CartView::from(&*session)
        })
    }

    /// Records the cash handed over by the customer.
    pub fn set_tendered(&self, amount: Money) -> ServiceResult<CartView> {
        debug!(amount = amount.minor(), "set_tendered");
        validate_tender(amount).map_err(|e| ServiceError::validation(e.to_string()))?;

        self.session.with_mut(|session| {
            session.set_tendered(amount);
            CartView::from(&*session)
        })
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Completes the sale: stock is deducted, the receipt is journaled and a
    /// fresh cart starts.
    pub fn checkout(&self, cashier_id: &str) -> ServiceResult<Receipt> {
        debug!(cashier_id = %cashier_id, "checkout");

        let cashier = self.cashiers.with(|c| c.require_active(cashier_id))??;
        let now = Utc::now();

        let receipt = self.session.with_mut(|session| -> ServiceResult<Receipt> {
            let number = self.journal.with(|j| j.next_receipt_number(now))?;
            let receipt = session.prepare_receipt(cashier, number, now)?;

            self.inventory
                .with_mut(|inv| inv.commit_sale(receipt.items()))??;
            self.journal.with_mut(|j| j.append(receipt.clone()))?;

            session.clear();
            Ok(receipt)
        })?;

        let receipt = receipt.map_err(|e| {
            warn!(code = ?e.code, message = %e.message, "Checkout rejected");
            e
        })?;

        info!(
            receipt_number = %receipt.receipt_number(),
            total = receipt.total().minor(),
            method = %receipt.payment_method(),
            cashier = %receipt.cashier().name,
            "Sale completed"
        );
        Ok(receipt)
    }

    // =========================================================================
    // Receipts
    // =========================================================================

    pub fn receipt(&self, receipt_number: &str) -> ServiceResult<Receipt> {
        self.journal
            .with(|j| j.find(receipt_number).cloned())?
            .ok_or_else(|| ServiceError::not_found("Receipt", receipt_number))
    }

    pub fn last_receipt(&self) -> ServiceResult<Receipt> {
        self.journal
            .with(|j| j.last().cloned())?
            .ok_or_else(|| ServiceError::not_found("Receipt", "latest"))
    }

    pub fn receipts(&self) -> ServiceResult<Vec<Receipt>> {
        self.journal.with(|j| j.receipts().to_vec())
    }

    /// Printable text of a receipt at the configured paper width.
    pub fn receipt_text(&self, receipt_number: &str) -> ServiceResult<String> {
        let receipt = self.receipt(receipt_number)?;
        Ok(receipt::render_text(
            &receipt,
            &self.config.receipt_header(),
            self.config.receipt.paper_width,
        ))
    }

    /// WhatsApp link that sends a receipt to `phone`.
    pub fn share_receipt(&self, receipt_number: &str, phone: &str) -> ServiceResult<String> {
        debug!(receipt_number = %receipt_number, "share_receipt");
        let receipt = self.receipt(receipt_number)?;
        let message = share::receipt_message(&receipt, &self.config.receipt_header());
        let link = share::whatsapp_link(phone, &self.config.receipt.phone_country_code, &message)?;
        Ok(link.into())
    }

    /// All receipts as JSON (end-of-day export).
    pub fn export_journal(&self) -> ServiceResult<String> {
        Ok(self.journal.with(|j| j.export_json())??)
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    pub fn search_products(&self, query: &str) -> ServiceResult<Vec<Product>> {
        debug!(query = %query, "search_products");
        let found: Vec<Product> = self
            .inventory
            .with(|inv| inv.search(query).map(|ps| ps.into_iter().cloned().collect()))??;
        Ok(found)
    }

    pub fn product(&self, id: &str) -> ServiceResult<Product> {
        Ok(self.inventory.with(|inv| inv.product(id).cloned())??)
    }

    /// How many of a bundle can be sold; `None` when no component is tracked.
    pub fn bundle_availability(&self, id: &str) -> ServiceResult<Option<i64>> {
        let level = self.inventory.with(|inv| inv.bundle_availability(id))??;
        Ok(level.ceiling())
    }

    /// Receives stock. Returns the new level.
    pub fn restock(&self, id: &str, quantity: i64) -> ServiceResult<i64> {
        let stock = self.inventory.with_mut(|inv| inv.restock(id, quantity))??;
        info!(product_id = %id, quantity, stock, "Restocked");
        Ok(stock)
    }

    /// Corrects a stock count. Returns the new level.
    pub fn adjust_stock(&self, id: &str, delta: i64) -> ServiceResult<i64> {
        let stock = self.inventory.with_mut(|inv| inv.adjust_stock(id, delta))??;
        info!(product_id = %id, delta, stock, "Stock adjusted");
        Ok(stock)
    }

    pub fn set_price(&self, id: &str, price: Money) -> ServiceResult<()> {
        self.inventory.with_mut(|inv| inv.set_price(id, price))??;
        info!(product_id = %id, price = price.minor(), "Price changed");
        Ok(())
    }

    /// Products at or below the configured low-stock threshold.
    pub fn low_stock(&self) -> ServiceResult<Vec<StockView>> {
        let threshold = self.config.checkout.low_stock_threshold;
        self.inventory.with(|inv| {
            inv.low_stock(threshold)
                .into_iter()
                .map(StockView::from)
                .collect()
        })
    }

    // =========================================================================
    // Cashiers
    // =========================================================================

    pub fn register_cashier(
        &self,
        name: &str,
        phone: Option<&str>,
        role: CashierRole,
    ) -> ServiceResult<Cashier> {
        let cashier = self
            .cashiers
            .with_mut(|c| c.register(name, phone, role).cloned())??;
        info!(cashier_id = %cashier.id, name = %cashier.name, "Cashier registered");
        Ok(cashier)
    }

    pub fn update_cashier(&self, id: &str, name: &str, phone: Option<&str>) -> ServiceResult<Cashier> {
        Ok(self
            .cashiers
            .with_mut(|c| c.update_profile(id, name, phone).cloned())??)
    }

    pub fn deactivate_cashier(&self, id: &str) -> ServiceResult<()> {
        self.cashiers.with_mut(|c| c.deactivate(id))??;
        info!(cashier_id = %id, "Cashier deactivated");
        Ok(())
    }

    /// Finds an active cashier by name.
    pub fn find_cashier(&self, name: &str) -> ServiceResult<Cashier> {
        self.cashiers
            .with(|c| c.find_by_name(name).cloned())?
            .ok_or_else(|| ServiceError::not_found("Cashier", name))
    }

    pub fn cashiers(&self) -> ServiceResult<Vec<Cashier>> {
        self.cashiers.with(|c| c.active().cloned().collect())
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Sales summary over every journaled receipt.
    pub fn dashboard(&self, top_n: usize) -> ServiceResult<SalesSummary> {
        self.journal
            .with(|j| SalesSummary::from_receipts(j.receipts(), top_n))
    }

    /// Sales summary for one day (UTC).
    pub fn day_summary(&self, date: NaiveDate, top_n: usize) -> ServiceResult<SalesSummary> {
        self.journal.with(|j| {
            let day: Vec<Receipt> = report::receipts_on(j.receipts(), date)
                .into_iter()
                .cloned()
                .collect();
            SalesSummary::from_receipts(&day, top_n)
        })
    }

    pub fn daily_revenue(&self) -> ServiceResult<Vec<DailyRevenue>> {
        self.journal.with(|j| report::daily_revenue(j.receipts()))
    }

    pub fn sales_by_cashier(&self) -> ServiceResult<Vec<CashierSales>> {
        self.journal.with(|j| report::sales_by_cashier(j.receipts()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    const CATALOG: &str = r#"
        [[products]]
        id = "nasi"
        sku = "NASI-01"
        name = "Nasi Goreng"
        price = 75000

        [[products]]
        id = "kopi"
        sku = "KOPI-01"
        name = "Kopi Susu"
        price = 18000
        stock = 5

        [[products]]
        id = "roti"
        sku = "ROTI-01"
        name = "Roti Bakar"
        price = 15000
        stock = 7

        [[products]]
        id = "susu"
        sku = "SUSU-01"
        name = "Susu Murni"
        price = 9000
        stock = 0

        [[bundles]]
        id = "paket"
        name = "Paket Sarapan"
        price = 30000
        components = [
            { product_id = "roti", quantity = 1 },
            { product_id = "kopi", quantity = 2 },
        ]
    "#;

    fn service() -> (CheckoutService, String) {
        let mut config = StoreConfig::default();
        config.checkout.tax_rate_bps = 0;
        let inventory = Catalog::from_toml_str(CATALOG)
            .unwrap()
            .into_inventory()
            .unwrap();

        let service = CheckoutService::new(config, inventory);
        let cashier = service
            .register_cashier("Sari", None, CashierRole::Cashier)
            .unwrap();
        (service, cashier.id)
    }

    #[test]
    fn test_spec_example_totals() {
        let (service, _) = service();
        service.add_to_cart("nasi").unwrap();
        service.add_to_cart("kopi").unwrap();
        let cart = service.add_to_cart("kopi").unwrap();
        assert_eq!(cart.totals.subtotal.minor(), 111_000);

        let cart = service.set_discount(10).unwrap();
        assert_eq!(cart.totals.total.minor(), 99_900);

        let cart = service.set_tendered(Money::from_minor(100_000)).unwrap();
        assert_eq!(cart.payment.change.minor(), 100);
        assert!(cart.payment.status.is_settled());
    }

    #[test]
    fn test_add_respects_stock() {
        let (service, _) = service();
        for _ in 0..10 {
            service.add_to_cart("kopi").unwrap();
        }
        let cart = service.cart().unwrap();
        assert_eq!(cart.items[0].quantity, 5);

        let err = service.add_to_cart("susu").unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let err = service.add_to_cart("ghost").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_bundle_and_unit_lines_share_stock() {
        let (service, cashier) = service();
        // kopi stock 5; each paket takes 2
        service.add_to_cart("paket").unwrap();
        service.add_to_cart("paket").unwrap();
        service.add_to_cart("kopi").unwrap();
        let cart = service.add_to_cart("kopi").unwrap();
        assert_eq!(cart.items[1].quantity, 1);

        let cart = service.update_quantity("kopi", 5).unwrap();
        assert_eq!(cart.items[1].quantity, 1);
        let cart = service.add_to_cart("paket").unwrap();
        assert_eq!(cart.items[0].quantity, 2);

        service.set_payment_method(PaymentMethod::Card).unwrap();
        service.checkout(&cashier).unwrap();
        assert_eq!(service.product("kopi").unwrap().stock, Some(0));
        assert_eq!(service.product("roti").unwrap().stock, Some(5));
    }

    #[test]
    fn test_bundle_rejected_when_units_hold_its_stock() {
        let (service, _) = service();
        service.add_to_cart("kopi").unwrap();
        service.update_quantity("kopi", 4).unwrap();

        let err = service.add_to_cart("paket").unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let cart = service.update_quantity("kopi", 3).unwrap();
        assert_eq!(cart.items.len(), 1);
        let cart = service.add_to_cart("paket").unwrap();
        assert_eq!(cart.items[1].quantity, 1);
        let cart = service.update_quantity("paket", 2).unwrap();
        assert_eq!(cart.items[1].quantity, 1);
    }

    #[test]
    fn test_update_and_remove() {
        let (service, _) = service();
        service.add_to_cart("kopi").unwrap();
        service.add_to_cart("nasi").unwrap();

        let cart = service.update_quantity("kopi", 50).unwrap();
        assert_eq!(cart.items[0].quantity, 5);

        let cart = service.update_quantity("kopi", 0).unwrap();
        assert_eq!(cart.items.len(), 1);

        let cart = service.remove_from_cart("nasi").unwrap();
        assert!(cart.items.is_empty());
        assert!(service.remove_from_cart("nasi").is_ok());
    }

    #[test]
    fn test_clear_resets_payment() {
        let (service, _) = service();
        service.add_to_cart("nasi").unwrap();
        service.set_discount(20).unwrap();
        service.set_tendered(Money::from_minor(10_000)).unwrap();

        let cart = service.clear_cart().unwrap();
        assert!(cart.items.is_empty());
        assert_eq!(cart.payment.discount_percent, 0);
        assert!(cart.payment.tendered.is_zero());
    }

    #[test]
    fn test_negative_tender_rejected() {
        let (service, _) = service();
        let err = service.set_tendered(Money::from_minor(-1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_checkout_deducts_stock_and_journals() {
        let (service, cashier) = service();
        service.add_to_cart("paket").unwrap();
        service.add_to_cart("kopi").unwrap();
        service.set_payment_method(PaymentMethod::Qris).unwrap();

        let receipt = service.checkout(&cashier).unwrap();
        assert_eq!(receipt.total().minor(), 48_000);
        assert_eq!(receipt.cashier().name, "Sari");
        assert!(receipt.receipt_number().ends_with("-0001"));

        // paket = roti 1 + kopi 2, plus one kopi
        assert_eq!(service.product("roti").unwrap().stock, Some(6));
        assert_eq!(service.product("kopi").unwrap().stock, Some(2));
        assert_eq!(service.bundle_availability("paket").unwrap(), Some(1));

        assert!(service.cart().unwrap().items.is_empty());
        assert_eq!(service.last_receipt().unwrap(), receipt);
        assert_eq!(service.receipts().unwrap().len(), 1);
    }

    #[test]
    fn test_checkout_failures_keep_cart() {
        let (service, cashier) = service();

        let err = service.checkout(&cashier).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);

        service.add_to_cart("nasi").unwrap();
        service.set_tendered(Money::from_minor(50_000)).unwrap();
        let err = service.checkout(&cashier).unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);
        assert_eq!(service.cart().unwrap().items.len(), 1);

        let err = service.checkout("nobody").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        let err = service
            .checkout("550e8400-e29b-41d4-a716-446655440000")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(service.receipts().unwrap().is_empty());
    }

    #[test]
    fn test_checkout_stock_race_is_all_or_nothing() {
        let (service, cashier) = service();
        service.add_to_cart("paket").unwrap();
        service.add_to_cart("roti").unwrap();
        service.set_payment_method(PaymentMethod::Card).unwrap();

        // Stock counted down after the lines were added
        service.adjust_stock("kopi", -4).unwrap();

        let err = service.checkout(&cashier).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(service.product("roti").unwrap().stock, Some(7));
        assert_eq!(service.cart().unwrap().items.len(), 2);
    }

    #[test]
    fn test_inactive_cashier_cannot_checkout() {
        let (service, cashier) = service();
        service.add_to_cart("nasi").unwrap();
        service.set_payment_method(PaymentMethod::Card).unwrap();
        service.deactivate_cashier(&cashier).unwrap();

        let err = service.checkout(&cashier).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
    }

    #[test]
    fn test_receipt_text_and_share() {
        let (service, cashier) = service();
        service.add_to_cart("nasi").unwrap();
        service.set_tendered(Money::from_minor(100_000)).unwrap();
        let receipt = service.checkout(&cashier).unwrap();

        let text = service.receipt_text(receipt.receipt_number()).unwrap();
        assert!(text.contains("Nasi Goreng"));
        assert!(text.contains("Rp25.000"));

        let link = service
            .share_receipt(receipt.receipt_number(), "0812-3456-7890")
            .unwrap();
        assert!(link.starts_with("https://wa.me/6281234567890?text="));

        let err = service.share_receipt("missing", "081234567890").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_dashboard() {
        let (service, cashier) = service();
        service.add_to_cart("kopi").unwrap();
        service.add_to_cart("kopi").unwrap();
        service.set_payment_method(PaymentMethod::Card).unwrap();
        service.checkout(&cashier).unwrap();

        service.add_to_cart("nasi").unwrap();
        service.set_tendered(Money::from_minor(75_000)).unwrap();
        service.checkout(&cashier).unwrap();

        let summary = service.dashboard(3).unwrap();
        assert_eq!(summary.transaction_count, 2);
        assert_eq!(summary.gross_sales.minor(), 111_000);
        assert_eq!(summary.top_products[0].item_id, "kopi");

        let today = Utc::now().date_naive();
        assert_eq!(service.day_summary(today, 3).unwrap().transaction_count, 2);
        assert_eq!(service.daily_revenue().unwrap().len(), 1);
        assert_eq!(service.sales_by_cashier().unwrap()[0].transactions, 2);

        let json = service.export_journal().unwrap();
        assert!(json.contains("\"receiptNumber\""));
    }

    #[test]
    fn test_low_stock_and_restock() {
        let (service, _) = service();
        let low: Vec<String> = service.low_stock().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(low, vec!["susu", "kopi"]);

        assert_eq!(service.restock("susu", 12).unwrap(), 12);
        let low: Vec<String> = service.low_stock().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(low, vec!["kopi"]);
    }

    #[test]
    fn test_search_and_cashiers() {
        let (service, _) = service();
        assert_eq!(service.search_products("kopi").unwrap().len(), 1);

        assert_eq!(service.find_cashier("sari").unwrap().name, "Sari");
        let budi = service
            .register_cashier("Budi", Some("0811 222 333"), CashierRole::Supervisor)
            .unwrap();
        assert_eq!(service.cashiers().unwrap().len(), 2);

        let updated = service.update_cashier(&budi.id, "Budi S", None).unwrap();
        assert_eq!(updated.name, "Budi S");
    }
}
