//! # Checkout Session
//!
//! Everything that belongs to the one transaction currently on the counter:
//! the ledger plus the payment state, behind a single owner.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌────────┐  add / update   ┌──────────┐  discount / tender  ┌───────┐ │
//! │   │ Empty  │ ──────────────► │ Building │ ──────────────────► │ Ready │ │
//! │   └────────┘                 └──────────┘                     └───┬───┘ │
//! │       ▲                           │ clear()                       │     │
//! │       │                           ▼                               │     │
//! │       └───────────────────────────┴──────── checkout() ◄──────────┘     │
//! │                                              │                          │
//! │                                              ▼                          │
//! │                                           Receipt                       │
//! │                                                                         │
//! │   checkout() fails with EmptyCart or PaymentIncomplete and then leaves  │
//! │   the session exactly as it was.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::cashier::CashierRef;
use crate::error::{CoreError, CoreResult};
use crate::ledger::{AddOutcome, Ledger, LineItem, UpdateOutcome};
use crate::money::Money;
use crate::receipt::{Capture, Receipt};
use crate::totals::{PaymentState, PaymentStatus, Totals};
use crate::types::{DiscountRate, PaymentMethod, TaxRate};

/// Ledger and payment state of the active transaction.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    ledger: Ledger,
    payment: PaymentState,
    tax_rate: TaxRate,
}

impl CheckoutSession {
    /// Creates an empty session using the store's tax policy.
    pub fn new(tax_rate: TaxRate) -> Self {
        CheckoutSession {
            ledger: Ledger::new(),
            payment: PaymentState::default(),
            tax_rate,
        }
    }

    /// Creates an empty session whose lines without stock ceiling stop at `max`.
    pub fn with_max_quantity(tax_rate: TaxRate, max: i64) -> Self {
        CheckoutSession {
            ledger: Ledger::with_default_max(max),
            payment: PaymentState::default(),
            tax_rate,
        }
    }

    // =========================================================================
    // Ledger
    // =========================================================================

    pub fn add(&mut self, item: LineItem) -> AddOutcome {
        self.ledger.add(item)
    }

    pub fn update_quantity(&mut self, id: &str, qty: i64) -> UpdateOutcome {
        self.ledger.update_quantity(id, qty)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ledger.remove(id)
    }

    pub fn set_max_quantity(&mut self, id: &str, max: Option<i64>) -> bool {
        self.ledger.set_max_quantity(id, max)
    }

    /// Abandons the transaction: empties the ledger and resets payment.
    pub fn clear(&mut self) {
        self.ledger.clear();
        self.payment = PaymentState::default();
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    // =========================================================================
    // Payment
    // =========================================================================

    /// Sets the discount from a whole percentage; out-of-range input is clamped.
    pub fn set_discount_percent(&mut self, pct: i64) -> DiscountRate {
        self.set_discount(DiscountRate::from_percent(pct))
    }

    pub fn set_discount(&mut self, rate: DiscountRate) -> DiscountRate {
        self.payment.discount = rate;
        rate
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment.method = method;
    }

    /// Records what the customer handed over. Negative amounts count as zero.
    pub fn set_tendered(&mut self, amount: Money) {
        self.payment.tendered = if amount.is_negative() {
            Money::zero()
        } else {
            amount
        };
    }

    pub fn payment(&self) -> &PaymentState {
        &self.payment
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn totals(&self) -> Totals {
        Totals::compute(&self.ledger, self.payment.discount, self.tax_rate)
    }

    /// `amount_paid − total`; negative while money is still owed.
    pub fn change(&self) -> Money {
        self.payment.change(self.totals().total)
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment.status(self.totals().total)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Builds the receipt this session would produce, without ending it.
    ///
    /// Lets callers run further checks (stock) before committing.
    pub fn prepare_receipt(
        &self,
        cashier: CashierRef,
        receipt_number: String,
        completed_at: DateTime<Utc>,
    ) -> CoreResult<Receipt> {
        if self.ledger.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let totals = self.totals();
        if !self.payment.status(totals.total).is_settled() {
            return Err(CoreError::PaymentIncomplete {
                total: totals.total,
                tendered: self.payment.amount_paid(totals.total),
            });
        }

        Ok(Receipt::capture(Capture {
            items: self.ledger.items(),
            totals,
            payment: self.payment,
            tax_rate: self.tax_rate,
            cashier,
            receipt_number,
            completed_at,
        }))
    }

    /// Completes the transaction and starts a fresh one.
    ///
    /// ```rust
    /// use chrono::Utc;
    /// use till_core::cashier::CashierRef;
    /// use till_core::ledger::LineItem;
    /// use till_core::money::Money;
    /// use till_core::session::CheckoutSession;
    /// use till_core::types::TaxRate;
    ///
    /// let mut session = CheckoutSession::new(TaxRate::zero());
    /// session.add(LineItem::new("teh", "Es Teh", Money::from_minor(5_000)));
    /// session.set_tendered(Money::from_minor(10_000));
    ///
    /// let cashier = CashierRef { id: "c1".into(), name: "Sari".into() };
    /// let receipt = session.checkout(cashier, "0001".into(), Utc::now()).unwrap();
    ///
    /// assert_eq!(receipt.change().minor(), 5_000);
    /// assert!(session.ledger().is_empty());
    /// ```
    pub fn checkout(
        &mut self,
        cashier: CashierRef,
        receipt_number: String,
        completed_at: DateTime<Utc>,
    ) -> CoreResult<Receipt> {
        let receipt = self.prepare_receipt(cashier, receipt_number, completed_at)?;
        self.clear();
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cashier() -> CashierRef {
        CashierRef {
            id: "c1".to_string(),
            name: "Sari".to_string(),
        }
    }

    fn example_session() -> CheckoutSession {
        let mut session = CheckoutSession::new(TaxRate::zero());
        session.add(LineItem::new("nasi", "Nasi Goreng", Money::from_minor(75_000)));
        session.add(LineItem::new("kopi", "Kopi Susu", Money::from_minor(18_000)));
        session.update_quantity("kopi", 2);
        session
    }

    #[test]
    fn test_discount_and_change_example() {
        let mut session = example_session();
        session.set_discount_percent(10);
        session.set_tendered(Money::from_minor(100_000));

        let totals = session.totals();
        assert_eq!(totals.subtotal.minor(), 111_000);
        assert_eq!(totals.total.minor(), 99_900);
        assert_eq!(session.change().minor(), 100);
    }

    #[test]
    fn test_discount_is_clamped() {
        let mut session = example_session();
        assert_eq!(session.set_discount_percent(250).percent(), 100);
        assert!(session.totals().total.is_zero());

        assert_eq!(session.set_discount_percent(-20).percent(), 0);
        assert_eq!(session.totals().total.minor(), 111_000);
    }

    #[test]
    fn test_negative_tender_counts_as_zero() {
        let mut session = example_session();
        session.set_tendered(Money::from_minor(-500));
        assert!(session.payment().tendered.is_zero());
    }

    #[test]
    fn test_checkout_empty_cart() {
        let mut session = CheckoutSession::new(TaxRate::zero());
        let result = session.checkout(cashier(), "0001".to_string(), Utc::now());
        assert!(matches!(result, Err(CoreError::EmptyCart)));
    }

    #[test]
    fn test_checkout_underpaid_keeps_session() {
        let mut session = example_session();
        session.set_tendered(Money::from_minor(50_000));

        let result = session.checkout(cashier(), "0001".to_string(), Utc::now());
        match result {
            Err(CoreError::PaymentIncomplete { total, tendered }) => {
                assert_eq!(total.minor(), 111_000);
                assert_eq!(tendered.minor(), 50_000);
            }
            other => panic!("expected PaymentIncomplete, got {other:?}"),
        }
        assert_eq!(session.ledger().len(), 2);
        assert_eq!(session.payment().tendered.minor(), 50_000);
    }

    #[test]
    fn test_checkout_resets_session() {
        let mut session = example_session();
        session.set_discount_percent(10);
        session.set_tendered(Money::from_minor(100_000));

        let receipt = session
            .checkout(cashier(), "0001".to_string(), Utc::now())
            .unwrap();

        assert_eq!(receipt.total().minor(), 99_900);
        assert_eq!(receipt.change().minor(), 100);
        assert_eq!(receipt.receipt_number(), "0001");
        assert!(session.ledger().is_empty());
        assert!(session.payment().discount.is_none());
        assert!(session.payment().tendered.is_zero());
    }

    #[test]
    fn test_card_checkout_needs_no_tender() {
        let mut session = example_session();
        session.set_payment_method(PaymentMethod::Card);
        assert!(session.payment_status().is_settled());

        let receipt = session
            .checkout(cashier(), "0002".to_string(), Utc::now())
            .unwrap();
        assert_eq!(receipt.amount_paid(), receipt.total());
        assert!(receipt.change().is_zero());
    }

    #[test]
    fn test_prepare_receipt_does_not_reset() {
        let mut session = example_session();
        session.set_tendered(Money::from_minor(200_000));

        let receipt = session
            .prepare_receipt(cashier(), "0003".to_string(), Utc::now())
            .unwrap();
        assert_eq!(receipt.items().len(), 2);
        assert_eq!(session.ledger().len(), 2);
    }

    #[test]
    fn test_tax_policy_applies_to_receipt() {
        let mut session = CheckoutSession::new(TaxRate::from_bps(1000));
        session.add(LineItem::new("nasi", "Nasi Goreng", Money::from_minor(75_000)));
        session.set_payment_method(PaymentMethod::Qris);

        let live_total = session.totals().total;
        let receipt = session
            .checkout(cashier(), "0004".to_string(), Utc::now())
            .unwrap();

        assert_eq!(receipt.tax().minor(), 7_500);
        assert_eq!(receipt.total(), live_total);
    }

    #[test]
    fn test_with_max_quantity() {
        let mut session = CheckoutSession::with_max_quantity(TaxRate::zero(), 2);
        let teh = LineItem::new("teh", "Es Teh", Money::from_minor(5_000));
        session.add(teh.clone());
        session.add(teh.clone());
        assert_eq!(session.add(teh), AddOutcome::AtLimit { quantity: 2 });
    }
}
