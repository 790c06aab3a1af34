//! # Totals Calculator
//!
//! Derives every amount shown on the tender screen from the ledger, the
//! discount and the store's tax policy.
//!
//! ## Derivation
//! ```text
//! subtotal   = Σ unit_price × quantity
//! discount   = subtotal × discount_bps / 10000      (rounded half-up)
//! discounted = subtotal − discount
//! tax        = discounted × tax_bps / 10000         (rounded half-up)
//! total      = discounted + tax
//! change     = amount_paid − total                  (negative = not paid yet)
//! ```
//!
//! One tax policy applies everywhere: the live cart and the receipt use the
//! same [`TaxRate`], so the two can never disagree.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ledger::Ledger;
use crate::money::Money;
use crate::types::{DiscountRate, PaymentMethod, TaxRate};

// =============================================================================
// Totals
// =============================================================================

/// Amounts derived from a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub item_count: u32,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount: Money,
    pub discounted: Money,
    pub tax: Money,
    pub total: Money,
}

impl Totals {
    /// Computes totals for a ledger.
    ///
    /// ```rust
    /// use till_core::ledger::{Ledger, LineItem};
    /// use till_core::money::Money;
    /// use till_core::totals::Totals;
    /// use till_core::types::{DiscountRate, TaxRate};
    ///
    /// let mut ledger = Ledger::new();
    /// ledger.add(LineItem::new("nasi", "Nasi Goreng", Money::from_minor(75_000)));
    /// ledger.add(LineItem::new("kopi", "Kopi Susu", Money::from_minor(18_000)));
    /// ledger.update_quantity("kopi", 2);
    ///
    /// let totals = Totals::compute(&ledger, DiscountRate::from_percent(10), TaxRate::zero());
    /// assert_eq!(totals.subtotal.minor(), 111_000);
    /// assert_eq!(totals.total.minor(), 99_900);
    /// ```
    pub fn compute(ledger: &Ledger, discount: DiscountRate, tax_rate: TaxRate) -> Totals {
        let subtotal = ledger.subtotal();
        let discount_amount = subtotal.discount_amount(discount);
        let discounted = subtotal - discount_amount;
        let tax = discounted.calculate_tax(tax_rate);

        Totals {
            item_count: ledger.len() as u32,
            total_quantity: ledger.total_quantity(),
            subtotal,
            discount: discount_amount,
            discounted,
            tax,
            total: discounted + tax,
        }
    }

    /// Totals of an empty ledger.
    pub fn empty() -> Totals {
        Totals {
            item_count: 0,
            total_quantity: 0,
            subtotal: Money::zero(),
            discount: Money::zero(),
            discounted: Money::zero(),
            tax: Money::zero(),
            total: Money::zero(),
        }
    }
}

// =============================================================================
// Payment State
// =============================================================================

/// Discount and tender for the active transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentState {
    pub method: PaymentMethod,
    pub discount: DiscountRate,
    pub tendered: Money,
}

impl PaymentState {
    /// What the customer is considered to have paid against `total`.
    ///
    /// Cash uses the entered amount; card and QR settle the exact total.
    pub fn amount_paid(&self, total: Money) -> Money {
        if self.method.requires_tender() {
            self.tendered
        } else {
            total
        }
    }

    /// `amount_paid − total`. Negative while payment is incomplete.
    pub fn change(&self, total: Money) -> Money {
        self.amount_paid(total) - total
    }

    /// Classifies the payment against `total`.
    pub fn status(&self, total: Money) -> PaymentStatus {
        let change = self.change(total);
        if change.is_negative() {
            PaymentStatus::Incomplete {
                remaining: change.abs(),
            }
        } else {
            PaymentStatus::Settled { change }
        }
    }
}

/// Whether the customer has paid enough.
///
/// A negative change is never a refund: it means money is still owed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PaymentStatus {
    Incomplete { remaining: Money },
    Settled { change: Money },
}

impl PaymentStatus {
    /// True when checkout may proceed.
    pub fn is_settled(&self) -> bool {
        matches!(self, PaymentStatus::Settled { .. })
    }
}
