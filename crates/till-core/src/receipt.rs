//! # Receipt
//!
//! The durable artifact of a completed transaction: an immutable snapshot of
//! the ledger, the amounts and the payment at the moment of checkout.
//!
//! ## Snapshot Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CheckoutSession (mutable)          Receipt (immutable)                 │
//! │  ─────────────────────────          ───────────────────                 │
//! │  Ledger ──────────── checkout() ──► items: Vec<ReceiptLine>             │
//! │  Totals ────────────────────────► subtotal, discount, tax, total       │
//! │  PaymentState ──────────────────► method, amount_paid, change          │
//! │  CashierRef, now ───────────────► cashier, completed_at                │
//! │                                                                         │
//! │  Fields are private: once captured, nothing can change them.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cashier::CashierRef;
use crate::ledger::{LineItem, LineKind};
use crate::money::{CurrencyFormat, Money};
use crate::totals::{PaymentState, Totals};
use crate::types::{DiscountRate, PaymentMethod, TaxRate};

// =============================================================================
// Receipt Line
// =============================================================================

/// A line as sold (frozen copy of a [`LineItem`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub item_id: String,
    pub name: String,
    pub kind: LineKind,
    pub unit_price: Money,
    pub quantity: i64,
    pub line_total: Money,
}

impl From<&LineItem> for ReceiptLine {
    fn from(item: &LineItem) -> Self {
        ReceiptLine {
            item_id: item.id.clone(),
            name: item.name.clone(),
            kind: item.kind,
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total: item.line_total(),
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// Immutable snapshot of a completed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    id: String,
    receipt_number: String,
    items: Vec<ReceiptLine>,
    subtotal: Money,
    discount_rate: DiscountRate,
    discount: Money,
    tax_rate: TaxRate,
    tax: Money,
    total: Money,
    payment_method: PaymentMethod,
    amount_paid: Money,
    change: Money,
    #[ts(as = "String")]
    completed_at: DateTime<Utc>,
    cashier: CashierRef,
}

/// Everything a receipt is captured from.
pub(crate) struct Capture<'a> {
    pub items: &'a [LineItem],
    pub totals: Totals,
    pub payment: PaymentState,
    pub tax_rate: TaxRate,
    pub cashier: CashierRef,
    pub receipt_number: String,
    pub completed_at: DateTime<Utc>,
}

impl Receipt {
    pub(crate) fn capture(c: Capture<'_>) -> Receipt {
        let amount_paid = c.payment.amount_paid(c.totals.total);
        Receipt {
            id: Uuid::new_v4().to_string(),
            receipt_number: c.receipt_number,
            items: c.items.iter().map(ReceiptLine::from).collect(),
            subtotal: c.totals.subtotal,
            discount_rate: c.payment.discount,
            discount: c.totals.discount,
            tax_rate: c.tax_rate,
            tax: c.totals.tax,
            total: c.totals.total,
            payment_method: c.payment.method,
            amount_paid,
            change: amount_paid - c.totals.total,
            completed_at: c.completed_at,
            cashier: c.cashier,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn receipt_number(&self) -> &str {
        &self.receipt_number
    }

    pub fn items(&self) -> &[ReceiptLine] {
        &self.items
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn discount_rate(&self) -> DiscountRate {
        self.discount_rate
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    pub fn tax(&self) -> Money {
        self.tax
    }

    pub fn total(&self) -> Money {
        self.total
    }

    /// Total before tax (what the store keeps).
    pub fn net(&self) -> Money {
        self.total - self.tax
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn amount_paid(&self) -> Money {
        self.amount_paid
    }

    pub fn change(&self) -> Money {
        self.change
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    pub fn cashier(&self) -> &CashierRef {
        &self.cashier
    }

    /// Units sold across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Text Rendering
// =============================================================================

/// Store details printed at the top and bottom of a receipt.
#[derive(Debug, Clone, Default)]
pub struct ReceiptHeader {
    pub store_name: String,
    pub address: Vec<String>,
    pub footer: Option<String>,
    pub currency: CurrencyFormat,
}

/// Renders a fixed-width receipt for a thermal printer.
///
/// `width` is the paper width in characters (typically 32, 42 or 48).
pub fn render_text(receipt: &Receipt, header: &ReceiptHeader, width: usize) -> String {
    let width = width.max(24);
    let fmt = |m: Money| header.currency.format(m);
    let rule = "-".repeat(width);
    let mut lines: Vec<String> = Vec::new();

    lines.push(center(&header.store_name, width));
    for line in &header.address {
        lines.push(center(line, width));
    }
    lines.push(rule.clone());
    lines.push(format!("No: {}", receipt.receipt_number()));
    lines.push(two_columns(
        &receipt.completed_at().format("%Y-%m-%d %H:%M").to_string(),
        &format!("Cashier: {}", receipt.cashier().name),
        width,
    ));
    lines.push(rule.clone());

    for item in receipt.items() {
        match item.kind {
            LineKind::Unit => lines.push(item.name.clone()),
            LineKind::Bundle => lines.push(format!("{} (bundle)", item.name)),
        }
        lines.push(two_columns(
            &format!("  {} x {}", item.quantity, fmt(item.unit_price)),
            &fmt(item.line_total),
            width,
        ));
    }
    lines.push(rule.clone());

    lines.push(two_columns("Subtotal", &fmt(receipt.subtotal()), width));
    if !receipt.discount().is_zero() {
        lines.push(two_columns(
            &format!("Discount ({}%)", receipt.discount_rate().percent()),
            &fmt(-receipt.discount()),
            width,
        ));
    }
    if !receipt.tax_rate().is_zero() {
        lines.push(two_columns(
            &format!("Tax ({}%)", receipt.tax_rate().percentage()),
            &fmt(receipt.tax()),
            width,
        ));
    }
    lines.push(two_columns("TOTAL", &fmt(receipt.total()), width));
    lines.push(two_columns(
        &format!("Paid ({})", receipt.payment_method()),
        &fmt(receipt.amount_paid()),
        width,
    ));
    lines.push(two_columns("Change", &fmt(receipt.change()), width));
    lines.push(rule);

    if let Some(footer) = &header.footer {
        lines.push(center(footer, width));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}

fn two_columns(left: &str, right: &str, width: usize) -> String {
    let used = left.chars().count() + right.chars().count();
    let pad = width.saturating_sub(used).max(1);
    format!("{}{}{}", left, " ".repeat(pad), right)
}
