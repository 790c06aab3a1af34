//! # Sales Reports
//!
//! Dashboard and analytics figures computed from completed receipts.
//!
//! ## Figures
//! ```text
//! gross_sales     = Σ receipt.total
//! tax_collected   = Σ receipt.tax
//! net_sales       = gross_sales − tax_collected
//! discounts_given = Σ receipt.discount
//! average_ticket  = gross_sales / transaction_count    (0 when no sales)
//! ```
//!
//! Bundles are reported as the line the customer bought, not as their
//! components.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cashier::CashierRef;
use crate::ledger::LineKind;
use crate::money::Money;
use crate::receipt::Receipt;
use crate::types::PaymentMethod;

/// Totals taken with one payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MethodTotal {
    pub method: PaymentMethod,
    pub transactions: u32,
    pub total: Money,
}

/// A best-selling line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub item_id: String,
    pub name: String,
    pub kind: LineKind,
    pub quantity: i64,
    pub revenue: Money,
}

/// Dashboard summary over a set of receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub transaction_count: u32,
    pub gross_sales: Money,
    pub net_sales: Money,
    pub tax_collected: Money,
    pub discounts_given: Money,
    pub units_sold: i64,
    pub average_ticket: Money,
    pub by_method: Vec<MethodTotal>,
    pub top_products: Vec<TopProduct>,
}

impl SalesSummary {
    /// Summarises `receipts`, keeping the `top_n` best sellers by quantity.
    pub fn from_receipts(receipts: &[Receipt], top_n: usize) -> SalesSummary {
        let gross_sales: Money = receipts.iter().map(Receipt::total).sum();
        let tax_collected: Money = receipts.iter().map(Receipt::tax).sum();
        let count = receipts.len() as i64;

        let average_ticket = if count == 0 {
            Money::zero()
        } else {
            Money::from_minor(gross_sales.minor() / count)
        };

        SalesSummary {
            transaction_count: receipts.len() as u32,
            gross_sales,
            net_sales: gross_sales - tax_collected,
            tax_collected,
            discounts_given: receipts.iter().map(Receipt::discount).sum(),
            units_sold: receipts.iter().map(Receipt::total_quantity).sum(),
            average_ticket,
            by_method: by_method(receipts),
            top_products: top_products(receipts, top_n),
        }
    }
}

fn by_method(receipts: &[Receipt]) -> Vec<MethodTotal> {
    let mut totals: BTreeMap<PaymentMethod, (u32, Money)> = BTreeMap::new();
    for receipt in receipts {
        let entry = totals
            .entry(receipt.payment_method())
            .or_insert((0, Money::zero()));
        entry.0 += 1;
        entry.1 += receipt.total();
    }

    totals
        .into_iter()
        .map(|(method, (transactions, total))| MethodTotal {
            method,
            transactions,
            total,
        })
        .collect()
}

/// Best sellers by quantity; ties go to higher revenue, then name.
pub fn top_products(receipts: &[Receipt], top_n: usize) -> Vec<TopProduct> {
    let mut by_item: BTreeMap<&str, TopProduct> = BTreeMap::new();
    for line in receipts.iter().flat_map(|r| r.items()) {
        let entry = by_item
            .entry(line.item_id.as_str())
            .or_insert_with(|| TopProduct {
                item_id: line.item_id.clone(),
                name: line.name.clone(),
                kind: line.kind,
                quantity: 0,
                revenue: Money::zero(),
            });
        entry.quantity += line.quantity;
        entry.revenue += line.line_total;
    }

    let mut ranked: Vec<TopProduct> = by_item.into_values().collect();
    ranked.sort_by(|a, b| {
        b.quantity
            .cmp(&a.quantity)
            .then(b.revenue.cmp(&a.revenue))
            .then(a.name.cmp(&b.name))
    });
    ranked.truncate(top_n);
    ranked
}

/// Revenue of one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DailyRevenue {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub transactions: u32,
    pub revenue: Money,
}

/// Revenue per day, oldest first. Days without sales are omitted.
pub fn daily_revenue(receipts: &[Receipt]) -> Vec<DailyRevenue> {
    let mut days: BTreeMap<NaiveDate, (u32, Money)> = BTreeMap::new();
    for receipt in receipts {
        let entry = days
            .entry(receipt.completed_at().date_naive())
            .or_insert((0, Money::zero()));
        entry.0 += 1;
        entry.1 += receipt.total();
    }

    days.into_iter()
        .map(|(date, (transactions, revenue))| DailyRevenue {
            date,
            transactions,
            revenue,
        })
        .collect()
}

/// What one cashier rang up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CashierSales {
    pub cashier: CashierRef,
    pub transactions: u32,
    pub total: Money,
}

/// Sales per cashier, highest total first.
pub fn sales_by_cashier(receipts: &[Receipt]) -> Vec<CashierSales> {
    let mut by_cashier: BTreeMap<&CashierRef, (u32, Money)> = BTreeMap::new();
    for receipt in receipts {
        let entry = by_cashier
            .entry(receipt.cashier())
            .or_insert((0, Money::zero()));
        entry.0 += 1;
        entry.1 += receipt.total();
    }

    let mut sales: Vec<CashierSales> = by_cashier
        .into_iter()
        .map(|(cashier, (transactions, total))| CashierSales {
            cashier: cashier.clone(),
            transactions,
            total,
        })
        .collect();
    sales.sort_by(|a, b| b.total.cmp(&a.total));
    sales
}

/// Receipts completed on `date` (UTC).
pub fn receipts_on(receipts: &[Receipt], date: NaiveDate) -> Vec<&Receipt> {
    receipts
        .iter()
        .filter(|r| r.completed_at().date_naive() == date)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LineItem;
    use crate::session::CheckoutSession;
    use crate::types::TaxRate;
    use chrono::{TimeZone, Utc};

    fn cashier(name: &str) -> CashierRef {
        CashierRef {
            id: name.to_lowercase(),
            name: name.to_string(),
        }
    }

    fn sale(
        lines: &[(&str, i64, i64)],
        method: PaymentMethod,
        day: u32,
        who: &str,
    ) -> Receipt {
        let mut session = CheckoutSession::new(TaxRate::from_bps(1000));
        for (id, price, qty) in lines {
            session.add(LineItem::new(*id, id.to_uppercase(), Money::from_minor(*price)));
            session.update_quantity(id, *qty);
        }
        session.set_payment_method(method);
        session.set_tendered(Money::from_minor(1_000_000));
        session
            .checkout(
                cashier(who),
                format!("R{day}"),
                Utc.with_ymd_and_hms(2024, 10, day, 10, 0, 0).unwrap(),
            )
            .unwrap()
    }

    fn receipts() -> Vec<Receipt> {
        vec![
            sale(&[("kopi", 18_000, 2), ("roti", 15_000, 1)], PaymentMethod::Cash, 17, "Sari"),
            sale(&[("kopi", 18_000, 1)], PaymentMethod::Qris, 17, "Budi"),
            sale(&[("nasi", 75_000, 1)], PaymentMethod::Cash, 18, "Sari"),
        ]
    }

    #[test]
    fn test_summary_totals() {
        let summary = SalesSummary::from_receipts(&receipts(), 5);

        assert_eq!(summary.transaction_count, 3);
        // 51_000 + 18_000 + 75_000 = 144_000 before tax, 10% tax
        assert_eq!(summary.net_sales.minor(), 144_000);
        assert_eq!(summary.tax_collected.minor(), 14_400);
        assert_eq!(summary.gross_sales.minor(), 158_400);
        assert_eq!(summary.average_ticket.minor(), 52_800);
        assert_eq!(summary.units_sold, 5);
        assert!(summary.discounts_given.is_zero());
    }

    #[test]
    fn test_summary_by_method() {
        let summary = SalesSummary::from_receipts(&receipts(), 5);
        assert_eq!(summary.by_method.len(), 2);
        assert_eq!(summary.by_method[0].method, PaymentMethod::Cash);
        assert_eq!(summary.by_method[0].transactions, 2);
        assert_eq!(summary.by_method[1].method, PaymentMethod::Qris);
        assert_eq!(summary.by_method[1].total.minor(), 19_800);
    }

    #[test]
    fn test_top_products() {
        let top = top_products(&receipts(), 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].item_id, "kopi");
        assert_eq!(top[0].quantity, 3);
        assert_eq!(top[0].revenue.minor(), 54_000);
        // nasi and roti both sold once; nasi earned more
        assert_eq!(top[1].item_id, "nasi");
    }

    #[test]
    fn test_daily_revenue() {
        let days = daily_revenue(&receipts());
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 10, 17).unwrap());
        assert_eq!(days[0].transactions, 2);
        assert_eq!(days[1].revenue.minor(), 82_500);
    }

    #[test]
    fn test_sales_by_cashier() {
        let sales = sales_by_cashier(&receipts());
        assert_eq!(sales[0].cashier.name, "Sari");
        assert_eq!(sales[0].transactions, 2);
        assert_eq!(sales[1].cashier.name, "Budi");
    }

    #[test]
    fn test_receipts_on() {
        let all = receipts();
        let day = NaiveDate::from_ymd_opt(2024, 10, 18).unwrap();
        assert_eq!(receipts_on(&all, day).len(), 1);
    }

    #[test]
    fn test_empty_summary() {
        let summary = SalesSummary::from_receipts(&[], 5);
        assert_eq!(summary.transaction_count, 0);
        assert!(summary.average_ticket.is_zero());
        assert!(summary.top_products.is_empty());
        assert!(daily_revenue(&[]).is_empty());
    }
}
