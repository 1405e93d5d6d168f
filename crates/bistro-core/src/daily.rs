//! Daily summary: what a business day earned and spent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Expense, ExpenseCategory, InventoryReceipt, SaleEntry};

/// Money totals for one daily record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailySummary {
    pub revenue: Money,
    pub expenses_total: Money,
    /// Only categories with at least one expense appear.
    pub expenses_by_category: BTreeMap<ExpenseCategory, Money>,
    /// Cost of goods received.
    pub purchases_total: Money,
    /// `revenue − expenses − purchases`.
    pub net: Money,
    pub sale_count: i64,
    pub items_sold: i64,
}

/// Totals a day's sales, expenses and deliveries.
pub fn summarize_day(
    sales: &[SaleEntry],
    expenses: &[Expense],
    receipts: &[InventoryReceipt],
) -> DailySummary {
    let revenue: Money = sales.iter().map(SaleEntry::total).sum();
    let purchases_total: Money = receipts.iter().map(InventoryReceipt::cost).sum();

    let mut expenses_by_category: BTreeMap<ExpenseCategory, Money> = BTreeMap::new();
    for expense in expenses {
        *expenses_by_category.entry(expense.category).or_default() += expense.amount();
    }
    let expenses_total: Money = expenses_by_category.values().copied().sum();

    DailySummary {
        revenue,
        expenses_total,
        expenses_by_category,
        purchases_total,
        net: revenue - expenses_total - purchases_total,
        sale_count: sales.len() as i64,
        items_sold: sales.iter().map(|s| s.quantity).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sale(quantity: i64, price: i64) -> SaleEntry {
        SaleEntry {
            id: "s".to_string(),
            daily_record_id: "d".to_string(),
            sales_item_id: "i".to_string(),
            quantity,
            unit_price_cents: price,
            recorded_at: Utc::now(),
        }
    }

    fn expense(category: ExpenseCategory, cents: i64) -> Expense {
        Expense {
            id: "e".to_string(),
            daily_record_id: "d".to_string(),
            category,
            description: "x".to_string(),
            amount_cents: cents,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summarize_day() {
        let sales = vec![sale(2, 450), sale(1, 300)];
        let expenses = vec![
            expense(ExpenseCategory::Supplies, 500),
            expense(ExpenseCategory::Utilities, 1200),
            expense(ExpenseCategory::Supplies, 250),
        ];
        let receipts = vec![InventoryReceipt {
            id: "r".to_string(),
            daily_record_id: "d".to_string(),
            product_id: "p".to_string(),
            quantity_milli: 10_000,
            cost_cents: 1000,
            supplier: None,
            received_at: Utc::now(),
        }];

        let summary = summarize_day(&sales, &expenses, &receipts);
        assert_eq!(summary.revenue.cents(), 1200);
        assert_eq!(summary.expenses_total.cents(), 1950);
        assert_eq!(summary.expenses_by_category[&ExpenseCategory::Supplies].cents(), 750);
        assert_eq!(summary.purchases_total.cents(), 1000);
        assert_eq!(summary.net.cents(), 1200 - 1950 - 1000);
        assert_eq!(summary.sale_count, 2);
        assert_eq!(summary.items_sold, 3);
        assert!(!summary.expenses_by_category.contains_key(&ExpenseCategory::Rent));
    }

    #[test]
    fn test_empty_day() {
        let summary = summarize_day(&[], &[], &[]);
        assert_eq!(summary, DailySummary::default());
    }
}
