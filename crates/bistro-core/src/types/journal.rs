//! Journal types: the daily record and everything recorded against it.
//!
//! ## Daily Record Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  open_day(2026-03-14)                                                   │
//! │     └── DailyRecord { status: Open }                                    │
//! │         └── opening counts (copied from yesterday's closing)            │
//! │                                                                         │
//! │  during the day                                                         │
//! │     ├── SaleEntry      (POS lines)                                      │
//! │     ├── InventoryReceipt (deliveries)                                   │
//! │     └── Expense                                                         │
//! │                                                                         │
//! │  end of day                                                             │
//! │     ├── closing counts                                                  │
//! │     ├── reconciliation report                                           │
//! │     └── close_day() → DailyRecord { status: Closed }  (immutable)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::quantity::Quantity;

// =============================================================================
// Daily Record
// =============================================================================

/// Status of a business day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// Day is in progress; everything can still be recorded.
    Open,
    /// Day is closed; the record is read-only.
    Closed,
}

impl Default for DayStatus {
    fn default() -> Self {
        DayStatus::Open
    }
}

/// A business day's operational journal.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct DailyRecord {
    pub id: String,
    /// Calendar date of the business day (unique).
    #[ts(as = "String")]
    pub business_date: NaiveDate,
    pub status: DayStatus,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,
}

impl DailyRecord {
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.status == DayStatus::Closed
    }
}

// =============================================================================
// Inventory Snapshot
// =============================================================================

/// When in the day an inventory count was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotKind {
    Opening,
    Closing,
}

impl SnapshotKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotKind::Opening => "opening",
            SnapshotKind::Closing => "closing",
        }
    }
}

/// A counted quantity of one product at the opening or closing of a day.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventorySnapshot {
    pub id: String,
    pub daily_record_id: String,
    pub product_id: String,
    pub kind: SnapshotKind,
    pub quantity_milli: i64,
    #[ts(as = "String")]
    pub counted_at: DateTime<Utc>,
}

impl InventorySnapshot {
    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::from_milli(self.quantity_milli)
    }
}

// =============================================================================
// Inventory Receipt
// =============================================================================

/// Goods delivered during the day.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InventoryReceipt {
    pub id: String,
    pub daily_record_id: String,
    pub product_id: String,
    pub quantity_milli: i64,
    /// Total paid for this delivery line.
    pub cost_cents: i64,
    pub supplier: Option<String>,
    #[ts(as = "String")]
    pub received_at: DateTime<Utc>,
}

impl InventoryReceipt {
    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::from_milli(self.quantity_milli)
    }

    #[inline]
    pub fn cost(&self) -> Money {
        Money::from_cents(self.cost_cents)
    }
}

// =============================================================================
// Sale Entry
// =============================================================================

/// One recorded point-of-sale line.
///
/// Uses the snapshot pattern: `unit_price_cents` freezes the menu price at
/// recording time so later price changes don't rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleEntry {
    pub id: String,
    pub daily_record_id: String,
    pub sales_item_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    #[ts(as = "String")]
    pub recorded_at: DateTime<Utc>,
}

impl SaleEntry {
    /// Line total (unit price × quantity).
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.unit_price_cents) * self.quantity
    }
}

// =============================================================================
// Expense
// =============================================================================

/// What an expense was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Supplies,
    Utilities,
    Rent,
    Payroll,
    Maintenance,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Supplies,
        ExpenseCategory::Utilities,
        ExpenseCategory::Rent,
        ExpenseCategory::Payroll,
        ExpenseCategory::Maintenance,
        ExpenseCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Supplies => "supplies",
            ExpenseCategory::Utilities => "utilities",
            ExpenseCategory::Rent => "rent",
            ExpenseCategory::Payroll => "payroll",
            ExpenseCategory::Maintenance => "maintenance",
            ExpenseCategory::Other => "other",
        }
    }
}

/// Money paid out during the day (not a delivery of counted goods).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Expense {
    pub id: String,
    pub daily_record_id: String,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Expense {
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sale_entry_total() {
        let entry = SaleEntry {
            id: "s".to_string(),
            daily_record_id: "d".to_string(),
            sales_item_id: "i".to_string(),
            quantity: 3,
            unit_price_cents: 450,
            recorded_at: Utc::now(),
        };
        assert_eq!(entry.total().cents(), 1350);
    }

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&DayStatus::Closed).unwrap(), "\"closed\"");
        assert_eq!(serde_json::to_string(&SnapshotKind::Opening).unwrap(), "\"opening\"");
        for category in ExpenseCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }
}
