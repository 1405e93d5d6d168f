//! # Analytics Repository
//!
//! Read-only queries that assemble the inputs of the pure engines in
//! `bistro_core`. No calculation happens here.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  reconciliation_input(record)          wage_input(period)               │
//! │  ├── products                          ├── effective_rates              │
//! │  ├── snapshots (opening / closing)     └── shifts of period and the     │
//! │  ├── receipts (summed per product)         previous period              │
//! │  ├── recipes                                                            │
//! │  ├── sales items                                                        │
//! │  └── sale lines                                                         │
//! │             │                                       │                   │
//! │             ▼                                       ▼                   │
//! │  reconciliation::reconcile              wages::wage_report              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{EmployeeRepository, SalesItemRepository};
use bistro_core::reconciliation::{ProductInfo, ReconciliationInput, SaleLine, SalesItemInfo};
use bistro_core::wages::{WageInput, WagePolicy};
use bistro_core::{Period, Quantity, Shift};

#[derive(Debug, Clone)]
pub struct AnalyticsRepository {
    pool: SqlitePool,
}

impl AnalyticsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AnalyticsRepository { pool }
    }

    /// Loads everything recorded for one business day.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - unknown record
    pub async fn reconciliation_input(
        &self,
        record_id: &str,
        tolerance_bps: i64,
    ) -> DbResult<ReconciliationInput> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM daily_records WHERE id = ?1)")
                .bind(record_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(DbError::not_found("DailyRecord", record_id));
        }

        let products = sqlx::query_as::<_, ProductInfo>(
            "SELECT id, name, unit, cost_cents FROM products ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        let counts: Vec<(String, String, i64)> = sqlx::query_as(
            r#"
            SELECT product_id, kind, quantity_milli
            FROM inventory_snapshots
            WHERE daily_record_id = ?1
            "#,
        )
        .bind(record_id)
        .fetch_all(&self.pool)
        .await?;

        let mut opening = HashMap::new();
        let mut closing = HashMap::new();
        for (product_id, kind, milli) in counts {
            let target = if kind == "opening" { &mut opening } else { &mut closing };
            target.insert(product_id, Quantity::from_milli(milli));
        }

        let received: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT product_id, SUM(quantity_milli)
            FROM inventory_receipts
            WHERE daily_record_id = ?1
            GROUP BY product_id
            "#,
        )
        .bind(record_id)
        .fetch_all(&self.pool)
        .await?;
        let receipts = received
            .into_iter()
            .map(|(product_id, milli)| (product_id, Quantity::from_milli(milli)))
            .collect();

        let recipes = SalesItemRepository::new(self.pool.clone()).all_recipes().await?;

        let sales_items = sqlx::query_as::<_, SalesItemInfo>(
            "SELECT id, name, price_cents, is_active FROM sales_items ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        let sales = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT sales_item_id, quantity, unit_price_cents
            FROM sale_entries
            WHERE daily_record_id = ?1
            "#,
        )
        .bind(record_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(
            record_id = %record_id,
            opening = opening.len(),
            closing = closing.len(),
            sales = sales.len(),
            "Loaded reconciliation input"
        );

        Ok(ReconciliationInput {
            products,
            opening,
            closing,
            receipts,
            recipes,
            sales_items,
            sales,
            tolerance_bps,
        })
    }

    /// Every shift with `from <= shift_date <= to`, for all employees.
    pub async fn wage_shifts(&self, from: NaiveDate, to: NaiveDate) -> DbResult<Vec<Shift>> {
        let shifts = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, employee_id, template_id, shift_date, start_time, end_time,
                   status, actual_minutes, notes, created_at, updated_at
            FROM shifts
            WHERE shift_date BETWEEN ?1 AND ?2
            ORDER BY employee_id, shift_date, start_time
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(shifts)
    }

    /// Rates and shifts for a month and the month before it.
    pub async fn wage_input(
        &self,
        period: Period,
        policy: WagePolicy,
        today: NaiveDate,
    ) -> DbResult<WageInput> {
        let from = period.previous().first_day();
        let shifts = self.wage_shifts(from, period.last_day()).await?;
        let employees = EmployeeRepository::new(self.pool.clone()).effective_rates().await?;

        debug!(
            period = %period,
            employees = employees.len(),
            shifts = shifts.len(),
            "Loaded wage input"
        );

        Ok(WageInput {
            period,
            employees,
            shifts,
            policy,
            today,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::*;
    use crate::repository::generate_id;
    use bistro_core::reconciliation::{reconcile, LineStatus};
    use bistro_core::wages::wage_report;
    use bistro_core::{InventoryReceipt, SaleEntry, ShiftStatus, SnapshotKind, Unit};
    use chrono::{NaiveTime, Utc};

    #[tokio::test]
    async fn test_reconciliation_input_for_unknown_record() {
        let db = memory_db().await;
        let err = db.analytics().reconciliation_input("missing", 500).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_reconciliation_from_recorded_day() {
        let db = memory_db().await;
        let beans = product("Coffee beans", Unit::Kilogram, 2400);
        db.products().insert(&beans).await.unwrap();
        let espresso = sales_item("Espresso", 300);
        db.sales_items().insert(&espresso).await.unwrap();
        db.sales_items()
            .set_recipe(&espresso.id, &[(beans.id.clone(), 18)])
            .await
            .unwrap();

        let journal = db.daily_records();
        let day = journal.open_day(date(2026, 3, 14), false, None).await.unwrap();
        journal
            .upsert_snapshot(&day.id, &beans.id, SnapshotKind::Opening, 1_000)
            .await
            .unwrap();
        for quantity_milli in [250, 250] {
            journal
                .add_receipt(&InventoryReceipt {
                    id: generate_id(),
                    daily_record_id: day.id.clone(),
                    product_id: beans.id.clone(),
                    quantity_milli,
                    cost_cents: 600,
                    supplier: None,
                    received_at: Utc::now(),
                })
                .await
                .unwrap();
        }
        journal
            .add_sale(&SaleEntry {
                id: generate_id(),
                daily_record_id: day.id.clone(),
                sales_item_id: espresso.id.clone(),
                quantity: 50,
                unit_price_cents: 300,
                recorded_at: Utc::now(),
            })
            .await
            .unwrap();
        // 1.000 + 0.500 - 0.600 = 0.900 used, 0.900 recorded
        journal
            .upsert_snapshot(&day.id, &beans.id, SnapshotKind::Closing, 600)
            .await
            .unwrap();

        let input = db.analytics().reconciliation_input(&day.id, 500).await.unwrap();
        assert_eq!(input.receipts[&beans.id], Quantity::from_milli(500));
        assert_eq!(input.sales.len(), 1);

        let report = reconcile(&input);
        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.lines[0].status, LineStatus::Ok);
        assert!(report.balanced);
    }

    #[tokio::test]
    async fn test_wage_input_covers_two_months() {
        let db = memory_db().await;
        let barista = position("Barista", 1600);
        db.positions().insert(&barista).await.unwrap();
        let olena = employee("Olena", &barista.id, None);
        db.employees().insert(&olena).await.unwrap();

        let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
        for day in [date(2026, 1, 31), date(2026, 2, 10), date(2026, 3, 10)] {
            let shift = Shift {
                id: generate_id(),
                employee_id: olena.id.clone(),
                template_id: None,
                shift_date: day,
                start_time: t(8),
                end_time: t(16),
                status: ShiftStatus::Completed,
                actual_minutes: None,
                notes: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            db.shifts().insert_shift(&shift).await.unwrap();
        }

        let period = Period::new(2026, 3).unwrap();
        let input = db
            .analytics()
            .wage_input(period, WagePolicy::default(), date(2026, 3, 31))
            .await
            .unwrap();
        assert_eq!(input.shifts.len(), 2);

        let report = wage_report(&input);
        assert_eq!(report.lines.len(), 1);
        assert_eq!(report.lines[0].worked_minutes, 480);
        assert_eq!(report.lines[0].previous_minutes, 480);
        assert_eq!(report.lines[0].gross_pay.cents(), 12_800);
    }
}
