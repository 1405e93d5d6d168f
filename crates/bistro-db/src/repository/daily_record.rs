//! # Daily Record Repository
//!
//! The daily journal: one record per business date plus everything
//! recorded against it.
//!
//! ## Day Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  open_day(2026-03-14, carry_over = true)                                │
//! │     ├── INSERT daily_records (status = 'open')                          │
//! │     └── copy closing counts of the latest closed day before it          │
//! │         as this day's opening counts                                    │
//! │                                                                         │
//! │  while open                                                             │
//! │     ├── upsert_snapshots (opening / closing counts)                     │
//! │     ├── add_receipt / add_sale / add_expense                            │
//! │     └── delete_sale / delete_expense                                    │
//! │                                                                         │
//! │  close_day  ── requires ≥ 1 closing count ──► status = 'closed'         │
//! │  reopen_day ── closed → open (corrections)                              │
//! │                                                                         │
//! │  Any mutation on a closed day → DbError::Conflict                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every guarded mutation reads the record state and writes inside the same
//! transaction.

use chrono::{NaiveDate, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use bistro_core::{
    CoreError, DailyRecord, DayStatus, Expense, InventoryReceipt, InventorySnapshot, SaleEntry,
    SnapshotKind,
};

/// Repository for the daily journal.
#[derive(Debug, Clone)]
pub struct DailyRecordRepository {
    pool: SqlitePool,
}

/// Loads a record through any executor (pool or open transaction).
async fn fetch_record<'e, E>(executor: E, id: &str) -> DbResult<DailyRecord>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, DailyRecord>(
        r#"
        SELECT id, business_date, status, notes, opened_at, closed_at
        FROM daily_records
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| DbError::not_found("DailyRecord", id))
}

fn ensure_open(record: &DailyRecord) -> DbResult<()> {
    if record.is_closed() {
        let err = CoreError::DayClosed {
            date: record.business_date.to_string(),
        };
        debug!(id = %record.id, "Rejected mutation on closed day");
        return Err(DbError::conflict(err.to_string()));
    }
    Ok(())
}

impl DailyRecordRepository {
    /// Creates a new DailyRecordRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DailyRecordRepository { pool }
    }

    /// Begins a transaction and checks the record is open.
    async fn begin_on_open_day(
        &self,
        record_id: &str,
    ) -> DbResult<(Transaction<'static, Sqlite>, DailyRecord)> {
        let mut tx = self.pool.begin().await?;
        let record = fetch_record(&mut *tx, record_id).await?;
        ensure_open(&record)?;
        Ok((tx, record))
    }

    async fn commit(tx: Transaction<'static, Sqlite>) -> DbResult<()> {
        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))
    }

    // =========================================================================
    // Record lifecycle
    // =========================================================================

    /// Opens a new business day.
    ///
    /// With `carry_over`, the closing counts of the most recent earlier
    /// closed day become this day's opening counts.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - a record for the date exists
    pub async fn open_day(
        &self,
        business_date: NaiveDate,
        carry_over: bool,
        notes: Option<String>,
    ) -> DbResult<DailyRecord> {
        let mut tx = self.pool.begin().await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM daily_records WHERE business_date = ?1)")
                .bind(business_date)
                .fetch_one(&mut *tx)
                .await?;
        if exists {
            return Err(DbError::duplicate("business_date", business_date.to_string()));
        }

        let now = Utc::now();
        let record = DailyRecord {
            id: generate_id(),
            business_date,
            status: DayStatus::Open,
            notes,
            opened_at: now,
            closed_at: None,
        };

        sqlx::query(
            r#"
            INSERT INTO daily_records (id, business_date, status, notes, opened_at, closed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, NULL)
            "#,
        )
        .bind(&record.id)
        .bind(record.business_date)
        .bind(record.status)
        .bind(&record.notes)
        .bind(record.opened_at)
        .execute(&mut *tx)
        .await?;

        let mut carried = 0usize;
        if carry_over {
            let previous: Option<String> = sqlx::query_scalar(
                r#"
                SELECT id FROM daily_records
                WHERE business_date < ?1 AND status = 'closed'
                ORDER BY business_date DESC
                LIMIT 1
                "#,
            )
            .bind(business_date)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(previous_id) = previous {
                let closing: Vec<(String, i64)> = sqlx::query_as(
                    r#"
                    SELECT product_id, quantity_milli FROM inventory_snapshots
                    WHERE daily_record_id = ?1 AND kind = 'closing'
                    "#,
                )
                .bind(&previous_id)
                .fetch_all(&mut *tx)
                .await?;

                for (product_id, quantity_milli) in &closing {
                    sqlx::query(
                        r#"
                        INSERT INTO inventory_snapshots
                            (id, daily_record_id, product_id, kind, quantity_milli, counted_at)
                        VALUES (?1, ?2, ?3, 'opening', ?4, ?5)
                        "#,
                    )
                    .bind(generate_id())
                    .bind(&record.id)
                    .bind(product_id)
                    .bind(quantity_milli)
                    .bind(now)
                    .execute(&mut *tx)
                    .await?;
                }
                carried = closing.len();
            }
        }

        Self::commit(tx).await?;

        info!(
            id = %record.id,
            date = %record.business_date,
            carried_counts = carried,
            "Opened business day"
        );
        Ok(record)
    }

    /// Gets a record by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<DailyRecord>> {
        match fetch_record(&self.pool, id).await {
            Ok(record) => Ok(Some(record)),
            Err(DbError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Gets the record of a business date.
    pub async fn get_by_date(&self, business_date: NaiveDate) -> DbResult<Option<DailyRecord>> {
        let record = sqlx::query_as::<_, DailyRecord>(
            r#"
            SELECT id, business_date, status, notes, opened_at, closed_at
            FROM daily_records
            WHERE business_date = ?1
            "#,
        )
        .bind(business_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Lists records in an optional inclusive date range, newest first.
    pub async fn list(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> DbResult<Vec<DailyRecord>> {
        let records = sqlx::query_as::<_, DailyRecord>(
            r#"
            SELECT id, business_date, status, notes, opened_at, closed_at
            FROM daily_records
            WHERE (?1 IS NULL OR business_date >= ?1)
              AND (?2 IS NULL OR business_date <= ?2)
            ORDER BY business_date DESC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Closes an open day.
    ///
    /// ## Returns
    /// * `Err(DbError::Conflict)` - already closed, or no closing count yet
    pub async fn close_day(&self, id: &str) -> DbResult<DailyRecord> {
        let (mut tx, record) = self.begin_on_open_day(id).await?;

        let closing_counts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM inventory_snapshots WHERE daily_record_id = ?1 AND kind = 'closing'",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if closing_counts == 0 {
            let err = CoreError::MissingClosingCount {
                date: record.business_date.to_string(),
            };
            return Err(DbError::conflict(err.to_string()));
        }

        sqlx::query("UPDATE daily_records SET status = 'closed', closed_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        let closed = fetch_record(&mut *tx, id).await?;
        Self::commit(tx).await?;

        info!(id = %id, date = %closed.business_date, "Closed business day");
        Ok(closed)
    }

    /// Reopens a closed day for corrections.
    pub async fn reopen_day(&self, id: &str) -> DbResult<DailyRecord> {
        let mut tx = self.pool.begin().await?;
        let record = fetch_record(&mut *tx, id).await?;

        if !record.is_closed() {
            return Err(DbError::conflict(format!(
                "Daily record for {} is not closed",
                record.business_date
            )));
        }

        sqlx::query("UPDATE daily_records SET status = 'open', closed_at = NULL WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let reopened = fetch_record(&mut *tx, id).await?;
        Self::commit(tx).await?;

        info!(id = %id, date = %reopened.business_date, "Reopened business day");
        Ok(reopened)
    }

    // =========================================================================
    // Inventory counts
    // =========================================================================

    /// Records counts of one kind; a product counted again is overwritten.
    ///
    /// Returns every count of that kind for the record.
    pub async fn upsert_snapshots(
        &self,
        record_id: &str,
        kind: SnapshotKind,
        counts: &[(String, i64)],
    ) -> DbResult<Vec<InventorySnapshot>> {
        debug!(record_id = %record_id, kind = kind.as_str(), count = counts.len(), "Upserting counts");

        let (mut tx, _) = self.begin_on_open_day(record_id).await?;
        let now = Utc::now();

        for (product_id, quantity_milli) in counts {
            sqlx::query(
                r#"
                INSERT INTO inventory_snapshots
                    (id, daily_record_id, product_id, kind, quantity_milli, counted_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT (daily_record_id, product_id, kind) DO UPDATE SET
                    quantity_milli = excluded.quantity_milli,
                    counted_at = excluded.counted_at
                "#,
            )
            .bind(generate_id())
            .bind(record_id)
            .bind(product_id)
            .bind(kind)
            .bind(quantity_milli)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        Self::commit(tx).await?;

        let snapshots = self.snapshots(record_id).await?;
        Ok(snapshots.into_iter().filter(|s| s.kind == kind).collect())
    }

    /// Records a single count.
    pub async fn upsert_snapshot(
        &self,
        record_id: &str,
        product_id: &str,
        kind: SnapshotKind,
        quantity_milli: i64,
    ) -> DbResult<InventorySnapshot> {
        self.upsert_snapshots(record_id, kind, &[(product_id.to_string(), quantity_milli)])
            .await?
            .into_iter()
            .find(|s| s.product_id == product_id)
            .ok_or_else(|| DbError::Internal("snapshot missing after upsert".to_string()))
    }

    /// All counts of a record, opening first, then by product name.
    pub async fn snapshots(&self, record_id: &str) -> DbResult<Vec<InventorySnapshot>> {
        let snapshots = sqlx::query_as::<_, InventorySnapshot>(
            r#"
            SELECT s.id, s.daily_record_id, s.product_id, s.kind, s.quantity_milli, s.counted_at
            FROM inventory_snapshots s
            INNER JOIN products p ON p.id = s.product_id
            WHERE s.daily_record_id = ?1
            ORDER BY CASE s.kind WHEN 'opening' THEN 0 ELSE 1 END, p.name
            "#,
        )
        .bind(record_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(snapshots)
    }

    // =========================================================================
    // Receipts
    // =========================================================================

    /// Records a delivery.
    pub async fn add_receipt(&self, receipt: &InventoryReceipt) -> DbResult<InventoryReceipt> {
        debug!(
            record_id = %receipt.daily_record_id,
            product_id = %receipt.product_id,
            quantity_milli = receipt.quantity_milli,
            "Recording receipt"
        );

        let (mut tx, _) = self.begin_on_open_day(&receipt.daily_record_id).await?;

        sqlx::query(
            r#"
            INSERT INTO inventory_receipts
                (id, daily_record_id, product_id, quantity_milli, cost_cents, supplier, received_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&receipt.id)
        .bind(&receipt.daily_record_id)
        .bind(&receipt.product_id)
        .bind(receipt.quantity_milli)
        .bind(receipt.cost_cents)
        .bind(&receipt.supplier)
        .bind(receipt.received_at)
        .execute(&mut *tx)
        .await?;

        Self::commit(tx).await?;
        Ok(receipt.clone())
    }

    pub async fn receipts(&self, record_id: &str) -> DbResult<Vec<InventoryReceipt>> {
        let receipts = sqlx::query_as::<_, InventoryReceipt>(
            r#"
            SELECT id, daily_record_id, product_id, quantity_milli, cost_cents, supplier, received_at
            FROM inventory_receipts
            WHERE daily_record_id = ?1
            ORDER BY received_at
            "#,
        )
        .bind(record_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(receipts)
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Records a point-of-sale line.
    ///
    /// The caller fills `unit_price_cents` (menu price snapshot or an
    /// explicit price).
    pub async fn add_sale(&self, sale: &SaleEntry) -> DbResult<SaleEntry> {
        debug!(
            record_id = %sale.daily_record_id,
            sales_item_id = %sale.sales_item_id,
            quantity = sale.quantity,
            "Recording sale"
        );

        let (mut tx, _) = self.begin_on_open_day(&sale.daily_record_id).await?;

        sqlx::query(
            r#"
            INSERT INTO sale_entries
                (id, daily_record_id, sales_item_id, quantity, unit_price_cents, recorded_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.daily_record_id)
        .bind(&sale.sales_item_id)
        .bind(sale.quantity)
        .bind(sale.unit_price_cents)
        .bind(sale.recorded_at)
        .execute(&mut *tx)
        .await?;

        Self::commit(tx).await?;
        Ok(sale.clone())
    }

    pub async fn sales(&self, record_id: &str) -> DbResult<Vec<SaleEntry>> {
        let sales = sqlx::query_as::<_, SaleEntry>(
            r#"
            SELECT id, daily_record_id, sales_item_id, quantity, unit_price_cents, recorded_at
            FROM sale_entries
            WHERE daily_record_id = ?1
            ORDER BY recorded_at
            "#,
        )
        .bind(record_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Removes a mistaken sale line.
    pub async fn delete_sale(&self, record_id: &str, sale_id: &str) -> DbResult<()> {
        let (mut tx, _) = self.begin_on_open_day(record_id).await?;

        let result = sqlx::query("DELETE FROM sale_entries WHERE id = ?1 AND daily_record_id = ?2")
            .bind(sale_id)
            .bind(record_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("SaleEntry", sale_id));
        }

        Self::commit(tx).await?;
        debug!(record_id = %record_id, sale_id = %sale_id, "Deleted sale");
        Ok(())
    }

    // =========================================================================
    // Expenses
    // =========================================================================

    pub async fn add_expense(&self, expense: &Expense) -> DbResult<Expense> {
        debug!(
            record_id = %expense.daily_record_id,
            category = expense.category.as_str(),
            amount_cents = expense.amount_cents,
            "Recording expense"
        );

        let (mut tx, _) = self.begin_on_open_day(&expense.daily_record_id).await?;

        sqlx::query(
            r#"
            INSERT INTO expenses
                (id, daily_record_id, category, description, amount_cents, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.daily_record_id)
        .bind(expense.category)
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(expense.created_at)
        .execute(&mut *tx)
        .await?;

        Self::commit(tx).await?;
        Ok(expense.clone())
    }

    pub async fn expenses(&self, record_id: &str) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, daily_record_id, category, description, amount_cents, created_at
            FROM expenses
            WHERE daily_record_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(record_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    pub async fn delete_expense(&self, record_id: &str, expense_id: &str) -> DbResult<()> {
        let (mut tx, _) = self.begin_on_open_day(record_id).await?;

        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1 AND daily_record_id = ?2")
            .bind(expense_id)
            .bind(record_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", expense_id));
        }

        Self::commit(tx).await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::*;
    use crate::Database;
    use bistro_core::{ExpenseCategory, Product, SalesItem, Unit};

    async fn setup() -> (Database, Product, SalesItem) {
        let db = memory_db().await;
        let beans = product("Coffee beans", Unit::Kilogram, 2400);
        db.products().insert(&beans).await.unwrap();
        let espresso = sales_item("Espresso", 300);
        db.sales_items().insert(&espresso).await.unwrap();
        (db, beans, espresso)
    }

    fn sale(record: &DailyRecord, item: &SalesItem, quantity: i64) -> SaleEntry {
        SaleEntry {
            id: generate_id(),
            daily_record_id: record.id.clone(),
            sales_item_id: item.id.clone(),
            quantity,
            unit_price_cents: item.price_cents,
            recorded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_open_day_rejects_duplicate_date() {
        let (db, _, _) = setup().await;
        let repo = db.daily_records();

        repo.open_day(date(2026, 3, 14), false, None).await.unwrap();
        let err = repo.open_day(date(2026, 3, 14), false, None).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_close_requires_closing_count() {
        let (db, beans, _) = setup().await;
        let repo = db.daily_records();
        let day = repo.open_day(date(2026, 3, 14), false, None).await.unwrap();

        let err = repo.close_day(&day.id).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));

        repo.upsert_snapshot(&day.id, &beans.id, SnapshotKind::Closing, 800)
            .await
            .unwrap();
        let closed = repo.close_day(&day.id).await.unwrap();
        assert_eq!(closed.status, DayStatus::Closed);
        assert!(closed.closed_at.is_some());

        let err = repo.close_day(&day.id).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_closed_day_is_read_only() {
        let (db, beans, espresso) = setup().await;
        let repo = db.daily_records();
        let day = repo.open_day(date(2026, 3, 14), false, None).await.unwrap();
        repo.add_sale(&sale(&day, &espresso, 2)).await.unwrap();
        repo.upsert_snapshot(&day.id, &beans.id, SnapshotKind::Closing, 800)
            .await
            .unwrap();
        repo.close_day(&day.id).await.unwrap();

        let err = repo.add_sale(&sale(&day, &espresso, 1)).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
        let err = repo
            .upsert_snapshot(&day.id, &beans.id, SnapshotKind::Closing, 700)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
        assert_eq!(repo.sales(&day.id).await.unwrap().len(), 1);

        let reopened = repo.reopen_day(&day.id).await.unwrap();
        assert_eq!(reopened.status, DayStatus::Open);
        assert!(reopened.closed_at.is_none());
        repo.add_sale(&sale(&day, &espresso, 1)).await.unwrap();
        assert_eq!(repo.sales(&day.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_carry_over_uses_latest_closed_day() {
        let (db, beans, _) = setup().await;
        let repo = db.daily_records();

        let monday = repo.open_day(date(2026, 3, 9), false, None).await.unwrap();
        repo.upsert_snapshot(&monday.id, &beans.id, SnapshotKind::Closing, 750)
            .await
            .unwrap();
        repo.close_day(&monday.id).await.unwrap();

        // Tuesday stays open, so Wednesday carries Monday's counts
        let tuesday = repo.open_day(date(2026, 3, 10), false, None).await.unwrap();
        repo.upsert_snapshot(&tuesday.id, &beans.id, SnapshotKind::Closing, 500)
            .await
            .unwrap();

        let wednesday = repo.open_day(date(2026, 3, 11), true, None).await.unwrap();
        let counts = repo.snapshots(&wednesday.id).await.unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].kind, SnapshotKind::Opening);
        assert_eq!(counts[0].quantity_milli, 750);
    }

    #[tokio::test]
    async fn test_upsert_overwrites_count() {
        let (db, beans, _) = setup().await;
        let repo = db.daily_records();
        let day = repo.open_day(date(2026, 3, 14), false, None).await.unwrap();

        repo.upsert_snapshot(&day.id, &beans.id, SnapshotKind::Opening, 1000)
            .await
            .unwrap();
        let updated = repo
            .upsert_snapshot(&day.id, &beans.id, SnapshotKind::Opening, 950)
            .await
            .unwrap();
        assert_eq!(updated.quantity_milli, 950);
        assert_eq!(repo.snapshots(&day.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_receipts_expenses_and_deletes() {
        let (db, beans, espresso) = setup().await;
        let repo = db.daily_records();
        let day = repo.open_day(date(2026, 3, 14), false, None).await.unwrap();

        repo.add_receipt(&InventoryReceipt {
            id: generate_id(),
            daily_record_id: day.id.clone(),
            product_id: beans.id.clone(),
            quantity_milli: 2000,
            cost_cents: 4800,
            supplier: Some("Roastery".to_string()),
            received_at: Utc::now(),
        })
        .await
        .unwrap();
        assert_eq!(repo.receipts(&day.id).await.unwrap().len(), 1);

        let expense = Expense {
            id: generate_id(),
            daily_record_id: day.id.clone(),
            category: ExpenseCategory::Maintenance,
            description: "Grinder burrs".to_string(),
            amount_cents: 3500,
            created_at: Utc::now(),
        };
        repo.add_expense(&expense).await.unwrap();
        assert_eq!(repo.expenses(&day.id).await.unwrap()[0].category, ExpenseCategory::Maintenance);

        repo.delete_expense(&day.id, &expense.id).await.unwrap();
        assert!(repo.expenses(&day.id).await.unwrap().is_empty());

        let entry = sale(&day, &espresso, 1);
        repo.add_sale(&entry).await.unwrap();
        let err = repo.delete_sale(&day.id, "missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        repo.delete_sale(&day.id, &entry.id).await.unwrap();
        assert!(repo.sales(&day.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_by_range() {
        let (db, _, _) = setup().await;
        let repo = db.daily_records();
        for day in 1..=5 {
            repo.open_day(date(2026, 3, day), false, None).await.unwrap();
        }

        let listed = repo.list(Some(date(2026, 3, 2)), Some(date(2026, 3, 4))).await.unwrap();
        let dates: Vec<NaiveDate> = listed.iter().map(|r| r.business_date).collect();
        assert_eq!(dates, vec![date(2026, 3, 4), date(2026, 3, 3), date(2026, 3, 2)]);

        assert_eq!(repo.list(None, None).await.unwrap().len(), 5);
        assert!(repo.get_by_date(date(2026, 3, 3)).await.unwrap().is_some());
        assert!(repo.get_by_id("missing").await.unwrap().is_none());
    }
}
