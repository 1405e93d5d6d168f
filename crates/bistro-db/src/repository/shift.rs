//! # Shift Repository
//!
//! Shift templates (recurring patterns) and concrete shifts.
//!
//! ## Shift States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │              complete_shift()                                           │
//! │  scheduled ───────────────────► completed ──┐ complete_shift()          │
//! │     │                              ▲        │ (correct minutes)         │
//! │     │                              └────────┘                           │
//! │     │ set_status(cancelled)                                             │
//! │     ├───────────────────────► cancelled                                 │
//! │     │ set_status(no_show)                                               │
//! │     └───────────────────────► no_show                                   │
//! │                                                                         │
//! │  Only scheduled and completed shifts occupy the employee's time.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inserts and time edits check for overlapping shifts of the same employee
//! inside the write transaction.

use chrono::{Duration, NaiveDate, Utc};
use sqlx::{Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use bistro_core::schedule::find_overlap;
use bistro_core::{CoreError, Shift, ShiftStatus, ShiftTemplate};

/// Repository for scheduling.
#[derive(Debug, Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

/// Shifts of one employee starting the day before through the day after
/// `date`; enough to catch overnight overlaps.
async fn shifts_around<'e, E>(executor: E, employee_id: &str, date: NaiveDate) -> DbResult<Vec<Shift>>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    let shifts = sqlx::query_as::<_, Shift>(
        r#"
        SELECT id, employee_id, template_id, shift_date, start_time, end_time,
               status, actual_minutes, notes, created_at, updated_at
        FROM shifts
        WHERE employee_id = ?1 AND shift_date BETWEEN ?2 AND ?3
        "#,
    )
    .bind(employee_id)
    .bind(date - Duration::days(1))
    .bind(date + Duration::days(1))
    .fetch_all(executor)
    .await?;

    Ok(shifts)
}

fn overlap_conflict(shift: &Shift, existing: &[Shift]) -> DbResult<()> {
    let slot = (shift.shift_date, shift.start_time, shift.end_time);
    if let Some(blocking) = find_overlap(&shift.employee_id, slot, existing, Some(shift.id.as_str())) {
        debug!(shift_id = %shift.id, blocking_id = %blocking.id, "Shift overlaps");
        let err = CoreError::ShiftOverlap {
            employee_id: shift.employee_id.clone(),
            date: shift.shift_date.to_string(),
        };
        return Err(DbError::conflict(err.to_string()));
    }
    Ok(())
}

fn invalid_status(shift: &Shift, action: &str) -> DbError {
    let err = CoreError::InvalidShiftStatus {
        shift_id: shift.id.clone(),
        status: shift.status.as_str().to_string(),
        action: action.to_string(),
    };
    DbError::conflict(err.to_string())
}

impl ShiftRepository {
    /// Creates a new ShiftRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShiftRepository { pool }
    }

    // =========================================================================
    // Templates
    // =========================================================================

    /// Lists templates ordered by start time, then name.
    pub async fn list_templates(&self, include_inactive: bool) -> DbResult<Vec<ShiftTemplate>> {
        let templates = sqlx::query_as::<_, ShiftTemplate>(
            r#"
            SELECT id, name, position_id, weekday_mask, start_time, end_time,
                   is_active, created_at, updated_at
            FROM shift_templates
            WHERE is_active = 1 OR ?1
            ORDER BY start_time, name
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(templates)
    }

    pub async fn get_template(&self, id: &str) -> DbResult<Option<ShiftTemplate>> {
        let template = sqlx::query_as::<_, ShiftTemplate>(
            r#"
            SELECT id, name, position_id, weekday_mask, start_time, end_time,
                   is_active, created_at, updated_at
            FROM shift_templates
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(template)
    }

    pub async fn insert_template(&self, template: &ShiftTemplate) -> DbResult<ShiftTemplate> {
        debug!(name = %template.name, mask = template.weekday_mask, "Inserting shift template");

        sqlx::query(
            r#"
            INSERT INTO shift_templates (
                id, name, position_id, weekday_mask, start_time, end_time,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&template.id)
        .bind(&template.name)
        .bind(&template.position_id)
        .bind(template.weekday_mask)
        .bind(template.start_time)
        .bind(template.end_time)
        .bind(template.is_active)
        .bind(template.created_at)
        .bind(template.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(template.clone())
    }

    /// Updates a template. Shifts already generated from it keep their times.
    pub async fn update_template(&self, template: &ShiftTemplate) -> DbResult<ShiftTemplate> {
        debug!(id = %template.id, "Updating shift template");

        let result = sqlx::query(
            r#"
            UPDATE shift_templates SET
                name = ?2,
                position_id = ?3,
                weekday_mask = ?4,
                start_time = ?5,
                end_time = ?6,
                is_active = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&template.id)
        .bind(&template.name)
        .bind(&template.position_id)
        .bind(template.weekday_mask)
        .bind(template.start_time)
        .bind(template.end_time)
        .bind(template.is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ShiftTemplate", &template.id));
        }

        self.get_template(&template.id)
            .await?
            .ok_or_else(|| DbError::not_found("ShiftTemplate", &template.id))
    }

    pub async fn deactivate_template(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating shift template");

        let result =
            sqlx::query("UPDATE shift_templates SET is_active = 0, updated_at = ?2 WHERE id = ?1")
                .bind(id)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("ShiftTemplate", id));
        }

        Ok(())
    }

    // =========================================================================
    // Shifts
    // =========================================================================

    /// Lists shifts with `from <= shift_date <= to`, optionally for one
    /// employee, ordered by date and start time.
    pub async fn list_shifts(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        employee_id: Option<&str>,
    ) -> DbResult<Vec<Shift>> {
        let shifts = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, employee_id, template_id, shift_date, start_time, end_time,
                   status, actual_minutes, notes, created_at, updated_at
            FROM shifts
            WHERE shift_date BETWEEN ?1 AND ?2
              AND (?3 IS NULL OR employee_id = ?3)
            ORDER BY shift_date, start_time
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(from = %from, to = %to, count = shifts.len(), "Listed shifts");
        Ok(shifts)
    }

    pub async fn get_shift(&self, id: &str) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, employee_id, template_id, shift_date, start_time, end_time,
                   status, actual_minutes, notes, created_at, updated_at
            FROM shifts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Inserts a shift.
    ///
    /// ## Returns
    /// * `Err(DbError::Conflict)` - the employee already works at that time
    /// * `Err(DbError::ForeignKeyViolation)` - unknown employee or template
    pub async fn insert_shift(&self, shift: &Shift) -> DbResult<Shift> {
        debug!(
            employee_id = %shift.employee_id,
            date = %shift.shift_date,
            "Inserting shift"
        );

        let mut tx = self.pool.begin().await?;

        if shift.status.blocks_slot() {
            let existing = shifts_around(&mut *tx, &shift.employee_id, shift.shift_date).await?;
            overlap_conflict(shift, &existing)?;
        }

        Self::insert_row(&mut tx, shift).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(shift.clone())
    }

    async fn insert_row(tx: &mut sqlx::Transaction<'static, Sqlite>, shift: &Shift) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO shifts (
                id, employee_id, template_id, shift_date, start_time, end_time,
                status, actual_minutes, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&shift.id)
        .bind(&shift.employee_id)
        .bind(&shift.template_id)
        .bind(shift.shift_date)
        .bind(shift.start_time)
        .bind(shift.end_time)
        .bind(shift.status)
        .bind(shift.actual_minutes)
        .bind(&shift.notes)
        .bind(shift.created_at)
        .bind(shift.updated_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Inserts a batch of generated shifts, all or nothing.
    ///
    /// Every row is checked for overlaps inside the transaction, against
    /// stored shifts and rows inserted earlier in the batch. A shift
    /// written between planning and insert fails the whole batch with
    /// `DbError::Conflict`.
    pub async fn insert_many(&self, shifts: &[Shift]) -> DbResult<usize> {
        let mut tx = self.pool.begin().await?;

        for shift in shifts {
            if shift.status.blocks_slot() {
                let existing =
                    shifts_around(&mut *tx, &shift.employee_id, shift.shift_date).await?;
                overlap_conflict(shift, &existing)?;
            }
            Self::insert_row(&mut tx, shift).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(count = shifts.len(), "Inserted generated shifts");
        Ok(shifts.len())
    }

    /// Updates employee, date, times and notes of a scheduled shift.
    pub async fn update_shift(&self, shift: &Shift) -> DbResult<Shift> {
        debug!(id = %shift.id, "Updating shift");

        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, employee_id, template_id, shift_date, start_time, end_time,
                   status, actual_minutes, notes, created_at, updated_at
            FROM shifts
            WHERE id = ?1
            "#,
        )
        .bind(&shift.id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Shift", &shift.id))?;

        if current.status != ShiftStatus::Scheduled {
            return Err(invalid_status(&current, "edit"));
        }

        let existing = shifts_around(&mut *tx, &shift.employee_id, shift.shift_date).await?;
        overlap_conflict(shift, &existing)?;

        sqlx::query(
            r#"
            UPDATE shifts SET
                employee_id = ?2,
                shift_date = ?3,
                start_time = ?4,
                end_time = ?5,
                notes = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&shift.id)
        .bind(&shift.employee_id)
        .bind(shift.shift_date)
        .bind(shift.start_time)
        .bind(shift.end_time)
        .bind(&shift.notes)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        self.get_shift(&shift.id)
            .await?
            .ok_or_else(|| DbError::not_found("Shift", &shift.id))
    }

    /// Marks a shift worked.
    ///
    /// `actual_minutes` of `None` means "as scheduled". A completed shift
    /// can be completed again to correct its minutes.
    pub async fn complete_shift(&self, id: &str, actual_minutes: Option<i64>) -> DbResult<Shift> {
        let current = self
            .get_shift(id)
            .await?
            .ok_or_else(|| DbError::not_found("Shift", id))?;

        if !matches!(current.status, ShiftStatus::Scheduled | ShiftStatus::Completed) {
            return Err(invalid_status(&current, "complete"));
        }

        sqlx::query(
            r#"
            UPDATE shifts SET status = 'completed', actual_minutes = ?2, updated_at = ?3
            WHERE id = ?1 AND status IN ('scheduled', 'completed')
            "#,
        )
        .bind(id)
        .bind(actual_minutes)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        info!(id = %id, actual_minutes = ?actual_minutes, "Completed shift");

        self.get_shift(id)
            .await?
            .ok_or_else(|| DbError::not_found("Shift", id))
    }

    /// Cancels a scheduled shift or marks it a no-show.
    pub async fn set_status(&self, id: &str, status: ShiftStatus) -> DbResult<Shift> {
        let current = self
            .get_shift(id)
            .await?
            .ok_or_else(|| DbError::not_found("Shift", id))?;

        let allowed = matches!(status, ShiftStatus::Cancelled | ShiftStatus::NoShow)
            && current.status == ShiftStatus::Scheduled;
        if !allowed {
            return Err(invalid_status(&current, &format!("become {}", status.as_str())));
        }

        sqlx::query("UPDATE shifts SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        info!(id = %id, status = status.as_str(), "Changed shift status");

        self.get_shift(id)
            .await?
            .ok_or_else(|| DbError::not_found("Shift", id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::*;
    use crate::repository::generate_id;
    use crate::Database;
    use bistro_core::WeekdaySet;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    async fn setup() -> (Database, String) {
        let db = memory_db().await;
        let barista = position("Barista", 1600);
        db.positions().insert(&barista).await.unwrap();
        let olena = employee("Olena", &barista.id, None);
        db.employees().insert(&olena).await.unwrap();
        (db, olena.id)
    }

    fn shift(employee_id: &str, day: NaiveDate, start: NaiveTime, end: NaiveTime) -> Shift {
        Shift {
            id: generate_id(),
            employee_id: employee_id.to_string(),
            template_id: None,
            shift_date: day,
            start_time: start,
            end_time: end,
            status: ShiftStatus::Scheduled,
            actual_minutes: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_template_crud() {
        let db = memory_db().await;
        let repo = db.shifts();
        let morning = ShiftTemplate {
            id: generate_id(),
            name: "Morning".to_string(),
            position_id: None,
            weekday_mask: WeekdaySet::ALL.mask() as i64,
            start_time: t(7, 0),
            end_time: t(15, 0),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        repo.insert_template(&morning).await.unwrap();

        let mut weekdays = morning.clone();
        weekdays.weekday_mask = 0b001_1111;
        let updated = repo.update_template(&weekdays).await.unwrap();
        assert_eq!(updated.weekday_mask, 31);

        repo.deactivate_template(&morning.id).await.unwrap();
        assert!(repo.list_templates(false).await.unwrap().is_empty());
        assert_eq!(repo.list_templates(true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_overnight_overlap_rejected() {
        let (db, olena) = setup().await;
        let repo = db.shifts();

        repo.insert_shift(&shift(&olena, date(2026, 3, 13), t(22, 0), t(6, 0)))
            .await
            .unwrap();

        let err = repo
            .insert_shift(&shift(&olena, date(2026, 3, 14), t(5, 0), t(13, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));

        // Back-to-back is fine
        repo.insert_shift(&shift(&olena, date(2026, 3, 14), t(6, 0), t(14, 0)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_shift_frees_slot() {
        let (db, olena) = setup().await;
        let repo = db.shifts();
        let first = shift(&olena, date(2026, 3, 14), t(8, 0), t(16, 0));
        repo.insert_shift(&first).await.unwrap();

        let cancelled = repo.set_status(&first.id, ShiftStatus::Cancelled).await.unwrap();
        assert_eq!(cancelled.status, ShiftStatus::Cancelled);

        repo.insert_shift(&shift(&olena, date(2026, 3, 14), t(9, 0), t(17, 0)))
            .await
            .unwrap();

        let err = repo.complete_shift(&first.id, None).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_complete_and_correct_minutes() {
        let (db, olena) = setup().await;
        let repo = db.shifts();
        let s = shift(&olena, date(2026, 3, 14), t(8, 0), t(16, 0));
        repo.insert_shift(&s).await.unwrap();

        let done = repo.complete_shift(&s.id, Some(450)).await.unwrap();
        assert_eq!(done.status, ShiftStatus::Completed);
        assert_eq!(done.worked_minutes(), 450);

        let corrected = repo.complete_shift(&s.id, None).await.unwrap();
        assert_eq!(corrected.worked_minutes(), 480);

        let err = repo.set_status(&s.id, ShiftStatus::NoShow).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_checks_overlap_and_status() {
        let (db, olena) = setup().await;
        let repo = db.shifts();
        let morning = shift(&olena, date(2026, 3, 14), t(7, 0), t(12, 0));
        let evening = shift(&olena, date(2026, 3, 14), t(16, 0), t(22, 0));
        repo.insert_shift(&morning).await.unwrap();
        repo.insert_shift(&evening).await.unwrap();

        let mut longer = morning.clone();
        longer.end_time = t(15, 0);
        let updated = repo.update_shift(&longer).await.unwrap();
        assert_eq!(updated.end_time, t(15, 0));

        let mut clash = morning.clone();
        clash.end_time = t(17, 0);
        let err = repo.update_shift(&clash).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_insert_many_and_list() {
        let (db, olena) = setup().await;
        let repo = db.shifts();
        let batch: Vec<Shift> = (9..=13)
            .map(|d| shift(&olena, date(2026, 3, d), t(8, 0), t(16, 0)))
            .collect();

        assert_eq!(repo.insert_many(&batch).await.unwrap(), 5);

        let listed = repo
            .list_shifts(date(2026, 3, 10), date(2026, 3, 12), Some(&olena))
            .await
            .unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[0].shift_date, date(2026, 3, 10));

        let nobody = repo
            .list_shifts(date(2026, 3, 1), date(2026, 3, 31), Some("someone-else"))
            .await
            .unwrap();
        assert!(nobody.is_empty());
    }

    #[tokio::test]
    async fn test_insert_many_is_atomic() {
        let (db, olena) = setup().await;
        let repo = db.shifts();
        let batch = vec![
            shift(&olena, date(2026, 3, 9), t(8, 0), t(16, 0)),
            shift("missing-employee", date(2026, 3, 10), t(8, 0), t(16, 0)),
        ];

        assert!(repo.insert_many(&batch).await.is_err());
        let listed = repo
            .list_shifts(date(2026, 3, 1), date(2026, 3, 31), None)
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_insert_many_rejects_slot_taken_since_planning() {
        let (db, olena) = setup().await;
        let repo = db.shifts();
        repo.insert_shift(&shift(&olena, date(2026, 3, 10), t(12, 0), t(20, 0)))
            .await
            .unwrap();

        let batch = vec![
            shift(&olena, date(2026, 3, 9), t(8, 0), t(16, 0)),
            shift(&olena, date(2026, 3, 10), t(8, 0), t(16, 0)),
        ];
        let err = repo.insert_many(&batch).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));

        let listed = repo
            .list_shifts(date(2026, 3, 1), date(2026, 3, 31), Some(&olena))
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].start_time, t(12, 0));
    }

    #[tokio::test]
    async fn test_insert_many_rejects_overlap_within_batch() {
        let (db, olena) = setup().await;
        let repo = db.shifts();
        let batch = vec![
            shift(&olena, date(2026, 3, 9), t(22, 0), t(6, 0)),
            shift(&olena, date(2026, 3, 10), t(5, 0), t(13, 0)),
        ];

        let err = repo.insert_many(&batch).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict(_)));
        let listed = repo
            .list_shifts(date(2026, 3, 1), date(2026, 3, 31), None)
            .await
            .unwrap();
        assert!(listed.is_empty());
    }
}
