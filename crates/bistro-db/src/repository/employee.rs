//! # Employee Repository
//!
//! Employees and the rate each one is actually paid at.
//!
//! ## Effective Rate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  employees.hourly_rate_cents    positions.hourly_rate_cents             │
//! │            │                               │                            │
//! │            └──────── COALESCE(e, p) ───────┘                            │
//! │                          │                                              │
//! │                          ▼                                              │
//! │                  EmployeeRate.rate_cents → wage engine                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bistro_core::{Employee, EmployeeRate};

/// Repository for employee database operations.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    pool: SqlitePool,
}

impl EmployeeRepository {
    /// Creates a new EmployeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        EmployeeRepository { pool }
    }

    /// Lists employees sorted by name.
    pub async fn list(&self, include_inactive: bool) -> DbResult<Vec<Employee>> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, full_name, position_id, hourly_rate_cents, phone, hired_on,
                   is_active, created_at, updated_at
            FROM employees
            WHERE is_active = 1 OR ?1
            ORDER BY full_name
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(employees)
    }

    /// Gets an employee by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Employee>> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, full_name, position_id, hourly_rate_cents, phone, hired_on,
                   is_active, created_at, updated_at
            FROM employees
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    /// Inserts a new employee.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - unknown position
    pub async fn insert(&self, employee: &Employee) -> DbResult<Employee> {
        debug!(name = %employee.full_name, position_id = %employee.position_id, "Inserting employee");

        sqlx::query(
            r#"
            INSERT INTO employees (
                id, full_name, position_id, hourly_rate_cents, phone, hired_on,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.full_name)
        .bind(&employee.position_id)
        .bind(employee.hourly_rate_cents)
        .bind(&employee.phone)
        .bind(employee.hired_on)
        .bind(employee.is_active)
        .bind(employee.created_at)
        .bind(employee.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(employee.clone())
    }

    /// Updates an existing employee.
    pub async fn update(&self, employee: &Employee) -> DbResult<Employee> {
        debug!(id = %employee.id, "Updating employee");

        let result = sqlx::query(
            r#"
            UPDATE employees SET
                full_name = ?2,
                position_id = ?3,
                hourly_rate_cents = ?4,
                phone = ?5,
                hired_on = ?6,
                is_active = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&employee.id)
        .bind(&employee.full_name)
        .bind(&employee.position_id)
        .bind(employee.hourly_rate_cents)
        .bind(&employee.phone)
        .bind(employee.hired_on)
        .bind(employee.is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Employee", &employee.id));
        }

        self.get_by_id(&employee.id)
            .await?
            .ok_or_else(|| DbError::not_found("Employee", &employee.id))
    }

    /// Marks an employee as no longer working here.
    ///
    /// Their past shifts still count in wage reports.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating employee");

        let result = sqlx::query("UPDATE employees SET is_active = 0, updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Employee", id));
        }

        Ok(())
    }

    /// Every employee (active or not) with the rate they are paid at.
    pub async fn effective_rates(&self) -> DbResult<Vec<EmployeeRate>> {
        let rates = sqlx::query_as::<_, EmployeeRate>(
            r#"
            SELECT
                e.id AS employee_id,
                e.full_name,
                p.name AS position_name,
                COALESCE(e.hourly_rate_cents, p.hourly_rate_cents) AS rate_cents
            FROM employees e
            INNER JOIN positions p ON p.id = e.position_id
            ORDER BY e.full_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rates.len(), "Loaded effective rates");
        Ok(rates)
    }
}
