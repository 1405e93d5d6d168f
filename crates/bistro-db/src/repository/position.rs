//! # Position Repository
//!
//! Job positions and their base hourly rates.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bistro_core::Position;

#[derive(Debug, Clone)]
pub struct PositionRepository {
    pool: SqlitePool,
}

impl PositionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PositionRepository { pool }
    }

    pub async fn list(&self, include_inactive: bool) -> DbResult<Vec<Position>> {
        let positions = sqlx::query_as::<_, Position>(
            r#"
            SELECT id, name, hourly_rate_cents, is_active, created_at, updated_at
            FROM positions
            WHERE is_active = 1 OR ?1
            ORDER BY name
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(positions)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Position>> {
        let position = sqlx::query_as::<_, Position>(
            r#"
            SELECT id, name, hourly_rate_cents, is_active, created_at, updated_at
            FROM positions
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(position)
    }

    pub async fn insert(&self, position: &Position) -> DbResult<Position> {
        debug!(name = %position.name, rate = position.hourly_rate_cents, "Inserting position");

        sqlx::query(
            r#"
            INSERT INTO positions (id, name, hourly_rate_cents, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&position.id)
        .bind(&position.name)
        .bind(position.hourly_rate_cents)
        .bind(position.is_active)
        .bind(position.created_at)
        .bind(position.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(position.clone())
    }

    /// Updates a position.
    ///
    /// A new rate applies to every wage report generated afterwards,
    /// including reports for past months.
    pub async fn update(&self, position: &Position) -> DbResult<Position> {
        debug!(id = %position.id, "Updating position");

        let result = sqlx::query(
            r#"
            UPDATE positions SET
                name = ?2,
                hourly_rate_cents = ?3,
                is_active = ?4,
                updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(&position.id)
        .bind(&position.name)
        .bind(position.hourly_rate_cents)
        .bind(position.is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Position", &position.id));
        }

        self.get_by_id(&position.id)
            .await?
            .ok_or_else(|| DbError::not_found("Position", &position.id))
    }

    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating position");

        let result = sqlx::query("UPDATE positions SET is_active = 0, updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Position", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::fixtures::*;

    #[tokio::test]
    async fn test_position_update_rate() {
        let db = memory_db().await;
        let barista = position("Barista", 1600);
        db.positions().insert(&barista).await.unwrap();

        let mut raised = barista.clone();
        raised.hourly_rate_cents = 1750;
        let updated = db.positions().update(&raised).await.unwrap();
        assert_eq!(updated.hourly_rate_cents, 1750);

        db.positions().deactivate(&barista.id).await.unwrap();
        assert!(db.positions().list(false).await.unwrap().is_empty());
    }
}
