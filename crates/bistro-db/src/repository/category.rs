//! # Category Repository
//!
//! Categories group products and menu items. They are never hard-deleted;
//! deactivation hides them from default listings.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bistro_core::Category;

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists categories ordered by `sort_order`, then name.
    pub async fn list(&self, include_inactive: bool) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, sort_order, is_active, created_at, updated_at
            FROM categories
            WHERE is_active = 1 OR ?1
            ORDER BY sort_order, name
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = categories.len(), "Listed categories");
        Ok(categories)
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, sort_order, is_active, created_at, updated_at
            FROM categories
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Inserts a new category.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - name already taken
    pub async fn insert(&self, category: &Category) -> DbResult<Category> {
        debug!(name = %category.name, "Inserting category");

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, description, sort_order, is_active, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.sort_order)
        .bind(category.is_active)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(category.clone())
    }

    /// Updates name, description, ordering and active flag.
    pub async fn update(&self, category: &Category) -> DbResult<Category> {
        debug!(id = %category.id, "Updating category");

        let result = sqlx::query(
            r#"
            UPDATE categories SET
                name = ?2,
                description = ?3,
                sort_order = ?4,
                is_active = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.sort_order)
        .bind(category.is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", &category.id));
        }

        self.get_by_id(&category.id)
            .await?
            .ok_or_else(|| DbError::not_found("Category", &category.id))
    }

    /// Soft-deletes a category.
    ///
    /// Products and menu items keep their reference; historical reports
    /// still resolve the name.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating category");

        let result = sqlx::query("UPDATE categories SET is_active = 0, updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::fixtures::*;
    use crate::DbError;

    #[tokio::test]
    async fn test_insert_list_and_deactivate() {
        let db = memory_db().await;
        let repo = db.categories();

        let mut pastry = category("Pastry");
        pastry.sort_order = 2;
        let coffee = category("Coffee");
        repo.insert(&pastry).await.unwrap();
        repo.insert(&coffee).await.unwrap();

        let names: Vec<String> = repo.list(false).await.unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Coffee", "Pastry"]);

        repo.deactivate(&coffee.id).await.unwrap();
        assert_eq!(repo.list(false).await.unwrap().len(), 1);
        assert_eq!(repo.list(true).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let db = memory_db().await;
        let repo = db.categories();

        repo.insert(&category("Coffee")).await.unwrap();
        let err = repo.insert(&category("Coffee")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_missing_category() {
        let db = memory_db().await;
        let err = db.categories().update(&category("Ghost")).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
