//! # Sales Item Repository
//!
//! Menu items and their recipes.
//!
//! ## Recipes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sales_items                  recipe_components                         │
//! │  ┌──────────────┐             ┌──────────────────────────────────────┐  │
//! │  │ Latte  $4.50 │────────────►│ Coffee beans   0.018 kg              │  │
//! │  └──────────────┘             │ Milk           0.200 l               │  │
//! │                               └──────────────────────────────────────┘  │
//! │                                                                         │
//! │  set_recipe() replaces the whole component list in one transaction      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use bistro_core::{RecipeComponent, SalesItem};

/// Repository for menu items and recipes.
#[derive(Debug, Clone)]
pub struct SalesItemRepository {
    pool: SqlitePool,
}

impl SalesItemRepository {
    /// Creates a new SalesItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SalesItemRepository { pool }
    }

    /// Lists menu items sorted by name.
    pub async fn list(&self, include_inactive: bool) -> DbResult<Vec<SalesItem>> {
        let items = sqlx::query_as::<_, SalesItem>(
            r#"
            SELECT id, category_id, name, price_cents, is_active, created_at, updated_at
            FROM sales_items
            WHERE is_active = 1 OR ?1
            ORDER BY name
            "#,
        )
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = items.len(), "Listed sales items");
        Ok(items)
    }

    /// Gets a menu item by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SalesItem>> {
        let item = sqlx::query_as::<_, SalesItem>(
            r#"
            SELECT id, category_id, name, price_cents, is_active, created_at, updated_at
            FROM sales_items
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Inserts a new menu item.
    pub async fn insert(&self, item: &SalesItem) -> DbResult<SalesItem> {
        debug!(name = %item.name, price_cents = item.price_cents, "Inserting sales item");

        sqlx::query(
            r#"
            INSERT INTO sales_items (
                id, category_id, name, price_cents, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&item.id)
        .bind(&item.category_id)
        .bind(&item.name)
        .bind(item.price_cents)
        .bind(item.is_active)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(item.clone())
    }

    /// Updates an existing menu item.
    ///
    /// Recorded sales keep the price they were rung up at.
    pub async fn update(&self, item: &SalesItem) -> DbResult<SalesItem> {
        debug!(id = %item.id, "Updating sales item");

        let result = sqlx::query(
            r#"
            UPDATE sales_items SET
                category_id = ?2,
                name = ?3,
                price_cents = ?4,
                is_active = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(&item.id)
        .bind(&item.category_id)
        .bind(&item.name)
        .bind(item.price_cents)
        .bind(item.is_active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("SalesItem", &item.id));
        }

        self.get_by_id(&item.id)
            .await?
            .ok_or_else(|| DbError::not_found("SalesItem", &item.id))
    }

    /// Soft-deletes a menu item.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating sales item");

        let result =
            sqlx::query("UPDATE sales_items SET is_active = 0, updated_at = ?2 WHERE id = ?1")
                .bind(id)
                .bind(Utc::now())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("SalesItem", id));
        }

        Ok(())
    }

    // =========================================================================
    // Recipes
    // =========================================================================

    /// Replaces the recipe of a menu item.
    ///
    /// Runs in one transaction: the old components are removed and the new
    /// ones inserted, or nothing changes. An empty list clears the recipe.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - unknown menu item
    /// * `Err(DbError::ForeignKeyViolation)` - unknown product
    /// * `Err(DbError::UniqueViolation)` - product listed twice
    pub async fn set_recipe(
        &self,
        sales_item_id: &str,
        components: &[(String, i64)],
    ) -> DbResult<Vec<RecipeComponent>> {
        debug!(sales_item_id = %sales_item_id, components = components.len(), "Replacing recipe");

        let mut tx = self.pool.begin().await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sales_items WHERE id = ?1)")
                .bind(sales_item_id)
                .fetch_one(&mut *tx)
                .await?;
        if !exists {
            return Err(DbError::not_found("SalesItem", sales_item_id));
        }

        sqlx::query("DELETE FROM recipe_components WHERE sales_item_id = ?1")
            .bind(sales_item_id)
            .execute(&mut *tx)
            .await?;

        for (product_id, quantity_milli) in components {
            sqlx::query(
                r#"
                INSERT INTO recipe_components (sales_item_id, product_id, quantity_milli)
                VALUES (?1, ?2, ?3)
                "#,
            )
            .bind(sales_item_id)
            .bind(product_id)
            .bind(quantity_milli)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        self.recipe(sales_item_id).await
    }

    /// Components of one menu item's recipe.
    pub async fn recipe(&self, sales_item_id: &str) -> DbResult<Vec<RecipeComponent>> {
        let components = sqlx::query_as::<_, RecipeComponent>(
            r#"
            SELECT rc.sales_item_id, rc.product_id, rc.quantity_milli
            FROM recipe_components rc
            INNER JOIN products p ON p.id = rc.product_id
            WHERE rc.sales_item_id = ?1
            ORDER BY p.name
            "#,
        )
        .bind(sales_item_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(components)
    }

    /// Every recipe, keyed by menu item id.
    pub async fn all_recipes(&self) -> DbResult<HashMap<String, Vec<RecipeComponent>>> {
        let rows = sqlx::query_as::<_, RecipeComponent>(
            r#"
            SELECT sales_item_id, product_id, quantity_milli
            FROM recipe_components
            ORDER BY sales_item_id, product_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut recipes: HashMap<String, Vec<RecipeComponent>> = HashMap::new();
        for component in rows {
            recipes
                .entry(component.sales_item_id.clone())
                .or_default()
                .push(component);
        }

        debug!(items = recipes.len(), "Loaded all recipes");
        Ok(recipes)
    }
}
