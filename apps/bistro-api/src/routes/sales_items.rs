//! Menu item and recipe endpoints

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use bistro_core::validation::{validate_name, validate_price_cents, validate_quantity_milli};
use bistro_core::{CoreError, RecipeComponent, SalesItem};
use bistro_db::repository::generate_id;

use super::{ListParams, MAX_NAME_LEN};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiJson, ApiQuery};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SalesItemRequest {
    pub category_id: Option<String>,
    pub name: String,
    pub price_cents: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct ComponentRequest {
    pub product_id: String,
    /// Thousandths of the product's unit per item sold.
    pub quantity_milli: i64,
}

#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    pub components: Vec<ComponentRequest>,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub sales_item_id: String,
    pub components: Vec<RecipeComponent>,
}

/// GET /sales-items
async fn list_items(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<Vec<SalesItem>>> {
    Ok(Json(state.db.sales_items().list(params.include_inactive).await?))
}

/// POST /sales-items
async fn create_item(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<SalesItemRequest>,
) -> ApiResult<(StatusCode, Json<SalesItem>)> {
    validate_price_cents("price_cents", req.price_cents)?;

    let now = Utc::now();
    let item = SalesItem {
        id: generate_id(),
        category_id: req.category_id,
        name: validate_name("name", &req.name, MAX_NAME_LEN)?,
        price_cents: req.price_cents,
        is_active: req.is_active,
        created_at: now,
        updated_at: now,
    };

    let created = state.db.sales_items().insert(&item).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /sales-items/{id}
async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SalesItem>> {
    state
        .db
        .sales_items()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("SalesItem", id))
}

/// PUT /sales-items/{id}
async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<SalesItemRequest>,
) -> ApiResult<Json<SalesItem>> {
    validate_price_cents("price_cents", req.price_cents)?;

    let repo = state.db.sales_items();
    let mut item = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("SalesItem", &id))?;

    item.category_id = req.category_id;
    item.name = validate_name("name", &req.name, MAX_NAME_LEN)?;
    item.price_cents = req.price_cents;
    item.is_active = req.is_active;

    Ok(Json(repo.update(&item).await?))
}

/// DELETE /sales-items/{id} - soft delete
async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.sales_items().deactivate(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /sales-items/{id}/recipe
async fn get_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<RecipeResponse>> {
    let repo = state.db.sales_items();
    if repo.get_by_id(&id).await?.is_none() {
        return Err(ApiError::not_found("SalesItem", id));
    }

    let components = repo.recipe(&id).await?;
    Ok(Json(RecipeResponse {
        sales_item_id: id,
        components,
    }))
}

/// PUT /sales-items/{id}/recipe - replaces the whole recipe
async fn put_recipe(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<RecipeRequest>,
) -> ApiResult<Json<RecipeResponse>> {
    let mut seen = HashSet::new();
    let mut components = Vec::with_capacity(req.components.len());
    for component in req.components {
        validate_quantity_milli("quantity_milli", component.quantity_milli, false)?;
        if !seen.insert(component.product_id.clone()) {
            return Err(CoreError::DuplicateRecipeComponent {
                product_id: component.product_id,
            }
            .into());
        }
        components.push((component.product_id, component.quantity_milli));
    }

    let components = state.db.sales_items().set_recipe(&id, &components).await?;
    Ok(Json(RecipeResponse {
        sales_item_id: id,
        components,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sales-items", get(list_items).post(create_item))
        .route(
            "/sales-items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/sales-items/{id}/recipe", get(get_recipe).put(put_recipe))
}
