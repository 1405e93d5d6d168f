//! Inventory product endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

use bistro_core::validation::{validate_name, validate_price_cents};
use bistro_core::{Product, Unit};
use bistro_db::repository::generate_id;

use super::MAX_NAME_LEN;
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiJson, ApiQuery};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub category_id: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
}

#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub category_id: Option<String>,
    pub name: String,
    pub unit: Unit,
    /// Cost of one unit, in cents.
    pub cost_cents: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// GET /products?category_id=&include_inactive=
async fn list_products(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ProductQuery>,
) -> ApiResult<Json<Vec<Product>>> {
    let repo = state.db.products();
    let products = match params.category_id.as_deref() {
        Some(category_id) => repo.list_by_category(category_id, params.include_inactive).await?,
        None => repo.list(params.include_inactive).await?,
    };
    Ok(Json(products))
}

/// POST /products
async fn create_product(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ProductRequest>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    validate_price_cents("cost_cents", req.cost_cents)?;

    let now = Utc::now();
    let product = Product {
        id: generate_id(),
        category_id: req.category_id,
        name: validate_name("name", &req.name, MAX_NAME_LEN)?,
        unit: req.unit,
        cost_cents: req.cost_cents,
        is_active: req.is_active,
        created_at: now,
        updated_at: now,
    };

    let created = state.db.products().insert(&product).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /products/{id}
async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", id))
}

/// PUT /products/{id}
///
/// Changing the unit of a product that already has counts rescales nothing;
/// old counts keep their numbers.
async fn update_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ProductRequest>,
) -> ApiResult<Json<Product>> {
    validate_price_cents("cost_cents", req.cost_cents)?;

    let repo = state.db.products();
    let mut product = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id))?;

    product.category_id = req.category_id;
    product.name = validate_name("name", &req.name, MAX_NAME_LEN)?;
    product.unit = req.unit;
    product.cost_cents = req.cost_cents;
    product.is_active = req.is_active;

    Ok(Json(repo.update(&product).await?))
}

/// DELETE /products/{id} - soft delete
async fn delete_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.products().deactivate(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}
