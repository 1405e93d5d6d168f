//! Category endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

use bistro_core::validation::{validate_name, validate_optional_text};
use bistro_core::Category;
use bistro_db::repository::generate_id;

use super::{ListParams, MAX_NAME_LEN, MAX_TEXT_LEN};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiJson, ApiQuery};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// GET /categories
async fn list_categories(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.db.categories().list(params.include_inactive).await?;
    Ok(Json(categories))
}

/// POST /categories
async fn create_category(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let now = Utc::now();
    let category = Category {
        id: generate_id(),
        name: validate_name("name", &req.name, MAX_NAME_LEN)?,
        description: validate_optional_text("description", req.description.as_deref(), MAX_TEXT_LEN)?,
        sort_order: req.sort_order,
        is_active: req.is_active,
        created_at: now,
        updated_at: now,
    };

    let created = state.db.categories().insert(&category).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /categories/{id}
async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Category>> {
    state
        .db
        .categories()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Category", id))
}

/// PUT /categories/{id}
async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CategoryRequest>,
) -> ApiResult<Json<Category>> {
    let repo = state.db.categories();
    let mut category = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category", &id))?;

    category.name = validate_name("name", &req.name, MAX_NAME_LEN)?;
    category.description =
        validate_optional_text("description", req.description.as_deref(), MAX_TEXT_LEN)?;
    category.sort_order = req.sort_order;
    category.is_active = req.is_active;

    Ok(Json(repo.update(&category).await?))
}

/// DELETE /categories/{id} - soft delete
async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.categories().deactivate(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
}
