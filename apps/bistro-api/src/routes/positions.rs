//! Position endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

use bistro_core::validation::{validate_hourly_rate_cents, validate_name};
use bistro_core::Position;
use bistro_db::repository::generate_id;

use super::{ListParams, MAX_NAME_LEN};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiJson, ApiQuery};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PositionRequest {
    pub name: String,
    pub hourly_rate_cents: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

async fn list_positions(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<Vec<Position>>> {
    Ok(Json(state.db.positions().list(params.include_inactive).await?))
}

async fn create_position(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<PositionRequest>,
) -> ApiResult<(StatusCode, Json<Position>)> {
    validate_hourly_rate_cents(req.hourly_rate_cents)?;

    let now = Utc::now();
    let position = Position {
        id: generate_id(),
        name: validate_name("name", &req.name, MAX_NAME_LEN)?,
        hourly_rate_cents: req.hourly_rate_cents,
        is_active: req.is_active,
        created_at: now,
        updated_at: now,
    };

    let created = state.db.positions().insert(&position).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_position(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Position>> {
    state
        .db
        .positions()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Position", id))
}

async fn update_position(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<PositionRequest>,
) -> ApiResult<Json<Position>> {
    validate_hourly_rate_cents(req.hourly_rate_cents)?;

    let repo = state.db.positions();
    let mut position = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Position", &id))?;

    position.name = validate_name("name", &req.name, MAX_NAME_LEN)?;
    position.hourly_rate_cents = req.hourly_rate_cents;
    position.is_active = req.is_active;

    Ok(Json(repo.update(&position).await?))
}

async fn delete_position(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.positions().deactivate(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/positions", get(list_positions).post(create_position))
        .route(
            "/positions/{id}",
            get(get_position).put(update_position).delete(delete_position),
        )
}
