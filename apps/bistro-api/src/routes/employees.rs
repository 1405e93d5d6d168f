//! Employee endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use bistro_core::validation::{validate_hourly_rate_cents, validate_name, validate_optional_text};
use bistro_core::Employee;
use bistro_db::repository::generate_id;

use super::{ListParams, MAX_NAME_LEN};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiJson, ApiQuery};
use crate::AppState;

const MAX_PHONE_LEN: usize = 32;

#[derive(Debug, Deserialize)]
pub struct EmployeeRequest {
    pub full_name: String,
    pub position_id: String,
    /// Personal rate; omit to use the position rate.
    pub hourly_rate_cents: Option<i64>,
    pub phone: Option<String>,
    pub hired_on: NaiveDate,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl EmployeeRequest {
    fn validated(&self) -> ApiResult<(String, Option<String>)> {
        if let Some(rate) = self.hourly_rate_cents {
            validate_hourly_rate_cents(rate)?;
        }
        let name = validate_name("full_name", &self.full_name, MAX_NAME_LEN)?;
        let phone = validate_optional_text("phone", self.phone.as_deref(), MAX_PHONE_LEN)?;
        Ok((name, phone))
    }
}

async fn list_employees(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<Vec<Employee>>> {
    Ok(Json(state.db.employees().list(params.include_inactive).await?))
}

async fn create_employee(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<EmployeeRequest>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    let (full_name, phone) = req.validated()?;

    let now = Utc::now();
    let employee = Employee {
        id: generate_id(),
        full_name,
        position_id: req.position_id,
        hourly_rate_cents: req.hourly_rate_cents,
        phone,
        hired_on: req.hired_on,
        is_active: req.is_active,
        created_at: now,
        updated_at: now,
    };

    let created = state.db.employees().insert(&employee).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    state
        .db
        .employees()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Employee", id))
}

async fn update_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<EmployeeRequest>,
) -> ApiResult<Json<Employee>> {
    let (full_name, phone) = req.validated()?;

    let repo = state.db.employees();
    let mut employee = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Employee", &id))?;

    employee.full_name = full_name;
    employee.position_id = req.position_id;
    employee.hourly_rate_cents = req.hourly_rate_cents;
    employee.phone = phone;
    employee.hired_on = req.hired_on;
    employee.is_active = req.is_active;

    Ok(Json(repo.update(&employee).await?))
}

async fn delete_employee(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.employees().deactivate(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}
