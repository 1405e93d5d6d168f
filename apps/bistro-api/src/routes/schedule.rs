//! # Scheduling Endpoints
//!
//! ```text
//! GET|POST       /shift-templates
//! PUT|DELETE     /shift-templates/{id}
//! POST           /shift-templates/generate     expand + assign over a range
//! GET|POST       /shifts?from=&to=&employee_id=
//! GET|PUT|DELETE /shifts/{id}                  DELETE cancels
//! POST           /shifts/{id}/complete
//! POST           /shifts/{id}/no-show
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use bistro_core::schedule::{expand_templates, plan_assignments, ScheduleConflict, TemplateAssignment};
use bistro_core::validation::{
    validate_actual_minutes, validate_date_order, validate_date_range, validate_name,
    validate_optional_text,
    validate_shift_times, validate_weekday_mask,
};
use bistro_core::{Shift, ShiftStatus, ShiftTemplate};
use bistro_db::repository::generate_id;

use super::{ListParams, MAX_NAME_LEN, MAX_TEXT_LEN};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiJson, ApiQuery};
use crate::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct TemplateRequest {
    pub name: String,
    pub position_id: Option<String>,
    /// Bit 0 = Monday .. bit 6 = Sunday.
    pub weekday_mask: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub assignments: Vec<TemplateAssignment>,
    /// Plan without inserting.
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub dry_run: bool,
    pub created: usize,
    pub shifts: Vec<Shift>,
    pub conflicts: Vec<ScheduleConflict>,
}

#[derive(Debug, Deserialize)]
pub struct ShiftQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub employee_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ShiftRequest {
    pub employee_id: String,
    pub template_id: Option<String>,
    pub shift_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompleteRequest {
    /// Omit when the shift was worked as scheduled.
    pub actual_minutes: Option<i64>,
}

// =============================================================================
// Templates
// =============================================================================

async fn list_templates(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<Vec<ShiftTemplate>>> {
    Ok(Json(state.db.shifts().list_templates(params.include_inactive).await?))
}

async fn create_template(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<TemplateRequest>,
) -> ApiResult<(StatusCode, Json<ShiftTemplate>)> {
    validate_shift_times(req.start_time, req.end_time)?;
    let weekdays = validate_weekday_mask(req.weekday_mask)?;

    let now = Utc::now();
    let template = ShiftTemplate {
        id: generate_id(),
        name: validate_name("name", &req.name, MAX_NAME_LEN)?,
        position_id: req.position_id,
        weekday_mask: i64::from(weekdays.mask()),
        start_time: req.start_time,
        end_time: req.end_time,
        is_active: req.is_active,
        created_at: now,
        updated_at: now,
    };

    let created = state.db.shifts().insert_template(&template).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<TemplateRequest>,
) -> ApiResult<Json<ShiftTemplate>> {
    validate_shift_times(req.start_time, req.end_time)?;
    let weekdays = validate_weekday_mask(req.weekday_mask)?;

    let repo = state.db.shifts();
    let mut template = repo
        .get_template(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("ShiftTemplate", &id))?;

    template.name = validate_name("name", &req.name, MAX_NAME_LEN)?;
    template.position_id = req.position_id;
    template.weekday_mask = i64::from(weekdays.mask());
    template.start_time = req.start_time;
    template.end_time = req.end_time;
    template.is_active = req.is_active;

    Ok(Json(repo.update_template(&template).await?))
}

async fn delete_template(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.shifts().deactivate_template(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /shift-templates/generate
///
/// Slots that overlap an employee's existing shifts, or a slot generated
/// earlier in the same run, are reported as conflicts and skipped.
async fn generate(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> ApiResult<(StatusCode, Json<GenerateResponse>)> {
    validate_date_range(req.from, req.to)?;

    let repo = state.db.shifts();
    let templates = repo.list_templates(false).await?;

    let known: HashSet<&str> = templates.iter().map(|t| t.id.as_str()).collect();
    if let Some(unknown) = req
        .assignments
        .iter()
        .find(|a| !known.contains(a.template_id.as_str()))
    {
        return Err(ApiError::InvalidReference(format!(
            "Unknown or inactive shift template: {}",
            unknown.template_id
        )));
    }

    // Night shifts of the day before can reach into the range.
    let window_from = req.from.pred_opt().unwrap_or(req.from);
    let window_to = req.to.succ_opt().unwrap_or(req.to);
    let existing = repo.list_shifts(window_from, window_to, None).await?;

    let planned = expand_templates(&templates, req.from, req.to);
    let plan = plan_assignments(&planned, &req.assignments, &existing);

    let now = Utc::now();
    let shifts: Vec<Shift> = plan
        .new_shifts
        .into_iter()
        .map(|s| Shift {
            id: generate_id(),
            employee_id: s.employee_id,
            template_id: s.template_id,
            shift_date: s.shift_date,
            start_time: s.start_time,
            end_time: s.end_time,
            status: ShiftStatus::Scheduled,
            actual_minutes: None,
            notes: None,
            created_at: now,
            updated_at: now,
        })
        .collect();

    let created = if req.dry_run {
        0
    } else {
        repo.insert_many(&shifts).await?
    };

    info!(
        from = %req.from,
        to = %req.to,
        planned = shifts.len(),
        created,
        conflicts = plan.conflicts.len(),
        dry_run = req.dry_run,
        "Generated schedule"
    );

    let status = if req.dry_run {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(GenerateResponse {
            dry_run: req.dry_run,
            created,
            shifts,
            conflicts: plan.conflicts,
        }),
    ))
}

// =============================================================================
// Shifts
// =============================================================================

async fn list_shifts(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ShiftQuery>,
) -> ApiResult<Json<Vec<Shift>>> {
    validate_date_order(params.from, params.to)?;
    let shifts = state
        .db
        .shifts()
        .list_shifts(params.from, params.to, params.employee_id.as_deref())
        .await?;
    Ok(Json(shifts))
}

async fn create_shift(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ShiftRequest>,
) -> ApiResult<(StatusCode, Json<Shift>)> {
    validate_shift_times(req.start_time, req.end_time)?;

    let now = Utc::now();
    let shift = Shift {
        id: generate_id(),
        employee_id: req.employee_id,
        template_id: req.template_id,
        shift_date: req.shift_date,
        start_time: req.start_time,
        end_time: req.end_time,
        status: ShiftStatus::Scheduled,
        actual_minutes: None,
        notes: validate_optional_text("notes", req.notes.as_deref(), MAX_TEXT_LEN)?,
        created_at: now,
        updated_at: now,
    };

    let created = state.db.shifts().insert_shift(&shift).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_shift(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Shift>> {
    state
        .db
        .shifts()
        .get_shift(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Shift", id))
}

/// PUT /shifts/{id} - reschedule; only scheduled shifts can move
async fn update_shift(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ShiftRequest>,
) -> ApiResult<Json<Shift>> {
    validate_shift_times(req.start_time, req.end_time)?;

    let repo = state.db.shifts();
    let mut shift = repo
        .get_shift(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Shift", &id))?;

    shift.employee_id = req.employee_id;
    shift.template_id = req.template_id;
    shift.shift_date = req.shift_date;
    shift.start_time = req.start_time;
    shift.end_time = req.end_time;
    shift.notes = validate_optional_text("notes", req.notes.as_deref(), MAX_TEXT_LEN)?;

    Ok(Json(repo.update_shift(&shift).await?))
}

/// DELETE /shifts/{id} - cancels; the row stays for history
async fn cancel_shift(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.db.shifts().set_status(&id, ShiftStatus::Cancelled).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn complete_shift(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CompleteRequest>,
) -> ApiResult<Json<Shift>> {
    if let Some(minutes) = req.actual_minutes {
        validate_actual_minutes(minutes)?;
    }
    Ok(Json(state.db.shifts().complete_shift(&id, req.actual_minutes).await?))
}

async fn no_show(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Shift>> {
    Ok(Json(state.db.shifts().set_status(&id, ShiftStatus::NoShow).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shift-templates", get(list_templates).post(create_template))
        .route("/shift-templates/generate", post(generate))
        .route(
            "/shift-templates/{id}",
            put(update_template).delete(delete_template),
        )
        .route("/shifts", get(list_shifts).post(create_shift))
        .route(
            "/shifts/{id}",
            get(get_shift).put(update_shift).delete(cancel_shift),
        )
        .route("/shifts/{id}/complete", post(complete_shift))
        .route("/shifts/{id}/no-show", post(no_show))
}
