//! # Daily Record Endpoints
//!
//! ```text
//! POST /daily-records                       open a day (carry-over by default)
//! GET  /daily-records?from=&to=             newest first
//! GET  /daily-records/{id}                  record + money summary
//! POST /daily-records/{id}/close|reopen
//! GET|PUT /daily-records/{id}/inventory     opening / closing counts
//! GET|POST /daily-records/{id}/receipts     deliveries
//! GET|POST /daily-records/{id}/sales        (+ DELETE /sales/{sale_id})
//! GET|POST /daily-records/{id}/expenses     (+ DELETE /expenses/{expense_id})
//! GET  /daily-records/{id}/reconciliation?tolerance_bps=
//! ```

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use bistro_core::daily::{summarize_day, DailySummary};
use bistro_core::reconciliation::{reconcile, ReconciliationReport};
use bistro_core::validation::{
    validate_amount_cents, validate_date_order, validate_name, validate_optional_text,
    validate_price_cents, validate_quantity_milli, validate_sale_quantity, validate_tolerance_bps,
};
use bistro_core::{
    DailyRecord, Expense, ExpenseCategory, InventoryReceipt, InventorySnapshot, SaleEntry,
    SnapshotKind,
};
use bistro_db::repository::generate_id;

use super::{MAX_NAME_LEN, MAX_TEXT_LEN};
use crate::error::{ApiError, ApiResult};
use crate::extractors::{ApiJson, ApiQuery};
use crate::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct OpenDayRequest {
    pub business_date: NaiveDate,
    #[serde(default = "default_carry_over")]
    pub carry_over: bool,
    pub notes: Option<String>,
}

fn default_carry_over() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct DayDetail {
    pub record: DailyRecord,
    pub summary: DailySummary,
}

#[derive(Debug, Deserialize)]
pub struct CountLine {
    pub product_id: String,
    pub quantity_milli: i64,
}

#[derive(Debug, Deserialize)]
pub struct InventoryRequest {
    pub kind: SnapshotKind,
    pub counts: Vec<CountLine>,
}

#[derive(Debug, Deserialize)]
pub struct ReceiptRequest {
    pub product_id: String,
    pub quantity_milli: i64,
    /// Total paid for the delivery.
    #[serde(default)]
    pub cost_cents: i64,
    pub supplier: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaleRequest {
    pub sales_item_id: String,
    pub quantity: i64,
    /// Overrides the menu price, e.g. for a discount.
    pub unit_price_cents: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ExpenseRequest {
    pub category: ExpenseCategory,
    pub description: String,
    pub amount_cents: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReconciliationQuery {
    pub tolerance_bps: Option<i64>,
}

// =============================================================================
// Helpers
// =============================================================================

async fn load_record(state: &AppState, id: &str) -> ApiResult<DailyRecord> {
    state
        .db
        .daily_records()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("DailyRecord", id))
}

// =============================================================================
// Record Lifecycle
// =============================================================================

async fn list_records(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<RangeQuery>,
) -> ApiResult<Json<Vec<DailyRecord>>> {
    if let (Some(from), Some(to)) = (params.from, params.to) {
        validate_date_order(from, to)?;
    }
    let records = state.db.daily_records().list(params.from, params.to).await?;
    Ok(Json(records))
}

async fn open_day(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<OpenDayRequest>,
) -> ApiResult<(StatusCode, Json<DailyRecord>)> {
    let notes = validate_optional_text("notes", req.notes.as_deref(), MAX_TEXT_LEN)?;
    let record = state
        .db
        .daily_records()
        .open_day(req.business_date, req.carry_over, notes)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn get_record(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DayDetail>> {
    let record = load_record(&state, &id).await?;

    let repo = state.db.daily_records();
    let sales = repo.sales(&id).await?;
    let expenses = repo.expenses(&id).await?;
    let receipts = repo.receipts(&id).await?;

    Ok(Json(DayDetail {
        record,
        summary: summarize_day(&sales, &expenses, &receipts),
    }))
}

async fn close_day(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DailyRecord>> {
    Ok(Json(state.db.daily_records().close_day(&id).await?))
}

async fn reopen_day(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DailyRecord>> {
    Ok(Json(state.db.daily_records().reopen_day(&id).await?))
}

// =============================================================================
// Inventory Counts
// =============================================================================

async fn list_inventory(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<InventorySnapshot>>> {
    load_record(&state, &id).await?;
    Ok(Json(state.db.daily_records().snapshots(&id).await?))
}

/// PUT /daily-records/{id}/inventory - products counted again are overwritten
async fn put_inventory(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<InventoryRequest>,
) -> ApiResult<Json<Vec<InventorySnapshot>>> {
    let mut counts = Vec::with_capacity(req.counts.len());
    for line in req.counts {
        validate_quantity_milli("quantity_milli", line.quantity_milli, true)?;
        counts.push((line.product_id, line.quantity_milli));
    }

    let snapshots = state
        .db
        .daily_records()
        .upsert_snapshots(&id, req.kind, &counts)
        .await?;
    Ok(Json(snapshots))
}

// =============================================================================
// Receipts
// =============================================================================

async fn list_receipts(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<InventoryReceipt>>> {
    load_record(&state, &id).await?;
    Ok(Json(state.db.daily_records().receipts(&id).await?))
}

async fn add_receipt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ReceiptRequest>,
) -> ApiResult<(StatusCode, Json<InventoryReceipt>)> {
    validate_quantity_milli("quantity_milli", req.quantity_milli, false)?;
    validate_price_cents("cost_cents", req.cost_cents)?;

    let receipt = InventoryReceipt {
        id: generate_id(),
        daily_record_id: id,
        product_id: req.product_id,
        quantity_milli: req.quantity_milli,
        cost_cents: req.cost_cents,
        supplier: validate_optional_text("supplier", req.supplier.as_deref(), MAX_NAME_LEN)?,
        received_at: Utc::now(),
    };

    let created = state.db.daily_records().add_receipt(&receipt).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// =============================================================================
// Sales
// =============================================================================

async fn list_sales(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<SaleEntry>>> {
    load_record(&state, &id).await?;
    Ok(Json(state.db.daily_records().sales(&id).await?))
}

/// POST /daily-records/{id}/sales
///
/// Without `unit_price_cents` the current menu price is stored with the
/// line, so later price changes do not rewrite history.
async fn add_sale(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<SaleRequest>,
) -> ApiResult<(StatusCode, Json<SaleEntry>)> {
    validate_sale_quantity(req.quantity)?;
    if let Some(price) = req.unit_price_cents {
        validate_price_cents("unit_price_cents", price)?;
    }

    let item = state
        .db
        .sales_items()
        .get_by_id(&req.sales_item_id)
        .await?
        .ok_or_else(|| {
            ApiError::InvalidReference(format!("Unknown sales item: {}", req.sales_item_id))
        })?;

    let sale = SaleEntry {
        id: generate_id(),
        daily_record_id: id,
        sales_item_id: item.id,
        quantity: req.quantity,
        unit_price_cents: req.unit_price_cents.unwrap_or(item.price_cents),
        recorded_at: Utc::now(),
    };

    let created = state.db.daily_records().add_sale(&sale).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_sale(
    State(state): State<Arc<AppState>>,
    Path((id, sale_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state.db.daily_records().delete_sale(&id, &sale_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Expenses
// =============================================================================

async fn list_expenses(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Expense>>> {
    load_record(&state, &id).await?;
    Ok(Json(state.db.daily_records().expenses(&id).await?))
}

async fn add_expense(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ExpenseRequest>,
) -> ApiResult<(StatusCode, Json<Expense>)> {
    validate_amount_cents("amount_cents", req.amount_cents)?;

    let expense = Expense {
        id: generate_id(),
        daily_record_id: id,
        category: req.category,
        description: validate_name("description", &req.description, MAX_TEXT_LEN)?,
        amount_cents: req.amount_cents,
        created_at: Utc::now(),
    };

    let created = state.db.daily_records().add_expense(&expense).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Path((id, expense_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state.db.daily_records().delete_expense(&id, &expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Reconciliation
// =============================================================================

/// GET /daily-records/{id}/reconciliation?tolerance_bps=
///
/// Works on open and closed days; an open day without closing counts
/// reports every line as uncounted.
async fn reconciliation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiQuery(params): ApiQuery<ReconciliationQuery>,
) -> ApiResult<Json<ReconciliationReport>> {
    let tolerance_bps = match params.tolerance_bps {
        Some(bps) => {
            validate_tolerance_bps(bps)?;
            bps
        }
        None => state.settings.reconciliation.tolerance_bps,
    };

    let input = state
        .db
        .analytics()
        .reconciliation_input(&id, tolerance_bps)
        .await?;
    let report = reconcile(&input);

    info!(
        record_id = %id,
        lines = report.lines.len(),
        flagged = report.totals.lines_flagged,
        balanced = report.balanced,
        "Reconciled day"
    );

    Ok(Json(report))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/daily-records", get(list_records).post(open_day))
        .route("/daily-records/{id}", get(get_record))
        .route("/daily-records/{id}/close", post(close_day))
        .route("/daily-records/{id}/reopen", post(reopen_day))
        .route(
            "/daily-records/{id}/inventory",
            get(list_inventory).put(put_inventory),
        )
        .route(
            "/daily-records/{id}/receipts",
            get(list_receipts).post(add_receipt),
        )
        .route("/daily-records/{id}/sales", get(list_sales).post(add_sale))
        .route("/daily-records/{id}/sales/{sale_id}", delete(delete_sale))
        .route(
            "/daily-records/{id}/expenses",
            get(list_expenses).post(add_expense),
        )
        .route(
            "/daily-records/{id}/expenses/{expense_id}",
            delete(delete_expense),
        )
        .route("/daily-records/{id}/reconciliation", get(reconciliation))
}
