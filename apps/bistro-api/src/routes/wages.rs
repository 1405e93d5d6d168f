//! Monthly wage report

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Local;
use serde::Deserialize;
use tracing::info;

use bistro_core::validation::parse_year_month;
use bistro_core::wages::{wage_report, WageReport};
use bistro_core::Period;

use crate::error::ApiResult;
use crate::extractors::ApiQuery;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WageQuery {
    /// `YYYY-MM`; the current month when omitted.
    pub month: Option<String>,
}

/// GET /wages?month=YYYY-MM
///
/// Pay for every employee in the month, next to the month before.
async fn get_wages(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<WageQuery>,
) -> ApiResult<Json<WageReport>> {
    let today = Local::now().date_naive();
    let period = match params.month.as_deref() {
        Some(month) => parse_year_month(month)?,
        None => Period::containing(today),
    };

    let input = state
        .db
        .analytics()
        .wage_input(period, state.settings.wages, today)
        .await?;
    let report = wage_report(&input);

    info!(
        period = %period,
        employees = report.lines.len(),
        total_cents = report.totals.gross_pay.cents(),
        "Built wage report"
    );

    Ok(Json(report))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/wages", get(get_wages))
}
