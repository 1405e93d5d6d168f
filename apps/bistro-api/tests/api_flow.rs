//! End-to-end flows through the router against an in-memory database.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use bistro_api::{build_router, AppState, Settings};
use bistro_db::{Database, DbConfig};

async fn app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    build_router(AppState::new(db, Settings::default()))
}

struct Reply {
    status: StatusCode,
    language: Option<String>,
    body: Value,
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Reply {
    send_with_locale(app, method, uri, body, None).await
}

async fn send_with_locale(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    accept_language: Option<&str>,
) -> Reply {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(lang) = accept_language {
        builder = builder.header(header::ACCEPT_LANGUAGE, lang);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let language = response
        .headers()
        .get(header::CONTENT_LANGUAGE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    Reply {
        status,
        language,
        body,
    }
}

fn id_of(reply: &Reply) -> String {
    reply.body["id"].as_str().unwrap().to_string()
}

/// Milk (liters) and a latte using 0.2 l of it.
async fn seed_latte(app: &Router) -> (String, String) {
    let milk = send(
        app,
        "POST",
        "/api/v1/products",
        Some(json!({"name": "Milk", "unit": "liter", "cost_cents": 120})),
    )
    .await;
    assert_eq!(milk.status, StatusCode::CREATED);

    let latte = send(
        app,
        "POST",
        "/api/v1/sales-items",
        Some(json!({"name": "Latte", "price_cents": 450})),
    )
    .await;
    assert_eq!(latte.status, StatusCode::CREATED);

    let (milk_id, latte_id) = (id_of(&milk), id_of(&latte));
    let recipe = send(
        app,
        "PUT",
        &format!("/api/v1/sales-items/{latte_id}/recipe"),
        Some(json!({"components": [{"product_id": milk_id, "quantity_milli": 200}]})),
    )
    .await;
    assert_eq!(recipe.status, StatusCode::OK);

    (milk_id, latte_id)
}

async fn seed_employee(app: &Router) -> String {
    let position = send(
        app,
        "POST",
        "/api/v1/positions",
        Some(json!({"name": "Barista", "hourly_rate_cents": 2000})),
    )
    .await;
    assert_eq!(position.status, StatusCode::CREATED);

    let employee = send(
        app,
        "POST",
        "/api/v1/employees",
        Some(json!({
            "full_name": "Olena Koval",
            "position_id": id_of(&position),
            "hired_on": "2025-06-01"
        })),
    )
    .await;
    assert_eq!(employee.status, StatusCode::CREATED);
    id_of(&employee)
}

// =============================================================================
// Health / Catalog
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = app().await;

    let reply = send(&app, "GET", "/health", None).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "ok");
    assert_eq!(reply.body["database"], true);
}

#[tokio::test]
async fn test_category_crud() {
    let app = app().await;

    let created = send(
        &app,
        "POST",
        "/api/v1/categories",
        Some(json!({"name": "Dairy", "sort_order": 2})),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = id_of(&created);

    let updated = send(
        &app,
        "PUT",
        &format!("/api/v1/categories/{id}"),
        Some(json!({"name": "Dairy & Eggs", "sort_order": 1})),
    )
    .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["name"], "Dairy & Eggs");

    let deleted = send(&app, "DELETE", &format!("/api/v1/categories/{id}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let active = send(&app, "GET", "/api/v1/categories", None).await;
    assert_eq!(active.body.as_array().unwrap().len(), 0);

    let all = send(&app, "GET", "/api/v1/categories?include_inactive=true", None).await;
    assert_eq!(all.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_category_name_is_conflict() {
    let app = app().await;
    let body = json!({"name": "Bakery"});

    send(&app, "POST", "/api/v1/categories", Some(body.clone())).await;
    let reply = send(&app, "POST", "/api/v1/categories", Some(body)).await;

    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["code"], "DUPLICATE");
}

#[tokio::test]
async fn test_blank_name_is_validation_error() {
    let app = app().await;

    let reply = send(
        &app,
        "POST",
        "/api/v1/products",
        Some(json!({"name": "   ", "unit": "piece", "cost_cents": 10})),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_oversized_price_is_validation_error() {
    let app = app().await;

    let reply = send(
        &app,
        "POST",
        "/api/v1/sales-items",
        Some(json!({"name": "Gold Latte", "price_cents": 4_000_000_000_000_000_000_i64})),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "VALIDATION_ERROR");

    let items = send(&app, "GET", "/api/v1/sales-items", None).await;
    assert_eq!(items.body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_recipe_rejects_repeated_product() {
    let app = app().await;
    let (milk_id, latte_id) = seed_latte(&app).await;

    let reply = send(
        &app,
        "PUT",
        &format!("/api/v1/sales-items/{latte_id}/recipe"),
        Some(json!({"components": [
            {"product_id": milk_id, "quantity_milli": 200},
            {"product_id": milk_id, "quantity_milli": 50}
        ]})),
    )
    .await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body["code"], "BUSINESS_RULE");

    let recipe = send(&app, "GET", &format!("/api/v1/sales-items/{latte_id}/recipe"), None).await;
    assert_eq!(recipe.body["components"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let app = app().await;

    let reply = send(&app, "GET", "/api/v1/products/nope", None).await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["code"], "NOT_FOUND");
    assert_eq!(reply.language.as_deref(), Some("en"));
}

// =============================================================================
// Daily Records
// =============================================================================

#[tokio::test]
async fn test_day_flow_with_reconciliation() {
    let app = app().await;
    let (milk_id, latte_id) = seed_latte(&app).await;

    let day = send(
        &app,
        "POST",
        "/api/v1/daily-records",
        Some(json!({"business_date": "2026-03-02", "carry_over": false})),
    )
    .await;
    assert_eq!(day.status, StatusCode::CREATED);
    let day_id = id_of(&day);
    let base = format!("/api/v1/daily-records/{day_id}");

    let opening = send(
        &app,
        "PUT",
        &format!("{base}/inventory"),
        Some(json!({"kind": "opening", "counts": [{"product_id": milk_id, "quantity_milli": 10000}]})),
    )
    .await;
    assert_eq!(opening.status, StatusCode::OK);

    let receipt = send(
        &app,
        "POST",
        &format!("{base}/receipts"),
        Some(json!({"product_id": milk_id, "quantity_milli": 5000, "cost_cents": 600})),
    )
    .await;
    assert_eq!(receipt.status, StatusCode::CREATED);

    let sale = send(
        &app,
        "POST",
        &format!("{base}/sales"),
        Some(json!({"sales_item_id": latte_id, "quantity": 10})),
    )
    .await;
    assert_eq!(sale.status, StatusCode::CREATED);
    assert_eq!(sale.body["unit_price_cents"], 450);

    let expense = send(
        &app,
        "POST",
        &format!("{base}/expenses"),
        Some(json!({"category": "supplies", "description": "Napkins", "amount_cents": 300})),
    )
    .await;
    assert_eq!(expense.status, StatusCode::CREATED);

    // Closing without a closing count is refused
    let early = send(&app, "POST", &format!("{base}/close"), None).await;
    assert_eq!(early.status, StatusCode::CONFLICT);

    // 10 l + 5 l - 11 l = 4 l gone, 10 lattes explain 2 l
    send(
        &app,
        "PUT",
        &format!("{base}/inventory"),
        Some(json!({"kind": "closing", "counts": [{"product_id": milk_id, "quantity_milli": 11000}]})),
    )
    .await;

    let report = send(&app, "GET", &format!("{base}/reconciliation"), None).await;
    assert_eq!(report.status, StatusCode::OK);
    assert_eq!(report.body["balanced"], false);
    let line = &report.body["lines"][0];
    assert_eq!(line["product_name"], "Milk");
    assert_eq!(line["expected_consumption"], 4000);
    assert_eq!(line["recorded_consumption"], 2000);
    assert_eq!(line["discrepancy"], 2000);
    assert_eq!(line["status"], "shortage");
    assert_eq!(report.body["suggestions"][0]["suggested_quantity"], 10);

    // A 50% tolerance accepts the gap
    let lenient = send(
        &app,
        "GET",
        &format!("{base}/reconciliation?tolerance_bps=5000"),
        None,
    )
    .await;
    assert_eq!(lenient.body["balanced"], true);

    let closed = send(&app, "POST", &format!("{base}/close"), None).await;
    assert_eq!(closed.status, StatusCode::OK);
    assert_eq!(closed.body["status"], "closed");

    let detail = send(&app, "GET", &base, None).await;
    assert_eq!(detail.body["summary"]["revenue"], 4500);
    assert_eq!(detail.body["summary"]["expenses_total"], 300);
    assert_eq!(detail.body["summary"]["purchases_total"], 600);
    assert_eq!(detail.body["summary"]["net"], 3600);

    // Closed days are read-only
    let late = send(
        &app,
        "POST",
        &format!("{base}/sales"),
        Some(json!({"sales_item_id": latte_id, "quantity": 1})),
    )
    .await;
    assert_eq!(late.status, StatusCode::CONFLICT);
    assert_eq!(late.body["code"], "CONFLICT");

    // The next day starts from yesterday's closing count
    let next = send(
        &app,
        "POST",
        "/api/v1/daily-records",
        Some(json!({"business_date": "2026-03-03"})),
    )
    .await;
    let counts = send(
        &app,
        "GET",
        &format!("/api/v1/daily-records/{}/inventory", id_of(&next)),
        None,
    )
    .await;
    assert_eq!(counts.body[0]["kind"], "opening");
    assert_eq!(counts.body[0]["quantity_milli"], 11000);
}

#[tokio::test]
async fn test_same_business_date_twice_is_duplicate() {
    let app = app().await;
    let body = json!({"business_date": "2026-03-02"});

    send(&app, "POST", "/api/v1/daily-records", Some(body.clone())).await;
    let reply = send(&app, "POST", "/api/v1/daily-records", Some(body)).await;

    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["code"], "DUPLICATE");
}

#[tokio::test]
async fn test_sale_of_unknown_item_is_invalid_reference() {
    let app = app().await;
    let day = send(
        &app,
        "POST",
        "/api/v1/daily-records",
        Some(json!({"business_date": "2026-03-02"})),
    )
    .await;

    let reply = send(
        &app,
        "POST",
        &format!("/api/v1/daily-records/{}/sales", id_of(&day)),
        Some(json!({"sales_item_id": "ghost", "quantity": 1})),
    )
    .await;

    assert_eq!(reply.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(reply.body["code"], "INVALID_REFERENCE");
}

// =============================================================================
// Scheduling / Wages
// =============================================================================

#[tokio::test]
async fn test_generate_schedule_skips_taken_slots() {
    let app = app().await;
    let employee_id = seed_employee(&app).await;

    let template = send(
        &app,
        "POST",
        "/api/v1/shift-templates",
        Some(json!({
            "name": "Morning",
            "weekday_mask": 127,
            "start_time": "07:00:00",
            "end_time": "15:00:00"
        })),
    )
    .await;
    assert_eq!(template.status, StatusCode::CREATED);

    let request = json!({
        "from": "2026-03-02",
        "to": "2026-03-04",
        "assignments": [{"template_id": id_of(&template), "employee_ids": [employee_id]}]
    });

    let first = send(&app, "POST", "/api/v1/shift-templates/generate", Some(request.clone())).await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.body["created"], 3);
    assert_eq!(first.body["conflicts"].as_array().unwrap().len(), 0);

    let second = send(&app, "POST", "/api/v1/shift-templates/generate", Some(request)).await;
    assert_eq!(second.body["created"], 0);
    assert_eq!(second.body["conflicts"].as_array().unwrap().len(), 3);

    let listed = send(
        &app,
        "GET",
        &format!("/api/v1/shifts?from=2026-03-01&to=2026-03-31&employee_id={employee_id}"),
        None,
    )
    .await;
    assert_eq!(listed.body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_overlapping_shift_is_conflict() {
    let app = app().await;
    let employee_id = seed_employee(&app).await;
    let shift = json!({
        "employee_id": employee_id,
        "shift_date": "2026-03-02",
        "start_time": "08:00:00",
        "end_time": "16:00:00"
    });

    let first = send(&app, "POST", "/api/v1/shifts", Some(shift)).await;
    assert_eq!(first.status, StatusCode::CREATED);

    let overlapping = send(
        &app,
        "POST",
        "/api/v1/shifts",
        Some(json!({
            "employee_id": employee_id,
            "shift_date": "2026-03-02",
            "start_time": "12:00:00",
            "end_time": "20:00:00"
        })),
    )
    .await;
    assert_eq!(overlapping.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_monthly_wages_from_completed_shift() {
    let app = app().await;
    let employee_id = seed_employee(&app).await;

    let shift = send(
        &app,
        "POST",
        "/api/v1/shifts",
        Some(json!({
            "employee_id": employee_id,
            "shift_date": "2026-03-03",
            "start_time": "08:00:00",
            "end_time": "16:00:00"
        })),
    )
    .await;
    let completed = send(
        &app,
        "POST",
        &format!("/api/v1/shifts/{}/complete", id_of(&shift)),
        Some(json!({})),
    )
    .await;
    assert_eq!(completed.status, StatusCode::OK);
    assert_eq!(completed.body["status"], "completed");

    let report = send(&app, "GET", "/api/v1/wages?month=2026-03", None).await;
    assert_eq!(report.status, StatusCode::OK);
    assert_eq!(report.body["period"], "2026-03");
    assert_eq!(report.body["previous_period"], "2026-02");
    let line = &report.body["lines"][0];
    assert_eq!(line["worked_minutes"], 480);
    assert_eq!(line["gross_pay"], 16000);
    assert_eq!(report.body["totals"]["gross_pay"], 16000);
}

#[tokio::test]
async fn test_bad_month_is_validation_error() {
    let app = app().await;

    let reply = send(&app, "GET", "/api/v1/wages?month=2026-13", None).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_listings_accept_long_ranges() {
    let app = app().await;

    let records = send(
        &app,
        "GET",
        "/api/v1/daily-records?from=2026-01-01&to=2026-06-30",
        None,
    )
    .await;
    assert_eq!(records.status, StatusCode::OK);

    let shifts = send(&app, "GET", "/api/v1/shifts?from=2026-01-01&to=2026-12-31", None).await;
    assert_eq!(shifts.status, StatusCode::OK);
}

#[tokio::test]
async fn test_reversed_listing_range_is_validation_error() {
    let app = app().await;

    let records = send(
        &app,
        "GET",
        "/api/v1/daily-records?from=2026-03-10&to=2026-03-01",
        None,
    )
    .await;
    assert_eq!(records.status, StatusCode::BAD_REQUEST);
    assert_eq!(records.body["code"], "VALIDATION_ERROR");

    let shifts = send(&app, "GET", "/api/v1/shifts?from=2026-03-10&to=2026-03-01", None).await;
    assert_eq!(shifts.status, StatusCode::BAD_REQUEST);
    assert_eq!(shifts.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_generate_keeps_span_limit() {
    let app = app().await;

    let reply = send(
        &app,
        "POST",
        "/api/v1/shift-templates/generate",
        Some(json!({"from": "2026-01-01", "to": "2026-06-30", "assignments": []})),
    )
    .await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Localization
// =============================================================================

#[tokio::test]
async fn test_errors_follow_accept_language() {
    let app = app().await;

    let reply = send_with_locale(
        &app,
        "GET",
        "/api/v1/employees/nope",
        None,
        Some("uk-UA,uk;q=0.9,en;q=0.5"),
    )
    .await;

    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.language.as_deref(), Some("uk"));
    assert_eq!(reply.body["code"], "NOT_FOUND");
    assert_eq!(reply.body["message"], "Запитаний ресурс не існує");
    assert!(reply.body["detail"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/categories")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

