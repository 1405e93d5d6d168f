//! # Bistro Back Office API
//!
//! HTTP server for the back office of a single café or restaurant.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         bistro-api                                      │
//! │                                                                         │
//! │  /health                         liveness, db check, migrations         │
//! │  /api/v1                                                                │
//! │  ├── categories, products,       catalog                                │
//! │  │   sales-items (+ recipe)                                             │
//! │  ├── positions, employees        staff                                  │
//! │  ├── daily-records               journal, summary, reconciliation       │
//! │  ├── shift-templates, shifts     scheduling                             │
//! │  └── wages                       monthly wage report                    │
//! │                                                                         │
//! │  Layers: TraceLayer (tower-http) → locale_middleware → handler          │
//! │                                                                         │
//! │  ┌─────────────┐   ┌──────────────────┐   ┌──────────────────────────┐  │
//! │  │  handlers   │──►│ bistro-db        │──►│ SQLite                   │  │
//! │  │  (routes/)  │   │ repositories     │   │                          │  │
//! │  │             │──►│ bistro-core      │   │                          │  │
//! │  │             │   │ rules + engines  │   │                          │  │
//! │  └─────────────┘   └──────────────────┘   └──────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config`]: defaults, `bistro.toml` (or `$BISTRO_CONFIG`), then
//! `BISTRO__*` environment variables.

pub mod config;
pub mod error;
pub mod extractors;
pub mod i18n;
pub mod routes;

use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use bistro_db::Database;

// Re-exports
pub use config::{Settings, SettingsError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use i18n::Locale;

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Arc<Self> {
        Arc::new(AppState { db, settings })
    }
}

/// Builds the complete router.
///
/// ## Example
/// ```rust,ignore
/// let db = Database::new(DbConfig::in_memory()).await?;
/// let app = bistro_api::build_router(AppState::new(db, Settings::default()));
/// axum::serve(listener, app).await?;
/// ```
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(routes::categories::router())
        .merge(routes::products::router())
        .merge(routes::sales_items::router())
        .merge(routes::positions::router())
        .merge(routes::employees::router())
        .merge(routes::daily_records::router())
        .merge(routes::schedule::router())
        .merge(routes::wages::router());

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", api)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            i18n::locale_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
