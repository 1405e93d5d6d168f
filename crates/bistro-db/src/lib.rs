//! # bistro-db: Database Layer for the Bistro Back Office
//!
//! Persistence for the back office: SQLite through sqlx, embedded
//! migrations, one repository per aggregate.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bistro Data Flow                                 │
//! │                                                                         │
//! │  HTTP handler (GET /daily-records/{id}/reconciliation)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     bistro-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │   │   │
//! │  │   │               │    │ DailyRecord    │    │ 001_initial  │   │   │
//! │  │   │ SqlitePool    │◄───│ Shift          │    │ 002_schedule │   │   │
//! │  │   │               │    │ Analytics ...  │    │              │   │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  SQLite file (bistro.db)      ReconciliationInput → bistro-core engine  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bistro_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./bistro.db")).await?;
//! let products = db.products().list(false).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use migrations::MigrationStatus;
pub use pool::{Database, DbConfig};

pub use repository::{
    AnalyticsRepository, CategoryRepository, DailyRecordRepository, EmployeeRepository,
    PositionRepository, ProductRepository, SalesItemRepository, ShiftRepository,
};
