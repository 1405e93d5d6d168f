//! # Repository Module
//!
//! Database repository implementations for the back office.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                           │
//! │       │                                                                 │
//! │       │  db.daily_records().add_sale(&entry)                            │
//! │       ▼                                                                 │
//! │  DailyRecordRepository                                                  │
//! │  ├── open_day / close_day / reopen_day                                  │
//! │  ├── upsert_snapshots / snapshots                                       │
//! │  ├── add_sale / sales / delete_sale                                     │
//! │  └── add_expense / add_receipt ...                                      │
//! │       │                                                                 │
//! │       │  SQL (sqlx::query_as + bind)                                    │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`] - Categories
//! - [`ProductRepository`] - Inventory products
//! - [`SalesItemRepository`] - Menu items and recipes
//! - [`PositionRepository`] - Job positions
//! - [`EmployeeRepository`] - Employees and effective rates
//! - [`DailyRecordRepository`] - Daily journal (counts, receipts, sales, expenses)
//! - [`ShiftRepository`] - Shift templates and shifts
//! - [`AnalyticsRepository`] - Inputs for the reconciliation and wage engines

pub mod analytics;
pub mod category;
pub mod daily_record;
pub mod employee;
pub mod position;
pub mod product;
pub mod sales_item;
pub mod shift;

pub use analytics::AnalyticsRepository;
pub use category::CategoryRepository;
pub use daily_record::DailyRecordRepository;
pub use employee::EmployeeRepository;
pub use position::PositionRepository;
pub use product::ProductRepository;
pub use sales_item::SalesItemRepository;
pub use shift::ShiftRepository;

use uuid::Uuid;

/// Generates a new row ID (UUID v4).
///
/// ## Usage
/// ```rust
/// let id = bistro_db::repository::generate_id();
/// assert_eq!(id.len(), 36);
/// ```
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Test Fixtures
// =============================================================================
