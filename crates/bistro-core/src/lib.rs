//! # bistro-core: Pure Business Logic for the Bistro Back Office
//!
//! This crate is the **heart** of the back office. It contains the business
//! rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Bistro Back Office Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    bistro-api (axum)                            │   │
//! │  │    /daily-records ──► /reconciliation      /wages?month=...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ bistro-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────────┐ ┌──────────┐      │   │
//! │  │   │  money   │ │ quantity │ │reconciliation│ │  wages   │      │   │
//! │  │   │  Money   │ │ Quantity │ │   Report     │ │  Report  │      │   │
//! │  │   └──────────┘ └──────────┘ └──────────────┘ └──────────┘      │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────────┐ ┌──────────┐      │   │
//! │  │   │  types   │ │ schedule │ │    daily     │ │validation│      │   │
//! │  │   └──────────┘ └──────────┘ └──────────────┘ └──────────┘      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bistro-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (catalog, staff, journal, scheduling)
//! - [`money`] - Money type with integer arithmetic (cents)
//! - [`quantity`] - Inventory quantities in thousandths of a unit
//! - [`reconciliation`] - Recorded sales vs. inventory-implied consumption
//! - [`wages`] - Per-employee pay with month-over-month comparison
//! - [`schedule`] - Periods, shift lengths, template expansion
//! - [`daily`] - Daily revenue / expense summary
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use bistro_core::money::Money;
//!
//! // 7h30m at $18.00/h
//! let pay = Money::for_minutes(Money::from_cents(1800), 450);
//! assert_eq!(pay.cents(), 13500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod daily;
pub mod error;
pub mod money;
pub mod quantity;
pub mod reconciliation;
pub mod schedule;
pub mod types;
pub mod validation;
pub mod wages;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use quantity::Quantity;
pub use schedule::Period;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default reconciliation tolerance in basis points (500 = 5%).
///
/// A product whose recorded consumption differs from the inventory-implied
/// consumption by no more than this share is considered balanced.
pub const DEFAULT_TOLERANCE_BPS: i64 = 500;

/// Hours worked per day before overtime applies (in minutes).
pub const DEFAULT_OVERTIME_THRESHOLD_MINUTES: i64 = 8 * 60;

/// Overtime pay multiplier in basis points (15000 = ×1.5).
pub const DEFAULT_OVERTIME_MULTIPLIER_BPS: i64 = 15_000;

/// Month-over-month pay change that gets flagged (2000 = 20%).
pub const DEFAULT_CHANGE_ALERT_BPS: i64 = 2_000;

/// Maximum quantity on a single recorded sale line.
pub const MAX_SALE_QUANTITY: i64 = 999;

/// Maximum price, cost or expense amount accepted ($1,000,000.00).
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Maximum hourly rate accepted ($500.00/h).
pub const MAX_HOURLY_RATE_CENTS: i64 = 50_000;

/// Longest shift that can be scheduled (16 hours).
pub const MAX_SHIFT_MINUTES: i64 = 16 * 60;

/// Widest date range accepted when generating a schedule.
pub const MAX_SCHEDULE_DAYS: i64 = 62;
