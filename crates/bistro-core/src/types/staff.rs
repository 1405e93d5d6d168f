//! Staff types: positions and employees.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// A job position ("Barista", "Cook") with its base hourly rate.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Position {
    pub id: String,
    pub name: String,
    pub hourly_rate_cents: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

/// A person on the payroll.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Employee {
    pub id: String,
    pub full_name: String,
    pub position_id: String,
    /// Personal rate; overrides the position rate when set.
    pub hourly_rate_cents: Option<i64>,
    pub phone: Option<String>,
    #[ts(as = "String")]
    pub hired_on: NaiveDate,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Rate actually paid: the personal override, else the position rate.
    pub fn effective_rate(&self, position: &Position) -> Money {
        Money::from_cents(self.hourly_rate_cents.unwrap_or(position.hourly_rate_cents))
    }
}

/// Employee joined with the rate they are paid at.
///
/// Produced by the database layer for wage analytics, so the engine does
/// not need positions at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct EmployeeRate {
    pub employee_id: String,
    pub full_name: String,
    pub position_name: String,
    pub rate_cents: i64,
}

impl EmployeeRate {
    #[inline]
    pub fn rate(&self) -> Money {
        Money::from_cents(self.rate_cents)
    }
}
