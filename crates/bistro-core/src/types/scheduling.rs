//! Scheduling types: shift templates, weekday sets and shift instances.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::schedule::shift_minutes;

// =============================================================================
// Weekday Set
// =============================================================================

/// A set of weekdays stored as a 7-bit mask (Monday = bit 0).
///
/// ```text
///   Mon Tue Wed Thu Fri Sat Sun
///    1   2   4   8  16  32  64
///
///   weekdays (Mon-Fri) = 0b001_1111 = 31
///   weekend            = 0b110_0000 = 96
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// Every day of the week.
    pub const ALL: WeekdaySet = WeekdaySet(0b111_1111);

    /// Builds a set from a raw mask; bits above Sunday are dropped.
    pub const fn from_mask(mask: u8) -> Self {
        WeekdaySet(mask & 0b111_1111)
    }

    pub fn from_days(days: &[Weekday]) -> Self {
        days.iter().fold(WeekdaySet(0), |set, day| set.with(*day))
    }

    pub const fn mask(&self) -> u8 {
        self.0
    }

    pub fn with(self, day: Weekday) -> Self {
        WeekdaySet(self.0 | (1 << day.num_days_from_monday()))
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Shift Template
// =============================================================================

/// A recurring work pattern used to generate shifts.
///
/// `end_time <= start_time` means the shift crosses midnight
/// (e.g. 22:00 → 06:00).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ShiftTemplate {
    pub id: String,
    pub name: String,
    /// Position the template is staffed by (informational).
    pub position_id: Option<String>,
    /// Raw [`WeekdaySet`] mask.
    pub weekday_mask: i64,
    #[ts(as = "String")]
    pub start_time: NaiveTime,
    #[ts(as = "String")]
    pub end_time: NaiveTime,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ShiftTemplate {
    pub fn weekdays(&self) -> WeekdaySet {
        WeekdaySet::from_mask(self.weekday_mask.clamp(0, 0b111_1111) as u8)
    }

    /// Scheduled length in minutes.
    pub fn minutes(&self) -> i64 {
        shift_minutes(self.start_time, self.end_time)
    }
}

// =============================================================================
// Shift
// =============================================================================

/// Lifecycle of a scheduled shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    /// Planned, not yet worked.
    Scheduled,
    /// Worked; counts toward wages.
    Completed,
    /// Called off before it started.
    Cancelled,
    /// Employee did not show up.
    NoShow,
}

impl ShiftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftStatus::Scheduled => "scheduled",
            ShiftStatus::Completed => "completed",
            ShiftStatus::Cancelled => "cancelled",
            ShiftStatus::NoShow => "no_show",
        }
    }

    /// Whether the shift still occupies the employee's time slot.
    pub fn blocks_slot(&self) -> bool {
        matches!(self, ShiftStatus::Scheduled | ShiftStatus::Completed)
    }
}

impl Default for ShiftStatus {
    fn default() -> Self {
        ShiftStatus::Scheduled
    }
}

/// One employee working one slot on one date.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Shift {
    pub id: String,
    pub employee_id: String,
    pub template_id: Option<String>,
    #[ts(as = "String")]
    pub shift_date: NaiveDate,
    #[ts(as = "String")]
    pub start_time: NaiveTime,
    #[ts(as = "String")]
    pub end_time: NaiveTime,
    pub status: ShiftStatus,
    /// Minutes actually worked, recorded when the shift is completed.
    pub actual_minutes: Option<i64>,
    pub notes: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Shift {
    /// Scheduled length in minutes.
    pub fn scheduled_minutes(&self) -> i64 {
        shift_minutes(self.start_time, self.end_time)
    }

    /// Minutes that count as worked: the recorded actual, else the schedule.
    pub fn worked_minutes(&self) -> i64 {
        self.actual_minutes.unwrap_or_else(|| self.scheduled_minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_set() {
        let set = WeekdaySet::from_days(&[Weekday::Mon, Weekday::Fri]);
        assert_eq!(set.mask(), 0b001_0001);
        assert!(set.contains(Weekday::Mon));
        assert!(set.contains(Weekday::Fri));
        assert!(!set.contains(Weekday::Sun));
        assert!(WeekdaySet::default().is_empty());
        assert_eq!(WeekdaySet::from_mask(0xFF), WeekdaySet::ALL);
    }

    #[test]
    fn test_shift_status_wire_names() {
        assert_eq!(serde_json::to_string(&ShiftStatus::NoShow).unwrap(), "\"no_show\"");
        assert!(ShiftStatus::Scheduled.blocks_slot());
        assert!(!ShiftStatus::Cancelled.blocks_slot());
    }
}
