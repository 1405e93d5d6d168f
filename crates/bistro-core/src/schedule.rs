//! # Schedule Module
//!
//! Calendar periods, shift lengths and shift generation from templates.
//!
//! ## Generating a Schedule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Templates                 Range 2026-03-02 .. 2026-03-08               │
//! │  ┌───────────────────┐                                                  │
//! │  │ Morning  Mon-Fri  │──► expand_templates() ──► PlannedShift × 5       │
//! │  │ 07:00-15:00       │                                                  │
//! │  └───────────────────┘                                                  │
//! │  ┌───────────────────┐                                                  │
//! │  │ Night    Fri-Sat  │──► expand_templates() ──► PlannedShift × 2       │
//! │  │ 22:00-06:00       │                                                  │
//! │  └───────────────────┘                                                  │
//! │                                 │                                       │
//! │  Assignments (template → staff) ▼                                       │
//! │                         plan_assignments()                              │
//! │                                 │                                       │
//! │               ┌─────────────────┴───────────────┐                       │
//! │               ▼                                 ▼                       │
//! │        new shifts to insert        conflicts (overlaps skipped)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{Shift, ShiftTemplate};

const MINUTES_PER_DAY: i64 = 24 * 60;

// =============================================================================
// Period
// =============================================================================

/// A calendar month, the unit wages are reported in.
///
/// Serialized as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    first: NaiveDate,
}

impl Period {
    /// Creates a period; `None` when the month is not 1-12 or the year is
    /// outside what `chrono` can represent.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Period { first })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date);
        Period { first }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn last_day(&self) -> NaiveDate {
        let next_first = if self.month() == 12 {
            NaiveDate::from_ymd_opt(self.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year(), self.month() + 1, 1)
        };
        next_first
            .and_then(|d| d.pred_opt())
            .unwrap_or(self.first)
    }

    /// The month before this one.
    pub fn previous(&self) -> Self {
        match self.first.pred_opt() {
            Some(last_of_previous) => Period::containing(last_of_previous),
            None => *self,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.last_day()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    /// Parses `"YYYY-MM"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ValidationError::invalid("month", "expected YYYY-MM");

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Period::new(year, month).ok_or_else(|| ValidationError::OutOfRange {
            field: "month".to_string(),
            min: 1,
            max: 12,
        })
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Shift Arithmetic
// =============================================================================

/// Length of a shift in minutes; `end <= start` wraps past midnight.
///
/// ## Example
/// ```rust
/// use bistro_core::schedule::shift_minutes;
/// use chrono::NaiveTime;
///
/// let t = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// assert_eq!(shift_minutes(t(7, 0), t(15, 30)), 510);
/// assert_eq!(shift_minutes(t(22, 0), t(6, 0)), 480);
/// ```
pub fn shift_minutes(start: NaiveTime, end: NaiveTime) -> i64 {
    let start = (start.num_seconds_from_midnight() / 60) as i64;
    let end = (end.num_seconds_from_midnight() / 60) as i64;
    if end > start {
        end - start
    } else {
        end + MINUTES_PER_DAY - start
    }
}

/// Absolute `[start, end)` interval of a shift.
pub fn shift_interval(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> (NaiveDateTime, NaiveDateTime) {
    let from = date.and_time(start);
    (from, from + Duration::minutes(shift_minutes(start, end)))
}

/// Whether two shifts overlap in absolute time.
///
/// Back-to-back shifts (one ends exactly when the other starts) do not
/// overlap.
pub fn overlaps(
    a: (NaiveDate, NaiveTime, NaiveTime),
    b: (NaiveDate, NaiveTime, NaiveTime),
) -> bool {
    let (a_start, a_end) = shift_interval(a.0, a.1, a.2);
    let (b_start, b_end) = shift_interval(b.0, b.1, b.2);
    a_start < b_end && b_start < a_end
}

/// Finds an existing shift of the same employee that blocks the slot.
///
/// Cancelled and no-show shifts never block. `ignore_id` skips the shift
/// being edited.
pub fn find_overlap<'a>(
    employee_id: &str,
    slot: (NaiveDate, NaiveTime, NaiveTime),
    existing: &'a [Shift],
    ignore_id: Option<&str>,
) -> Option<&'a Shift> {
    existing.iter().find(|shift| {
        shift.employee_id == employee_id
            && shift.status.blocks_slot()
            && Some(shift.id.as_str()) != ignore_id
            && overlaps(slot, (shift.shift_date, shift.start_time, shift.end_time))
    })
}

// =============================================================================
// Template Expansion
// =============================================================================

/// A slot produced by expanding a template over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PlannedShift {
    pub template_id: String,
    pub template_name: String,
    #[ts(as = "String")]
    pub shift_date: NaiveDate,
    #[ts(as = "String")]
    pub start_time: NaiveTime,
    #[ts(as = "String")]
    pub end_time: NaiveTime,
}

/// Expands active templates over `from..=to`.
///
/// Output is ordered by date, then start time, then template name.
pub fn expand_templates(templates: &[ShiftTemplate], from: NaiveDate, to: NaiveDate) -> Vec<PlannedShift> {
    let mut planned = Vec::new();
    if from > to {
        return planned;
    }

    for date in from.iter_days().take_while(|d| *d <= to) {
        for template in templates.iter().filter(|t| t.is_active) {
            if template.weekdays().contains(date.weekday()) {
                planned.push(PlannedShift {
                    template_id: template.id.clone(),
                    template_name: template.name.clone(),
                    shift_date: date,
                    start_time: template.start_time,
                    end_time: template.end_time,
                });
            }
        }
    }

    planned.sort_by(|a, b| {
        a.shift_date
            .cmp(&b.shift_date)
            .then(a.start_time.cmp(&b.start_time))
            .then_with(|| a.template_name.cmp(&b.template_name))
    });
    planned
}

// =============================================================================
// Assignment Planning
// =============================================================================

/// Which employees staff a template.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TemplateAssignment {
    pub template_id: String,
    pub employee_ids: Vec<String>,
}

/// A shift ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewShift {
    pub employee_id: String,
    pub template_id: Option<String>,
    #[ts(as = "String")]
    pub shift_date: NaiveDate,
    #[ts(as = "String")]
    pub start_time: NaiveTime,
    #[ts(as = "String")]
    pub end_time: NaiveTime,
}

/// A planned slot that was skipped because the employee is already busy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScheduleConflict {
    pub employee_id: String,
    pub template_id: String,
    #[ts(as = "String")]
    pub shift_date: NaiveDate,
    /// Id of the blocking shift, when it already exists in storage.
    pub blocking_shift_id: Option<String>,
}

/// Result of [`plan_assignments`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SchedulePlan {
    pub new_shifts: Vec<NewShift>,
    pub conflicts: Vec<ScheduleConflict>,
}

/// Pairs planned slots with the employees assigned to their template.
///
/// A slot is skipped for an employee when it overlaps one of their
/// existing blocking shifts or a shift planned earlier in the same run.
/// Templates without an assignment produce nothing.
pub fn plan_assignments(
    planned: &[PlannedShift],
    assignments: &[TemplateAssignment],
    existing: &[Shift],
) -> SchedulePlan {
    let by_template: HashMap<&str, &[String]> = assignments
        .iter()
        .map(|a| (a.template_id.as_str(), a.employee_ids.as_slice()))
        .collect();

    let mut plan = SchedulePlan::default();

    for slot in planned {
        let Some(employees) = by_template.get(slot.template_id.as_str()) else {
            continue;
        };
        let window = (slot.shift_date, slot.start_time, slot.end_time);

        for employee_id in employees.iter() {
            if let Some(blocking) = find_overlap(employee_id, window, existing, None) {
                plan.conflicts.push(ScheduleConflict {
                    employee_id: employee_id.clone(),
                    template_id: slot.template_id.clone(),
                    shift_date: slot.shift_date,
                    blocking_shift_id: Some(blocking.id.clone()),
                });
                continue;
            }

            let clashes_with_plan = plan.new_shifts.iter().any(|s| {
                s.employee_id == *employee_id
                    && overlaps(window, (s.shift_date, s.start_time, s.end_time))
            });
            if clashes_with_plan {
                plan.conflicts.push(ScheduleConflict {
                    employee_id: employee_id.clone(),
                    template_id: slot.template_id.clone(),
                    shift_date: slot.shift_date,
                    blocking_shift_id: None,
                });
                continue;
            }

            plan.new_shifts.push(NewShift {
                employee_id: employee_id.clone(),
                template_id: Some(slot.template_id.clone()),
                shift_date: slot.shift_date,
                start_time: slot.start_time,
                end_time: slot.end_time,
            });
        }
    }

    plan
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ShiftStatus, WeekdaySet};
    use chrono::{Utc, Weekday};

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn template(id: &str, days: &[Weekday], start: NaiveTime, end: NaiveTime) -> ShiftTemplate {
        ShiftTemplate {
            id: id.to_string(),
            name: id.to_string(),
            position_id: None,
            weekday_mask: WeekdaySet::from_days(days).mask() as i64,
            start_time: start,
            end_time: end,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn shift(id: &str, employee: &str, date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Shift {
        Shift {
            id: id.to_string(),
            employee_id: employee.to_string(),
            template_id: None,
            shift_date: date,
            start_time: start,
            end_time: end,
            status: ShiftStatus::Scheduled,
            actual_minutes: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_period_parse_and_bounds() {
        let p: Period = "2024-02".parse().unwrap();
        assert_eq!(p.first_day(), d(2024, 2, 1));
        assert_eq!(p.last_day(), d(2024, 2, 29));
        assert_eq!(p.to_string(), "2024-02");

        let dec: Period = "2025-12".parse().unwrap();
        assert_eq!(dec.last_day(), d(2025, 12, 31));

        assert!("2025-13".parse::<Period>().is_err());
        assert!("2025-1".parse::<Period>().is_err());
        assert!("march".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_previous_crosses_year() {
        let jan: Period = "2026-01".parse().unwrap();
        assert_eq!(jan.previous().to_string(), "2025-12");
        assert!(jan.contains(d(2026, 1, 31)));
        assert!(!jan.contains(d(2026, 2, 1)));
    }

    #[test]
    fn test_period_serde_as_string() {
        let p = Period::new(2026, 3).unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "\"2026-03\"");
        let back: Period = serde_json::from_str("\"2026-03\"").unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_overlap_with_midnight_wrap() {
        // Friday night shift runs into Saturday morning
        let night = (d(2026, 3, 6), t(22, 0), t(6, 0));
        let saturday_morning = (d(2026, 3, 7), t(5, 0), t(13, 0));
        let saturday_late = (d(2026, 3, 7), t(6, 0), t(14, 0));

        assert!(overlaps(night, saturday_morning));
        assert!(!overlaps(night, saturday_late), "back-to-back is not an overlap");
    }

    #[test]
    fn test_expand_templates_respects_weekdays() {
        let templates = vec![
            template("morning", &[Weekday::Mon, Weekday::Wed], t(7, 0), t(15, 0)),
            template("close", &[Weekday::Mon], t(15, 0), t(23, 0)),
        ];
        // 2026-03-02 is a Monday
        let planned = expand_templates(&templates, d(2026, 3, 2), d(2026, 3, 8));

        let summary: Vec<(NaiveDate, &str)> = planned
            .iter()
            .map(|p| (p.shift_date, p.template_id.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (d(2026, 3, 2), "morning"),
                (d(2026, 3, 2), "close"),
                (d(2026, 3, 4), "morning"),
            ]
        );
    }

    #[test]
    fn test_expand_skips_inactive_and_empty_range() {
        let mut inactive = template("x", &[Weekday::Mon], t(7, 0), t(15, 0));
        inactive.is_active = false;
        assert!(expand_templates(&[inactive], d(2026, 3, 2), d(2026, 3, 8)).is_empty());

        let active = template("y", &[Weekday::Mon], t(7, 0), t(15, 0));
        assert!(expand_templates(&[active], d(2026, 3, 8), d(2026, 3, 2)).is_empty());
    }

    #[test]
    fn test_plan_assignments_skips_conflicts() {
        let templates = vec![
            template("morning", &[Weekday::Mon], t(7, 0), t(15, 0)),
            template("mid", &[Weekday::Mon], t(11, 0), t(19, 0)),
        ];
        let planned = expand_templates(&templates, d(2026, 3, 2), d(2026, 3, 2));
        let assignments = vec![
            TemplateAssignment {
                template_id: "morning".to_string(),
                employee_ids: vec!["ana".to_string(), "ben".to_string()],
            },
            TemplateAssignment {
                template_id: "mid".to_string(),
                employee_ids: vec!["ana".to_string()],
            },
        ];
        // ben already works that morning
        let existing = vec![shift("s-1", "ben", d(2026, 3, 2), t(8, 0), t(12, 0))];

        let plan = plan_assignments(&planned, &assignments, &existing);

        assert_eq!(plan.new_shifts.len(), 1);
        assert_eq!(plan.new_shifts[0].employee_id, "ana");
        assert_eq!(plan.new_shifts[0].template_id.as_deref(), Some("morning"));

        assert_eq!(plan.conflicts.len(), 2);
        assert_eq!(plan.conflicts[0].employee_id, "ben");
        assert_eq!(plan.conflicts[0].blocking_shift_id.as_deref(), Some("s-1"));
        // ana's mid shift clashes with her own morning shift from this run
        assert_eq!(plan.conflicts[1].employee_id, "ana");
        assert_eq!(plan.conflicts[1].blocking_shift_id, None);
    }

    #[test]
    fn test_cancelled_shift_does_not_block() {
        let mut cancelled = shift("s-1", "ana", d(2026, 3, 2), t(7, 0), t(15, 0));
        cancelled.status = ShiftStatus::Cancelled;
        let existing = vec![cancelled];

        let slot = (d(2026, 3, 2), t(7, 0), t(15, 0));
        assert!(find_overlap("ana", slot, &existing, None).is_none());
    }
}
