//! # Wage Analytics Engine
//!
//! Per-employee pay for a calendar month, compared with the month before.
//!
//! ## Pay Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Employee: Olena (rate $20.00/h, threshold 8h/day, overtime ×1.5)       │
//! │                                                                         │
//! │  Mar 02   07:00-17:00   600 min ─► 480 regular + 120 overtime           │
//! │  Mar 03   07:00-12:00   300 min ┐                                       │
//! │           14:00-19:00   300 min ┴► 480 regular + 120 overtime           │
//! │  Mar 04   08:00-12:00   240 min ─► 240 regular                          │
//! │                                                                         │
//! │  regular  = 1200 min × $20.00/h           = $400.00                     │
//! │  overtime =  240 min × $20.00/h × 1.5     = $120.00                     │
//! │  gross    =                                 $520.00                     │
//! │                                                                         │
//! │  February gross $400.00 → change +$120.00 (+30.00%) → significant       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Which Shifts Count
//! - `completed` shifts, at their actual minutes when recorded
//! - `scheduled` shifts dated before `today`, only with
//!   [`WagePolicy::include_scheduled`]
//! - `no_show` shifts are only counted in [`WageLine::no_show_count`]
//!
//! Overnight shifts belong to the day they start on.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{div_round, Money};
use crate::schedule::Period;
use crate::types::{EmployeeRate, Shift, ShiftStatus};
use crate::{DEFAULT_CHANGE_ALERT_BPS, DEFAULT_OVERTIME_MULTIPLIER_BPS, DEFAULT_OVERTIME_THRESHOLD_MINUTES};

// =============================================================================
// Policy
// =============================================================================

/// Knobs for the wage calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct WagePolicy {
    /// Minutes per calendar day paid at the regular rate.
    pub overtime_daily_threshold_minutes: i64,
    /// Overtime multiplier in basis points (15000 = ×1.5).
    pub overtime_multiplier_bps: i64,
    /// Month-over-month pay change that is flagged.
    pub change_alert_bps: i64,
    /// Count past shifts still marked `scheduled` as worked.
    pub include_scheduled: bool,
}

impl Default for WagePolicy {
    fn default() -> Self {
        WagePolicy {
            overtime_daily_threshold_minutes: DEFAULT_OVERTIME_THRESHOLD_MINUTES,
            overtime_multiplier_bps: DEFAULT_OVERTIME_MULTIPLIER_BPS,
            change_alert_bps: DEFAULT_CHANGE_ALERT_BPS,
            include_scheduled: false,
        }
    }
}

// =============================================================================
// Input / Output
// =============================================================================

/// Everything the engine needs for one report.
#[derive(Debug, Clone)]
pub struct WageInput {
    pub period: Period,
    pub employees: Vec<EmployeeRate>,
    /// Shifts of both `period` and `period.previous()`; others are ignored.
    pub shifts: Vec<Shift>,
    pub policy: WagePolicy,
    /// Reference date for `include_scheduled`.
    pub today: NaiveDate,
}

/// Worked time and pay of one employee in one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PeriodPay {
    pub shift_count: i64,
    pub worked_minutes: i64,
    pub regular_minutes: i64,
    pub overtime_minutes: i64,
    pub regular_pay: Money,
    pub overtime_pay: Money,
    pub gross_pay: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WageLine {
    pub employee_id: String,
    pub full_name: String,
    pub position_name: String,
    pub rate: Money,
    pub shift_count: i64,
    pub worked_minutes: i64,
    pub regular_minutes: i64,
    pub overtime_minutes: i64,
    pub regular_pay: Money,
    pub overtime_pay: Money,
    pub gross_pay: Money,
    pub previous_minutes: i64,
    pub previous_pay: Money,
    pub pay_change: Money,
    /// `None` when there was no pay in the previous period.
    pub pay_change_bps: Option<i64>,
    pub hours_change_minutes: i64,
    pub significant_change: bool,
    pub no_show_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WageTotals {
    pub worked_minutes: i64,
    pub gross_pay: Money,
    pub previous_minutes: i64,
    pub previous_pay: Money,
    pub pay_change: Money,
    pub pay_change_bps: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WageReport {
    #[ts(as = "String")]
    pub period: Period,
    #[ts(as = "String")]
    pub previous_period: Period,
    pub policy: WagePolicy,
    pub lines: Vec<WageLine>,
    pub totals: WageTotals,
}

// =============================================================================
// Engine
// =============================================================================

/// Pay for a set of shifts at one rate.
///
/// Minutes are grouped per shift date; everything beyond the daily
/// threshold is overtime. Pay is rounded once per bucket.
pub fn period_pay(rate: Money, shifts: &[&Shift], policy: &WagePolicy, today: NaiveDate) -> PeriodPay {
    let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    let mut shift_count = 0;

    for shift in shifts.iter().filter(|s| counts_as_worked(s, policy, today)) {
        shift_count += 1;
        *per_day.entry(shift.shift_date).or_default() += shift.worked_minutes();
    }

    let threshold = policy.overtime_daily_threshold_minutes.max(0);
    let (regular_minutes, overtime_minutes) =
        per_day.values().fold((0, 0), |(regular, overtime), minutes| {
            let day_regular = (*minutes).min(threshold);
            (regular + day_regular, overtime + (minutes - day_regular))
        });

    let regular_pay = Money::for_minutes(rate, regular_minutes);
    let overtime_pay =
        Money::for_minutes(rate, overtime_minutes).scale_bps(policy.overtime_multiplier_bps);

    PeriodPay {
        shift_count,
        worked_minutes: regular_minutes + overtime_minutes,
        regular_minutes,
        overtime_minutes,
        regular_pay,
        overtime_pay,
        gross_pay: regular_pay + overtime_pay,
    }
}

fn counts_as_worked(shift: &Shift, policy: &WagePolicy, today: NaiveDate) -> bool {
    match shift.status {
        ShiftStatus::Completed => true,
        ShiftStatus::Scheduled => policy.include_scheduled && shift.shift_date < today,
        ShiftStatus::Cancelled | ShiftStatus::NoShow => false,
    }
}

/// `(current − previous) / previous` in basis points.
fn change_bps(current: Money, previous: Money) -> Option<i64> {
    if previous.is_zero() {
        return None;
    }
    let delta = (current - previous).cents() as i128 * 10_000;
    let base = previous.cents().abs() as i128;
    Some(div_round(delta, base) as i64)
}

/// Builds the wage report for `input.period`.
///
/// Lines are sorted by gross pay (highest first), then name. Employees
/// without counted shifts or no-shows in either period are left out.
pub fn wage_report(input: &WageInput) -> WageReport {
    let period = input.period;
    let previous_period = period.previous();
    let policy = input.policy;

    let mut by_employee: HashMap<&str, Vec<&Shift>> = HashMap::new();
    for shift in &input.shifts {
        by_employee.entry(shift.employee_id.as_str()).or_default().push(shift);
    }

    let mut lines = Vec::new();
    for employee in &input.employees {
        let shifts = by_employee
            .get(employee.employee_id.as_str())
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let current: Vec<&Shift> = shifts
            .iter()
            .copied()
            .filter(|s| period.contains(s.shift_date))
            .collect();
        let previous: Vec<&Shift> = shifts
            .iter()
            .copied()
            .filter(|s| previous_period.contains(s.shift_date))
            .collect();

        let rate = employee.rate();
        let now = period_pay(rate, &current, &policy, input.today);
        let before = period_pay(rate, &previous, &policy, input.today);
        let no_show_count = current
            .iter()
            .filter(|s| s.status == ShiftStatus::NoShow)
            .count() as i64;

        if now.shift_count == 0 && before.shift_count == 0 && no_show_count == 0 {
            continue;
        }

        let pay_change = now.gross_pay - before.gross_pay;
        let pay_change_bps = change_bps(now.gross_pay, before.gross_pay);
        let significant_change = match pay_change_bps {
            Some(bps) => bps.abs() >= policy.change_alert_bps,
            None => !now.gross_pay.is_zero(),
        };

        lines.push(WageLine {
            employee_id: employee.employee_id.clone(),
            full_name: employee.full_name.clone(),
            position_name: employee.position_name.clone(),
            rate,
            shift_count: now.shift_count,
            worked_minutes: now.worked_minutes,
            regular_minutes: now.regular_minutes,
            overtime_minutes: now.overtime_minutes,
            regular_pay: now.regular_pay,
            overtime_pay: now.overtime_pay,
            gross_pay: now.gross_pay,
            previous_minutes: before.worked_minutes,
            previous_pay: before.gross_pay,
            pay_change,
            pay_change_bps,
            hours_change_minutes: now.worked_minutes - before.worked_minutes,
            significant_change,
            no_show_count,
        });
    }

    lines.sort_by(|a, b| {
        b.gross_pay
            .cmp(&a.gross_pay)
            .then_with(|| a.full_name.cmp(&b.full_name))
    });

    let mut totals = WageTotals::default();
    for line in &lines {
        totals.worked_minutes += line.worked_minutes;
        totals.gross_pay += line.gross_pay;
        totals.previous_minutes += line.previous_minutes;
        totals.previous_pay += line.previous_pay;
    }
    totals.pay_change = totals.gross_pay - totals.previous_pay;
    totals.pay_change_bps = change_bps(totals.gross_pay, totals.previous_pay);

    WageReport {
        period,
        previous_period,
        policy,
        lines,
        totals,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Utc};

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn shift(employee: &str, date: NaiveDate, start: u32, end: u32, status: ShiftStatus) -> Shift {
        Shift {
            id: format!("{employee}-{date}-{start}"),
            employee_id: employee.to_string(),
            template_id: None,
            shift_date: date,
            start_time: t(start),
            end_time: t(end),
            status,
            actual_minutes: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn rate(id: &str, name: &str, cents: i64) -> EmployeeRate {
        EmployeeRate {
            employee_id: id.to_string(),
            full_name: name.to_string(),
            position_name: "Barista".to_string(),
            rate_cents: cents,
        }
    }

    fn input(shifts: Vec<Shift>, employees: Vec<EmployeeRate>) -> WageInput {
        WageInput {
            period: Period::new(2026, 3).unwrap(),
            employees,
            shifts,
            policy: WagePolicy::default(),
            today: d(4, 1),
        }
    }

    fn olena_shifts() -> Vec<Shift> {
        use ShiftStatus::Completed;
        vec![
            shift("olena", d(3, 2), 7, 17, Completed),
            shift("olena", d(3, 3), 7, 12, Completed),
            shift("olena", d(3, 3), 14, 19, Completed),
            shift("olena", d(3, 4), 8, 12, Completed),
            // February: 20h, no overtime
            shift("olena", d(2, 10), 8, 16, Completed),
            shift("olena", d(2, 11), 8, 16, Completed),
            shift("olena", d(2, 12), 8, 12, Completed),
        ]
    }

    #[test]
    fn test_overtime_grouped_per_day() {
        let report = wage_report(&input(olena_shifts(), vec![rate("olena", "Olena", 2000)]));
        let line = &report.lines[0];

        assert_eq!(line.shift_count, 4);
        assert_eq!(line.regular_minutes, 1200);
        assert_eq!(line.overtime_minutes, 240);
        assert_eq!(line.regular_pay.cents(), 40_000);
        assert_eq!(line.overtime_pay.cents(), 12_000);
        assert_eq!(line.gross_pay.cents(), 52_000);
    }

    #[test]
    fn test_night_shift_overtime_on_start_date() {
        use ShiftStatus::Completed;
        let shifts = vec![
            shift("olena", d(3, 2), 22, 8, Completed), // 600 min, ends Mar 03
            shift("olena", d(3, 3), 9, 17, Completed),
            shift("olena", d(3, 31), 22, 6, Completed), // ends in April
        ];
        let report = wage_report(&input(shifts, vec![rate("olena", "Olena", 2000)]));
        let line = &report.lines[0];

        // Mar 02: 480 + 120 overtime, Mar 03: 480, Mar 31: 480
        assert_eq!(line.shift_count, 3);
        assert_eq!(line.worked_minutes, 1560);
        assert_eq!(line.regular_minutes, 1440);
        assert_eq!(line.overtime_minutes, 120);
        assert_eq!(line.overtime_pay.cents(), 6_000);
    }

    #[test]
    fn test_custom_overtime_policy() {
        let mut custom = input(olena_shifts(), vec![rate("olena", "Olena", 2000)]);
        custom.policy.overtime_daily_threshold_minutes = 360;
        custom.policy.overtime_multiplier_bps = 20_000;

        let report = wage_report(&custom);
        let line = &report.lines[0];

        // Mar 02: 360 + 240, Mar 03: 360 + 240, Mar 04: 240
        assert_eq!(line.regular_minutes, 960);
        assert_eq!(line.overtime_minutes, 480);
        assert_eq!(line.regular_pay.cents(), 32_000);
        assert_eq!(line.overtime_pay.cents(), 32_000);
        assert_eq!(line.gross_pay.cents(), 64_000);
        assert_eq!(report.policy.overtime_multiplier_bps, 20_000);
    }

    #[test]
    fn test_month_over_month_comparison() {
        let report = wage_report(&input(olena_shifts(), vec![rate("olena", "Olena", 2000)]));
        let line = &report.lines[0];

        assert_eq!(report.previous_period.to_string(), "2026-02");
        assert_eq!(line.previous_minutes, 1200);
        assert_eq!(line.previous_pay.cents(), 40_000);
        assert_eq!(line.pay_change.cents(), 12_000);
        assert_eq!(line.pay_change_bps, Some(3000));
        assert_eq!(line.hours_change_minutes, 240);
        assert!(line.significant_change);

        assert_eq!(report.totals.gross_pay.cents(), 52_000);
        assert_eq!(report.totals.pay_change_bps, Some(3000));
    }

    #[test]
    fn test_new_employee_has_no_change_ratio() {
        use ShiftStatus::Completed;
        let shifts = vec![shift("ivan", d(3, 5), 9, 13, Completed)];
        let report = wage_report(&input(shifts, vec![rate("ivan", "Ivan", 1500)]));
        let line = &report.lines[0];

        assert_eq!(line.previous_pay, Money::zero());
        assert_eq!(line.pay_change_bps, None);
        assert!(line.significant_change);
    }

    #[test]
    fn test_status_filtering_and_no_shows() {
        use ShiftStatus::*;
        let mut completed_short = shift("ana", d(3, 6), 9, 17, Completed);
        completed_short.actual_minutes = Some(450);
        let shifts = vec![
            completed_short,
            shift("ana", d(3, 7), 9, 17, Cancelled),
            shift("ana", d(3, 8), 9, 17, NoShow),
            shift("ana", d(3, 9), 9, 17, Scheduled),
        ];

        let report = wage_report(&input(shifts.clone(), vec![rate("ana", "Ana", 1800)]));
        let line = &report.lines[0];
        assert_eq!(line.shift_count, 1);
        assert_eq!(line.worked_minutes, 450);
        assert_eq!(line.gross_pay.cents(), 13_500);
        assert_eq!(line.no_show_count, 1);

        let mut with_scheduled = input(shifts, vec![rate("ana", "Ana", 1800)]);
        with_scheduled.policy.include_scheduled = true;
        let report = wage_report(&with_scheduled);
        assert_eq!(report.lines[0].shift_count, 2);
        assert_eq!(report.lines[0].worked_minutes, 930);
    }

    #[test]
    fn test_scheduled_shift_counts_once_date_passed() {
        use ShiftStatus::Scheduled;
        let shifts = vec![
            shift("ana", d(3, 8), 9, 17, Scheduled),
            shift("ana", d(3, 9), 9, 17, Scheduled),
        ];
        let mut today_is_9th = input(shifts, vec![rate("ana", "Ana", 1800)]);
        today_is_9th.policy.include_scheduled = true;
        today_is_9th.today = d(3, 9);

        let report = wage_report(&today_is_9th);
        assert_eq!(report.lines[0].shift_count, 1);
        assert_eq!(report.lines[0].worked_minutes, 480);
    }

    #[test]
    fn test_sorting_and_omission() {
        use ShiftStatus::Completed;
        let shifts = vec![
            shift("a", d(3, 2), 9, 13, Completed),
            shift("b", d(3, 2), 9, 17, Completed),
            shift("c", d(3, 2), 9, 13, Completed),
        ];
        let employees = vec![
            rate("c", "Cleo", 1500),
            rate("a", "Adam", 1500),
            rate("b", "Bohdan", 1500),
            rate("idle", "Idle", 1500),
        ];
        let report = wage_report(&input(shifts, employees));

        let names: Vec<&str> = report.lines.iter().map(|l| l.full_name.as_str()).collect();
        assert_eq!(names, vec!["Bohdan", "Adam", "Cleo"]);
    }

    #[test]
    fn test_small_change_not_flagged() {
        use ShiftStatus::Completed;
        let shifts = vec![
            shift("a", d(3, 2), 9, 17, Completed),
            shift("a", d(2, 2), 9, 16, Completed),
        ];
        let report = wage_report(&input(shifts, vec![rate("a", "Adam", 1500)]));
        // 8h vs 7h = +14.29%
        assert_eq!(report.lines[0].pay_change_bps, Some(1429));
        assert!(!report.lines[0].significant_change);
    }
}
