//! # Validation Module
//!
//! Input validation for the back office.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP request DTO (bistro-api)                                 │
//! │  ├── Type validation (serde deserialization)                            │
//! │  └── calls into THIS MODULE: field rules                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repositories (bistro-db)                                      │
//! │  └── State rules (closed day, shift status)                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  ├── UNIQUE constraints                                                 │
//! │  └── Foreign key constraints                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bistro_core::validation::{validate_name, validate_sale_quantity};
//!
//! let name = validate_name("name", "  Flat White ", 120).unwrap();
//! assert_eq!(name, "Flat White");
//!
//! assert!(validate_sale_quantity(3).is_ok());
//! assert!(validate_sale_quantity(0).is_err());
//! ```

use chrono::{NaiveDate, NaiveTime};

use crate::error::ValidationError;
use crate::schedule::{shift_minutes, Period};
use crate::types::WeekdaySet;
use crate::{
    MAX_HOURLY_RATE_CENTS, MAX_PRICE_CENTS, MAX_SALE_QUANTITY, MAX_SCHEDULE_DAYS, MAX_SHIFT_MINUTES,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest inventory quantity accepted on one line (1,000,000 units).
const MAX_QUANTITY_MILLI: i64 = 1_000_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a required name-like field.
///
/// ## Rules
/// - Surrounding whitespace is trimmed
/// - Must not be empty after trimming
/// - At most `max_len` characters
///
/// ## Returns
/// The trimmed value.
pub fn validate_name(field: &str, value: &str, max_len: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > max_len {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: max_len,
        });
    }

    Ok(value.to_string())
}

/// Validates an optional free-text field.
///
/// Blank input collapses to `None`.
pub fn validate_optional_text(
    field: &str,
    value: Option<&str>,
    max_len: usize,
) -> ValidationResult<Option<String>> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    if value.chars().count() > max_len {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: max_len,
        });
    }

    Ok(Some(value.to_string()))
}

// =============================================================================
// Money Validators
// =============================================================================

/// Validates a menu price or product cost in cents.
///
/// ## Example
/// ```rust
/// use bistro_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents("price_cents", 450).is_ok());
/// assert!(validate_price_cents("price_cents", 0).is_ok());
/// assert!(validate_price_cents("price_cents", -1).is_err());
/// assert!(validate_price_cents("price_cents", 4_000_000_000_000_000_000).is_err());
/// ```
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates an amount that must be strictly positive (expenses):
/// `0 < cents <= MAX_PRICE_CENTS`.
pub fn validate_amount_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if cents > MAX_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates an hourly rate: `0 < rate <= MAX_HOURLY_RATE_CENTS`.
pub fn validate_hourly_rate_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "hourly_rate_cents".to_string(),
        });
    }

    if cents > MAX_HOURLY_RATE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "hourly_rate_cents".to_string(),
            min: 1,
            max: MAX_HOURLY_RATE_CENTS,
        });
    }

    Ok(())
}

// =============================================================================
// Quantity Validators
// =============================================================================

/// Validates an inventory quantity in thousandths.
///
/// Counts may be zero (an empty shelf); deliveries and recipe amounts may not.
pub fn validate_quantity_milli(field: &str, milli: i64, allow_zero: bool) -> ValidationResult<()> {
    if milli < 0 || (milli == 0 && !allow_zero) {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if milli > MAX_QUANTITY_MILLI {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: if allow_zero { 0 } else { 1 },
            max: MAX_QUANTITY_MILLI,
        });
    }

    Ok(())
}

/// Validates the quantity on a recorded sale line.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed `MAX_SALE_QUANTITY` (999)
pub fn validate_sale_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_SALE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_SALE_QUANTITY,
        });
    }

    Ok(())
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a UUID string.
///
/// ## Example
/// ```rust
/// use bistro_core::validation::validate_uuid;
///
/// assert!(validate_uuid("product_id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("product_id", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    uuid::Uuid::parse_str(id.trim())
        .map_err(|_| ValidationError::invalid(field, "must be a valid UUID"))?;

    Ok(())
}

// =============================================================================
// Scheduling Validators
// =============================================================================

/// Validates shift times and returns the shift length in minutes.
///
/// `end < start` is an overnight shift. `start == end` is rejected.
///
/// ```text
///   07:00 → 15:00   480 min   ok
///   22:00 → 06:00   480 min   ok (crosses midnight)
///   09:00 → 09:00             rejected
///   06:00 → 23:00  1020 min   rejected (> 16h)
/// ```
pub fn validate_shift_times(start: NaiveTime, end: NaiveTime) -> ValidationResult<i64> {
    if start == end {
        return Err(ValidationError::invalid(
            "end_time",
            "must differ from start_time",
        ));
    }

    let minutes = shift_minutes(start, end);
    if minutes > MAX_SHIFT_MINUTES {
        return Err(ValidationError::OutOfRange {
            field: "shift_minutes".to_string(),
            min: 1,
            max: MAX_SHIFT_MINUTES,
        });
    }

    Ok(minutes)
}

/// Validates minutes actually worked on a completed shift.
pub fn validate_actual_minutes(minutes: i64) -> ValidationResult<()> {
    if !(0..=MAX_SHIFT_MINUTES).contains(&minutes) {
        return Err(ValidationError::OutOfRange {
            field: "actual_minutes".to_string(),
            min: 0,
            max: MAX_SHIFT_MINUTES,
        });
    }

    Ok(())
}

/// Validates a weekday mask and converts it to a [`WeekdaySet`].
pub fn validate_weekday_mask(mask: i64) -> ValidationResult<WeekdaySet> {
    if !(1..=WeekdaySet::ALL.mask() as i64).contains(&mask) {
        return Err(ValidationError::OutOfRange {
            field: "weekday_mask".to_string(),
            min: 1,
            max: WeekdaySet::ALL.mask() as i64,
        });
    }

    Ok(WeekdaySet::from_mask(mask as u8))
}

/// Validates that a listing range is not reversed. Any span is allowed.
pub fn validate_date_order(from: NaiveDate, to: NaiveDate) -> ValidationResult<()> {
    if from > to {
        return Err(ValidationError::invalid("to", "must not be before from"));
    }

    Ok(())
}

/// Validates a date range for generating shifts.
///
/// Both ends are inclusive; the span may not exceed `MAX_SCHEDULE_DAYS`.
pub fn validate_date_range(from: NaiveDate, to: NaiveDate) -> ValidationResult<()> {
    validate_date_order(from, to)?;

    let days = (to - from).num_days() + 1;
    if days > MAX_SCHEDULE_DAYS {
        return Err(ValidationError::OutOfRange {
            field: "date range (days)".to_string(),
            min: 1,
            max: MAX_SCHEDULE_DAYS,
        });
    }

    Ok(())
}

// =============================================================================
// Report Parameters
// =============================================================================

/// Validates a reconciliation tolerance (0% to 100%).
pub fn validate_tolerance_bps(bps: i64) -> ValidationResult<()> {
    if !(0..=10_000).contains(&bps) {
        return Err(ValidationError::OutOfRange {
            field: "tolerance_bps".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Parses a `YYYY-MM` month into a [`Period`].
pub fn parse_year_month(value: &str) -> ValidationResult<Period> {
    if value.trim().is_empty() {
        return Err(ValidationError::required("month"));
    }
    value.parse()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", " Latte ", 50).unwrap(), "Latte");
        assert_eq!(
            validate_name("name", "   ", 50),
            Err(ValidationError::required("name"))
        );
        assert!(validate_name("name", &"A".repeat(51), 50).is_err());
        // Counted in characters, not bytes
        assert!(validate_name("name", "Вареники", 8).is_ok());
    }

    #[test]
    fn test_validate_optional_text() {
        assert_eq!(validate_optional_text("notes", None, 10).unwrap(), None);
        assert_eq!(validate_optional_text("notes", Some("  "), 10).unwrap(), None);
        assert_eq!(
            validate_optional_text("notes", Some(" hi "), 10).unwrap(),
            Some("hi".to_string())
        );
        assert!(validate_optional_text("notes", Some("too long text"), 5).is_err());
    }

    #[test]
    fn test_money_validators() {
        assert!(validate_price_cents("price_cents", 0).is_ok());
        assert!(validate_price_cents("price_cents", -5).is_err());
        assert!(validate_price_cents("price_cents", MAX_PRICE_CENTS).is_ok());
        assert!(validate_price_cents("price_cents", MAX_PRICE_CENTS + 1).is_err());
        assert!(validate_price_cents("price_cents", i64::MAX / 3).is_err());
        assert!(validate_amount_cents("amount_cents", 1).is_ok());
        assert!(validate_amount_cents("amount_cents", 0).is_err());
        assert!(validate_amount_cents("amount_cents", MAX_PRICE_CENTS + 1).is_err());
        assert!(validate_hourly_rate_cents(1850).is_ok());
        assert!(validate_hourly_rate_cents(0).is_err());
        assert!(validate_hourly_rate_cents(MAX_HOURLY_RATE_CENTS + 1).is_err());
    }

    #[test]
    fn test_quantity_validators() {
        assert!(validate_quantity_milli("quantity_milli", 0, true).is_ok());
        assert!(validate_quantity_milli("quantity_milli", 0, false).is_err());
        assert!(validate_quantity_milli("quantity_milli", -1, true).is_err());
        assert!(validate_quantity_milli("quantity_milli", MAX_QUANTITY_MILLI + 1, true).is_err());

        assert!(validate_sale_quantity(1).is_ok());
        assert!(validate_sale_quantity(999).is_ok());
        assert!(validate_sale_quantity(0).is_err());
        assert!(validate_sale_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert_eq!(validate_uuid("id", ""), Err(ValidationError::required("id")));
        assert!(validate_uuid("id", "123").is_err());
    }

    #[test]
    fn test_validate_shift_times() {
        assert_eq!(validate_shift_times(t(7, 0), t(15, 0)).unwrap(), 480);
        assert_eq!(validate_shift_times(t(22, 0), t(6, 0)).unwrap(), 480);
        assert!(validate_shift_times(t(9, 0), t(9, 0)).is_err());
        assert!(validate_shift_times(t(6, 0), t(23, 0)).is_err());
    }

    #[test]
    fn test_validate_actual_minutes() {
        assert!(validate_actual_minutes(0).is_ok());
        assert!(validate_actual_minutes(MAX_SHIFT_MINUTES).is_ok());
        assert!(validate_actual_minutes(-1).is_err());
        assert!(validate_actual_minutes(MAX_SHIFT_MINUTES + 1).is_err());
    }

    #[test]
    fn test_validate_weekday_mask() {
        assert_eq!(validate_weekday_mask(31).unwrap().mask(), 31);
        assert!(validate_weekday_mask(0).is_err());
        assert!(validate_weekday_mask(128).is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let d = |day| NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
        assert!(validate_date_range(d(1), d(1)).is_ok());
        assert!(validate_date_range(d(1), d(31)).is_ok());
        assert!(validate_date_range(d(2), d(1)).is_err());

        let far = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
        assert!(validate_date_range(d(1), far).is_err());
    }

    #[test]
    fn test_validate_date_order_has_no_span_limit() {
        let from = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        assert!(validate_date_order(from, to).is_ok());
        assert!(validate_date_order(from, from).is_ok());
        assert!(validate_date_order(to, from).is_err());
    }

    #[test]
    fn test_report_parameters() {
        assert!(validate_tolerance_bps(0).is_ok());
        assert!(validate_tolerance_bps(10_000).is_ok());
        assert!(validate_tolerance_bps(10_001).is_err());

        assert_eq!(parse_year_month("2026-03").unwrap().to_string(), "2026-03");
        assert_eq!(parse_year_month(""), Err(ValidationError::required("month")));
        assert!(parse_year_month("2026/03").is_err());
    }
}
