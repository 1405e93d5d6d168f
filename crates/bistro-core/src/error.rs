//! # Error Types
//!
//! Domain-specific error types for bistro-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bistro-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  bistro-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  bistro-api errors                                                     │
//! │  └── ApiError         - What HTTP clients see (JSON + status)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Client                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. The API layer maps
/// them to `422 Unprocessable Entity` unless noted otherwise.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The daily record is closed and can no longer change.
    ///
    /// ## When This Occurs
    /// - Adding a sale or expense to a closed day
    /// - Re-counting inventory after the day was closed
    #[error("Daily record for {date} is closed")]
    DayClosed { date: String },

    /// A day cannot be closed without a closing inventory count.
    #[error("Daily record for {date} has no closing inventory count")]
    MissingClosingCount { date: String },

    /// Shift is not in a state that allows the requested operation.
    #[error("Shift {shift_id} is {status}, cannot {action}")]
    InvalidShiftStatus {
        shift_id: String,
        status: String,
        action: String,
    },

    /// Two shifts of the same employee overlap.
    #[error("Shift overlaps an existing shift for employee {employee_id} on {date}")]
    ShiftOverlap { employee_id: String, date: String },

    /// A recipe references the same product twice.
    #[error("Recipe lists product {product_id} more than once")]
    DuplicateRecipeComponent { product_id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid month).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Shorthand for [`ValidationError::InvalidFormat`].
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::DayClosed {
            date: "2026-03-14".to_string(),
        };
        assert_eq!(err.to_string(), "Daily record for 2026-03-14 is closed");

        let err = CoreError::InvalidShiftStatus {
            shift_id: "s-1".to_string(),
            status: "cancelled".to_string(),
            action: "complete".to_string(),
        };
        assert_eq!(err.to_string(), "Shift s-1 is cancelled, cannot complete");
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::required("name").to_string(), "name is required");

        let err = ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        };
        assert_eq!(err.to_string(), "name must be at most 100 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::required("month").into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
