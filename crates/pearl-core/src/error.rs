//! # Error Types
//!
//! Domain-specific error types for pearl-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pearl-core errors (this file)                                         │
//! │  └── ValidationError  - Input validation failures, caught before I/O   │
//! │                                                                         │
//! │  pearl-db errors (separate crate)                                      │
//! │  └── EngineError      - Allocator / Persistence / Report failures      │
//! │                                                                         │
//! │  Flow: ValidationError → EngineError::Validation → caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, offending value)
//! 3. Errors are enum variants, never String
//! 4. Validation always happens before any I/O is attempted

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when a request doesn't meet preconditions. They are raised
/// before any storage call, so a validation failure never leaves partial
/// state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A collection that must have entries is empty.
    #[error("{field} must not be empty")]
    Empty { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// An hour window where the start comes after the end.
    #[error("start hour {start} cannot be greater than end hour {end}")]
    InvertedHourRange { start: u8, end: u8 },

    /// A malformed line item inside a sale submission.
    #[error("line item {index} is invalid: {reason}")]
    InvalidLineItem { index: usize, reason: String },

    /// Value is not in the allowed set (e.g. an unknown trend type).
    #[error("{field} '{value}' is not recognized")]
    Unrecognized { field: String, value: String },
}

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::Required {
            field: "customer_name".to_string(),
        };
        assert_eq!(err.to_string(), "customer_name is required");

        let err = ValidationError::InvertedHourRange { start: 17, end: 9 };
        assert_eq!(
            err.to_string(),
            "start hour 17 cannot be greater than end hour 9"
        );

        let err = ValidationError::Unrecognized {
            field: "trend_type".to_string(),
            value: "Weekly Vibes".to_string(),
        };
        assert_eq!(err.to_string(), "trend_type 'Weekly Vibes' is not recognized");
    }
}
