//! # Validation Module
//!
//! Pre-I/O validation for engine requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (pure, before any storage call)                  │
//! │  ├── Required fields, ranges, hour windows, known trend names          │
//! │  └── A failure here guarantees zero I/O was attempted                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── CHECK (quantity > 0, price_cents >= 0)                            │
//! │  ├── UNIQUE (inventory.menuitemid)                                     │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: the storage layer re-enforces what we checked       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::{ReportKind, SaleSubmission, TimeRange, TrendKind};

// =============================================================================
// Sale Submission
// =============================================================================

/// Validates a sale submission before the recorder opens a transaction.
///
/// ## Rules
/// - `customer_name` non-empty (after trimming)
/// - `payer_id` non-negative (0 is the guest account)
/// - `items` non-empty
/// - every line: positive `item_id`, non-negative `price_cents`
///
/// A violation fails the whole submission with no I/O attempted.
pub fn validate_sale_submission(submission: &SaleSubmission) -> ValidationResult<()> {
    if submission.customer_name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "customer_name".to_string(),
        });
    }

    if submission.payer_id < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "payer_id".to_string(),
        });
    }

    if submission.items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    for (index, line) in submission.items.iter().enumerate() {
        if line.item_id <= 0 {
            return Err(ValidationError::InvalidLineItem {
                index,
                reason: "item_id must be positive".to_string(),
            });
        }
        if line.price_cents < 0 {
            return Err(ValidationError::InvalidLineItem {
                index,
                reason: "price must not be negative".to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Report Windows
// =============================================================================

/// Validates an hourly report window.
///
/// ## Rules
/// - both hours in `[0, 23]`
/// - `start_hour <= end_hour`
///
/// Applies to both X and Z report kinds; a violation is rejected before
/// any query is issued.
pub fn validate_hour_range(start_hour: u8, end_hour: u8) -> ValidationResult<()> {
    if start_hour > 23 {
        return Err(ValidationError::OutOfRange {
            field: "start_hour".to_string(),
            min: 0,
            max: 23,
        });
    }

    if end_hour > 23 {
        return Err(ValidationError::OutOfRange {
            field: "end_hour".to_string(),
            min: 0,
            max: 23,
        });
    }

    if start_hour > end_hour {
        return Err(ValidationError::InvertedHourRange {
            start: start_hour,
            end: end_hour,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Rules
// =============================================================================

/// Validates an inventory delta or absolute quantity target.
///
/// Absolute overwrites must not be negative; zero is allowed (sold out).
pub fn validate_absolute_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (promotional items).
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Wire-Name Parsing
// =============================================================================

/// Parses a report kind from its request tag ("X" or "Z").
pub fn parse_report_kind(value: &str) -> ValidationResult<ReportKind> {
    match value.trim() {
        "X" | "x" => Ok(ReportKind::X),
        "Z" | "z" => Ok(ReportKind::Z),
        other => Err(ValidationError::Unrecognized {
            field: "report_kind".to_string(),
            value: other.to_string(),
        }),
    }
}

/// Parses a trend kind from its request name ("Daily Sales", ...).
///
/// An unknown name is a validation failure returned before querying.
pub fn parse_trend_kind(value: &str) -> ValidationResult<TrendKind> {
    match value.trim() {
        "Daily Sales" => Ok(TrendKind::DailySales),
        "Peak Days" => Ok(TrendKind::PeakDays),
        "Total Orders" => Ok(TrendKind::TotalOrders),
        "Product Usage" => Ok(TrendKind::ProductUsage),
        other => Err(ValidationError::Unrecognized {
            field: "trend_type".to_string(),
            value: other.to_string(),
        }),
    }
}

/// Parses an optional recency window; absent means unrestricted.
pub fn parse_time_range(value: Option<&str>) -> ValidationResult<TimeRange> {
    match value.map(str::trim) {
        None | Some("") | Some("All Time") => Ok(TimeRange::AllTime),
        Some("Last 7 Days") => Ok(TimeRange::Last7Days),
        Some("Last 30 Days") => Ok(TimeRange::Last30Days),
        Some(other) => Err(ValidationError::Unrecognized {
            field: "time_range".to_string(),
            value: other.to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SaleLine;

    fn submission() -> SaleSubmission {
        SaleSubmission {
            customer_name: "Ada".to_string(),
            payer_id: 3,
            items: vec![
                SaleLine {
                    item_id: 1,
                    price_cents: 575,
                },
                SaleLine {
                    item_id: 2,
                    price_cents: 625,
                },
            ],
            payment_method: "Cash".to_string(),
        }
    }

    #[test]
    fn test_valid_submission() {
        assert!(validate_sale_submission(&submission()).is_ok());
    }

    #[test]
    fn test_blank_customer_rejected() {
        let mut sub = submission();
        sub.customer_name = "   ".to_string();
        assert!(matches!(
            validate_sale_submission(&sub),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_guest_payer_allowed() {
        let mut sub = submission();
        sub.payer_id = 0;
        assert!(validate_sale_submission(&sub).is_ok());

        sub.payer_id = -1;
        assert!(validate_sale_submission(&sub).is_err());
    }

    #[test]
    fn test_empty_cart_rejected() {
        let mut sub = submission();
        sub.items.clear();
        assert!(matches!(
            validate_sale_submission(&sub),
            Err(ValidationError::Empty { .. })
        ));
    }

    #[test]
    fn test_bad_line_reports_index() {
        let mut sub = submission();
        sub.items[1].price_cents = -5;
        match validate_sale_submission(&sub) {
            Err(ValidationError::InvalidLineItem { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidLineItem, got {:?}", other),
        }
    }

    #[test]
    fn test_hour_range() {
        assert!(validate_hour_range(0, 23).is_ok());
        assert!(validate_hour_range(9, 9).is_ok());
        assert!(matches!(
            validate_hour_range(17, 9),
            Err(ValidationError::InvertedHourRange { start: 17, end: 9 })
        ));
        assert!(validate_hour_range(24, 24).is_err());
        assert!(validate_hour_range(0, 24).is_err());
    }

    #[test]
    fn test_parse_report_kind() {
        assert_eq!(parse_report_kind("X").unwrap(), ReportKind::X);
        assert_eq!(parse_report_kind("z").unwrap(), ReportKind::Z);
        assert!(parse_report_kind("Y").is_err());
    }

    #[test]
    fn test_parse_trend_kind() {
        assert_eq!(parse_trend_kind("Daily Sales").unwrap(), TrendKind::DailySales);
        assert_eq!(parse_trend_kind("Peak Days").unwrap(), TrendKind::PeakDays);
        assert_eq!(parse_trend_kind("Total Orders").unwrap(), TrendKind::TotalOrders);
        assert_eq!(parse_trend_kind("Product Usage").unwrap(), TrendKind::ProductUsage);
        assert!(parse_trend_kind("Hourly Sales").is_err());
    }

    #[test]
    fn test_parse_time_range() {
        assert_eq!(parse_time_range(None).unwrap(), TimeRange::AllTime);
        assert_eq!(parse_time_range(Some("")).unwrap(), TimeRange::AllTime);
        assert_eq!(
            parse_time_range(Some("Last 7 Days")).unwrap(),
            TimeRange::Last7Days
        );
        assert_eq!(
            parse_time_range(Some("Last 30 Days")).unwrap(),
            TimeRange::Last30Days
        );
        assert!(parse_time_range(Some("Yesterday")).is_err());
    }

    #[test]
    fn test_absolute_quantity() {
        assert!(validate_absolute_quantity(0).is_ok());
        assert!(validate_absolute_quantity(40).is_ok());
        assert!(validate_absolute_quantity(-1).is_err());
    }
}
