//! # Domain Types
//!
//! Core domain types used throughout Pearl POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │    MenuItem     │   │  TransactionRecord  │   │ InventoryRecord │   │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ─────────────  │   │
//! │  │  item_id        │◄──┤  menu_item_id (FK)  │   │  menu_item_id   │   │
//! │  │  name           │   │  id (allocator)     │   │  (UNIQUE)       │   │
//! │  │  item_type      │   │  price_cents        │   │  quantity       │   │
//! │  │  price_cents    │   │  category           │   │  restock_date   │   │
//! │  └─────────────────┘   └─────────────────────┘   └─────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────────┐   ┌─────────────────┐   │
//! │  │   SaleHeader    │   │   SaleSubmission    │   │  Report rows    │   │
//! │  │  ─────────────  │   │  ─────────────────  │   │  ─────────────  │   │
//! │  │  sales_timestamp│   │  customer_name      │   │  HourlyBucket   │   │
//! │  │  total_amount   │   │  payer_id           │   │  ZReportRow     │   │
//! │  │  peak_day_flag  │   │  items: [SaleLine]  │   │  TrendPoint     │   │
//! │  └─────────────────┘   └─────────────────────┘   └─────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The transaction log (`TransactionRecord`) is append-only and is the
//! immutable source of truth for every report: corrections become new
//! `Return`/`Void`/`Discard` rows, never in-place edits.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Constants
// =============================================================================

/// Sentinel `sale_id` for transaction records not linked to a sale header.
///
/// ## Extension Point
/// `submit_sale` never creates a sale header, so every line item it records
/// carries this sentinel. Linking line items to a header is a deliberate
/// future extension, not a correctness requirement: reports left-join
/// through `sale_id` and simply find no header for sentinel rows.
pub const UNLINKED_SALE_ID: i64 = 0;

// =============================================================================
// Menu Item (Catalog)
// =============================================================================

/// A sellable item in the menu catalog.
///
/// Owned by catalog administration. The sale-recording path only ever reads
/// this; the captured `price_cents` on a [`TransactionRecord`] is what keeps
/// historical reports stable when catalog prices change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MenuItem {
    /// Catalog identifier.
    pub item_id: i64,

    /// Display name shown to the cashier.
    pub name: String,

    /// Category tag, e.g. "Drink", "Seasonal".
    pub item_type: String,

    /// Current price in cents (not what reports use; see TransactionRecord).
    pub price_cents: i64,

    /// Whether the item can currently be sold.
    pub available: bool,
}

impl MenuItem {
    /// Returns the current catalog price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Transaction Category
// =============================================================================

/// Tag distinguishing how a transaction record is treated in reports.
///
/// ## Sign Convention
/// `Return`, `Void`, and `Discard` rows are stored with **positive**
/// price magnitudes, exactly like `Sale` rows. Reports accumulate them as
/// positive totals ("absolute value of the adjustment") and the caller is
/// responsible for subtracting. [`Self::signed_magnitude`] is the single
/// place that rule is written down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum TransactionCategory {
    /// A sold line item.
    Sale,
    /// A returned line item (customer refund).
    Return,
    /// A voided line item (operator cancellation).
    Void,
    /// A discarded line item (waste, spillage).
    Discard,
}

impl TransactionCategory {
    /// The exact tag stored in the `transactions.category` column.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionCategory::Sale => "Sale",
            TransactionCategory::Return => "Return",
            TransactionCategory::Void => "Void",
            TransactionCategory::Discard => "Discard",
        }
    }

    /// True for the categories that reduce net takings.
    pub const fn is_adjustment(&self) -> bool {
        !matches!(self, TransactionCategory::Sale)
    }

    /// Applies the category's sign to a stored (positive) magnitude.
    ///
    /// Reports store and surface adjustment totals as positive magnitudes;
    /// this is the documented rule for callers that want a net figure.
    pub fn signed_magnitude(&self, amount: Money) -> Money {
        if self.is_adjustment() {
            Money::zero() - amount.abs()
        } else {
            amount.abs()
        }
    }
}

// =============================================================================
// Transaction Record
// =============================================================================

/// One line item in the append-only transaction log.
///
/// Created exactly once per line item per sale and immutable thereafter.
/// `id` is allocator-assigned, strictly increasing in insertion order, and
/// never reused.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionRecord {
    /// Monotonic identifier assigned by the sequence allocator.
    pub id: i64,

    /// Back-reference to a sale header, or [`UNLINKED_SALE_ID`].
    pub sale_id: i64,

    /// The catalog item this line refers to.
    pub menu_item_id: i64,

    /// Units on this line. Always positive; submitted sales record 1.
    pub quantity: i64,

    /// Price in cents captured at time of sale (never re-derived from the
    /// catalog, so historical reports stay stable).
    pub price_cents: i64,

    /// Free-form payment tag, e.g. "Cash", "Card".
    pub payment_method: String,

    /// Report treatment tag.
    pub category: TransactionCategory,
}

impl TransactionRecord {
    /// Returns the captured unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Line total (price × quantity) as a positive magnitude.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.price_cents * self.quantity)
    }
}

// =============================================================================
// Sale Submission (Recorder Input)
// =============================================================================

/// One priced unit within a submitted sale.
///
/// Each line maps to exactly one [`TransactionRecord`]. The price is trusted
/// verbatim from the client (computed at order time), not re-looked-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLine {
    /// Catalog item being sold.
    pub item_id: i64,

    /// Client-computed price in cents, captured as-is.
    pub price_cents: i64,
}

/// A logical sale as accepted by the Transaction Recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleSubmission {
    /// Customer display name; must be non-empty.
    pub customer_name: String,

    /// Identity of the payer (employee or guest id).
    pub payer_id: i64,

    /// Ordered cart lines; each is exactly one sold unit.
    pub items: Vec<SaleLine>,

    /// Payment tag applied to every line of this sale.
    pub payment_method: String,
}

/// Result of a successful sale submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleReceipt {
    /// Number of transaction records written (equals the line count).
    pub recorded_lines: usize,

    /// Allocator-assigned ids, in input order (strictly increasing).
    pub transaction_ids: Vec<i64>,
}

// =============================================================================
// Inventory
// =============================================================================

/// On-hand record for one catalog item. At most one row per `menu_item_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryRecord {
    pub inventory_id: i64,
    pub menu_item_id: i64,
    /// Cumulative quantity; adjusted additively, never below zero.
    pub quantity: i64,
    /// First-seen timestamp.
    pub timestamp: DateTime<Utc>,
    pub restock_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Inventory row joined with its catalog name, for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct InventoryLine {
    pub inventory_id: i64,
    pub menu_item_id: i64,
    pub item_name: String,
    pub quantity: i64,
    pub timestamp: DateTime<Utc>,
    pub restock_date: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Whether an inventory adjustment created a new row or updated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustOutcome {
    Created,
    Updated,
}

// =============================================================================
// Sale Header (External, Read-Only)
// =============================================================================

/// A sale header row, written outside the engine and read by reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleHeader {
    pub id: i64,
    pub sales_timestamp: DateTime<Utc>,
    pub total_amount_cents: i64,
    pub peak_day_flag: bool,
    /// Cashier who rang the sale; joined for Z-report signatures.
    pub user_id: Option<i64>,
    /// Discount amount; positive values accumulate into the Z-report.
    pub rewards_cents: i64,
}

impl SaleHeader {
    /// Returns the header total as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

// =============================================================================
// Report Parameters
// =============================================================================

/// Which hourly report variant to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportKind {
    /// Mid-shift reading: counts, revenue, gross, adjustments.
    X,
    /// End-of-day closing: X fields plus derived tax, service charge,
    /// discounts, and employee signatures.
    Z,
}

/// Named trend series over the sales/inventory history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendKind {
    /// Per-sale totals, chronological ascending.
    DailySales,
    /// Peak-flagged sales only, **descending by amount** (intentionally
    /// different ordering from the other three).
    PeakDays,
    /// Order counts grouped by day, chronological ascending.
    TotalOrders,
    /// Inventory quantity grouped by restock date, chronological ascending.
    ProductUsage,
}

impl TrendKind {
    /// The wire name used by report requests ("Daily Sales", ...).
    pub const fn as_str(&self) -> &'static str {
        match self {
            TrendKind::DailySales => "Daily Sales",
            TrendKind::PeakDays => "Peak Days",
            TrendKind::TotalOrders => "Total Orders",
            TrendKind::ProductUsage => "Product Usage",
        }
    }
}

/// Optional recency window for trend queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    Last7Days,
    Last30Days,
    AllTime,
}

impl TimeRange {
    /// Number of days to look back, or None for unrestricted.
    pub const fn lookback_days(&self) -> Option<i64> {
        match self {
            TimeRange::Last7Days => Some(7),
            TimeRange::Last30Days => Some(30),
            TimeRange::AllTime => None,
        }
    }
}

/// Date window for the product-usage report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UsageWindow {
    Last7Days,
    Last30Days,
    Custom { start: NaiveDate, end: NaiveDate },
}

impl UsageWindow {
    /// Resolves the window to inclusive `[start, end]` dates.
    ///
    /// The named windows end at `today`; a custom window is used as given.
    pub fn resolve(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match *self {
            UsageWindow::Last7Days => (today - Duration::days(7), today),
            UsageWindow::Last30Days => (today - Duration::days(30), today),
            UsageWindow::Custom { start, end } => (start, end),
        }
    }
}

// =============================================================================
// Report Rows
// =============================================================================

/// One `{label, value}` point in a trend series.
///
/// The unit of `value` depends on the series: cents for `Daily Sales` and
/// `Peak Days`, a count for `Total Orders`, units for `Product Usage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TrendPoint {
    pub label: String,
    pub value: i64,
}

/// One row of the product-usage report, sorted descending by usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductUsageRow {
    pub item_name: String,
    pub total_used: i64,
}

/// One hour-of-day bucket of the X-report.
///
/// Adjustment totals (`returns`, `voids`, `discards`) are positive
/// magnitudes per the [`TransactionCategory`] sign convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyBucket {
    /// Hour of day, 0-23.
    pub hour: u8,

    /// Count of distinct transaction records joined to this hour.
    pub transactions: i64,

    /// Revenue summed from the joined sale-header rows.
    pub sales_revenue_cents: i64,

    /// Gross sales: Σ(price × quantity) over all joined line items.
    pub gross_sales_cents: i64,

    /// Σ(price × quantity) of Return-category lines (positive magnitude).
    pub returns_cents: i64,

    /// Units of Drink-type items sold this hour.
    pub drink_units: i64,

    /// Σ(price × quantity) of Void-category lines (positive magnitude).
    pub voids_cents: i64,

    /// Σ(price × quantity) of Discard-category lines (positive magnitude).
    pub discards_cents: i64,

    /// Distinct payment methods used this hour, joined with ", ".
    pub payment_methods: String,
}

impl HourlyBucket {
    /// Gross sales as Money.
    #[inline]
    pub fn gross_sales(&self) -> Money {
        Money::from_cents(self.gross_sales_cents)
    }
}

/// One hour-of-day row of the Z-report.
///
/// `tax` and `service_charge` are derived at report time from the flat
/// rates in [`crate::report`]; they are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZReportRow {
    pub hour: u8,
    pub transactions: i64,
    pub sales_revenue_cents: i64,
    pub gross_sales_cents: i64,
    pub tax_cents: i64,
    pub service_charge_cents: i64,
    pub voids_cents: i64,
    pub discards_cents: i64,
    pub discounts_cents: i64,
    /// Distinct cashier names joined through the sale headers, ", "-joined.
    pub employee_signatures: String,
    pub payment_methods: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_tags() {
        assert_eq!(TransactionCategory::Sale.as_str(), "Sale");
        assert_eq!(TransactionCategory::Return.as_str(), "Return");
        assert_eq!(TransactionCategory::Void.as_str(), "Void");
        assert_eq!(TransactionCategory::Discard.as_str(), "Discard");
    }

    #[test]
    fn test_sign_convention() {
        let amount = Money::from_cents(500);
        assert_eq!(
            TransactionCategory::Sale.signed_magnitude(amount).cents(),
            500
        );
        assert_eq!(
            TransactionCategory::Return.signed_magnitude(amount).cents(),
            -500
        );
        assert_eq!(
            TransactionCategory::Void.signed_magnitude(amount).cents(),
            -500
        );
        assert_eq!(
            TransactionCategory::Discard
                .signed_magnitude(amount)
                .cents(),
            -500
        );
    }

    #[test]
    fn test_line_total() {
        let record = TransactionRecord {
            id: 1,
            sale_id: UNLINKED_SALE_ID,
            menu_item_id: 7,
            quantity: 3,
            price_cents: 575,
            payment_method: "Cash".to_string(),
            category: TransactionCategory::Sale,
        };
        assert_eq!(record.line_total().cents(), 1725);
    }

    #[test]
    fn test_usage_window_resolution() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();

        let (start, end) = UsageWindow::Last7Days.resolve(today);
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 8, 23).unwrap());
        assert_eq!(end, today);

        let (start, end) = UsageWindow::Last30Days.resolve(today);
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 7, 31).unwrap());
        assert_eq!(end, today);

        let custom = UsageWindow::Custom {
            start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        };
        let (start, end) = custom.resolve(today);
        assert_eq!(start, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 31).unwrap());
    }

    #[test]
    fn test_time_range_lookback() {
        assert_eq!(TimeRange::Last7Days.lookback_days(), Some(7));
        assert_eq!(TimeRange::Last30Days.lookback_days(), Some(30));
        assert_eq!(TimeRange::AllTime.lookback_days(), None);
    }
}
