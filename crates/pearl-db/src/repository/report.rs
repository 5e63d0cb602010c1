//! # Report Repository
//!
//! The Report Aggregator: read-only queries over the transaction log,
//! sale headers, and inventory. Nothing in this module writes.
//!
//! ## Report Surface
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Report Aggregator                                 │
//! │                                                                         │
//! │  hourly_x(start, end)  ──► today's activity bucketed by hour-of-day    │
//! │  hourly_z(start, end)  ──► X fields + derived tax / service charge /   │
//! │                            discounts / employee signatures             │
//! │  trend(kind, range)    ──► {label, value} series over history          │
//! │  product_usage(window) ──► per-item usage totals, descending           │
//! │                                                                         │
//! │  JOIN SHAPE (hourly reports):                                          │
//! │    sales ──LEFT JOIN── transactions ──LEFT JOIN── menuitem (X)         │
//! │    payment/signature lists: separate per-hour distinct queries         │
//! │    (signatures via employee, joined on sales.user_id)                  │
//! │                                                                         │
//! │  Starting FROM sales means an hour with a header but no line items     │
//! │  still yields a (zero-count) bucket, and header totals repeat per      │
//! │  joined line: sales_revenue over-counts multi-line sales. That is the  │
//! │  published figure, pinned by tests; see DESIGN notes before "fixing".  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Hour-range validation happens in `pearl-core` before any query runs;
//! read failures surface as `EngineError::Report` and are always safe to
//! retry.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use pearl_core::report::derived_charges;
use pearl_core::validation::validate_hour_range;
use pearl_core::{
    HourlyBucket, Money, ProductUsageRow, TimeRange, TrendKind, TrendPoint, UsageWindow,
    ZReportRow,
};

/// Shared SELECT list for the X-report query.
const HOURLY_X_SQL: &str = "\
    SELECT \
        CAST(strftime('%H', s.sales_timestamp) AS INTEGER) AS hour, \
        COUNT(DISTINCT t.id) AS transactions, \
        COALESCE(SUM(s.total_amount_cents), 0) AS sales_revenue_cents, \
        COALESCE(SUM(t.price_cents * t.quantity), 0) AS gross_sales_cents, \
        COALESCE(SUM(CASE WHEN t.category = 'Return' THEN t.price_cents * t.quantity ELSE 0 END), 0) AS returns_cents, \
        COALESCE(SUM(CASE WHEN m.itemtype = 'Drink' THEN t.quantity ELSE 0 END), 0) AS drink_units, \
        COALESCE(SUM(CASE WHEN t.category = 'Void' THEN t.price_cents * t.quantity ELSE 0 END), 0) AS voids_cents, \
        COALESCE(SUM(CASE WHEN t.category = 'Discard' THEN t.price_cents * t.quantity ELSE 0 END), 0) AS discards_cents \
    FROM sales s \
    LEFT JOIN transactions t ON t.sale_id = s.id \
    LEFT JOIN menuitem m ON m.itemid = t.menu_item_id \
    WHERE date(s.sales_timestamp) = date('now') \
      AND CAST(strftime('%H', s.sales_timestamp) AS INTEGER) BETWEEN ?1 AND ?2 \
    GROUP BY hour \
    ORDER BY hour";

const HOURLY_Z_SQL: &str = "\
    SELECT \
        CAST(strftime('%H', s.sales_timestamp) AS INTEGER) AS hour, \
        COUNT(DISTINCT t.id) AS transactions, \
        COALESCE(SUM(s.total_amount_cents), 0) AS sales_revenue_cents, \
        COALESCE(SUM(t.price_cents * t.quantity), 0) AS gross_sales_cents, \
        COALESCE(SUM(CASE WHEN t.category = 'Void' THEN ABS(t.price_cents * t.quantity) ELSE 0 END), 0) AS voids_cents, \
        COALESCE(SUM(CASE WHEN t.category = 'Discard' THEN ABS(t.price_cents * t.quantity) ELSE 0 END), 0) AS discards_cents, \
        COALESCE(SUM(CASE WHEN s.rewards_cents > 0 THEN s.rewards_cents ELSE 0 END), 0) AS discounts_cents \
    FROM sales s \
    LEFT JOIN transactions t ON t.sale_id = s.id \
    WHERE date(s.sales_timestamp) = date('now') \
      AND CAST(strftime('%H', s.sales_timestamp) AS INTEGER) BETWEEN ?1 AND ?2 \
    GROUP BY hour \
    ORDER BY hour";

// The deduplicated text lists (payment methods, signatures) are collected
// as one row per distinct value and joined in Rust. SQLite's
// GROUP_CONCAT(DISTINCT ..) forces the bare-comma separator, which would
// make a value containing a comma indistinguishable from two values.

const HOURLY_PAYMENTS_SQL: &str = "\
    SELECT \
        CAST(strftime('%H', s.sales_timestamp) AS INTEGER) AS hour, \
        t.payment_method AS value \
    FROM sales s \
    JOIN transactions t ON t.sale_id = s.id \
    WHERE date(s.sales_timestamp) = date('now') \
      AND CAST(strftime('%H', s.sales_timestamp) AS INTEGER) BETWEEN ?1 AND ?2 \
    GROUP BY hour, t.payment_method \
    ORDER BY hour, value";

const HOURLY_SIGNATURES_SQL: &str = "\
    SELECT \
        CAST(strftime('%H', s.sales_timestamp) AS INTEGER) AS hour, \
        e.employeename AS value \
    FROM sales s \
    JOIN employee e ON e.employeeid = s.user_id \
    WHERE date(s.sales_timestamp) = date('now') \
      AND CAST(strftime('%H', s.sales_timestamp) AS INTEGER) BETWEEN ?1 AND ?2 \
    GROUP BY hour, e.employeename \
    ORDER BY hour, value";

fn joined(lists: &BTreeMap<u8, Vec<String>>, hour: u8) -> String {
    lists.get(&hour).map(|v| v.join(", ")).unwrap_or_default()
}

/// Read-only repository over the reporting surface.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Collects one of the per-hour distinct-value lists as `hour -> values`.
    ///
    /// Values arrive pre-deduplicated and sorted; callers join them with
    /// ", " so a comma inside a single value survives intact.
    async fn distinct_by_hour(
        &self,
        sql: &str,
        start_hour: u8,
        end_hour: u8,
    ) -> EngineResult<BTreeMap<u8, Vec<String>>> {
        let rows = sqlx::query(sql)
            .bind(start_hour as i64)
            .bind(end_hour as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(EngineError::report)?;

        let mut by_hour: BTreeMap<u8, Vec<String>> = BTreeMap::new();
        for row in rows {
            by_hour
                .entry(row.get::<i64, _>("hour") as u8)
                .or_default()
                .push(row.get("value"));
        }

        Ok(by_hour)
    }

    /// X-report: today's activity bucketed by hour of day.
    ///
    /// Hours with a sale header but no line items appear as zero-count
    /// buckets; hours with no sale headers at all are absent.
    pub async fn hourly_x(&self, start_hour: u8, end_hour: u8) -> EngineResult<Vec<HourlyBucket>> {
        validate_hour_range(start_hour, end_hour)?;

        debug!(start_hour, end_hour, "Running X-report");

        let rows = sqlx::query(HOURLY_X_SQL)
            .bind(start_hour as i64)
            .bind(end_hour as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(EngineError::report)?;

        let payments = self
            .distinct_by_hour(HOURLY_PAYMENTS_SQL, start_hour, end_hour)
            .await?;

        let mut buckets = Vec::with_capacity(rows.len());
        for row in rows {
            let hour = row.get::<i64, _>("hour") as u8;
            buckets.push(HourlyBucket {
                hour,
                transactions: row.get("transactions"),
                sales_revenue_cents: row.get("sales_revenue_cents"),
                gross_sales_cents: row.get("gross_sales_cents"),
                returns_cents: row.get("returns_cents"),
                drink_units: row.get("drink_units"),
                voids_cents: row.get("voids_cents"),
                discards_cents: row.get("discards_cents"),
                payment_methods: joined(&payments, hour),
            });
        }

        Ok(buckets)
    }

    /// Z-report: the end-of-day closing view.
    ///
    /// Tax and service charge are derived from gross sales at report time
    /// using the flat rates in `pearl_core::report`; they are never stored.
    pub async fn hourly_z(&self, start_hour: u8, end_hour: u8) -> EngineResult<Vec<ZReportRow>> {
        validate_hour_range(start_hour, end_hour)?;

        debug!(start_hour, end_hour, "Running Z-report");

        let rows = sqlx::query(HOURLY_Z_SQL)
            .bind(start_hour as i64)
            .bind(end_hour as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(EngineError::report)?;

        let payments = self
            .distinct_by_hour(HOURLY_PAYMENTS_SQL, start_hour, end_hour)
            .await?;
        let signatures = self
            .distinct_by_hour(HOURLY_SIGNATURES_SQL, start_hour, end_hour)
            .await?;

        let mut report = Vec::with_capacity(rows.len());
        for row in rows {
            let hour = row.get::<i64, _>("hour") as u8;
            let gross_sales_cents: i64 = row.get("gross_sales_cents");
            let (tax, service_charge) = derived_charges(Money::from_cents(gross_sales_cents));

            report.push(ZReportRow {
                hour,
                transactions: row.get("transactions"),
                sales_revenue_cents: row.get("sales_revenue_cents"),
                gross_sales_cents,
                tax_cents: tax.cents(),
                service_charge_cents: service_charge.cents(),
                voids_cents: row.get("voids_cents"),
                discards_cents: row.get("discards_cents"),
                discounts_cents: row.get("discounts_cents"),
                employee_signatures: joined(&signatures, hour),
                payment_methods: joined(&payments, hour),
            });
        }

        Ok(report)
    }

    /// One of the four named trend series, optionally recency-filtered.
    ///
    /// `PeakDays` sorts descending by amount; the other three are
    /// chronological ascending.
    pub async fn trend(&self, kind: TrendKind, range: TimeRange) -> EngineResult<Vec<TrendPoint>> {
        debug!(kind = kind.as_str(), "Running trend query");

        let cutoff = range
            .lookback_days()
            .map(|days| (Utc::now().date_naive() - Duration::days(days)).to_string());

        let sql = match (kind, cutoff.is_some()) {
            (TrendKind::DailySales, with_cutoff) => format!(
                "SELECT sales_timestamp AS label, total_amount_cents AS value \
                 FROM sales {} ORDER BY sales_timestamp ASC",
                if with_cutoff { "WHERE date(sales_timestamp) >= ?1" } else { "" }
            ),
            (TrendKind::PeakDays, with_cutoff) => format!(
                "SELECT sales_timestamp AS label, total_amount_cents AS value \
                 FROM sales WHERE peak_day_flag = 1 {} \
                 ORDER BY total_amount_cents DESC",
                if with_cutoff { "AND date(sales_timestamp) >= ?1" } else { "" }
            ),
            (TrendKind::TotalOrders, with_cutoff) => format!(
                "SELECT date(sales_timestamp) AS label, COUNT(*) AS value \
                 FROM sales {} GROUP BY date(sales_timestamp) ORDER BY label ASC",
                if with_cutoff { "WHERE date(sales_timestamp) >= ?1" } else { "" }
            ),
            (TrendKind::ProductUsage, with_cutoff) => format!(
                "SELECT date(restockdate) AS label, COALESCE(SUM(quantity), 0) AS value \
                 FROM inventory {} GROUP BY date(restockdate) ORDER BY label ASC",
                if with_cutoff { "WHERE date(restockdate) >= ?1" } else { "" }
            ),
        };

        let mut query = sqlx::query_as::<_, TrendPoint>(&sql);
        if let Some(cutoff) = &cutoff {
            query = query.bind(cutoff.clone());
        }

        query
            .fetch_all(&self.pool)
            .await
            .map_err(EngineError::report)
    }

    /// Per-item usage totals over a date window, heaviest first.
    ///
    /// The window filters on the inventory row's first-seen `timestamp`
    /// date, inclusive on both ends.
    pub async fn product_usage(&self, window: UsageWindow) -> EngineResult<Vec<ProductUsageRow>> {
        let (start, end) = window.resolve(Utc::now().date_naive());

        debug!(%start, %end, "Running product-usage report");

        sqlx::query_as::<_, ProductUsageRow>(
            "SELECT m.itemname AS item_name, COALESCE(SUM(i.quantity), 0) AS total_used \
             FROM inventory i \
             JOIN menuitem m ON m.itemid = i.menuitemid \
             WHERE date(i.timestamp) BETWEEN ?1 AND ?2 \
             GROUP BY m.itemname \
             ORDER BY total_used DESC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(EngineError::report)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
