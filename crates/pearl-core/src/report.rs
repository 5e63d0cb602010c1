//! # Report Math & Export
//!
//! Pure reporting logic: the flat derived-charge rates, the Z-row
//! derivation, and CSV export/parse for the Z-report.
//!
//! ## Report-Time Derivation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Z-REPORT DERIVED FIELDS                                                │
//! │                                                                         │
//! │  transaction log ──► hourly gross sales (stored facts)                 │
//! │                            │                                            │
//! │                            ▼                                            │
//! │  tax            = gross × 8%   ← computed HERE, every run              │
//! │  service charge = gross × 5%   ← computed HERE, every run              │
//! │                                                                         │
//! │  KNOWN LIMITATION: the rates are flat constants with no per-period     │
//! │  history. Because the figures are recomputed on every run, editing     │
//! │  TAX_RATE or SERVICE_CHARGE_RATE changes ALL historical Z-reports      │
//! │  retroactively.                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::money::{ChargeRate, Money};
use crate::types::ZReportRow;

// =============================================================================
// Rate Constants
// =============================================================================

/// Flat sales tax applied to gross sales at report time (8%).
pub const TAX_RATE: ChargeRate = ChargeRate::from_bps(800);

/// Flat service charge applied to gross sales at report time (5%).
pub const SERVICE_CHARGE_RATE: ChargeRate = ChargeRate::from_bps(500);

/// Computes the Z-report's derived charges for one bucket's gross sales.
///
/// Returns `(tax, service_charge)`. Both are fresh derivations; nothing
/// here is read back from storage.
pub fn derived_charges(gross_sales: Money) -> (Money, Money) {
    (
        gross_sales.apply_rate(TAX_RATE),
        gross_sales.apply_rate(SERVICE_CHARGE_RATE),
    )
}

// =============================================================================
// CSV Export
// =============================================================================

/// The fixed 11-column Z-report header, in export order.
pub const Z_REPORT_COLUMNS: [&str; 11] = [
    "Hour",
    "Transactions",
    "Sales Revenue",
    "Total Sales",
    "Total Tax",
    "Service Charges",
    "Voids",
    "Discards",
    "Discounts",
    "Employee Signatures",
    "Payment Methods",
];

/// Errors from Z-report CSV export or parse.
#[derive(Debug, Error)]
pub enum ReportCsvError {
    /// The csv layer failed (malformed quoting, wrong field count, I/O).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A numeric field did not parse.
    #[error("invalid {column} value '{value}' in row {row}")]
    BadField {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// The header row is missing or doesn't match [`Z_REPORT_COLUMNS`].
    #[error("unexpected csv header")]
    BadHeader,
}

/// Serializes Z-report rows as CSV with the fixed 11-column header.
///
/// Money renders with two decimals; the csv layer quotes text fields that
/// contain commas (the signature and payment-method lists routinely do).
pub fn z_report_to_csv(rows: &[ZReportRow]) -> Result<String, ReportCsvError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(Z_REPORT_COLUMNS)?;

    for row in rows {
        writer.write_record([
            row.hour.to_string(),
            row.transactions.to_string(),
            Money::from_cents(row.sales_revenue_cents).to_decimal_string(),
            Money::from_cents(row.gross_sales_cents).to_decimal_string(),
            Money::from_cents(row.tax_cents).to_decimal_string(),
            Money::from_cents(row.service_charge_cents).to_decimal_string(),
            Money::from_cents(row.voids_cents).to_decimal_string(),
            Money::from_cents(row.discards_cents).to_decimal_string(),
            Money::from_cents(row.discounts_cents).to_decimal_string(),
            row.employee_signatures.clone(),
            row.payment_methods.clone(),
        ])?;
    }

    writer.flush().map_err(csv::Error::from)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ReportCsvError::Csv(csv::Error::from(e.into_error())))?;

    // The writer only ever receives UTF-8 strings.
    Ok(String::from_utf8(bytes).expect("csv output is utf-8"))
}

/// Parses a Z-report CSV produced by [`z_report_to_csv`] back into rows.
///
/// Exists for the export round-trip guarantee: numeric fields reproduce
/// exactly (money to two decimal places).
pub fn parse_z_report_csv(input: &str) -> Result<Vec<ZReportRow>, ReportCsvError> {
    let mut reader = csv::Reader::from_reader(input.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.len() != Z_REPORT_COLUMNS.len()
        || headers.iter().zip(Z_REPORT_COLUMNS).any(|(h, c)| h != c)
    {
        return Err(ReportCsvError::BadHeader);
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or_default();

        rows.push(ZReportRow {
            hour: parse_hour(index, field(0))?,
            transactions: parse_int(index, "Transactions", field(1))?,
            sales_revenue_cents: parse_money(index, "Sales Revenue", field(2))?,
            gross_sales_cents: parse_money(index, "Total Sales", field(3))?,
            tax_cents: parse_money(index, "Total Tax", field(4))?,
            service_charge_cents: parse_money(index, "Service Charges", field(5))?,
            voids_cents: parse_money(index, "Voids", field(6))?,
            discards_cents: parse_money(index, "Discards", field(7))?,
            discounts_cents: parse_money(index, "Discounts", field(8))?,
            employee_signatures: field(9).to_string(),
            payment_methods: field(10).to_string(),
        });
    }

    Ok(rows)
}

/// An hour outside 0-23 is a bad field, not a truncated one.
fn parse_hour(row: usize, value: &str) -> Result<u8, ReportCsvError> {
    u8::try_from(parse_int(row, "Hour", value)?)
        .ok()
        .filter(|hour| *hour <= 23)
        .ok_or_else(|| ReportCsvError::BadField {
            row,
            column: "Hour",
            value: value.to_string(),
        })
}

fn parse_int(row: usize, column: &'static str, value: &str) -> Result<i64, ReportCsvError> {
    value.trim().parse().map_err(|_| ReportCsvError::BadField {
        row,
        column,
        value: value.to_string(),
    })
}

fn parse_money(row: usize, column: &'static str, value: &str) -> Result<i64, ReportCsvError> {
    value
        .parse::<Money>()
        .map(|m| m.cents())
        .map_err(|_| ReportCsvError::BadField {
            row,
            column,
            value: value.to_string(),
        })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> ZReportRow {
        ZReportRow {
            hour: 10,
            transactions: 4,
            sales_revenue_cents: 2300,
            gross_sales_cents: 10_000,
            tax_cents: 800,
            service_charge_cents: 500,
            voids_cents: 575,
            discards_cents: 0,
            discounts_cents: 150,
            employee_signatures: "Mei Lin, Jordan".to_string(),
            payment_methods: "Cash, Card".to_string(),
        }
    }

    #[test]
    fn test_derived_charges_fixture() {
        // Gross sales $100.00 → tax $8.00, service $5.00
        let (tax, service) = derived_charges(Money::from_cents(10_000));
        assert_eq!(tax.cents(), 800);
        assert_eq!(service.cents(), 500);
    }

    #[test]
    fn test_derived_charges_consistency() {
        // Same gross always derives the same charges (pure recomputation)
        for cents in [0, 1, 99, 575, 12_345, 1_000_000] {
            let gross = Money::from_cents(cents);
            assert_eq!(derived_charges(gross), derived_charges(gross));
            assert_eq!(derived_charges(gross).0, gross.apply_rate(TAX_RATE));
        }
    }

    #[test]
    fn test_csv_header() {
        let csv = z_report_to_csv(&[]).unwrap();
        assert_eq!(csv.lines().next().unwrap(), Z_REPORT_COLUMNS.join(","));
    }

    #[test]
    fn test_csv_quotes_comma_fields() {
        let csv = z_report_to_csv(&[sample_row()]).unwrap();
        // Comma-bearing text fields must be quoted
        assert!(csv.contains("\"Mei Lin, Jordan\""));
        assert!(csv.contains("\"Cash, Card\""));
        // Money fields render with two decimals
        assert!(csv.contains("100.00"));
        assert!(csv.contains("8.00"));
        assert!(csv.contains("5.00"));
    }

    #[test]
    fn test_csv_round_trip() {
        let rows = vec![
            sample_row(),
            ZReportRow {
                hour: 11,
                transactions: 0,
                sales_revenue_cents: 0,
                gross_sales_cents: 0,
                tax_cents: 0,
                service_charge_cents: 0,
                voids_cents: 0,
                discards_cents: 0,
                discounts_cents: 0,
                employee_signatures: String::new(),
                payment_methods: String::new(),
            },
        ];

        let exported = z_report_to_csv(&rows).unwrap();
        let parsed = parse_z_report_csv(&exported).unwrap();
        assert_eq!(parsed, rows);
    }

    #[test]
    fn test_csv_bad_header_rejected() {
        let err = parse_z_report_csv("Hour,Bogus\n1,2\n").unwrap_err();
        assert!(matches!(err, ReportCsvError::BadHeader));
    }

    #[test]
    fn test_csv_bad_field_rejected() {
        let mut exported = z_report_to_csv(&[sample_row()]).unwrap();
        exported = exported.replace("100.00", "not-money");
        assert!(parse_z_report_csv(&exported).is_err());
    }

    #[test]
    fn test_csv_out_of_range_hour_rejected() {
        // 300 must not wrap into a valid hour (300 as u8 would be 44)
        let exported = z_report_to_csv(&[sample_row()]).unwrap();
        let bent = exported.replace("\n10,", "\n300,");
        let err = parse_z_report_csv(&bent).unwrap_err();
        assert!(matches!(
            err,
            ReportCsvError::BadField { column: "Hour", .. }
        ));

        let bent = exported.replace("\n10,", "\n24,");
        assert!(parse_z_report_csv(&bent).is_err());
    }
}
