//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Aggregate a day of line items that way and the Z-report drifts by     │
//! │  whole cents. Reports are recomputed from the transaction log every    │
//! │  time, so any drift would be visible and non-deterministic.            │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every price, revenue figure, and derived charge is an i64 count     │
//! │    of cents. Division loss is explicit, never silent.                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pearl_core::money::Money;
//!
//! let price = Money::from_cents(575); // $5.75 bubble tea
//! let line = price * 2;               // $11.50
//! assert_eq!(line.cents(), 1150);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

// =============================================================================
// Charge Rate
// =============================================================================

/// A flat percentage rate in basis points (1 bps = 0.01%).
///
/// Used for the report-time derived charges: 800 bps = the 8% tax line,
/// 500 bps = the 5% service charge line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeRate(u32);

impl ChargeRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        ChargeRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: aggregates can legitimately go negative once returns
///   are subtracted by a caller applying the sign convention
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use pearl_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Applies a flat percentage rate, rounding half away from zero.
    ///
    /// This is how the Z-report derives its tax and service-charge lines
    /// from gross sales at report time. The figures are never stored, so a
    /// rate change rewrites history; see [`crate::report`] for the caveat.
    ///
    /// ## Example
    /// ```rust
    /// use pearl_core::money::{ChargeRate, Money};
    ///
    /// let gross = Money::from_cents(10_000); // $100.00
    /// let tax = gross.apply_rate(ChargeRate::from_bps(800)); // 8%
    /// assert_eq!(tax.cents(), 800); // $8.00
    /// ```
    pub fn apply_rate(&self, rate: ChargeRate) -> Money {
        // i128 to keep large daily aggregates from overflowing mid-multiply
        let charged = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(charged as i64)
    }

    /// Renders the value as a plain decimal string with two fraction digits.
    ///
    /// This is the CSV wire format: `"8.00"`, `"-5.50"`. `Display` adds the
    /// currency symbol and is for logs, not export.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

/// Parses the two-decimal wire format back into cents.
///
/// Accepts an optional leading minus, an integer part, and at most two
/// fraction digits (`"8"`, `"8.0"`, `"8.00"` all parse to 800 cents).
/// Floats are never involved.
impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let (whole, frac) = match rest.split_once('.') {
            Some((w, f)) => (w, f),
            None => (rest, ""),
        };

        if whole.is_empty() || frac.len() > 2 {
            return Err(MoneyParseError(s.to_string()));
        }

        let dollars: i64 = whole.parse().map_err(|_| MoneyParseError(s.to_string()))?;
        let cents: i64 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{:0<2}", frac);
            padded.parse().map_err(|_| MoneyParseError(s.to_string()))?
        };

        let total = dollars * 100 + cents;
        Ok(Money(if negative { -total } else { total }))
    }
}

/// Error returned when a decimal money string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid money value: '{0}'")]
pub struct MoneyParseError(pub String);

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
    }

    #[test]
    fn test_apply_rate_exact() {
        // $100.00 at 8% = $8.00, at 5% = $5.00
        let gross = Money::from_cents(10_000);
        assert_eq!(gross.apply_rate(ChargeRate::from_bps(800)).cents(), 800);
        assert_eq!(gross.apply_rate(ChargeRate::from_bps(500)).cents(), 500);
    }

    #[test]
    fn test_apply_rate_rounds() {
        // $1.99 at 8% = 15.92 cents → 16 cents
        let gross = Money::from_cents(199);
        assert_eq!(gross.apply_rate(ChargeRate::from_bps(800)).cents(), 16);
        // $0.06 at 5% = 0.3 cents → 0 cents
        let tiny = Money::from_cents(6);
        assert_eq!(tiny.apply_rate(ChargeRate::from_bps(500)).cents(), 0);
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(800).to_decimal_string(), "8.00");
        assert_eq!(Money::from_cents(1099).to_decimal_string(), "10.99");
        assert_eq!(Money::from_cents(-550).to_decimal_string(), "-5.50");
        assert_eq!(Money::from_cents(0).to_decimal_string(), "0.00");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!("8.00".parse::<Money>().unwrap(), Money::from_cents(800));
        assert_eq!("8".parse::<Money>().unwrap(), Money::from_cents(800));
        assert_eq!("8.5".parse::<Money>().unwrap(), Money::from_cents(850));
        assert_eq!("-5.50".parse::<Money>().unwrap(), Money::from_cents(-550));
        assert!("".parse::<Money>().is_err());
        assert!("8.005".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
    }

    #[test]
    fn test_parse_roundtrip() {
        for cents in [0, 1, 99, 100, 1099, -1, -550, 123_456_789] {
            let m = Money::from_cents(cents);
            let parsed: Money = m.to_decimal_string().parse().unwrap();
            assert_eq!(parsed, m);
        }
    }
}
