//! Share prices in minor currency units
//!
//! Budgets work in whole units, but share prices carry paise/cents. A
//! `SharePrice` stores hundredths as i64 so price times quantity stays exact.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::{split_amount, MoneyParseError};

/// Minor units per whole currency unit
pub const MINOR_PER_UNIT: i64 = 100;

/// A price or cost in hundredths of a currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharePrice(i64);

impl SharePrice {
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// A price of whole units, or None on overflow
    pub fn from_units(units: i64) -> Option<Self> {
        units.checked_mul(MINOR_PER_UNIT).map(Self)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn minor(&self) -> i64 {
        self.0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiply by a share count, returning None on overflow
    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Parse a price such as "123.45", "₹99.5" or "1,250"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        Self::parse_with_symbol(s, "")
    }

    /// Parse like [`SharePrice::parse`], also accepting `symbol`
    pub fn parse_with_symbol(s: &str, symbol: &str) -> Result<Self, MoneyParseError> {
        let parts = split_amount(s, symbol)?;
        let out_of_range = || MoneyParseError::OutOfRange(s.trim().to_string());

        // Fraction digits are validated as ASCII digits; pad "5" to "50"
        let fraction = match parts.fraction {
            None => 0,
            Some(digits) if digits.len() <= 2 => {
                let padded = format!("{:0<2}", digits);
                padded.parse::<i64>().map_err(|_| out_of_range())?
            }
            Some(_) => return Err(MoneyParseError::TooPrecise(s.trim().to_string())),
        };

        let minor = parts
            .whole
            .parse::<i64>()
            .ok()
            .and_then(|units| units.checked_mul(MINOR_PER_UNIT))
            .and_then(|minor| minor.checked_add(fraction))
            .ok_or_else(out_of_range)?;

        Ok(Self(if parts.negative { -minor } else { minor }))
    }

    /// Format with a currency symbol, always with two decimals
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}{}", sign, symbol, Decimal(self.0.unsigned_abs()))
    }
}

/// Unsigned minor units printed as `units.cc`
struct Decimal(u64);

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let per_unit = MINOR_PER_UNIT.unsigned_abs();
        write!(f, "{}.{:02}", self.0 / per_unit, self.0 % per_unit)
    }
}

impl fmt::Display for SharePrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with_symbol(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fractional_prices() {
        assert_eq!(SharePrice::parse("123.45").unwrap().minor(), 12345);
        assert_eq!(SharePrice::parse("₹99.5").unwrap().minor(), 9950);
        assert_eq!(SharePrice::parse("$1,250").unwrap().minor(), 125000);
        assert_eq!(SharePrice::parse("0.01").unwrap().minor(), 1);
        assert_eq!(SharePrice::parse("-2.50").unwrap().minor(), -250);
    }

    #[test]
    fn test_parse_rejects_bad_prices() {
        assert!(matches!(
            SharePrice::parse("1.234"),
            Err(MoneyParseError::TooPrecise(_))
        ));
        assert!(SharePrice::parse("1.").is_err());
        assert!(SharePrice::parse("1.2.3").is_err());
        assert!(SharePrice::parse("ACME12").is_err());
        assert!(matches!(
            SharePrice::parse("92233720368547759"),
            Err(MoneyParseError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_exact_multiplication() {
        let price = SharePrice::parse("123.45").unwrap();
        assert_eq!(price.checked_mul(2), Some(SharePrice::from_minor(24690)));
        assert!(SharePrice::from_minor(i64::MAX).checked_mul(2).is_none());
    }

    #[test]
    fn test_format() {
        assert_eq!(SharePrice::from_minor(24690).format_with_symbol("₹"), "₹246.90");
        assert_eq!(SharePrice::from_minor(5).to_string(), "0.05");
        assert_eq!(SharePrice::from_minor(-250).format_with_symbol("$"), "-$2.50");
        assert_eq!(SharePrice::from_units(7), Some(SharePrice::from_minor(700)));
    }
}
