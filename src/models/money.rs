//! Money type for representing currency amounts
//!
//! Amounts are whole currency units stored as i64. Ledger arithmetic goes
//! through the checked helpers so an overflow surfaces as an error instead of
//! wrapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A monetary amount in whole currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from whole units
    ///
    /// # Examples
    /// ```
    /// use purse::models::Money;
    /// let amount = Money::from_units(1500);
    /// assert_eq!(amount.units(), 1500);
    /// ```
    pub const fn from_units(units: i64) -> Self {
        Self(units)
    }

    /// Create a zero Money amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in whole units
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is positive
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is negative
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Multiply by a quantity, returning None on overflow
    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "1500", "-20", "₹1500", "$1,500", "₹-500", "1,00,000"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        Self::parse_with_symbol(s, "")
    }

    /// Parse like [`Money::parse`], also accepting `symbol` as the currency
    pub fn parse_with_symbol(s: &str, symbol: &str) -> Result<Self, MoneyParseError> {
        let parts = split_amount(s, symbol)?;
        if parts.fraction.is_some() {
            return Err(MoneyParseError::Fractional(s.trim().to_string()));
        }

        let units: i64 = parts
            .whole
            .parse()
            .map_err(|_| MoneyParseError::OutOfRange(s.trim().to_string()))?;

        Ok(Self(if parts.negative { -units } else { units }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}", symbol, self.0.unsigned_abs())
        } else {
            format!("{}{}", symbol, self.0)
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Money {
    fn from(units: i64) -> Self {
        Self(units)
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Currency symbols recognised without configuration
pub const KNOWN_SYMBOLS: &[&str] = &["₹", "$"];

/// A typed amount split into sign, whole digits and fraction digits
pub(crate) struct AmountParts<'a> {
    pub negative: bool,
    pub whole: String,
    pub fraction: Option<&'a str>,
}

/// Split `input` as `[sign][symbol][sign]digits[,ddd...][.digits]`
///
/// At most one sign and one currency symbol are allowed. Commas must group
/// digits in threes (`1,500,000`) or in the lakh style (`15,00,000`).
pub(crate) fn split_amount<'a>(
    input: &'a str,
    symbol: &str,
) -> Result<AmountParts<'a>, MoneyParseError> {
    let invalid = || MoneyParseError::InvalidFormat(input.trim().to_string());

    let s = input.trim();
    if s.is_empty() {
        return Err(MoneyParseError::Empty);
    }

    let (lead_sign, s) = strip_sign(s);
    let s = strip_symbol(s, symbol);
    let (inner_sign, s) = strip_sign(s);
    let negative = match (lead_sign, inner_sign) {
        (Some(_), Some(_)) => return Err(invalid()),
        (Some(neg), None) | (None, Some(neg)) => neg,
        (None, None) => false,
    };

    let (whole, fraction) = match s.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (s, None),
    };

    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
    }

    let whole = ungroup(whole).ok_or_else(invalid)?;
    Ok(AmountParts {
        negative,
        whole,
        fraction,
    })
}

fn strip_sign(s: &str) -> (Option<bool>, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (Some(true), rest)
    } else if let Some(rest) = s.strip_prefix('+') {
        (Some(false), rest)
    } else {
        (None, s)
    }
}

fn strip_symbol<'a>(s: &'a str, symbol: &str) -> &'a str {
    if !symbol.is_empty() {
        if let Some(rest) = s.strip_prefix(symbol) {
            return rest;
        }
    }
    for known in KNOWN_SYMBOLS {
        if let Some(rest) = s.strip_prefix(*known) {
            return rest;
        }
    }
    s
}

/// Digits with separators removed, or None if the grouping is malformed
fn ungroup(whole: &str) -> Option<String> {
    let groups: Vec<&str> = whole.split(',').collect();
    if groups
        .iter()
        .any(|g| g.is_empty() || !g.bytes().all(|b| b.is_ascii_digit()))
    {
        return None;
    }

    if let Some((first, rest)) = groups.split_first() {
        if let Some((last, middle)) = rest.split_last() {
            if last.len() != 3 || first.len() > 3 {
                return None;
            }
            let thousands = middle.iter().all(|g| g.len() == 3);
            let lakhs = first.len() <= 2 && middle.iter().all(|g| g.len() == 2);
            if !thousands && !lakhs {
                return None;
            }
        }
    }

    Some(groups.concat())
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    Empty,
    InvalidFormat(String),
    Fractional(String),
    TooPrecise(String),
    OutOfRange(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "No amount given"),
            Self::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
            Self::Fractional(s) => write!(f, "Amount must be whole units: {}", s),
            Self::TooPrecise(s) => write!(f, "At most two decimal places allowed: {}", s),
            Self::OutOfRange(s) => write!(f, "Amount out of range: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}
