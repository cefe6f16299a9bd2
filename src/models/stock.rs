//! Stock purchase records
//!
//! Holdings form a second append-only ledger. They are not tied to category
//! balances; the only invariant is that the recorded total cost is exactly
//! unit price times quantity. Prices are kept in minor units, so
//! fractional share prices multiply exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::price::SharePrice;

/// One row of the `stocks` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockHolding {
    name: String,
    #[serde(rename = "unit_price_minor")]
    unit_price: SharePrice,
    quantity: u32,
    #[serde(rename = "total_cost_minor")]
    total_cost: SharePrice,
    timestamp: DateTime<Utc>,
}

impl StockHolding {
    /// Record a purchase, computing its total cost
    pub fn new(
        name: impl Into<String>,
        unit_price: SharePrice,
        quantity: u32,
    ) -> Result<Self, StockValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(StockValidationError::EmptyName);
        }
        if !unit_price.is_positive() {
            return Err(StockValidationError::NonPositivePrice(unit_price.minor()));
        }
        if quantity == 0 {
            return Err(StockValidationError::ZeroQuantity);
        }
        let total_cost = unit_price
            .checked_mul(quantity)
            .ok_or(StockValidationError::CostOverflow)?;

        Ok(Self {
            name,
            unit_price,
            quantity,
            total_cost,
            timestamp: Utc::now(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> SharePrice {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn total_cost(&self) -> SharePrice {
        self.total_cost
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Check a row read back from storage
    pub fn validate(&self) -> Result<(), StockValidationError> {
        if self.unit_price.checked_mul(self.quantity) != Some(self.total_cost) {
            return Err(StockValidationError::CostMismatch);
        }
        Ok(())
    }
}

impl fmt::Display for StockHolding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x {} @ {} = {}",
            self.quantity, self.name, self.unit_price, self.total_cost
        )
    }
}

/// Validation errors for stock purchases
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockValidationError {
    EmptyName,
    NonPositivePrice(i64),
    ZeroQuantity,
    CostOverflow,
    CostMismatch,
}

impl fmt::Display for StockValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Stock name cannot be empty"),
            Self::NonPositivePrice(p) => write!(
                f,
                "Stock price must be positive, got {}",
                SharePrice::from_minor(*p)
            ),
            Self::ZeroQuantity => write!(f, "Quantity must be at least 1"),
            Self::CostOverflow => write!(f, "Total cost is too large"),
            Self::CostMismatch => write!(f, "Total cost does not equal price times quantity"),
        }
    }
}

impl std::error::Error for StockValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(s: &str) -> SharePrice {
        SharePrice::parse(s).unwrap()
    }

    #[test]
    fn test_total_cost() {
        let holding = StockHolding::new("ACME", price("250"), 4).unwrap();
        assert_eq!(holding.total_cost(), price("1000"));
        assert_eq!(holding.name(), "ACME");
        assert!(holding.validate().is_ok());
    }

    #[test]
    fn test_fractional_price_is_exact() {
        let holding = StockHolding::new("ACME", price("123.45"), 3).unwrap();
        assert_eq!(holding.total_cost().minor(), 37035);
        assert_eq!(holding.to_string(), "3 x ACME @ 123.45 = 370.35");
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            StockHolding::new(" ", price("1"), 1),
            Err(StockValidationError::EmptyName)
        );
        assert_eq!(
            StockHolding::new("ACME", SharePrice::zero(), 1),
            Err(StockValidationError::NonPositivePrice(0))
        );
        assert_eq!(
            StockHolding::new("ACME", price("1"), 0),
            Err(StockValidationError::ZeroQuantity)
        );
        assert_eq!(
            StockHolding::new("ACME", SharePrice::from_minor(i64::MAX), 2),
            Err(StockValidationError::CostOverflow)
        );
    }

    #[test]
    fn test_stored_row_uses_minor_units() {
        let holding = StockHolding::new("ACME", price("10.05"), 3).unwrap();
        let json = serde_json::to_value(&holding).unwrap();
        assert_eq!(json["unit_price_minor"], 1005);
        assert_eq!(json["total_cost_minor"], 3015);
    }

    #[test]
    fn test_validate_detects_tampered_row() {
        let holding = StockHolding::new("ACME", price("10"), 3).unwrap();
        let mut json = serde_json::to_value(&holding).unwrap();
        json["total_cost_minor"] = serde_json::json!(3001);
        let tampered: StockHolding = serde_json::from_value(json).unwrap();
        assert_eq!(tampered.validate(), Err(StockValidationError::CostMismatch));
    }
}
