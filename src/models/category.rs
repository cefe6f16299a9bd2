//! Category weights and per-category spending status
//!
//! A category is a named bucket of planned spending. Its weight is the share
//! of monthly income (in whole percent) it receives when a budget is
//! allocated. A category that is not payable (Savings by default) is funded
//! but never accepts payments.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the pseudo-category used for reset audit markers
pub const RESET_MARKER: &str = "*";

/// A category and the percentage of income assigned to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWeight {
    /// Category name, unique within a ledger
    pub name: String,

    /// Percentage of income (0-100)
    pub weight: u32,

    /// Whether payments may be drawn from this category
    #[serde(default = "default_payable")]
    pub payable: bool,
}

fn default_payable() -> bool {
    true
}

impl CategoryWeight {
    pub fn new(name: impl Into<String>, weight: u32) -> Self {
        Self {
            name: name.into(),
            weight,
            payable: true,
        }
    }

    /// Set whether payments may be drawn from this category
    pub fn with_payable(mut self, payable: bool) -> Self {
        self.payable = payable;
        self
    }

    /// Validate a single entry
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        if name == RESET_MARKER {
            return Err(CategoryValidationError::ReservedName);
        }

        if self.name.len() > 50 {
            return Err(CategoryValidationError::NameTooLong(self.name.len()));
        }

        if self.weight > 100 {
            return Err(CategoryValidationError::WeightOutOfRange(self.weight));
        }

        Ok(())
    }
}

impl fmt::Display for CategoryWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}%)", self.name, self.weight)
    }
}

/// The category set a fresh budget is split into
pub fn default_weights() -> Vec<CategoryWeight> {
    vec![
        CategoryWeight::new("Housing", 30),
        CategoryWeight::new("Food", 20),
        CategoryWeight::new("Transportation", 15),
        CategoryWeight::new("Entertainment", 10),
        CategoryWeight::new("Utilities", 10),
        CategoryWeight::new("Savings", 15).with_payable(false),
    ]
}

/// Where a category sits in its spending lifecycle
///
/// `Funded -> PartiallySpent* -> Depleted`; only a reset re-funds a
/// depleted category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryStatus {
    /// Nothing spent yet
    Funded,
    /// Some, but not all, of the allocation spent
    PartiallySpent,
    /// Remaining balance is zero
    Depleted,
}

impl CategoryStatus {
    /// Derive the status from an allocation and its remaining balance
    pub fn from_balances(allocated: i64, remaining: i64) -> Self {
        if remaining == 0 {
            Self::Depleted
        } else if remaining == allocated {
            Self::Funded
        } else {
            Self::PartiallySpent
        }
    }
}

impl fmt::Display for CategoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Funded => write!(f, "Funded"),
            Self::PartiallySpent => write!(f, "Partially spent"),
            Self::Depleted => write!(f, "Depleted"),
        }
    }
}

/// Validation errors for category weights
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    ReservedName,
    NameTooLong(usize),
    WeightOutOfRange(u32),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::ReservedName => {
                write!(f, "Category name '{}' is reserved", RESET_MARKER)
            }
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max 50)", len)
            }
            Self::WeightOutOfRange(w) => {
                write!(f, "Category weight {}% is outside 0-100", w)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_sum_to_100() {
        let total: u32 = default_weights().iter().map(|c| c.weight).sum();
        assert_eq!(total, 100);
        assert_eq!(default_weights().len(), 6);
    }

    #[test]
    fn test_only_savings_is_closed_to_payments() {
        let closed: Vec<String> = default_weights()
            .into_iter()
            .filter(|w| !w.payable)
            .map(|w| w.name)
            .collect();
        assert_eq!(closed, ["Savings"]);
    }

    #[test]
    fn test_payable_defaults_to_true_when_missing() {
        let weight: CategoryWeight =
            serde_json::from_str(r#"{"name": "Food", "weight": 20}"#).unwrap();
        assert!(weight.payable);

        let json = serde_json::to_value(CategoryWeight::new("Savings", 15).with_payable(false))
            .unwrap();
        assert_eq!(json["payable"], false);
    }

    #[test]
    fn test_validation() {
        assert!(CategoryWeight::new("Food", 20).validate().is_ok());
        assert_eq!(
            CategoryWeight::new("  ", 20).validate(),
            Err(CategoryValidationError::EmptyName)
        );
        assert_eq!(
            CategoryWeight::new("*", 20).validate(),
            Err(CategoryValidationError::ReservedName)
        );
        assert_eq!(
            CategoryWeight::new("Food", 101).validate(),
            Err(CategoryValidationError::WeightOutOfRange(101))
        );
        assert!(matches!(
            CategoryWeight::new("x".repeat(51), 1).validate(),
            Err(CategoryValidationError::NameTooLong(51))
        ));
    }

    #[test]
    fn test_status_from_balances() {
        assert_eq!(CategoryStatus::from_balances(2000, 2000), CategoryStatus::Funded);
        assert_eq!(
            CategoryStatus::from_balances(2000, 1500),
            CategoryStatus::PartiallySpent
        );
        assert_eq!(CategoryStatus::from_balances(2000, 0), CategoryStatus::Depleted);
        // A zero allocation has nothing left to spend
        assert_eq!(CategoryStatus::from_balances(0, 0), CategoryStatus::Depleted);
    }
}
