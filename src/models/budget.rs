//! Budget allocation and ledger state models
//!
//! A `BudgetAllocation` is what income was split into. A `LedgerState` keeps,
//! per category, both the allocated amount and what is left of it after
//! accepted payments, so a stored state is enough to check the log against.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::CategoryStatus;
use super::money::Money;

/// Amount allocated to one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub category: String,
    pub amount: Money,
}

/// Per-category amounts derived from one income value
///
/// Entries keep the order of the weights they were allocated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAllocation {
    /// Income the allocation was derived from
    pub income: Money,

    /// Allocated amount per category
    pub entries: Vec<AllocationEntry>,
}

impl BudgetAllocation {
    pub fn new(income: Money, entries: Vec<AllocationEntry>) -> Self {
        Self { income, entries }
    }

    /// Amount allocated to a category
    pub fn get(&self, category: &str) -> Option<Money> {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.amount)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.entries.iter().any(|e| e.category == category)
    }

    /// Category names in allocation order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.category.as_str())
    }

    /// Sum of all allocated amounts
    pub fn total(&self) -> Money {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Allocated total minus income
    ///
    /// Per-category rounding means the allocated total can miss the income by
    /// up to half a unit per category. Positive means more was handed out
    /// than earned.
    pub fn rounding_drift(&self) -> i64 {
        self.total().units() - self.income.units()
    }

    /// The fully-funded ledger state for this allocation
    pub fn initial_state(&self) -> LedgerState {
        LedgerState {
            income: self.income,
            balances: self
                .entries
                .iter()
                .map(|e| CategoryBalance {
                    category: e.category.clone(),
                    allocated: e.amount,
                    remaining: e.amount,
                })
                .collect(),
        }
    }
}

/// Allocation and remaining balance of one category; one row of the
/// `budget` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBalance {
    pub category: String,
    pub allocated: Money,
    pub remaining: Money,
}

/// Remaining balance of every category in a ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Income of the allocation this state was funded from
    pub income: Money,

    /// One row per category, in allocation order
    pub balances: Vec<CategoryBalance>,
}

impl LedgerState {
    /// Remaining balance of a category
    pub fn remaining(&self, category: &str) -> Option<Money> {
        self.balances
            .iter()
            .find(|b| b.category == category)
            .map(|b| b.remaining)
    }

    pub(crate) fn remaining_mut(&mut self, category: &str) -> Option<&mut Money> {
        self.balances
            .iter_mut()
            .find(|b| b.category == category)
            .map(|b| &mut b.remaining)
    }

    /// The allocation this state was funded from
    pub fn allocation(&self) -> BudgetAllocation {
        BudgetAllocation::new(
            self.income,
            self.balances
                .iter()
                .map(|b| AllocationEntry {
                    category: b.category.clone(),
                    amount: b.allocated,
                })
                .collect(),
        )
    }

    /// Sum of all remaining balances
    pub fn total_remaining(&self) -> Money {
        self.balances.iter().map(|b| b.remaining).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

/// A category's budget status: allocation, balance and spending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: String,
    pub allocated: Money,
    pub remaining: Money,
    pub spent: Money,
    pub status: CategoryStatus,
}

impl CategorySummary {
    pub fn new(category: impl Into<String>, allocated: Money, remaining: Money) -> Self {
        Self {
            category: category.into(),
            allocated,
            remaining,
            spent: allocated - remaining,
            status: CategoryStatus::from_balances(allocated.units(), remaining.units()),
        }
    }
}

impl fmt::Display for CategorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} of {} left ({})",
            self.category, self.remaining, self.allocated, self.status
        )
    }
}
