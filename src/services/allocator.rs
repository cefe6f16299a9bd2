//! Income allocation
//!
//! Splits an income across weighted categories. Each share is rounded on its
//! own with round-half-to-even, so the allocated total may drift from the
//! income by at most half a unit per category. That drift is reported by
//! [`BudgetAllocation::rounding_drift`] rather than pushed into any one
//! category.

use std::collections::HashSet;

use crate::error::{PurseError, PurseResult};
use crate::models::{AllocationEntry, BudgetAllocation, CategoryWeight, Money};

/// Split `income` across `weights`
///
/// Fails with `InvalidIncome` for a negative income and with
/// `InvalidWeights` unless the weights are non-empty, uniquely named and
/// sum to exactly 100.
pub fn allocate(income: Money, weights: &[CategoryWeight]) -> PurseResult<BudgetAllocation> {
    if income.is_negative() {
        return Err(PurseError::InvalidIncome(income.units()));
    }

    validate_weights(weights)?;

    let entries = weights
        .iter()
        .map(|w| AllocationEntry {
            category: w.name.trim().to_string(),
            amount: Money::from_units(share(income.units(), w.weight)),
        })
        .collect();

    Ok(BudgetAllocation::new(income, entries))
}

/// Check a weight set without allocating anything
pub fn validate_weights(weights: &[CategoryWeight]) -> PurseResult<()> {
    if weights.is_empty() {
        return Err(PurseError::InvalidWeights("no categories configured".into()));
    }

    let mut seen = HashSet::new();
    for weight in weights {
        weight
            .validate()
            .map_err(|e| PurseError::InvalidWeights(e.to_string()))?;

        if !seen.insert(weight.name.trim()) {
            return Err(PurseError::InvalidWeights(format!(
                "duplicate category '{}'",
                weight.name.trim()
            )));
        }
    }

    let total: u32 = weights.iter().map(|w| w.weight).sum();
    if total != 100 {
        return Err(PurseError::InvalidWeights(format!(
            "weights sum to {}%, expected 100%",
            total
        )));
    }

    Ok(())
}

/// `income * pct / 100`, rounded half to even
fn share(income: i64, pct: u32) -> i64 {
    let product = i128::from(income) * i128::from(pct);
    let quotient = product / 100;
    let remainder = product % 100;

    let rounded = match (remainder * 2).cmp(&100) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal if quotient % 2 == 0 => quotient,
        std::cmp::Ordering::Equal => quotient + 1,
    };

    // pct <= 100, so the share never exceeds the income
    rounded as i64
}
