//! Transaction model
//!
//! Every attempted deduction produces one immutable `Transaction`, accepted
//! or rejected. Resets are logged as transactions against the `*` marker
//! category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::budget::BudgetAllocation;
use super::category::RESET_MARKER;
use super::ids::PaymentReference;
use super::money::Money;

/// Reason recorded on a payment that was applied
pub const REASON_PAID: &str = "paid";

/// Reason recorded on a payment larger than the remaining balance
pub const REASON_INSUFFICIENT: &str = "insufficient balance";

/// Reason recorded on reset markers
pub const REASON_RESET: &str = "reset";

/// Outcome of an attempted deduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Accepted,
    Rejected,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => write!(f, "Accepted"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

/// One row of the `transactions` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Category the payment was made against (`*` for reset markers)
    pub category: String,

    /// Amount of the attempted deduction
    pub amount: Money,

    /// When the outcome was decided
    pub timestamp: DateTime<Utc>,

    pub status: TransactionStatus,

    /// Human-readable reason for the outcome
    pub reason: String,

    /// Gateway reference for confirmed payments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<PaymentReference>,

    /// Allocation a reset marker funded the ledger with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocation: Option<BudgetAllocation>,
}

impl Transaction {
    /// An accepted payment
    pub fn accepted(category: impl Into<String>, amount: Money) -> Self {
        Self {
            category: category.into(),
            amount,
            timestamp: Utc::now(),
            status: TransactionStatus::Accepted,
            reason: REASON_PAID.to_string(),
            reference: None,
            allocation: None,
        }
    }

    /// A payment refused for lack of funds
    pub fn rejected(category: impl Into<String>, amount: Money) -> Self {
        Self {
            category: category.into(),
            amount,
            timestamp: Utc::now(),
            status: TransactionStatus::Rejected,
            reason: REASON_INSUFFICIENT.to_string(),
            reference: None,
            allocation: None,
        }
    }

    /// Audit marker for a reset that re-funded the ledger
    ///
    /// The marker carries the new allocation, so the log alone is enough to
    /// rebuild balances even if the state write after it never landed.
    pub fn reset_marker(allocation: &BudgetAllocation) -> Self {
        Self {
            category: RESET_MARKER.to_string(),
            amount: allocation.total(),
            timestamp: Utc::now(),
            status: TransactionStatus::Accepted,
            reason: REASON_RESET.to_string(),
            reference: None,
            allocation: Some(allocation.clone()),
        }
    }

    /// Attach a gateway payment reference
    pub fn with_reference(mut self, reference: PaymentReference) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn is_accepted(&self) -> bool {
        self.status == TransactionStatus::Accepted
    }

    pub fn is_reset(&self) -> bool {
        self.category == RESET_MARKER && self.reason == REASON_RESET
    }

    /// Accepted deduction against a real category
    pub fn is_accepted_payment(&self) -> bool {
        self.is_accepted() && !self.is_reset()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} ({})",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.status,
            self.category,
            self.amount,
            self.reason
        )
    }
}

/// A payment the external gateway has confirmed
///
/// Signature and token checks belong to the gateway integration; the ledger
/// still re-validates the amount and category like any user payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmed {
    /// Unique gateway reference; replays of the same reference are refused
    pub reference: PaymentReference,
    pub category: String,
    pub amount: Money,
}

impl PaymentConfirmed {
    pub fn new(reference: PaymentReference, category: impl Into<String>, amount: Money) -> Self {
        Self {
            reference,
            category: category.into(),
            amount,
        }
    }
}
