//! Custom error types for Purse
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.
//!
//! Note that an over-drawn payment is *not* an error: it is recorded as a
//! rejected [`Transaction`](crate::models::Transaction) and returned normally.

use thiserror::Error;

/// The main error type for Purse operations
#[derive(Error, Debug)]
pub enum PurseError {
    /// Income supplied to the allocator was negative
    #[error("Invalid income: {0} (income must not be negative)")]
    InvalidIncome(i64),

    /// Category weights are not a usable configuration
    #[error("Invalid category weights: {0}")]
    InvalidWeights(String),

    /// Payment or purchase amount outside the accepted range
    #[error("Invalid amount for '{category}': {amount} (amount must be positive)")]
    InvalidAmount { category: String, amount: i64 },

    /// Category is not part of the ledger's category set
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Category exists but does not accept payments
    #[error("Category '{0}' does not accept payments")]
    NotPayable(String),

    /// A payment confirmation with this reference was already recorded
    #[error("Payment reference already recorded: {0}")]
    DuplicatePayment(String),

    /// No ledger exists yet for this session
    #[error("No budget has been set up yet; supply a monthly income first")]
    NotInitialized,

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Store unreachable, write failure or unreadable persisted data
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl PurseError {
    /// Create an "invalid amount" error for a category
    pub fn invalid_amount(category: impl Into<String>, amount: i64) -> Self {
        Self::InvalidAmount {
            category: category.into(),
            amount,
        }
    }

    /// Create an "unknown category" error
    pub fn unknown_category(category: impl Into<String>) -> Self {
        Self::UnknownCategory(category.into())
    }

    /// Check if this is a persistence failure
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }

    /// Check if this error was raised before any mutation happened
    pub fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidIncome(_)
                | Self::InvalidWeights(_)
                | Self::InvalidAmount { .. }
                | Self::UnknownCategory(_)
                | Self::NotPayable(_)
                | Self::DuplicatePayment(_)
                | Self::Validation(_)
        )
    }
}

impl From<std::io::Error> for PurseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PurseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Purse operations
pub type PurseResult<T> = Result<T, PurseError>;
