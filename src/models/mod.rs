//! Core data models for Purse
//!
//! This module contains the records the ledger works with: category weights,
//! allocations, remaining balances, transactions and stock holdings.

pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod price;
pub mod stock;
pub mod transaction;

pub use budget::{AllocationEntry, BudgetAllocation, CategoryBalance, CategorySummary, LedgerState};
pub use category::{default_weights, CategoryStatus, CategoryWeight, RESET_MARKER};
pub use ids::{PaymentReference, SessionId};
pub use money::{Money, MoneyParseError};
pub use price::SharePrice;
pub use stock::StockHolding;
pub use transaction::{PaymentConfirmed, Transaction, TransactionStatus};
