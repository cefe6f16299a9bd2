//! Display formatting for terminal output
//!
//! Provides utilities for formatting budgets, transaction history and stock
//! holdings as terminal tables.

pub mod budget;
pub mod stock;
pub mod transaction;

pub use budget::{format_allocation, format_status};
pub use stock::format_stocks;
pub use transaction::{format_history, format_payment_outcome};
