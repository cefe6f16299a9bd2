//! CLI command handlers
//!
//! Each handler takes an open [`Session`](crate::services::Session), does one
//! user action and prints the result.

pub mod budget;
pub mod payment;
pub mod stock;

pub use budget::{handle_income, handle_reset, handle_status};
pub use payment::{handle_confirm, handle_history, handle_pay};
pub use stock::{handle_buy, handle_stocks};

use crate::error::{PurseError, PurseResult};
use crate::models::{Money, SharePrice};

/// Parse a whole-unit amount typed on the command line
pub(crate) fn parse_amount(input: &str, symbol: &str) -> PurseResult<Money> {
    Money::parse_with_symbol(input, symbol)
        .map_err(|e| PurseError::Validation(format!("Invalid amount '{}': {}", input, e)))
}

/// Parse a share price, which may carry two decimals
pub(crate) fn parse_price(input: &str, symbol: &str) -> PurseResult<SharePrice> {
    SharePrice::parse_with_symbol(input, symbol)
        .map_err(|e| PurseError::Validation(format!("Invalid price '{}': {}", input, e)))
}
