//! Service layer for Purse
//!
//! The service layer holds the budgeting logic on top of the storage layer:
//! splitting income, guarding category balances, and routing session actions.

pub mod allocator;
pub mod ledger;
pub mod session;

pub use allocator::{allocate, validate_weights};
pub use ledger::Ledger;
pub use session::Session;
