//! Storage layer for Purse
//!
//! The ledger reads and writes through the [`PersistenceGateway`] trait. Two
//! backends are provided: [`JsonStore`] keeps the collections in files under
//! the data directory, [`MemoryStore`] keeps them in process.

pub mod file_io;
pub mod json_store;
pub mod memory;

pub use file_io::{append_json_line, read_json, read_json_lines, write_json_atomic};
pub use json_store::JsonStore;
pub use memory::MemoryStore;

use crate::error::PurseResult;
use crate::models::{LedgerState, StockHolding, Transaction};

/// Abstract document store behind the ledger
///
/// Three collections: `budget` (one row per category, replaced as a whole),
/// `transactions` and `stocks` (append-only, insertion order is
/// chronological order). Every failure is reported as
/// [`PurseError::Persistence`](crate::error::PurseError::Persistence).
pub trait PersistenceGateway: Send + Sync {
    /// Current ledger state, or None if no budget was ever saved
    fn load_state(&self) -> PurseResult<Option<LedgerState>>;

    /// Every recorded transaction, oldest first
    fn load_transactions(&self) -> PurseResult<Vec<Transaction>>;

    /// Replace the whole ledger state in one atomic step
    fn save_state(&self, state: &LedgerState) -> PurseResult<()>;

    fn append_transaction(&self, transaction: &Transaction) -> PurseResult<()>;

    /// Every recorded stock purchase, oldest first
    fn load_stocks(&self) -> PurseResult<Vec<StockHolding>>;

    fn append_stock(&self, holding: &StockHolding) -> PurseResult<()>;
}
