//! In-process persistence gateway
//!
//! Keeps the three collections in memory. `set_available(false)` makes every
//! call fail the way an unreachable store would; `set_state_writes_failing`
//! fails only `save_state`, leaving appends working. Both are how session
//! recovery is exercised in tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use crate::error::{PurseError, PurseResult};
use crate::models::{LedgerState, StockHolding, Transaction};

use super::PersistenceGateway;

/// Persistence gateway backed by process memory
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<Option<LedgerState>>,
    transactions: RwLock<Vec<Transaction>>,
    stocks: RwLock<Vec<StockHolding>>,
    available: AtomicBool,
    state_writes_fail: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(None),
            transactions: RwLock::new(Vec::new()),
            stocks: RwLock::new(Vec::new()),
            available: AtomicBool::new(true),
            state_writes_fail: AtomicBool::new(false),
        }
    }

    /// Simulate the store going away or coming back
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Make `save_state` fail while appends keep succeeding
    pub fn set_state_writes_failing(&self, failing: bool) {
        self.state_writes_fail.store(failing, Ordering::SeqCst);
    }

    /// Number of stored transactions
    pub fn transaction_count(&self) -> PurseResult<usize> {
        let transactions = self.transactions.read().map_err(lock_error)?;
        Ok(transactions.len())
    }

    fn check_available(&self) -> PurseResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(PurseError::Persistence("store is unreachable".into()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> PurseError {
    PurseError::Persistence(format!("Failed to acquire store lock: {}", e))
}

impl PersistenceGateway for MemoryStore {
    fn load_state(&self) -> PurseResult<Option<LedgerState>> {
        self.check_available()?;
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.clone())
    }

    fn load_transactions(&self) -> PurseResult<Vec<Transaction>> {
        self.check_available()?;
        let transactions = self.transactions.read().map_err(lock_error)?;
        Ok(transactions.clone())
    }

    fn save_state(&self, new_state: &LedgerState) -> PurseResult<()> {
        self.check_available()?;
        if self.state_writes_fail.load(Ordering::SeqCst) {
            return Err(PurseError::Persistence("disk full".into()));
        }
        // Swapped under the write lock, so readers see old or new, never a mix
        let mut state = self.state.write().map_err(lock_error)?;
        *state = Some(new_state.clone());
        Ok(())
    }

    fn append_transaction(&self, transaction: &Transaction) -> PurseResult<()> {
        self.check_available()?;
        let mut transactions = self.transactions.write().map_err(lock_error)?;
        transactions.push(transaction.clone());
        Ok(())
    }

    fn load_stocks(&self) -> PurseResult<Vec<StockHolding>> {
        self.check_available()?;
        let stocks = self.stocks.read().map_err(lock_error)?;
        Ok(stocks.clone())
    }

    fn append_stock(&self, holding: &StockHolding) -> PurseResult<()> {
        self.check_available()?;
        let mut stocks = self.stocks.write().map_err(lock_error)?;
        stocks.push(holding.clone());
        Ok(())
    }
}
