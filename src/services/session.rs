//! Session controller
//!
//! A `Session` owns the one ledger of a user session and routes user actions
//! to the allocator and the ledger. All mutations run inside one mutex scope
//! (validate, mutate in memory, persist), so two payments or resets can never
//! interleave on the same ledger.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, info_span, warn};

use crate::error::{PurseError, PurseResult};
use crate::models::{
    BudgetAllocation, CategorySummary, CategoryWeight, LedgerState, Money, PaymentConfirmed,
    SessionId, SharePrice, StockHolding, Transaction,
};
use crate::storage::PersistenceGateway;

use super::allocator::{allocate, validate_weights};
use super::ledger::Ledger;

/// Mutable session data guarded by the session mutex
struct SessionInner {
    ledger: Option<Ledger>,
    /// History loaded from the store while no budget exists yet
    orphan_history: Vec<Transaction>,
    stocks: Vec<StockHolding>,
    pending_stocks: Vec<StockHolding>,
}

impl SessionInner {
    fn ledger_mut(&mut self) -> PurseResult<&mut Ledger> {
        self.ledger.as_mut().ok_or(PurseError::NotInitialized)
    }

    fn flush_stocks(&mut self, gateway: &dyn PersistenceGateway) -> PurseResult<()> {
        while let Some(next) = self.pending_stocks.first() {
            gateway.append_stock(next)?;
            self.pending_stocks.remove(0);
        }
        Ok(())
    }
}

/// One user's budgeting session
pub struct Session {
    id: SessionId,
    weights: Vec<CategoryWeight>,
    gateway: Arc<dyn PersistenceGateway>,
    inner: Mutex<SessionInner>,
}

impl Session {
    /// Open a session, loading any budget the store already holds
    ///
    /// The allocator only runs later, on the first `set_income`, and only if
    /// the store had no budget.
    pub fn open(
        gateway: Arc<dyn PersistenceGateway>,
        weights: Vec<CategoryWeight>,
    ) -> PurseResult<Self> {
        validate_weights(&weights)?;

        let id = SessionId::new();
        let _span = info_span!("session", id = %id).entered();

        let state = gateway.load_state()?;
        let history = gateway.load_transactions()?;
        let stocks = gateway.load_stocks()?;

        let (ledger, orphan_history) = match state {
            Some(state) => {
                let mut ledger = Ledger::restore(state, history, gateway.clone())?;
                if ledger.has_unsynced() {
                    // Stale state; write the replayed balances back if we can
                    if let Err(e) = ledger.flush() {
                        warn!(error = %e, "repaired budget not persisted");
                    }
                }
                info!(
                    transactions = ledger.history().len(),
                    stocks = stocks.len(),
                    "session opened with stored budget"
                );
                (Some(ledger), Vec::new())
            }
            None => {
                info!(transactions = history.len(), "session opened without budget");
                (None, history)
            }
        };

        Ok(Self {
            id,
            weights,
            gateway,
            inner: Mutex::new(SessionInner {
                ledger,
                orphan_history,
                stocks,
                pending_stocks: Vec::new(),
            }),
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Categories this session allocates income across
    pub fn weights(&self) -> &[CategoryWeight] {
        &self.weights
    }

    /// Whether a budget exists
    pub fn has_budget(&self) -> PurseResult<bool> {
        Ok(self.lock()?.ledger.is_some())
    }

    /// Supply the monthly income
    ///
    /// Creates and persists the budget the first time. Once a budget exists
    /// the call leaves it untouched and returns its allocation; use
    /// [`Session::reset`] to re-fund from a new income.
    pub fn set_income(&self, income: Money) -> PurseResult<BudgetAllocation> {
        let _span = info_span!("session", id = %self.id).entered();
        let mut inner = self.lock()?;

        if let Some(ledger) = &inner.ledger {
            if ledger.allocation().income != income {
                warn!(
                    current = ledger.allocation().income.units(),
                    requested = income.units(),
                    "budget already exists; income unchanged (reset to re-fund)"
                );
            }
            return Ok(ledger.allocation().clone());
        }

        let allocation = allocate(income, &self.weights)?;
        let prior = std::mem::take(&mut inner.orphan_history);
        let mut ledger = Ledger::unsaved(allocation.clone(), prior, self.gateway.clone());
        let flushed = ledger.flush();
        inner.ledger = Some(ledger);

        // On a store failure the budget still exists in memory, unsynced
        if let Err(e) = flushed {
            warn!(error = %e, "budget created but not persisted");
            return Err(e);
        }
        Ok(allocation)
    }

    /// Pay `amount` against `category`
    ///
    /// Returns the recorded transaction; check its status, an over-draw comes
    /// back as `Rejected` rather than as an error.
    pub fn pay(&self, category: &str, amount: Money) -> PurseResult<Transaction> {
        let _span = info_span!("session", id = %self.id).entered();
        let mut inner = self.lock()?;
        let ledger = inner.ledger_mut()?;
        self.check_payable(category, amount)?;
        ledger.apply_payment(category, amount)
    }

    /// Apply a payment the external gateway confirmed
    pub fn confirm_payment(&self, event: PaymentConfirmed) -> PurseResult<Transaction> {
        let _span = info_span!("session", id = %self.id).entered();
        let mut inner = self.lock()?;
        let ledger = inner.ledger_mut()?;
        self.check_payable(&event.category, event.amount)?;
        ledger.apply_confirmed(event)
    }

    /// Re-fund the whole budget from a new income
    pub fn reset(&self, income: Money) -> PurseResult<BudgetAllocation> {
        let _span = info_span!("session", id = %self.id).entered();
        let allocation = allocate(income, &self.weights)?;

        let mut inner = self.lock()?;
        inner.ledger_mut()?.reset(allocation.clone())?;
        Ok(allocation)
    }

    /// Record a stock purchase
    pub fn buy_stock(
        &self,
        name: &str,
        unit_price: SharePrice,
        quantity: u32,
    ) -> PurseResult<StockHolding> {
        let _span = info_span!("session", id = %self.id).entered();

        let holding = StockHolding::new(name, unit_price, quantity).map_err(|e| {
            warn!(name, price = %unit_price, quantity, error = %e, "stock purchase refused");
            PurseError::Validation(e.to_string())
        })?;

        let mut inner = self.lock()?;
        inner.stocks.push(holding.clone());
        inner.pending_stocks.push(holding.clone());

        info!(
            name = holding.name(),
            quantity,
            total = %holding.total_cost(),
            "stock purchased"
        );

        inner.flush_stocks(self.gateway.as_ref())?;
        Ok(holding)
    }

    /// Retry every write that has not reached the store
    pub fn sync(&self) -> PurseResult<()> {
        let _span = info_span!("session", id = %self.id).entered();
        let mut inner = self.lock()?;

        inner.flush_stocks(self.gateway.as_ref())?;
        if let Some(ledger) = inner.ledger.as_mut() {
            ledger.flush()?;
        }

        info!("session synced");
        Ok(())
    }

    /// True while some accepted change is only in memory
    pub fn is_unsynced(&self) -> PurseResult<bool> {
        let inner = self.lock()?;
        let ledger_unsynced = inner.ledger.as_ref().is_some_and(|l| l.has_unsynced());
        Ok(ledger_unsynced || !inner.pending_stocks.is_empty())
    }

    pub fn allocation(&self) -> PurseResult<Option<BudgetAllocation>> {
        let inner = self.lock()?;
        Ok(inner.ledger.as_ref().map(|l| l.allocation().clone()))
    }

    pub fn snapshot(&self) -> PurseResult<Option<LedgerState>> {
        let inner = self.lock()?;
        Ok(inner.ledger.as_ref().map(|l| l.snapshot()))
    }

    pub fn summaries(&self) -> PurseResult<Vec<CategorySummary>> {
        let inner = self.lock()?;
        Ok(inner
            .ledger
            .as_ref()
            .map(|l| l.summaries())
            .unwrap_or_default())
    }

    /// Every transaction, oldest first
    pub fn transactions(&self) -> PurseResult<Vec<Transaction>> {
        let inner = self.lock()?;
        Ok(match &inner.ledger {
            Some(ledger) => ledger.history().to_vec(),
            None => inner.orphan_history.clone(),
        })
    }

    /// Every stock purchase, oldest first
    pub fn stocks(&self) -> PurseResult<Vec<StockHolding>> {
        Ok(self.lock()?.stocks.clone())
    }

    /// Refuse payments to a category configured as not payable
    fn check_payable(&self, category: &str, amount: Money) -> PurseResult<()> {
        let closed = self
            .weights
            .iter()
            .any(|w| !w.payable && w.name.trim() == category);

        if closed {
            warn!(category, amount = amount.units(), "payment to non-payable category");
            return Err(PurseError::NotPayable(category.to_string()));
        }
        Ok(())
    }

    fn lock(&self) -> PurseResult<MutexGuard<'_, SessionInner>> {
        self.inner
            .lock()
            .map_err(|e| PurseError::Validation(format!("Session lock poisoned: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::PursePaths;
    use crate::models::{default_weights, PaymentReference, TransactionStatus};
    use crate::storage::{JsonStore, MemoryStore};
    use tempfile::TempDir;

    fn memory_session() -> (Arc<MemoryStore>, Session) {
        let store = Arc::new(MemoryStore::new());
        let session = Session::open(store.clone(), default_weights()).unwrap();
        (store, session)
    }

    fn remaining(session: &Session, category: &str) -> i64 {
        session
            .snapshot()
            .unwrap()
            .unwrap()
            .remaining(category)
            .unwrap()
            .units()
    }

    #[test]
    fn test_actions_before_income_fail() {
        let (_store, session) = memory_session();

        assert!(!session.has_budget().unwrap());
        assert!(matches!(
            session.pay("Food", Money::from_units(1)),
            Err(PurseError::NotInitialized)
        ));
        assert!(matches!(
            session.reset(Money::from_units(1)),
            Err(PurseError::NotInitialized)
        ));
        assert!(session.snapshot().unwrap().is_none());
    }

    #[test]
    fn test_worked_example() {
        let (_store, session) = memory_session();

        let allocation = session.set_income(Money::from_units(10000)).unwrap();
        assert_eq!(allocation.get("Housing"), Some(Money::from_units(3000)));
        assert_eq!(allocation.get("Savings"), Some(Money::from_units(1500)));

        let paid = session.pay("Food", Money::from_units(500)).unwrap();
        assert_eq!(paid.status, TransactionStatus::Accepted);
        assert_eq!(remaining(&session, "Food"), 1500);

        let refused = session.pay("Food", Money::from_units(3000)).unwrap();
        assert_eq!(refused.status, TransactionStatus::Rejected);
        assert_eq!(refused.reason, "insufficient balance");
        assert_eq!(remaining(&session, "Food"), 1500);

        let err = session.pay("Rent", Money::from_units(100)).unwrap_err();
        assert!(matches!(err, PurseError::UnknownCategory(_)));
        assert_eq!(session.transactions().unwrap().len(), 2);

        session.reset(Money::from_units(13333)).unwrap();
        assert_eq!(remaining(&session, "Savings"), 2000);
        let last = session.transactions().unwrap().pop().unwrap();
        assert_eq!(last.category, "*");
        assert_eq!(last.reason, "reset");
    }

    #[test]
    fn test_set_income_twice_keeps_budget() {
        let (_store, session) = memory_session();
        session.set_income(Money::from_units(10000)).unwrap();
        session.pay("Food", Money::from_units(100)).unwrap();

        let allocation = session.set_income(Money::from_units(50000)).unwrap();

        assert_eq!(allocation.income.units(), 10000);
        assert_eq!(remaining(&session, "Food"), 1900);
    }

    #[test]
    fn test_reopen_skips_allocator() {
        let (store, session) = memory_session();
        session.set_income(Money::from_units(10000)).unwrap();
        session.pay("Housing", Money::from_units(1200)).unwrap();
        drop(session);

        let reopened = Session::open(store, default_weights()).unwrap();
        assert!(reopened.has_budget().unwrap());
        assert_eq!(remaining(&reopened, "Housing"), 1800);
        assert_eq!(
            reopened.allocation().unwrap().unwrap().get("Housing"),
            Some(Money::from_units(3000))
        );
    }

    #[test]
    fn test_invalid_weights_rejected_on_open() {
        let store = Arc::new(MemoryStore::new());
        let weights = vec![CategoryWeight::new("A", 60), CategoryWeight::new("B", 30)];

        let err = Session::open(store, weights).err().unwrap();
        assert!(matches!(err, PurseError::InvalidWeights(_)));
    }

    #[test]
    fn test_negative_income_rejected() {
        let (_store, session) = memory_session();
        let err = session.set_income(Money::from_units(-10)).unwrap_err();
        assert!(matches!(err, PurseError::InvalidIncome(-10)));
        assert!(!session.has_budget().unwrap());
    }

    #[test]
    fn test_confirmed_payment_replay_refused() {
        let (_store, session) = memory_session();
        session.set_income(Money::from_units(10000)).unwrap();
        let event = PaymentConfirmed::new(
            PaymentReference::new("pay_9").unwrap(),
            "Transportation",
            Money::from_units(400),
        );

        session.confirm_payment(event.clone()).unwrap();
        let err = session.confirm_payment(event).unwrap_err();

        assert!(matches!(err, PurseError::DuplicatePayment(_)));
        assert_eq!(remaining(&session, "Transportation"), 1100);
    }

    #[test]
    fn test_unsynced_flag_until_sync() {
        let (store, session) = memory_session();
        session.set_income(Money::from_units(10000)).unwrap();

        store.set_available(false);
        assert!(session.pay("Food", Money::from_units(250)).unwrap_err().is_persistence());
        assert!(session.is_unsynced().unwrap());
        assert_eq!(remaining(&session, "Food"), 1750);

        assert!(session.sync().is_err());
        assert!(session.is_unsynced().unwrap());

        store.set_available(true);
        session.sync().unwrap();
        assert!(!session.is_unsynced().unwrap());
        assert_eq!(store.transaction_count().unwrap(), 1);
        assert_eq!(
            store.load_state().unwrap().unwrap().remaining("Food"),
            Some(Money::from_units(1750))
        );
    }

    #[test]
    fn test_budget_created_while_store_down() {
        let (store, session) = memory_session();
        store.set_available(false);

        assert!(session
            .set_income(Money::from_units(10000))
            .unwrap_err()
            .is_persistence());
        assert!(session.has_budget().unwrap());
        assert!(session.is_unsynced().unwrap());

        store.set_available(true);
        session.sync().unwrap();
        assert!(store.load_state().unwrap().is_some());
    }

    #[test]
    fn test_savings_refuses_payments() {
        let (store, session) = memory_session();
        session.set_income(Money::from_units(10000)).unwrap();

        let err = session.pay("Savings", Money::from_units(100)).unwrap_err();
        assert!(matches!(err, PurseError::NotPayable(ref c) if c == "Savings"));

        let event = PaymentConfirmed::new(
            PaymentReference::new("pay_sv").unwrap(),
            "Savings",
            Money::from_units(100),
        );
        let err = session.confirm_payment(event.clone()).unwrap_err();
        assert!(matches!(err, PurseError::NotPayable(_)));

        assert_eq!(remaining(&session, "Savings"), 1500);
        assert!(session.transactions().unwrap().iter().all(|t| t.category != "Savings"));
        // One reset marker from budget creation
        assert_eq!(store.transaction_count().unwrap(), 1);
    }

    #[test]
    fn test_reopen_after_lost_state_write() {
        let (store, session) = memory_session();
        session.set_income(Money::from_units(10000)).unwrap();

        store.set_state_writes_failing(true);
        assert!(session.pay("Food", Money::from_units(500)).unwrap_err().is_persistence());
        drop(session);

        store.set_state_writes_failing(false);
        let reopened = Session::open(store.clone(), default_weights()).unwrap();
        let allocation = reopened.allocation().unwrap().unwrap();

        assert_eq!(remaining(&reopened, "Food"), 1500);
        assert_eq!(allocation.get("Food"), Some(Money::from_units(2000)));
        assert_eq!(allocation.total().units(), 10000);
        assert!(!reopened.is_unsynced().unwrap());
        assert_eq!(
            store.load_state().unwrap().unwrap().remaining("Food"),
            Some(Money::from_units(1500))
        );
    }

    #[test]
    fn test_stock_purchases() {
        let (store, session) = memory_session();

        let price = SharePrice::parse("150.25").unwrap();
        let holding = session.buy_stock("ACME", price, 3).unwrap();
        assert_eq!(holding.total_cost(), SharePrice::from_minor(45075));

        assert!(session.buy_stock("ACME", SharePrice::zero(), 3).is_err());
        assert!(session.buy_stock("", SharePrice::from_minor(100), 3).is_err());

        assert_eq!(session.stocks().unwrap().len(), 1);
        assert_eq!(store.load_stocks().unwrap(), vec![holding]);
    }

    #[test]
    fn test_concurrent_payments_never_overdraw() {
        let (_store, session) = memory_session();
        session.set_income(Money::from_units(10000)).unwrap();
        let session = Arc::new(session);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let session = Arc::clone(&session);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        session.pay("Food", Money::from_units(7)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let accepted: i64 = session
            .transactions()
            .unwrap()
            .iter()
            .filter(|t| t.is_accepted_payment())
            .map(|t| t.amount.units())
            .sum();
        assert_eq!(remaining(&session, "Food"), 2000 - accepted);
        assert!(remaining(&session, "Food") >= 0);
        assert_eq!(session.transactions().unwrap().len(), 400);
    }

    #[test]
    fn test_json_store_session_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PursePaths::with_base_dir(temp_dir.path().to_path_buf());

        {
            let store = Arc::new(JsonStore::new(&paths).unwrap());
            let session = Session::open(store, default_weights()).unwrap();
            session.set_income(Money::from_units(10000)).unwrap();
            session.pay("Food", Money::from_units(500)).unwrap();
            session.pay("Food", Money::from_units(3000)).unwrap();
            session.buy_stock("ACME", SharePrice::from_minor(1050), 2).unwrap();
        }

        let store = Arc::new(JsonStore::new(&paths).unwrap());
        let session = Session::open(store, default_weights()).unwrap();
        assert_eq!(remaining(&session, "Food"), 1500);
        assert_eq!(session.transactions().unwrap().len(), 2);
        assert_eq!(session.stocks().unwrap().len(), 1);
        assert_eq!(
            session.allocation().unwrap().unwrap().get("Food"),
            Some(Money::from_units(2000))
        );
    }
}
