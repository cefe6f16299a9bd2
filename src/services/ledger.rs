//! The category ledger
//!
//! Holds the remaining balance of every category and the append-only
//! transaction log. Every outcome, accepted or rejected, is written through
//! the persistence gateway before the operation returns.
//!
//! Writes are queued and flushed in order. If the gateway fails, the
//! in-memory ledger keeps the mutation and the queue keeps the unwritten
//! records; the next successful flush writes them before anything newer, so
//! the store never sees transactions out of order.
//!
//! The transaction log is written first and is the source of truth. On
//! restore, balances are replayed from the last reset marker (which carries
//! its allocation) or from the stored allocation, and a stored state that
//! lags behind the log is repaired.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{PurseError, PurseResult};
use crate::models::{
    BudgetAllocation, CategoryStatus, CategorySummary, LedgerState, Money,
    PaymentConfirmed, PaymentReference, Transaction,
};
use crate::storage::PersistenceGateway;

/// Category balances plus transaction history, backed by a gateway
pub struct Ledger {
    allocation: BudgetAllocation,
    state: LedgerState,
    history: Vec<Transaction>,
    references: HashSet<PaymentReference>,
    gateway: Arc<dyn PersistenceGateway>,
    /// Transactions not yet appended to the store, oldest first
    pending: Vec<Transaction>,
    /// In-memory state differs from the stored one
    state_dirty: bool,
}

impl Ledger {
    /// Create a fully funded ledger and persist it
    pub fn create(
        allocation: BudgetAllocation,
        prior_history: Vec<Transaction>,
        gateway: Arc<dyn PersistenceGateway>,
    ) -> PurseResult<Self> {
        let mut ledger = Self::unsaved(allocation, prior_history, gateway);
        ledger.flush()?;
        Ok(ledger)
    }

    /// Create a fully funded ledger whose writes are still queued
    ///
    /// `prior_history` is whatever the store already holds. If it is not
    /// empty a reset marker is logged first so the old payments are not
    /// replayed against the new budget.
    pub fn unsaved(
        allocation: BudgetAllocation,
        prior_history: Vec<Transaction>,
        gateway: Arc<dyn PersistenceGateway>,
    ) -> Self {
        let mut ledger = Self {
            state: allocation.initial_state(),
            references: collect_references(&prior_history),
            history: prior_history,
            allocation,
            gateway,
            pending: Vec::new(),
            state_dirty: true,
        };

        if !ledger.history.is_empty() {
            ledger.record(Transaction::reset_marker(&ledger.allocation));
        }

        info!(
            income = ledger.allocation.income.units(),
            categories = ledger.allocation.entries.len(),
            drift = ledger.allocation.rounding_drift(),
            "budget created"
        );

        ledger
    }

    /// Rebuild a ledger from persisted state and history
    ///
    /// The allocation comes from the last reset marker, or from the stored
    /// state when the log has none. Balances are replayed from the log:
    /// `remaining = allocated - accepted payments since the last reset`. If
    /// the stored state disagrees (a state write failed after its
    /// transaction was logged) the ledger comes back unsynced with the
    /// replayed balances, ready to be flushed.
    pub fn restore(
        stored: LedgerState,
        history: Vec<Transaction>,
        gateway: Arc<dyn PersistenceGateway>,
    ) -> PurseResult<Self> {
        let allocation = match history.iter().rposition(|t| t.is_reset()) {
            Some(index) => history[index].allocation.clone().ok_or_else(|| {
                PurseError::Persistence(format!(
                    "reset marker #{} carries no allocation",
                    index + 1
                ))
            })?,
            None => stored.allocation(),
        };

        if let Some(entry) = allocation.entries.iter().find(|e| e.amount.is_negative()) {
            return Err(PurseError::Persistence(format!(
                "stored allocation for '{}' is negative ({})",
                entry.category, entry.amount
            )));
        }

        let spent = spent_since_last_reset(&history).map_err(PurseError::Persistence)?;
        let state = replay(&allocation, &spent).map_err(PurseError::Persistence)?;

        let state_dirty = state != stored;
        if state_dirty {
            warn!(
                stored_remaining = stored.total_remaining().units(),
                replayed_remaining = state.total_remaining().units(),
                "stored budget disagrees with transaction log; using the log"
            );
        }

        debug!(
            transactions = history.len(),
            categories = allocation.entries.len(),
            "ledger restored from store"
        );

        Ok(Self {
            allocation,
            references: collect_references(&history),
            state,
            history,
            gateway,
            pending: Vec::new(),
            state_dirty,
        })
    }

    /// Deduct `amount` from `category` if the balance allows it
    ///
    /// Over-drawing is not an error: a rejected transaction is recorded and
    /// returned, and the balance is left alone.
    pub fn apply_payment(&mut self, category: &str, amount: Money) -> PurseResult<Transaction> {
        self.decide(category, amount, None)
    }

    /// Apply a payment confirmed by the external gateway
    ///
    /// Validated exactly like [`Ledger::apply_payment`]; a reference that was
    /// already recorded fails with `DuplicatePayment` and records nothing.
    pub fn apply_confirmed(&mut self, event: PaymentConfirmed) -> PurseResult<Transaction> {
        if self.references.contains(&event.reference) {
            warn!(
                reference = %event.reference,
                category = %event.category,
                amount = event.amount.units(),
                "duplicate payment confirmation refused"
            );
            return Err(PurseError::DuplicatePayment(event.reference.to_string()));
        }

        self.decide(&event.category, event.amount, Some(event.reference))
    }

    /// Replace the whole ledger with a freshly funded allocation
    ///
    /// Logs a `*`/"reset" marker carrying the new allocation, then replaces
    /// the stored state in one atomic write; none of the old balances
    /// survive. If only the marker lands, restore still funds from it.
    pub fn reset(&mut self, new_allocation: BudgetAllocation) -> PurseResult<Transaction> {
        let marker = Transaction::reset_marker(&new_allocation);

        self.state = new_allocation.initial_state();
        self.allocation = new_allocation;
        self.state_dirty = true;
        self.record(marker.clone());

        info!(
            income = self.allocation.income.units(),
            total = self.allocation.total().units(),
            drift = self.allocation.rounding_drift(),
            "ledger reset"
        );

        self.flush()?;
        Ok(marker)
    }

    /// Copy of the current balances
    pub fn snapshot(&self) -> LedgerState {
        self.state.clone()
    }

    pub fn allocation(&self) -> &BudgetAllocation {
        &self.allocation
    }

    /// Every transaction, oldest first
    pub fn history(&self) -> &[Transaction] {
        &self.history
    }

    /// Lifecycle position of a category
    pub fn status(&self, category: &str) -> Option<CategoryStatus> {
        let balance = self.state.balances.iter().find(|b| b.category == category)?;
        Some(CategoryStatus::from_balances(
            balance.allocated.units(),
            balance.remaining.units(),
        ))
    }

    /// Allocation, balance and spending of every category
    pub fn summaries(&self) -> Vec<CategorySummary> {
        self.state
            .balances
            .iter()
            .map(|b| CategorySummary::new(b.category.clone(), b.allocated, b.remaining))
            .collect()
    }

    /// Whether some outcome has not reached the store yet
    pub fn has_unsynced(&self) -> bool {
        self.state_dirty || !self.pending.is_empty()
    }

    /// Write every queued transaction, then the state if it changed
    pub fn flush(&mut self) -> PurseResult<()> {
        while let Some(next) = self.pending.first() {
            self.gateway.append_transaction(next).map_err(|e| {
                warn!(error = %e, queued = self.pending.len(), "transaction append failed");
                e
            })?;
            self.pending.remove(0);
        }

        if self.state_dirty {
            self.gateway.save_state(&self.state).map_err(|e| {
                warn!(error = %e, "budget state save failed");
                e
            })?;
            self.state_dirty = false;
        }

        Ok(())
    }

    /// Check the balance and replay invariants
    pub fn verify(&self) -> PurseResult<()> {
        let spent = spent_since_last_reset(&self.history).map_err(PurseError::Validation)?;
        let expected = replay(&self.allocation, &spent).map_err(PurseError::Validation)?;

        for balance in &self.state.balances {
            if balance.remaining.is_negative() || balance.remaining > balance.allocated {
                return Err(PurseError::Validation(format!(
                    "'{}' balance {} outside 0..={}",
                    balance.category, balance.remaining, balance.allocated
                )));
            }
        }

        if expected != self.state {
            return Err(PurseError::Validation(format!(
                "balances replay to {} remaining, ledger holds {}",
                expected.total_remaining(),
                self.state.total_remaining()
            )));
        }

        Ok(())
    }

    fn decide(
        &mut self,
        category: &str,
        amount: Money,
        reference: Option<PaymentReference>,
    ) -> PurseResult<Transaction> {
        let Some(remaining) = self.state.remaining_mut(category) else {
            warn!(category, amount = amount.units(), "payment to unknown category");
            return Err(PurseError::unknown_category(category));
        };

        if !amount.is_positive() {
            warn!(category, amount = amount.units(), "payment amount not positive");
            return Err(PurseError::invalid_amount(category, amount.units()));
        }

        let mut transaction = if *remaining >= amount {
            *remaining -= amount;
            self.state_dirty = true;
            info!(
                category,
                amount = amount.units(),
                remaining = remaining.units(),
                "payment accepted"
            );
            Transaction::accepted(category, amount)
        } else {
            info!(
                category,
                amount = amount.units(),
                remaining = remaining.units(),
                reason = crate::models::transaction::REASON_INSUFFICIENT,
                "payment rejected"
            );
            Transaction::rejected(category, amount)
        };

        if let Some(reference) = reference {
            debug!(reference = %reference, "payment reference recorded");
            self.references.insert(reference.clone());
            transaction = transaction.with_reference(reference);
        }

        self.record(transaction.clone());
        self.flush()?;
        Ok(transaction)
    }

    fn record(&mut self, transaction: Transaction) {
        self.pending.push(transaction.clone());
        self.history.push(transaction);
    }
}

/// Sum of accepted payments per category after the most recent reset marker
fn spent_since_last_reset(history: &[Transaction]) -> Result<HashMap<&str, Money>, String> {
    let start = history
        .iter()
        .rposition(|t| t.is_reset())
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut spent: HashMap<&str, Money> = HashMap::new();
    for txn in history[start..].iter().filter(|t| t.is_accepted_payment()) {
        let total = spent.entry(txn.category.as_str()).or_default();
        *total = total
            .checked_add(txn.amount)
            .ok_or_else(|| format!("payments against '{}' overflow", txn.category))?;
    }
    Ok(spent)
}

/// Balances of `allocation` after deducting `spent`
fn replay(
    allocation: &BudgetAllocation,
    spent: &HashMap<&str, Money>,
) -> Result<LedgerState, String> {
    if let Some(category) = spent.keys().find(|c| !allocation.contains(c)) {
        return Err(format!(
            "history has payments for '{}', which is not in the budget",
            category
        ));
    }

    let mut state = allocation.initial_state();
    for balance in &mut state.balances {
        let spent = spent.get(balance.category.as_str()).copied().unwrap_or_default();
        balance.remaining = balance
            .allocated
            .checked_sub(spent)
            .filter(|remaining| !remaining.is_negative())
            .ok_or_else(|| {
                format!(
                    "history spends {} from '{}', more than its allocation of {}",
                    spent, balance.category, balance.allocated
                )
            })?;
    }
    Ok(state)
}

fn collect_references(history: &[Transaction]) -> HashSet<PaymentReference> {
    history.iter().filter_map(|t| t.reference.clone()).collect()
}
