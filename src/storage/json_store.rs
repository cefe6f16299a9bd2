//! File-backed persistence gateway
//!
//! Layout under the data directory:
//!
//! - `budget.json`: allocated and remaining amount per category, replaced
//!   atomically on every save
//! - `transactions.jsonl`: one transaction per line, append-only
//! - `stocks.jsonl`: one stock purchase per line, append-only

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::paths::PursePaths;
use crate::error::{PurseError, PurseResult};
use crate::models::{CategoryBalance, LedgerState, Money, StockHolding, Transaction};

use super::file_io::{append_json_line, read_json, read_json_lines, write_json_atomic};
use super::PersistenceGateway;

/// Version 2 added the allocated amount to every budget row
const BUDGET_SCHEMA_VERSION: u32 = 2;

/// On-disk shape of `budget.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BudgetDocument {
    #[serde(default = "default_schema_version")]
    schema_version: u32,
    income: Money,
    budget: Vec<CategoryBalance>,
}

fn default_schema_version() -> u32 {
    BUDGET_SCHEMA_VERSION
}

/// Persistence gateway storing each collection in its own file
#[derive(Debug, Clone)]
pub struct JsonStore {
    budget_path: PathBuf,
    transactions_path: PathBuf,
    stocks_path: PathBuf,
}

impl JsonStore {
    /// Create a store over the standard data files
    pub fn new(paths: &PursePaths) -> PurseResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            budget_path: paths.budget_file(),
            transactions_path: paths.transactions_file(),
            stocks_path: paths.stocks_file(),
        })
    }

    pub fn budget_path(&self) -> &PathBuf {
        &self.budget_path
    }

    pub fn transactions_path(&self) -> &PathBuf {
        &self.transactions_path
    }

    pub fn stocks_path(&self) -> &PathBuf {
        &self.stocks_path
    }
}

impl PersistenceGateway for JsonStore {
    fn load_state(&self) -> PurseResult<Option<LedgerState>> {
        let document: Option<BudgetDocument> = read_json(&self.budget_path)?;

        match document {
            Some(doc) if doc.schema_version > BUDGET_SCHEMA_VERSION => {
                Err(PurseError::Persistence(format!(
                    "{} has schema version {}, newer than supported {}",
                    self.budget_path.display(),
                    doc.schema_version,
                    BUDGET_SCHEMA_VERSION
                )))
            }
            Some(doc) => Ok(Some(LedgerState {
                income: doc.income,
                balances: doc.budget,
            })),
            None => Ok(None),
        }
    }

    fn load_transactions(&self) -> PurseResult<Vec<Transaction>> {
        read_json_lines(&self.transactions_path)
    }

    fn save_state(&self, state: &LedgerState) -> PurseResult<()> {
        let document = BudgetDocument {
            schema_version: BUDGET_SCHEMA_VERSION,
            income: state.income,
            budget: state.balances.clone(),
        };
        write_json_atomic(&self.budget_path, &document)?;
        debug!(path = %self.budget_path.display(), "budget state replaced");
        Ok(())
    }

    fn append_transaction(&self, transaction: &Transaction) -> PurseResult<()> {
        append_json_line(&self.transactions_path, transaction)
    }

    fn load_stocks(&self) -> PurseResult<Vec<StockHolding>> {
        let holdings: Vec<StockHolding> = read_json_lines(&self.stocks_path)?;
        for holding in &holdings {
            holding.validate().map_err(|e| {
                PurseError::Persistence(format!(
                    "Invalid stock row '{}' in {}: {}",
                    holding.name(),
                    self.stocks_path.display(),
                    e
                ))
            })?;
        }
        Ok(holdings)
    }

    fn append_stock(&self, holding: &StockHolding) -> PurseResult<()> {
        append_json_line(&self.stocks_path, holding)
    }
}
