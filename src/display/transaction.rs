//! Transaction display formatting

use tabled::settings::{object::Columns, Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::{Transaction, TransactionStatus};

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

impl HistoryRow {
    fn new(txn: &Transaction, symbol: &str) -> Self {
        let status_icon = match txn.status {
            TransactionStatus::Accepted => "✓",
            TransactionStatus::Rejected => "✗",
        };

        Self {
            when: txn.timestamp.format("%Y-%m-%d %H:%M").to_string(),
            category: if txn.is_reset() {
                "(reset)".to_string()
            } else {
                txn.category.clone()
            },
            amount: txn.amount.format_with_symbol(symbol),
            status: format!("{} {}", status_icon, txn.status),
            reason: txn.reason.clone(),
        }
    }
}

/// Format transactions as a history table, oldest first
pub fn format_history(transactions: &[Transaction], symbol: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut table = Table::new(transactions.iter().map(|t| HistoryRow::new(t, symbol)));
    table
        .with(Style::psql())
        .modify(Columns::single(2), Alignment::right());

    format!("{}\n", table)
}

/// Format a one-line outcome for a payment attempt
pub fn format_payment_outcome(txn: &Transaction, symbol: &str) -> String {
    match txn.status {
        TransactionStatus::Accepted => format!(
            "Paid {} from {}",
            txn.amount.format_with_symbol(symbol),
            txn.category
        ),
        TransactionStatus::Rejected => format!(
            "Rejected {} from {}: {}",
            txn.amount.format_with_symbol(symbol),
            txn.category,
            txn.reason
        ),
    }
}
