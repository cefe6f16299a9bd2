//! Budget display formatting
//!
//! Tables for a fresh allocation and for the live per-category status.

use tabled::settings::{object::Columns, Alignment, Style};
use tabled::{Table, Tabled};

use crate::models::{BudgetAllocation, CategorySummary};

#[derive(Tabled)]
struct AllocationRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Allocated")]
    allocated: String,
}

#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Allocated")]
    allocated: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Format an allocation as a two-column table with an income footer
pub fn format_allocation(allocation: &BudgetAllocation, symbol: &str) -> String {
    let rows = allocation.entries.iter().map(|e| AllocationRow {
        category: e.category.clone(),
        allocated: e.amount.format_with_symbol(symbol),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .modify(Columns::single(1), Alignment::right());

    let mut output = format!("{}\n", table);
    output.push_str(&format!(
        "Income: {}  Allocated: {}",
        allocation.income.format_with_symbol(symbol),
        allocation.total().format_with_symbol(symbol)
    ));

    let drift = allocation.rounding_drift();
    if drift != 0 {
        output.push_str(&format!("  (rounding {:+})", drift));
    }
    output.push('\n');

    output
}

/// Format the live status of every category
pub fn format_status(summaries: &[CategorySummary], symbol: &str) -> String {
    if summaries.is_empty() {
        return "No budget yet. Run 'purse income <amount>' first.\n".to_string();
    }

    let rows = summaries.iter().map(|s| StatusRow {
        category: s.category.clone(),
        allocated: s.allocated.format_with_symbol(symbol),
        spent: s.spent.format_with_symbol(symbol),
        remaining: s.remaining.format_with_symbol(symbol),
        status: s.status.to_string(),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::psql())
        .modify(Columns::new(1..4), Alignment::right());

    let remaining: crate::models::Money = summaries.iter().map(|s| s.remaining).sum();
    format!(
        "{}\nTotal remaining: {}\n",
        table,
        remaining.format_with_symbol(symbol)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{default_weights, Money};
    use crate::services::allocate;

    #[test]
    fn test_allocation_table_lists_categories() {
        let allocation = allocate(Money::from_units(10000), &default_weights()).unwrap();
        let output = format_allocation(&allocation, "₹");

        assert!(output.contains("Housing"));
        assert!(output.contains("₹3000"));
        assert!(output.contains("Income: ₹10000"));
        assert!(!output.contains("rounding"));
    }

    #[test]
    fn test_status_table() {
        let summaries = vec![
            CategorySummary::new("Food", Money::from_units(2000), Money::from_units(1500)),
            CategorySummary::new("Savings", Money::from_units(1500), Money::zero()),
        ];
        let output = format_status(&summaries, "$");

        assert!(output.contains("Partially spent"));
        assert!(output.contains("Depleted"));
        assert!(output.contains("$500"));
        assert!(output.contains("Total remaining: $1500"));
    }

    #[test]
    fn test_status_without_budget() {
        assert!(format_status(&[], "$").contains("No budget yet"));
    }
}
