//! Stock holding display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{SharePrice, StockHolding};

#[derive(Tabled)]
struct StockRow {
    #[tabled(rename = "Bought")]
    bought: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Cost")]
    cost: String,
}

/// Format stock purchases with a total-cost footer
pub fn format_stocks(stocks: &[StockHolding], symbol: &str) -> String {
    if stocks.is_empty() {
        return "No stock purchases recorded.\n".to_string();
    }

    let rows = stocks.iter().map(|s| StockRow {
        bought: s.timestamp().format("%Y-%m-%d").to_string(),
        name: s.name().to_string(),
        price: s.unit_price().format_with_symbol(symbol),
        quantity: s.quantity(),
        cost: s.total_cost().format_with_symbol(symbol),
    });

    let total = stocks
        .iter()
        .try_fold(SharePrice::zero(), |acc, s| acc.checked_add(s.total_cost()))
        .map(|t| t.format_with_symbol(symbol))
        .unwrap_or_else(|| "overflow".to_string());

    format!(
        "{}\nTotal invested: {}\n",
        Table::new(rows).with(Style::psql()),
        total
    )
}
