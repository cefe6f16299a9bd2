//! Stock CLI commands

use crate::config::settings::Settings;
use crate::display::format_stocks;
use crate::error::{PurseError, PurseResult};
use crate::services::Session;

use super::parse_price;

/// Handle `purse buy <name> <price> <quantity>`
pub fn handle_buy(
    session: &Session,
    settings: &Settings,
    name: &str,
    price: &str,
    quantity: &str,
) -> PurseResult<()> {
    let price = parse_price(price, &settings.currency_symbol)?;
    let quantity: u32 = quantity.trim().parse().map_err(|_| {
        PurseError::Validation(format!(
            "Invalid quantity '{}': expected a positive whole number",
            quantity
        ))
    })?;

    let holding = session.buy_stock(name, price, quantity)?;

    println!(
        "Bought {} x {} at {} (total {})",
        holding.quantity(),
        holding.name(),
        holding.unit_price().format_with_symbol(&settings.currency_symbol),
        holding.total_cost().format_with_symbol(&settings.currency_symbol)
    );

    Ok(())
}

/// Handle `purse stocks`
pub fn handle_stocks(session: &Session, settings: &Settings) -> PurseResult<()> {
    let stocks = session.stocks()?;
    print!("{}", format_stocks(&stocks, &settings.currency_symbol));
    Ok(())
}
