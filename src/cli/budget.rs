//! Budget CLI commands
//!
//! Setting the income, re-funding with a reset, and showing the live status.

use crate::config::settings::Settings;
use crate::display::{format_allocation, format_status};
use crate::error::PurseResult;
use crate::services::Session;

use super::parse_amount;

/// Handle `purse income <amount>`
pub fn handle_income(session: &Session, settings: &Settings, amount: &str) -> PurseResult<()> {
    let income = parse_amount(amount, &settings.currency_symbol)?;
    let existed = session.has_budget()?;

    let allocation = session.set_income(income)?;

    if existed {
        println!("A budget already exists; it was left unchanged.");
        println!("Run 'purse reset <income>' to re-fund every category.");
        println!();
    } else {
        println!("Budget created.");
        println!();
    }
    print!("{}", format_allocation(&allocation, &settings.currency_symbol));

    Ok(())
}

/// Handle `purse reset <income>`
pub fn handle_reset(session: &Session, settings: &Settings, amount: &str) -> PurseResult<()> {
    let income = parse_amount(amount, &settings.currency_symbol)?;
    let allocation = session.reset(income)?;

    println!("Budget reset. Every category is fully funded again.");
    println!();
    print!("{}", format_allocation(&allocation, &settings.currency_symbol));

    Ok(())
}

/// Handle `purse status`
pub fn handle_status(session: &Session, settings: &Settings) -> PurseResult<()> {
    let summaries = session.summaries()?;
    print!("{}", format_status(&summaries, &settings.currency_symbol));
    Ok(())
}
