//! Payment CLI commands

use crate::config::settings::Settings;
use crate::display::{format_history, format_payment_outcome};
use crate::error::{PurseError, PurseResult};
use crate::models::{PaymentConfirmed, PaymentReference, Transaction};
use crate::services::Session;

use super::parse_amount;

/// Handle `purse pay <category> <amount>`
///
/// A payment larger than the remaining balance is reported, not failed.
pub fn handle_pay(
    session: &Session,
    settings: &Settings,
    category: &str,
    amount: &str,
) -> PurseResult<()> {
    let amount = parse_amount(amount, &settings.currency_symbol)?;
    let txn = session.pay(category, amount)?;
    print_outcome(session, settings, &txn)
}

/// Handle `purse confirm <reference> <category> <amount>`
pub fn handle_confirm(
    session: &Session,
    settings: &Settings,
    reference: &str,
    category: &str,
    amount: &str,
) -> PurseResult<()> {
    let reference = PaymentReference::new(reference)
        .map_err(|e| PurseError::Validation(e.to_string()))?;
    let amount = parse_amount(amount, &settings.currency_symbol)?;

    let txn = session.confirm_payment(PaymentConfirmed::new(reference, category, amount))?;
    print_outcome(session, settings, &txn)
}

/// Handle `purse history [--limit N]`, newest entries last
pub fn handle_history(session: &Session, settings: &Settings, limit: usize) -> PurseResult<()> {
    let transactions = session.transactions()?;
    let start = transactions.len().saturating_sub(limit);

    print!(
        "{}",
        format_history(&transactions[start..], &settings.currency_symbol)
    );
    if start > 0 {
        println!("({} older transactions not shown)", start);
    }

    Ok(())
}

fn print_outcome(session: &Session, settings: &Settings, txn: &Transaction) -> PurseResult<()> {
    println!("{}", format_payment_outcome(txn, &settings.currency_symbol));

    if let Some(remaining) = session
        .snapshot()?
        .and_then(|state| state.remaining(&txn.category))
    {
        println!(
            "Remaining in {}: {}",
            txn.category,
            remaining.format_with_symbol(&settings.currency_symbol)
        );
    }

    Ok(())
}
