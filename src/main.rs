use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use purse::cli::{
    handle_buy, handle_confirm, handle_history, handle_income, handle_pay, handle_reset,
    handle_status, handle_stocks,
};
use purse::config::{logging, paths::PursePaths, settings::Settings};
use purse::services::Session;
use purse::storage::JsonStore;

#[derive(Parser)]
#[command(
    name = "purse",
    version,
    about = "Split a monthly income into category budgets and track spending",
    long_about = "Purse divides a monthly income across weighted spending categories, \
                  refuses payments a category cannot cover, and keeps an append-only \
                  log of every payment attempt."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Set the monthly income and create the budget
    Income {
        /// Income in whole currency units (e.g., "10000" or "10,000")
        amount: String,
    },

    /// Pay an amount from a category
    Pay {
        /// Category name
        category: String,
        /// Amount in whole currency units
        amount: String,
    },

    /// Apply a payment confirmed by the payment gateway
    Confirm {
        /// Gateway reference; a reference is only ever applied once
        reference: String,
        /// Category name
        category: String,
        /// Amount in whole currency units
        amount: String,
    },

    /// Record a stock purchase
    Buy {
        /// Stock name or ticker
        name: String,
        /// Price per share
        price: String,
        /// Number of shares
        quantity: String,
    },

    /// Re-fund every category from a new income
    Reset {
        /// Income in whole currency units
        income: String,
    },

    /// Show allocated, spent and remaining per category
    Status,

    /// Show the transaction log
    #[command(alias = "log")]
    History {
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// List stock purchases
    Stocks,

    /// Create the data directory and default settings
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = PursePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let Some(command) = cli.command else {
        println!("Purse - budget allocation and transaction ledger");
        println!();
        println!("Run 'purse --help' for usage information.");
        println!("Run 'purse income <amount>' to create a budget.");
        return Ok(());
    };

    match command {
        Commands::Init => {
            println!("Initializing Purse at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Categories:");
            for weight in &settings.categories {
                let closed = if weight.payable { "" } else { ", no payments" };
                println!("  - {} ({}%{})", weight.name, weight.weight, closed);
            }
            println!();
            println!("Edit {} to change them.", paths.settings_file().display());
            return Ok(());
        }
        Commands::Config => {
            println!("Purse Configuration");
            println!("===================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Categories:");
            for weight in &settings.categories {
                let closed = if weight.payable { "" } else { "  no payments" };
                println!("    {:<16} {:>3}%{}", weight.name, weight.weight, closed);
            }
            return Ok(());
        }
        _ => {}
    }

    let store = Arc::new(JsonStore::new(&paths)?);
    let session = Session::open(store, settings.categories.clone())?;

    match command {
        Commands::Income { amount } => handle_income(&session, &settings, &amount)?,
        Commands::Pay { category, amount } => {
            handle_pay(&session, &settings, &category, &amount)?
        }
        Commands::Confirm {
            reference,
            category,
            amount,
        } => handle_confirm(&session, &settings, &reference, &category, &amount)?,
        Commands::Buy {
            name,
            price,
            quantity,
        } => handle_buy(&session, &settings, &name, &price, &quantity)?,
        Commands::Reset { income } => handle_reset(&session, &settings, &income)?,
        Commands::Status => handle_status(&session, &settings)?,
        Commands::History { limit } => handle_history(&session, &settings, limit)?,
        Commands::Stocks => handle_stocks(&session, &settings)?,
        Commands::Init | Commands::Config => {}
    }

    Ok(())
}
