//! Purse - budget allocation and transaction ledger
//!
//! This library splits a monthly income across weighted spending categories,
//! keeps a guarded balance per category, and records every payment attempt in
//! an append-only transaction log.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `cli`: Command handlers for the `purse` binary
//! - `config`: Paths, settings and logging setup
//! - `error`: Custom error types
//! - `models`: Money, allocations, balances, transactions, stock holdings
//! - `storage`: Persistence gateway and its JSON file / in-memory backends
//! - `services`: Allocator, ledger and session controller
//! - `display`: Terminal table formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use purse::config::{PursePaths, Settings};
//! use purse::models::Money;
//! use purse::services::Session;
//! use purse::storage::JsonStore;
//!
//! let paths = PursePaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let store = Arc::new(JsonStore::new(&paths)?);
//! let session = Session::open(store, settings.categories.clone())?;
//! session.set_income(Money::from_units(10000))?;
//! session.pay("Food", Money::from_units(500))?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::PurseError;
