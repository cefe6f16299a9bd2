//! Configuration module for Purse
//!
//! This module provides configuration management including:
//! - Platform path resolution with an environment override
//! - User settings persistence (category weights, currency symbol)
//! - Logging setup

pub mod logging;
pub mod paths;
pub mod settings;

pub use paths::PursePaths;
pub use settings::Settings;
