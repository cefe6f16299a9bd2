//! Path management for Purse
//!
//! ## Path Resolution Order
//!
//! 1. `PURSE_DATA_DIR` environment variable (if set)
//! 2. The platform config directory for `purse` (e.g. `~/.config/purse` on
//!    Linux, `%APPDATA%\purse\config` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::PurseError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "PURSE_DATA_DIR";

/// Manages all paths used by Purse
#[derive(Debug, Clone)]
pub struct PursePaths {
    /// Base directory for all Purse data
    base_dir: PathBuf,
}

impl PursePaths {
    /// Resolve the base directory from the environment or the platform
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, PurseError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create PursePaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the store collections
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to budget.json (remaining balance per category)
    pub fn budget_file(&self) -> PathBuf {
        self.data_dir().join("budget.json")
    }

    /// Get the path to transactions.jsonl
    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.jsonl")
    }

    /// Get the path to stocks.jsonl
    pub fn stocks_file(&self) -> PathBuf {
        self.data_dir().join("stocks.jsonl")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), PurseError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PurseError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| PurseError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, PurseError> {
    ProjectDirs::from("", "", "purse")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| PurseError::Config("Could not determine a home directory".into()))
}
