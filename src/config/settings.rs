//! User settings for Purse
//!
//! Holds the category weights income is split by and display preferences.
//! Every field has a default so older or hand-edited files keep loading.

use serde::{Deserialize, Serialize};

use super::paths::PursePaths;
use crate::error::PurseError;
use crate::models::{default_weights, CategoryWeight};
use crate::storage::file_io::{read_json, write_json_atomic};

/// User settings for Purse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Categories and their share of income, in display order
    #[serde(default = "default_weights")]
    pub categories: Vec<CategoryWeight>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₹".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            categories: default_weights(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &PursePaths) -> Result<Self, PurseError> {
        let settings: Option<Settings> = read_json(paths.settings_file()).map_err(|e| {
            PurseError::Config(format!("Failed to load settings file: {}", e))
        })?;

        // Don't save defaults yet - let caller decide when to persist
        Ok(settings.unwrap_or_default())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PursePaths) -> Result<(), PurseError> {
        paths.ensure_directories()?;

        write_json_atomic(paths.settings_file(), self)
            .map_err(|e| PurseError::Config(format!("Failed to write settings file: {}", e)))
    }
}
