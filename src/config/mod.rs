//! # Migrator Configuration
//!
//! Layered configuration for the migrator service: built-in defaults, an
//! optional TOML file and `MIGRATOR_*` environment variables, in increasing
//! precedence.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use migrator_core::config::MigratorConfig;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MigratorConfig::load(Some(Path::new("config/migrator.toml")))?;
//! println!("state file: {}", config.state_file_path.display());
//! # Ok(())
//! # }
//! ```

pub mod loader;

use crate::constants::{
    DEFAULT_QUERY_COOLDOWN_PERIOD, DEFAULT_STATE_FILE_PATH, MAX_MIGRATED_FUNDS_ENTRY_COUNT,
    SENSIBLE_MAX_ENTRIES_COUNT,
};
use crate::error::{MigratorError, MigratorResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Settings of the migrator service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct MigratorConfig {
    /// Path of the checkpoint file
    pub state_file_path: PathBuf,
    /// Maximum number of migrated funds entries per receipt
    pub receipt_max_entries: usize,
    /// Pause before re-querying the legacy ledger after a soft error
    pub query_cooldown_period_ms: u64,
}

impl Default for MigratorConfig {
    fn default() -> Self {
        Self {
            state_file_path: PathBuf::from(DEFAULT_STATE_FILE_PATH),
            receipt_max_entries: SENSIBLE_MAX_ENTRIES_COUNT,
            query_cooldown_period_ms: DEFAULT_QUERY_COOLDOWN_PERIOD.as_millis() as u64,
        }
    }
}

impl MigratorConfig {
    pub fn query_cooldown_period(&self) -> Duration {
        Duration::from_millis(self.query_cooldown_period_ms)
    }

    pub fn validate(&self) -> MigratorResult<()> {
        if self.state_file_path.as_os_str().is_empty() {
            return Err(MigratorError::configuration("state_file_path must not be empty"));
        }

        if self.receipt_max_entries == 0 || self.receipt_max_entries > MAX_MIGRATED_FUNDS_ENTRY_COUNT {
            return Err(MigratorError::configuration(format!(
                "receipt_max_entries must be within 1..={MAX_MIGRATED_FUNDS_ENTRY_COUNT}, got {}",
                self.receipt_max_entries
            )));
        }

        Ok(())
    }
}
