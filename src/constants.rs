//! # System Constants
//!
//! Operational boundaries of the migrator: receipt sizing, checkpoint file
//! naming and the defaults used when no configuration overrides them.

use std::time::Duration;

/// Upper bound on migrated funds entries a single receipt may carry.
pub const MAX_MIGRATED_FUNDS_ENTRY_COUNT: usize = 128;

/// Amount of entries per receipt which allows a milestone with 8 parents and
/// 2 signatures/public keys to stay below the next proof-of-work step.
pub const SENSIBLE_MAX_ENTRIES_COUNT: usize = 110;

/// Suffix appended to the checkpoint path for the rotated backup.
pub const STATE_FILE_BACKUP_SUFFIX: &str = "_old";

/// File mode for checkpoint files (owner and group read/write).
pub const STATE_FILE_PERMISSIONS: u32 = 0o660;

/// Default checkpoint location, relative to the working directory.
pub const DEFAULT_STATE_FILE_PATH: &str = "migrator.state";

/// Default pause before re-querying the legacy ledger after a soft error.
pub const DEFAULT_QUERY_COOLDOWN_PERIOD: Duration = Duration::from_secs(5);

/// Environment variable prefix for configuration overrides.
pub const CONFIG_ENV_PREFIX: &str = "MIGRATOR";
