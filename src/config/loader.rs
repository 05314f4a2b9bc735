//! Configuration loading through the `config` crate.

use super::MigratorConfig;
use crate::constants::CONFIG_ENV_PREFIX;
use crate::error::MigratorResult;
use config::{Config, Environment, File};
use std::path::Path;
use tracing::debug;

impl MigratorConfig {
    /// Loads defaults, then `config_file` (if given), then environment
    /// overrides such as `MIGRATOR_RECEIPT_MAX_ENTRIES`, and validates.
    pub fn load(config_file: Option<&Path>) -> MigratorResult<Self> {
        Self::load_with_environment(config_file, Environment::with_prefix(CONFIG_ENV_PREFIX))
    }

    fn load_with_environment(
        config_file: Option<&Path>,
        environment: Environment,
    ) -> MigratorResult<Self> {
        let defaults = MigratorConfig::default();

        let mut builder = Config::builder()
            .set_default(
                "state_file_path",
                defaults.state_file_path.to_string_lossy().into_owned(),
            )?
            .set_default("receipt_max_entries", defaults.receipt_max_entries as u64)?
            .set_default("query_cooldown_period_ms", defaults.query_cooldown_period_ms)?;

        if let Some(path) = config_file {
            debug!(path = %path.display(), "Loading migrator configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }

        let config: MigratorConfig = builder
            .add_source(environment.try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;

        debug!(
            state_file_path = %config.state_file_path.display(),
            receipt_max_entries = config.receipt_max_entries,
            query_cooldown_period_ms = config.query_cooldown_period_ms,
            "Migrator configuration loaded"
        );
        Ok(config)
    }
}
