//! # Migrator Error Types
//!
//! Structured error handling for the migrator using thiserror instead of
//! `Box<dyn Error>` patterns.

use crate::models::MilestoneIndex;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the migrator service and its collaborators
#[derive(Error, Debug)]
pub enum MigratorError {
    #[error("migrator state file already exists: {}", path.display())]
    StateFileAlreadyExists { path: PathBuf },

    #[error("migrator state file not found: {}", path.display())]
    StateFileNotFound { path: PathBuf },

    #[error("invalid migrator state: {reason}")]
    InvalidState { reason: String },

    #[error(
        "critical: invalid migrator state: state at index {included_index} but only {available} migrations at milestone {migrated_at}"
    )]
    InconsistentState {
        migrated_at: MilestoneIndex,
        included_index: u32,
        available: usize,
    },

    #[error(
        "critical: legacy ledger returned milestone {returned} when asked for migrations at or after {requested}"
    )]
    QuerierRegression {
        requested: MilestoneIndex,
        returned: MilestoneIndex,
    },

    #[error("failed to query migrated funds: {operation}: {message}")]
    Query { operation: String, message: String },

    #[error("failed to load state file {}: {message}", path.display())]
    StateLoad { path: PathBuf, message: String },

    #[error("state file {operation} failed for {}: {source}", path.display())]
    StateIo {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl MigratorError {
    /// Create an invalid state error
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    /// Create a query error for the given querier operation
    pub fn query(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Query {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a state file I/O error
    pub fn state_io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StateIo {
            operation,
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Whether the error means the checkpoint and the legacy ledger diverged.
    ///
    /// Critical errors must halt forward progress; retrying cannot fix them.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            Self::InconsistentState { .. } | Self::QuerierRegression { .. }
        )
    }

    /// Whether the error came from the legacy-ledger querier
    pub fn is_query_error(&self) -> bool {
        matches!(self, Self::Query { .. })
    }
}

impl From<config::ConfigError> for MigratorError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

pub type MigratorResult<T> = std::result::Result<T, MigratorError>;
