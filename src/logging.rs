//! # Logging
//!
//! Installs the `tracing` subscriber used by the migrator and its tooling.
//!
//! - `RUST_LOG` sets the filter; without it the level follows `MIGRATOR_ENV`
//!   (`production` logs at `info`, anything else at `debug`).
//! - `MIGRATOR_LOG_FORMAT=json` switches to JSON lines.
//!
//! Output goes to stderr so tools can keep stdout for their own results.

use crate::state::MigratorState;
use chrono::Utc;
use std::path::Path;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGING: OnceLock<LogFormat> = OnceLock::new();

/// Output format of the installed subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("MIGRATOR_LOG_FORMAT") {
            Ok(format) if format.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Pretty,
        }
    }
}

/// Installs the global subscriber once; later calls are no-ops.
///
/// A subscriber installed by the host process takes precedence.
pub fn init_structured_logging() -> LogFormat {
    *LOGGING.get_or_init(|| {
        let environment = environment();
        let format = LogFormat::from_env();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level(&environment)));

        let base = fmt::layer().with_writer(std::io::stderr).with_target(true);
        let layer = match format {
            LogFormat::Json => base.with_ansi(false).json().with_filter(filter).boxed(),
            LogFormat::Pretty => base.with_thread_ids(true).with_filter(filter).boxed(),
        };

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("tracing subscriber already installed, keeping it");
        }

        tracing::info!(
            pid = std::process::id(),
            environment = %environment,
            format = ?format,
            "🔧 Migrator logging initialized"
        );
        format
    })
}

fn environment() -> String {
    std::env::var("MIGRATOR_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_owned())
}

fn default_level(environment: &str) -> &'static str {
    if environment == "production" {
        "info"
    } else {
        "debug"
    }
}

/// Records an operation on a checkpoint file.
pub fn log_state_operation(operation: &str, path: &Path, state: Option<&MigratorState>, status: &str) {
    tracing::info!(
        operation,
        path = %path.display(),
        latest_migrated_at_index = state.map(|s| s.latest_migrated_at_index),
        latest_included_index = state.map(|s| s.latest_included_index),
        sending_receipt = state.map(|s| s.sending_receipt),
        status,
        at = %Utc::now().to_rfc3339(),
        "💾 Checkpoint {operation}: {status}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_logs_at_info() {
        assert_eq!(default_level("production"), "info");
        assert_eq!(default_level("development"), "debug");
        assert_eq!(default_level("test"), "debug");
    }

    #[test]
    fn repeated_init_keeps_first_format() {
        let first = init_structured_logging();
        assert_eq!(init_structured_logging(), first);
    }
}
