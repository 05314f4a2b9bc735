//! Error policies deciding whether the fetch loop retries or stops.

use crate::config::MigratorConfig;
use crate::error::MigratorError;
use std::time::Duration;
use tracing::{error, warn};

/// What the fetch loop does after a failed query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorDisposition {
    /// Retry immediately without changing state
    Continue,
    /// Retry after the given pause, unless shutdown fires first
    ContinueAfter(Duration),
    /// Stop the loop and close the hand-off for good
    Terminate,
}

/// Called by the fetch loop with every error it encounters.
pub trait ErrorPolicy: Send {
    fn on_error(&mut self, error: &MigratorError) -> ErrorDisposition;
}

impl<F> ErrorPolicy for F
where
    F: FnMut(&MigratorError) -> ErrorDisposition + Send,
{
    fn on_error(&mut self, error: &MigratorError) -> ErrorDisposition {
        self(error)
    }
}

/// Terminates on critical errors and retries everything else after a
/// cooldown, the way a long-running node wires the migrator.
#[derive(Debug, Clone, Copy)]
pub struct CooldownErrorPolicy {
    cooldown: Duration,
}

impl CooldownErrorPolicy {
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown }
    }

    pub fn from_config(config: &MigratorConfig) -> Self {
        Self::new(config.query_cooldown_period())
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}

impl ErrorPolicy for CooldownErrorPolicy {
    fn on_error(&mut self, error: &MigratorError) -> ErrorDisposition {
        if error.is_critical() {
            error!(error = %error, "🚨 Critical migrator error, stopping fetch loop");
            return ErrorDisposition::Terminate;
        }

        warn!(
            error = %error,
            cooldown_ms = self.cooldown.as_millis() as u64,
            "⚠️ Migrator query failed, retrying after cooldown"
        );
        if self.cooldown.is_zero() {
            ErrorDisposition::Continue
        } else {
            ErrorDisposition::ContinueAfter(self.cooldown)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_policies() {
        let mut calls = 0;
        {
            let mut policy = |_: &MigratorError| {
                calls += 1;
                ErrorDisposition::Terminate
            };
            let err = MigratorError::query("next", "boom");
            assert_eq!(policy.on_error(&err), ErrorDisposition::Terminate);
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn cooldown_policy_terminates_on_critical() {
        let mut policy = CooldownErrorPolicy::new(Duration::from_secs(5));
        let critical = MigratorError::InconsistentState {
            migrated_at: 105,
            included_index: 5,
            available: 3,
        };
        assert_eq!(policy.on_error(&critical), ErrorDisposition::Terminate);
    }

    #[test]
    fn cooldown_policy_retries_soft_errors() {
        let mut policy = CooldownErrorPolicy::new(Duration::from_millis(250));
        let err = MigratorError::query("query_migrated_funds", "timeout");
        assert_eq!(
            policy.on_error(&err),
            ErrorDisposition::ContinueAfter(Duration::from_millis(250))
        );

        let mut immediate = CooldownErrorPolicy::new(Duration::ZERO);
        assert_eq!(immediate.on_error(&err), ErrorDisposition::Continue);
    }
}
