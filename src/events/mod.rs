//! # Service Events
//!
//! Observer hooks raised by the migrator's fetch loop so the host process can
//! log or record metrics.
//!
//! Handlers run synchronously on the fetch loop's task, outside of any
//! service lock. They must return quickly and must not call back into
//! `receipt()` or `persist_state()`.
//!
//! ## Usage
//!
//! ```rust
//! use migrator_core::events::ServiceEvents;
//!
//! let events = ServiceEvents::new();
//! events.soft_error.hook(|err| tracing::warn!(error = %err, "migrator soft error"));
//! events.migrated_funds_fetched.hook(|fetched| {
//!     tracing::info!(milestone_index = fetched.milestone_index, entries = fetched.len(), "fetched");
//! });
//! ```

pub mod event;

pub use event::{Event, EventStats, HandlerId};

use crate::error::MigratorError;
use crate::models::FetchedFunds;

/// Events happening around a migrator service
#[derive(Debug)]
pub struct ServiceEvents {
    /// Triggered when a soft error is encountered
    pub soft_error: Event<MigratorError>,
    /// Triggered when new migrated funds were fetched from the legacy ledger,
    /// before they are split into receipt-sized batches
    pub migrated_funds_fetched: Event<FetchedFunds>,
}

impl ServiceEvents {
    pub fn new() -> Self {
        Self {
            soft_error: Event::new("soft_error"),
            migrated_funds_fetched: Event::new("migrated_funds_fetched"),
        }
    }

    pub fn stats(&self) -> Vec<EventStats> {
        vec![self.soft_error.stats(), self.migrated_funds_fetched.stats()]
    }
}

impl Default for ServiceEvents {
    fn default() -> Self {
        Self::new()
    }
}
