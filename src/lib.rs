#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Migrator Core
//!
//! Turns migrated funds finalized on a legacy ledger into receipts for the
//! successor ledger's milestones, with crash-safe progress tracking.
//!
//! ## Overview
//!
//! A fetch loop discovers newly finalized migrations through a
//! [`MigratedFundsQuerier`], splits them into receipt-sized batches and hands
//! them over one at a time. The caller pulls receipts without blocking and
//! confirms each one by persisting the checkpoint, so a restarted process
//! resumes exactly where it stopped.
//!
//! ## Module Organization
//!
//! - [`migrator`] - the service, its fetch loop, hand-off and error policies
//! - [`state`] - the checkpoint and its file store
//! - [`querier`] - the legacy-ledger query capability
//! - [`events`] - soft-error and funds-fetched notifications
//! - [`models`] - receipts and migrated funds entries
//! - [`config`] - layered configuration
//! - [`error`] - structured error handling
//! - [`logging`] - structured logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use migrator_core::{CooldownErrorPolicy, MigratedFundsQuerier, MigratorConfig, MigratorService};
//! use std::sync::Arc;
//!
//! # async fn example<Q: MigratedFundsQuerier + 'static>(querier: Q) -> Result<(), Box<dyn std::error::Error>> {
//! let config = MigratorConfig::load(None)?;
//! let service = Arc::new(MigratorService::from_config(querier, &config)?);
//! service.init_state(None)?;
//!
//! let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
//! let fetch_loop = service.spawn(
//!     async move {
//!         let _ = stop_rx.await;
//!     },
//!     CooldownErrorPolicy::from_config(&config),
//! );
//!
//! if let Some(receipt) = service.receipt() {
//!     // send the receipt, then confirm it
//!     println!("receipt for milestone {} ({} entries)", receipt.migrated_at, receipt.len());
//!     service.persist_state(false)?;
//! }
//!
//! let _ = stop_tx.send(());
//! fetch_loop.await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod migrator;
pub mod models;
pub mod querier;
pub mod state;

pub use config::MigratorConfig;
pub use constants::{MAX_MIGRATED_FUNDS_ENTRY_COUNT, SENSIBLE_MAX_ENTRIES_COUNT};
pub use error::{MigratorError, MigratorResult};
pub use events::ServiceEvents;
pub use migrator::{CooldownErrorPolicy, ErrorDisposition, ErrorPolicy, MigratorService};
pub use models::{FetchedFunds, MigratedFundsEntry, MilestoneIndex, Receipt};
pub use querier::MigratedFundsQuerier;
pub use state::{MigratorState, StateStore};
