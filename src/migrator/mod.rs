//! # Migrator
//!
//! Bridges legacy-ledger migrations into successor-ledger receipts.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   query    ┌────────────┐  put (blocks)  ┌─────────┐  try_take  ┌──────────┐
//! │ legacy node  │◀───────────│ fetch loop │───────────────▶│ handoff │◀───────────│ receipt()│
//! └──────────────┘            └────────────┘                └─────────┘            └──────────┘
//!                                   │ events                                             │ lock
//!                                   ▼                                                    ▼
//!                            soft_error / funds_fetched                           checkpoint state
//! ```
//!
//! - [`service`] - [`MigratorService`], the public surface
//! - [`handoff`] - one-slot rendezvous between producer and consumer
//! - [`batching`] - splitting fetched funds into receipt-sized batches
//! - [`policy`] - retry/terminate decisions for fetch errors

pub mod batching;
pub mod handoff;
pub mod policy;
pub mod service;

pub use batching::{split_into_batches, MigrationBatch};
pub use handoff::{Handoff, HandoffError};
pub use policy::{CooldownErrorPolicy, ErrorDisposition, ErrorPolicy};
pub use service::MigratorService;
