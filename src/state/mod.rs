//! # Checkpoint State
//!
//! The migrator's only durable record: which legacy milestone is being
//! migrated, how many of its entries were already emitted, and whether a
//! receipt was in flight when the checkpoint was written.
//!
//! - [`MigratorState`] - the checkpoint itself and its validation rules
//! - [`StateStore`] - load, bootstrap checks and backup-rotating persistence

pub mod checkpoint;
pub mod store;

pub use checkpoint::MigratorState;
pub use store::StateStore;
