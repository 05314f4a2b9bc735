//! # Migration Data Model
//!
//! Value types exchanged between the legacy-ledger querier, the migrator
//! service and its callers.

pub mod migrated_funds;
pub mod receipt;

pub use migrated_funds::{FetchedFunds, MigratedFundsEntry};
pub use receipt::Receipt;

/// Index of a milestone in either ledger. Zero means "uninitialized".
pub type MilestoneIndex = u32;
