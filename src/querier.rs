//! # Legacy-Ledger Querier
//!
//! The capability the migrator consumes to discover finalized migrations.
//! Implementations talk to a legacy node; the migrator only relies on the
//! contract below and never calls a querier concurrently.

use crate::error::MigratorResult;
use crate::models::{MigratedFundsEntry, MilestoneIndex};
use async_trait::async_trait;
use std::sync::Arc;

/// Queries migrated funds confirmed by legacy milestones.
#[async_trait]
pub trait MigratedFundsQuerier: Send + Sync {
    /// Funds finalized at exactly `milestone_index`, in ledger order.
    async fn query_migrated_funds(
        &self,
        milestone_index: MilestoneIndex,
    ) -> MigratorResult<Vec<MigratedFundsEntry>>;

    /// The next milestone at or after `milestone_index` that has funds,
    /// together with those funds.
    async fn query_next_migrated_funds(
        &self,
        milestone_index: MilestoneIndex,
    ) -> MigratorResult<(MilestoneIndex, Vec<MigratedFundsEntry>)>;
}

#[async_trait]
impl<T: MigratedFundsQuerier + ?Sized> MigratedFundsQuerier for Arc<T> {
    async fn query_migrated_funds(
        &self,
        milestone_index: MilestoneIndex,
    ) -> MigratorResult<Vec<MigratedFundsEntry>> {
        (**self).query_migrated_funds(milestone_index).await
    }

    async fn query_next_migrated_funds(
        &self,
        milestone_index: MilestoneIndex,
    ) -> MigratorResult<(MilestoneIndex, Vec<MigratedFundsEntry>)> {
        (**self).query_next_migrated_funds(milestone_index).await
    }
}
