//! Splitting fetched funds into receipt-sized batches.

use crate::models::{FetchedFunds, MigratedFundsEntry, MilestoneIndex, Receipt};

/// A batch handed from the fetch loop to the receipt consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationBatch {
    /// Legacy milestone the funds were finalized at
    pub milestone_index: MilestoneIndex,
    /// Whether no further batch follows for this milestone
    pub last_batch: bool,
    pub funds: Vec<MigratedFundsEntry>,
}

impl MigrationBatch {
    pub fn len(&self) -> usize {
        self.funds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }

    /// Converts the batch into a receipt; empty batches yield `None`.
    pub fn into_receipt(self) -> Option<Receipt> {
        Receipt::new(self.milestone_index, self.last_batch, self.funds)
    }
}

/// Splits `fetched` into batches of at most `max_entries`, keeping order.
///
/// Only the last batch is flagged as the last one. A fetch without funds
/// still yields one empty last batch so the consumer's checkpoint moves to
/// that milestone.
///
/// # Panics
///
/// Panics if `max_entries` is zero.
pub fn split_into_batches(fetched: FetchedFunds, max_entries: usize) -> Vec<MigrationBatch> {
    assert!(max_entries > 0, "receipt max entries must be positive");

    let FetchedFunds {
        milestone_index,
        mut funds,
    } = fetched;

    if funds.is_empty() {
        return vec![MigrationBatch {
            milestone_index,
            last_batch: true,
            funds,
        }];
    }

    let mut batches = Vec::with_capacity(funds.len().div_ceil(max_entries));
    while !funds.is_empty() {
        let rest = if funds.len() > max_entries {
            funds.split_off(max_entries)
        } else {
            Vec::new()
        };
        batches.push(MigrationBatch {
            milestone_index,
            last_batch: rest.is_empty(),
            funds: std::mem::replace(&mut funds, rest),
        });
    }
    batches
}
