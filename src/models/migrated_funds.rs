use super::MilestoneIndex;
use serde::{Deserialize, Serialize};

/// A unit of value carried over from the legacy ledger.
///
/// The migrator never looks inside an entry; it only counts and slices them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigratedFundsEntry {
    /// Tail transaction hash of the legacy bundle that burned the funds
    pub tail_transaction_hash: String,
    /// Target address on the successor ledger
    pub address: String,
    /// Migrated amount
    pub deposit: u64,
}

/// Funds finalized by a single legacy milestone, as returned by one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedFunds {
    pub milestone_index: MilestoneIndex,
    pub funds: Vec<MigratedFundsEntry>,
}

impl FetchedFunds {
    pub fn new(milestone_index: MilestoneIndex, funds: Vec<MigratedFundsEntry>) -> Self {
        Self {
            milestone_index,
            funds,
        }
    }

    pub fn len(&self) -> usize {
        self.funds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }
}
