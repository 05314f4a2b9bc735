use super::{MigratedFundsEntry, MilestoneIndex};
use serde::{Deserialize, Serialize};

/// Receipt of migrated funds, ready for inclusion in a milestone.
///
/// Each receipt only contains funds finalized by one legacy milestone.
/// `is_final` is set on the last receipt of that milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub migrated_at: MilestoneIndex,
    #[serde(rename = "final")]
    pub is_final: bool,
    pub funds: Vec<MigratedFundsEntry>,
}

impl Receipt {
    /// Builds a receipt, or `None` when there are no funds.
    ///
    /// An empty receipt is never created.
    pub fn new(
        migrated_at: MilestoneIndex,
        is_final: bool,
        funds: Vec<MigratedFundsEntry>,
    ) -> Option<Self> {
        if funds.is_empty() {
            return None;
        }

        Some(Self {
            migrated_at,
            is_final,
            funds,
        })
    }

    pub fn len(&self) -> usize {
        self.funds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funds.is_empty()
    }
}
