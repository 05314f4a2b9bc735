use migrator_core::{FetchedFunds, MigratedFundsEntry, MilestoneIndex};
use proptest::prelude::*;

/// Strategy for a single migrated funds entry
pub fn entry_strategy() -> impl Strategy<Value = MigratedFundsEntry> {
    ("[A-Z9]{81}", "[a-z0-9]{8,16}", 1u64..=2_779_530_283_277_761).prop_map(
        |(tail_transaction_hash, address, deposit)| MigratedFundsEntry {
            tail_transaction_hash,
            address,
            deposit,
        },
    )
}

pub fn milestone_index_strategy() -> impl Strategy<Value = MilestoneIndex> {
    1u32..10_000_000
}

/// Strategy for one milestone worth of fetched funds, possibly empty
pub fn fetched_funds_strategy() -> impl Strategy<Value = FetchedFunds> {
    (
        milestone_index_strategy(),
        prop::collection::vec(entry_strategy(), 0..400),
    )
        .prop_map(|(milestone_index, funds)| FetchedFunds::new(milestone_index, funds))
}

/// Receipt size caps the service accepts
pub fn receipt_max_entries_strategy() -> impl Strategy<Value = usize> {
    1usize..=128
}
