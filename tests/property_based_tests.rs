mod common;

use common::strategies::*;
use migrator_core::migrator::split_into_batches;
use migrator_core::MigratorState;
use proptest::prelude::*;

proptest! {
    /// Property: batch count is the ceiling of entries over the cap, with one
    /// empty batch for an empty fetch
    #[test]
    fn batch_count_is_ceiling(fetched in fetched_funds_strategy(), cap in receipt_max_entries_strategy()) {
        let total = fetched.len();
        let batches = split_into_batches(fetched, cap);

        let expected = if total == 0 { 1 } else { total.div_ceil(cap) };
        prop_assert_eq!(batches.len(), expected);
        prop_assert!(batches.iter().all(|b| b.len() <= cap));
    }

    /// Property: only the last batch is flagged, and every batch carries the
    /// fetched milestone
    #[test]
    fn only_last_batch_is_final(fetched in fetched_funds_strategy(), cap in receipt_max_entries_strategy()) {
        let milestone_index = fetched.milestone_index;
        let batches = split_into_batches(fetched, cap);
        let last = batches.len() - 1;

        for (i, batch) in batches.iter().enumerate() {
            prop_assert_eq!(batch.last_batch, i == last);
            prop_assert_eq!(batch.milestone_index, milestone_index);
        }
    }

    /// Property: concatenating the batches gives back the fetched funds in order
    #[test]
    fn batches_preserve_order(fetched in fetched_funds_strategy(), cap in receipt_max_entries_strategy()) {
        let original = fetched.funds.clone();
        let rejoined: Vec<_> = split_into_batches(fetched, cap)
            .into_iter()
            .flat_map(|b| b.funds)
            .collect();
        prop_assert_eq!(rejoined, original);
    }

    /// Property: applying every batch of a milestone leaves the cursor at the
    /// milestone's entry count, regardless of the cap
    #[test]
    fn applying_batches_counts_every_entry(fetched in fetched_funds_strategy(), cap in receipt_max_entries_strategy()) {
        let milestone_index = fetched.milestone_index;
        let total = fetched.len() as u32;
        let mut state = MigratorState::bootstrap(1);

        for batch in split_into_batches(fetched, cap) {
            state.apply_batch(batch.milestone_index, batch.len() as u32);
        }

        prop_assert_eq!(state.latest_migrated_at_index, milestone_index);
        prop_assert_eq!(state.latest_included_index, total);
    }

    /// Property: the checkpoint file format round-trips any state
    #[test]
    fn checkpoint_json_round_trips(
        migrated_at in milestone_index_strategy(),
        included in 0u32..10_000,
        sending in any::<bool>(),
    ) {
        let state = MigratorState {
            latest_migrated_at_index: migrated_at,
            latest_included_index: included,
            sending_receipt: sending,
        };
        let raw = serde_json::to_string(&state).unwrap();
        prop_assert_eq!(serde_json::from_str::<MigratorState>(&raw).unwrap(), state);
    }
}
