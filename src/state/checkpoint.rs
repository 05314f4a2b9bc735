use crate::error::{MigratorError, MigratorResult};
use crate::models::MilestoneIndex;
use serde::{Deserialize, Serialize};

/// Latest migration progress of the migrator service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MigratorState {
    /// Legacy milestone whose funds are currently being emitted
    pub latest_migrated_at_index: MilestoneIndex,
    /// Number of entries of that milestone already emitted in receipts
    pub latest_included_index: u32,
    /// Set while a receipt handed to the caller has not been confirmed as sent
    pub sending_receipt: bool,
}

impl MigratorState {
    /// Fresh checkpoint starting at the given legacy milestone
    pub fn bootstrap(migrated_at: MilestoneIndex) -> Self {
        Self {
            latest_migrated_at_index: migrated_at,
            latest_included_index: 0,
            sending_receipt: false,
        }
    }

    /// Checks a loaded or bootstrapped checkpoint before it is adopted.
    pub fn validate(&self) -> MigratorResult<()> {
        if self.sending_receipt {
            return Err(MigratorError::invalid_state(
                "'sending receipt' flag is set which means the node didn't shutdown correctly",
            ));
        }

        if self.latest_migrated_at_index == 0 {
            return Err(MigratorError::invalid_state(
                "latest migrated at index must not be zero",
            ));
        }

        Ok(())
    }

    /// Advances the checkpoint by a batch of `batch_len` entries taken for
    /// `migrated_at`.
    ///
    /// # Panics
    ///
    /// Panics if `migrated_at` is below the current checkpoint. The producer
    /// only ever moves forward, so a regression is an internal fault.
    pub fn apply_batch(&mut self, migrated_at: MilestoneIndex, batch_len: u32) {
        assert!(
            migrated_at >= self.latest_migrated_at_index,
            "invalid stop index: batch for milestone {} but checkpoint is at {}",
            migrated_at,
            self.latest_migrated_at_index
        );

        if migrated_at != self.latest_migrated_at_index {
            self.latest_migrated_at_index = migrated_at;
            self.latest_included_index = 0;
        }
        self.latest_included_index += batch_len;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_starts_with_empty_cursor() {
        let state = MigratorState::bootstrap(100);
        assert_eq!(state.latest_migrated_at_index, 100);
        assert_eq!(state.latest_included_index, 0);
        assert!(!state.sending_receipt);
        assert!(state.validate().is_ok());
    }

    #[test]
    fn sending_flag_is_rejected() {
        let state = MigratorState {
            sending_receipt: true,
            ..MigratorState::bootstrap(100)
        };
        assert!(matches!(
            state.validate(),
            Err(MigratorError::InvalidState { .. })
        ));
    }

    #[test]
    fn zero_index_is_rejected() {
        let err = MigratorState::bootstrap(0).validate().unwrap_err();
        assert!(err.to_string().contains("must not be zero"));
    }

    #[test]
    fn same_milestone_extends_cursor() {
        let mut state = MigratorState {
            latest_migrated_at_index: 105,
            latest_included_index: 2,
            sending_receipt: false,
        };
        state.apply_batch(105, 3);
        assert_eq!(state.latest_migrated_at_index, 105);
        assert_eq!(state.latest_included_index, 5);
    }

    #[test]
    fn newer_milestone_resets_cursor() {
        let mut state = MigratorState {
            latest_migrated_at_index: 105,
            latest_included_index: 7,
            sending_receipt: false,
        };
        state.apply_batch(110, 2);
        assert_eq!(state.latest_migrated_at_index, 110);
        assert_eq!(state.latest_included_index, 2);
    }

    #[test]
    fn empty_batch_still_moves_milestone() {
        let mut state = MigratorState::bootstrap(100);
        state.apply_batch(104, 0);
        assert_eq!(state.latest_migrated_at_index, 104);
        assert_eq!(state.latest_included_index, 0);
    }

    #[test]
    #[should_panic(expected = "invalid stop index")]
    fn regression_panics() {
        let mut state = MigratorState::bootstrap(105);
        state.apply_batch(104, 1);
    }

    #[test]
    fn serializes_with_fixed_field_names() {
        let state = MigratorState {
            latest_migrated_at_index: 105,
            latest_included_index: 3,
            sending_receipt: true,
        };
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "latestMigratedAtIndex": 105,
                "latestIncludedIndex": 3,
                "sendingReceipt": true
            })
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = r#"{"latestMigratedAtIndex":1,"latestIncludedIndex":0,"sendingReceipt":false,"extra":1}"#;
        assert!(serde_json::from_str::<MigratorState>(raw).is_err());
    }
}
