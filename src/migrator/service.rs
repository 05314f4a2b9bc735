//! The migrator service: a fetch loop producing receipt-sized batches and a
//! non-blocking pull that turns them into receipts while advancing the
//! checkpoint.

use super::batching::{split_into_batches, MigrationBatch};
use super::handoff::Handoff;
use super::policy::{ErrorDisposition, ErrorPolicy};
use crate::config::MigratorConfig;
use crate::constants::MAX_MIGRATED_FUNDS_ENTRY_COUNT;
use crate::error::{MigratorError, MigratorResult};
use crate::events::ServiceEvents;
use crate::models::{FetchedFunds, MilestoneIndex, Receipt};
use crate::querier::MigratedFundsQuerier;
use crate::state::{MigratorState, StateStore};
use parking_lot::Mutex;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Service querying the legacy ledger and handing out batches of migrated
/// funds as receipts.
///
/// Lifecycle: [`init_state`](Self::init_state) once, then
/// [`start`](Self::start) the fetch loop on its own task. The caller polls
/// [`receipt`](Self::receipt) and calls [`persist_state`](Self::persist_state)
/// exactly once for every receipt it got, after sending it.
pub struct MigratorService<Q> {
    pub events: ServiceEvents,

    querier: Q,
    store: StateStore,
    receipt_max_entries: usize,

    // guards the checkpoint together with taking from `migrations`
    state: Mutex<MigratorState>,
    migrations: Handoff<MigrationBatch>,
    started: AtomicBool,
}

impl<Q: MigratedFundsQuerier> MigratorService<Q> {
    /// Creates the service; the fetch loop is not started.
    pub fn new(
        querier: Q,
        state_file_path: impl Into<PathBuf>,
        receipt_max_entries: usize,
    ) -> MigratorResult<Self> {
        if receipt_max_entries == 0 || receipt_max_entries > MAX_MIGRATED_FUNDS_ENTRY_COUNT {
            return Err(MigratorError::configuration(format!(
                "receipt max entries must be within 1..={MAX_MIGRATED_FUNDS_ENTRY_COUNT}, got {receipt_max_entries}"
            )));
        }

        Ok(Self {
            events: ServiceEvents::new(),
            querier,
            store: StateStore::new(state_file_path),
            receipt_max_entries,
            state: Mutex::new(MigratorState::default()),
            migrations: Handoff::new(),
            started: AtomicBool::new(false),
        })
    }

    pub fn from_config(querier: Q, config: &MigratorConfig) -> MigratorResult<Self> {
        Self::new(
            querier,
            config.state_file_path.clone(),
            config.receipt_max_entries,
        )
    }

    /// Copy of the in-memory checkpoint
    pub fn state(&self) -> MigratorState {
        *self.state.lock()
    }

    pub fn state_file_path(&self) -> &Path {
        self.store.path()
    }

    pub fn receipt_max_entries(&self) -> usize {
        self.receipt_max_entries
    }

    /// Initializes the checkpoint. Must be called before [`start`](Self::start).
    ///
    /// With `bootstrap_index` the service starts fresh at that legacy
    /// milestone and refuses to run if a state file already exists. Without
    /// it, the checkpoint is loaded from the state file.
    pub fn init_state(&self, bootstrap_index: Option<MilestoneIndex>) -> MigratorResult<()> {
        let mut current = self.state.lock();

        let state = match bootstrap_index {
            None => self.store.load()?,
            Some(index) => {
                // bootstrapping must never overwrite existing progress
                if self.store.exists()? {
                    return Err(MigratorError::StateFileAlreadyExists {
                        path: self.store.path().to_path_buf(),
                    });
                }
                MigratorState::bootstrap(index)
            }
        };

        state.validate()?;
        *current = state;

        info!(
            mode = if bootstrap_index.is_some() { "bootstrap" } else { "recovery" },
            latest_migrated_at_index = state.latest_migrated_at_index,
            latest_included_index = state.latest_included_index,
            "📋 Migrator state initialized"
        );
        Ok(())
    }

    /// Returns the next receipt of migrated funds, or `None` if none is ready.
    ///
    /// Never blocks. Taking a batch and advancing the checkpoint happen under
    /// one lock, so the checkpoint always matches the receipts handed out.
    /// Once the fetch loop has stopped, this always returns `None`.
    pub fn receipt(&self) -> Option<Receipt> {
        let mut state = self.state.lock();

        let batch = self.migrations.try_take()?;
        // batches never exceed receipt_max_entries, which fits in u32
        state.apply_batch(batch.milestone_index, batch.len() as u32);

        debug!(
            migrated_at = batch.milestone_index,
            entries = batch.len(),
            final_batch = batch.last_batch,
            latest_included_index = state.latest_included_index,
            "🧾 Migration batch taken"
        );
        batch.into_receipt()
    }

    /// Sets the sending flag and durably writes the checkpoint, keeping the
    /// previous file as a backup.
    ///
    /// Must be called once for every receipt returned by
    /// [`receipt`](Self::receipt), after it has been sent.
    pub fn persist_state(&self, sending_receipt: bool) -> MigratorResult<()> {
        let mut state = self.state.lock();
        state.sending_receipt = sending_receipt;

        self.store.persist(&state)
    }

    /// Runs the fetch loop until `shutdown` completes or `on_error` asks it
    /// to terminate. Afterwards every [`receipt`](Self::receipt) call returns
    /// `None`.
    ///
    /// `shutdown` is only observed while waiting for a consumer or during an
    /// error cooldown.
    #[instrument(skip_all, fields(receipt_max_entries = self.receipt_max_entries))]
    pub async fn start<F, P>(&self, shutdown: F, mut on_error: P)
    where
        F: Future<Output = ()> + Send,
        P: ErrorPolicy,
    {
        if self.started.swap(true, Ordering::AcqRel) {
            error!("Migrator fetch loop can only be started once");
            return;
        }

        if self.state.lock().latest_migrated_at_index == 0 {
            let err = MigratorError::invalid_state("fetch loop started before state was initialized");
            error!(error = %err, "❌ Migrator fetch loop refused to start");
            self.events.soft_error.trigger(&err);
            self.migrations.close();
            return;
        }

        let mut shutdown = std::pin::pin!(shutdown);
        let mut last_fetched: Option<MilestoneIndex> = None;

        info!("🚀 Migrator fetch loop started");

        'fetch: loop {
            let fetched = match self.next_migrations(last_fetched).await {
                Ok(fetched) => fetched,
                Err(err) => {
                    self.events.soft_error.trigger(&err);
                    match on_error.on_error(&err) {
                        ErrorDisposition::Continue => continue,
                        ErrorDisposition::ContinueAfter(cooldown) => {
                            tokio::select! {
                                _ = tokio::time::sleep(cooldown) => continue,
                                _ = shutdown.as_mut() => {
                                    info!("Shutdown requested during query cooldown");
                                    break 'fetch;
                                }
                            }
                        }
                        ErrorDisposition::Terminate => {
                            warn!(error = %err, "🛑 Error policy terminated the migrator fetch loop");
                            break 'fetch;
                        }
                    }
                }
            };

            self.events.migrated_funds_fetched.trigger(&fetched);

            let milestone_index = fetched.milestone_index;
            info!(
                milestone_index,
                entries = fetched.len(),
                "📥 Migrated funds fetched"
            );

            for batch in split_into_batches(fetched, self.receipt_max_entries) {
                let entries = batch.len();
                let last_batch = batch.last_batch;
                if let Err(reason) = self.migrations.put(batch, shutdown.as_mut()).await {
                    info!(reason = %reason, "Migrator fetch loop stopping");
                    break 'fetch;
                }
                debug!(milestone_index, entries, last_batch, "Migration batch handed over");
            }

            last_fetched = Some(milestone_index);
        }

        self.migrations.close();
        info!("✅ Migrator fetch loop stopped");
    }

    /// Runs [`start`](Self::start) on a new tokio task.
    pub fn spawn<F, P>(self: &Arc<Self>, shutdown: F, on_error: P) -> JoinHandle<()>
    where
        Q: 'static,
        F: Future<Output = ()> + Send + 'static,
        P: ErrorPolicy + 'static,
    {
        let service = Arc::clone(self);
        tokio::spawn(async move { service.start(shutdown, on_error).await })
    }

    /// Queries the next migrations after `last_fetched`. `None` means the
    /// loop has not fetched anything yet and resumes from the checkpoint.
    async fn next_migrations(
        &self,
        last_fetched: Option<MilestoneIndex>,
    ) -> MigratorResult<FetchedFunds> {
        let start_index = match last_fetched {
            Some(index) => next_milestone(index)?,
            None => {
                let remaining = self.state_migrations().await?;
                if !remaining.is_empty() {
                    info!(
                        milestone_index = remaining.milestone_index,
                        remaining = remaining.len(),
                        "Resuming partially migrated milestone"
                    );
                    return Ok(remaining);
                }
                next_milestone(remaining.milestone_index)?
            }
        };

        let (milestone_index, funds) = self.querier.query_next_migrated_funds(start_index).await?;
        if milestone_index < start_index {
            return Err(MigratorError::QuerierRegression {
                requested: start_index,
                returned: milestone_index,
            });
        }

        Ok(FetchedFunds::new(milestone_index, funds))
    }

    /// Migrations at the checkpointed milestone that were not yet included.
    async fn state_migrations(&self) -> MigratorResult<FetchedFunds> {
        let state = self.state();

        let mut funds = self
            .querier
            .query_migrated_funds(state.latest_migrated_at_index)
            .await?;

        let included = state.latest_included_index as usize;
        if included > funds.len() {
            return Err(MigratorError::InconsistentState {
                migrated_at: state.latest_migrated_at_index,
                included_index: state.latest_included_index,
                available: funds.len(),
            });
        }

        let remaining = funds.split_off(included);
        Ok(FetchedFunds::new(state.latest_migrated_at_index, remaining))
    }
}

impl<Q> std::fmt::Debug for MigratorService<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigratorService")
            .field("state_file_path", &self.store.path())
            .field("receipt_max_entries", &self.receipt_max_entries)
            .field("state", &*self.state.lock())
            .field("started", &self.started.load(Ordering::Relaxed))
            .finish()
    }
}

fn next_milestone(index: MilestoneIndex) -> MigratorResult<MilestoneIndex> {
    index
        .checked_add(1)
        .ok_or_else(|| MigratorError::invalid_state(format!("milestone index {index} overflows")))
}
