//! Shared helpers for the migrator integration tests.

#![allow(dead_code)]

pub mod strategies;

use async_trait::async_trait;
use migrator_core::{
    MigratedFundsEntry, MigratedFundsQuerier, MigratorError, MigratorResult, MigratorService,
    MilestoneIndex, Receipt,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;

/// Querier call as recorded by [`MockQuerier`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryCall {
    MigratedFunds(MilestoneIndex),
    NextMigratedFunds(MilestoneIndex),
}

/// In-memory legacy ledger.
///
/// `query_next_migrated_funds` returns the first milestone at or after the
/// requested index that has an entry, or a query error when the ledger has
/// nothing further, which stands in for "not yet available".
#[derive(Debug, Default)]
pub struct MockQuerier {
    ledger: Mutex<BTreeMap<MilestoneIndex, Vec<MigratedFundsEntry>>>,
    next_override: Mutex<Option<(MilestoneIndex, Vec<MigratedFundsEntry>)>>,
    failures_remaining: Mutex<usize>,
    calls: Mutex<Vec<QueryCall>>,
}

impl MockQuerier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_funds(self, milestone_index: MilestoneIndex, funds: Vec<MigratedFundsEntry>) -> Self {
        self.insert(milestone_index, funds);
        self
    }

    pub fn insert(&self, milestone_index: MilestoneIndex, funds: Vec<MigratedFundsEntry>) {
        self.ledger.lock().insert(milestone_index, funds);
    }

    /// Makes the next `count` queries fail with a soft error.
    pub fn fail_next(&self, count: usize) {
        *self.failures_remaining.lock() = count;
    }

    /// Makes every `query_next_migrated_funds` call return exactly this.
    pub fn override_next(&self, milestone_index: MilestoneIndex, funds: Vec<MigratedFundsEntry>) {
        *self.next_override.lock() = Some((milestone_index, funds));
    }

    pub fn calls(&self) -> Vec<QueryCall> {
        self.calls.lock().clone()
    }

    fn injected_failure(&self, operation: &str) -> MigratorResult<()> {
        let mut remaining = self.failures_remaining.lock();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(MigratorError::query(operation, "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl MigratedFundsQuerier for MockQuerier {
    async fn query_migrated_funds(
        &self,
        milestone_index: MilestoneIndex,
    ) -> MigratorResult<Vec<MigratedFundsEntry>> {
        self.calls.lock().push(QueryCall::MigratedFunds(milestone_index));
        self.injected_failure("query_migrated_funds")?;

        Ok(self
            .ledger
            .lock()
            .get(&milestone_index)
            .cloned()
            .unwrap_or_default())
    }

    async fn query_next_migrated_funds(
        &self,
        start_index: MilestoneIndex,
    ) -> MigratorResult<(MilestoneIndex, Vec<MigratedFundsEntry>)> {
        self.calls.lock().push(QueryCall::NextMigratedFunds(start_index));
        self.injected_failure("query_next_migrated_funds")?;

        if let Some(overridden) = self.next_override.lock().clone() {
            return Ok(overridden);
        }

        self.ledger
            .lock()
            .range(start_index..)
            .next()
            .map(|(index, funds)| (*index, funds.clone()))
            .ok_or_else(|| {
                MigratorError::query(
                    "query_next_migrated_funds",
                    format!("no migrations at or after milestone {start_index}"),
                )
            })
    }
}

/// `count` distinguishable entries for one milestone
pub fn entries(milestone_index: MilestoneIndex, count: usize) -> Vec<MigratedFundsEntry> {
    (0..count)
        .map(|i| MigratedFundsEntry {
            tail_transaction_hash: format!("TAIL{milestone_index:06}{i:04}"),
            address: format!("addr-{milestone_index}-{i}"),
            deposit: 1_000_000 + i as u64,
        })
        .collect()
}

/// Shutdown signal for the fetch loop
pub fn shutdown_signal() -> (oneshot::Sender<()>, impl Future<Output = ()> + Send + 'static) {
    let (tx, rx) = oneshot::channel::<()>();
    (tx, async move {
        let _ = rx.await;
    })
}

/// Polls [`MigratorService::receipt`] until one is available or `timeout`
/// elapses.
pub async fn next_receipt<Q>(service: &MigratorService<Q>, timeout: Duration) -> Option<Receipt>
where
    Q: MigratedFundsQuerier,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if let Some(receipt) = service.receipt() {
            return Some(receipt);
        }
        if tokio::time::Instant::now() >= deadline {
            return None;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Polls until `condition` holds or `timeout` elapses.
pub async fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while !condition() {
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    true
}
