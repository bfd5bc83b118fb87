//! Sequential deletion batches.
//!
//! A [`DeletionBatch`] snapshots the selected rows of one grid and deletes
//! them one at a time through an [`ItemDeleter`]. The first failure aborts
//! the batch; remaining rows are left untouched and never retried.
//!
//! ```text
//! Idle -> Running -> Completed
//!                 \-> Aborted
//! ```

use std::fmt;
use std::time::Duration;

use apprel_core::baseline::Parsed;
use apprel_core::types::RowIndex;
use async_trait::async_trait;
use serde::Serialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::delete::DeleteFailure;

/// What a batch deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Rule,
    Version,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Rule => f.write_str("rule"),
            ItemKind::Version => f.write_str("version"),
        }
    }
}

/// Lifecycle of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    Idle,
    Running,
    Completed,
    Aborted,
}

/// The item that stopped a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    pub index: RowIndex,
    pub version: String,
    pub reason: DeleteFailure,
}

/// Outcome of a finished batch.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub kind: ItemKind,
    pub state: BatchState,
    /// Rows in the selection snapshot.
    pub selected: usize,
    /// Delete calls issued, including the failed one.
    pub attempted: usize,
    pub deleted: usize,
    pub failure: Option<ItemFailure>,
    /// Rows skipped because an earlier row failed.
    pub not_attempted: usize,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.state == BatchState::Completed
    }
}

/// Deletes a single snapshot row.
///
/// Implementations report per-item failures themselves (toast and log);
/// the batch only decides whether to continue.
#[async_trait]
pub trait ItemDeleter<T: Sync>: Send + Sync {
    async fn delete(&self, item: &Parsed<T>, timeout: Duration) -> Result<(), DeleteFailure>;
}

/// A snapshot of selected rows awaiting deletion.
pub struct DeletionBatch<T> {
    run_id: Uuid,
    kind: ItemKind,
    items: Vec<Parsed<T>>,
    state: BatchState,
}

impl<T: Send + Sync> DeletionBatch<T> {
    /// Keep the rows whose index is in `selected`, in grid order.
    pub fn from_selection(kind: ItemKind, rows: Vec<Parsed<T>>, selected: &[RowIndex]) -> Self {
        let items = rows
            .into_iter()
            .filter(|row| selected.contains(&row.index))
            .collect();
        Self {
            run_id: Uuid::new_v4(),
            kind,
            items,
            state: BatchState::Idle,
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Delete every row in order, stopping at the first failure.
    pub async fn run<D>(mut self, deleter: &D, timeout: Duration) -> BatchReport
    where
        D: ItemDeleter<T> + ?Sized,
    {
        let span = tracing::info_span!(
            "deletion_batch",
            run_id = %self.run_id,
            kind = %self.kind,
            selected = self.items.len(),
        );
        async move {
            self.advance(BatchState::Running);

            let selected = self.items.len();
            let mut deleted = 0;
            let mut failure = None;

            for item in &self.items {
                match deleter.delete(item, timeout).await {
                    Ok(()) => deleted += 1,
                    Err(reason) => {
                        failure = Some(ItemFailure {
                            index: item.index,
                            version: item.version.raw.clone(),
                            reason,
                        });
                        break;
                    }
                }
            }

            let attempted = deleted + usize::from(failure.is_some());
            if failure.is_some() {
                self.advance(BatchState::Aborted);
            } else {
                self.advance(BatchState::Completed);
            }

            tracing::info!(
                state = ?self.state,
                attempted,
                deleted,
                "Deletion batch finished",
            );

            BatchReport {
                run_id: self.run_id,
                kind: self.kind,
                state: self.state,
                selected,
                attempted,
                deleted,
                failure,
                not_attempted: selected - attempted,
            }
        }
        .instrument(span)
        .await
    }

    fn advance(&mut self, next: BatchState) {
        debug_assert!(
            matches!(
                (self.state, next),
                (BatchState::Idle, BatchState::Running)
                    | (BatchState::Running, BatchState::Completed)
                    | (BatchState::Running, BatchState::Aborted)
            ),
            "invalid batch transition {:?} -> {next:?}",
            self.state,
        );
        tracing::debug!(from = ?self.state, to = ?next, "Batch state change");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use apprel_core::baseline::snapshot_rows;
    use apprel_core::models::Rule;

    use super::*;

    /// Fails on the listed row indices, records every call.
    struct ScriptedDeleter {
        fail_on: Vec<RowIndex>,
        calls: Mutex<Vec<RowIndex>>,
    }

    impl ScriptedDeleter {
        fn failing_on(fail_on: Vec<RowIndex>) -> Self {
            Self {
                fail_on,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<RowIndex> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ItemDeleter<Rule> for ScriptedDeleter {
        async fn delete(&self, item: &Parsed<Rule>, _timeout: Duration) -> Result<(), DeleteFailure> {
            self.calls.lock().unwrap().push(item.index);
            if self.fail_on.contains(&item.index) {
                Err(DeleteFailure::Rejected("nope".into()))
            } else {
                Ok(())
            }
        }
    }

    fn rows(versions: &[&str]) -> Vec<Parsed<Rule>> {
        snapshot_rows(
            versions
                .iter()
                .map(|v| Rule {
                    uuid: "x".into(),
                    version: (*v).into(),
                    ..Default::default()
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn selection_keeps_grid_order() {
        let batch = DeletionBatch::from_selection(
            ItemKind::Rule,
            rows(&["3.0.0", "2.0.0", "1.0.0"]),
            &[2, 0],
        );
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.state(), BatchState::Idle);
        let indices: Vec<_> = batch.items.iter().map(|i| i.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[tokio::test]
    async fn all_successes_complete_batch() {
        let deleter = ScriptedDeleter::failing_on(vec![]);
        let batch = DeletionBatch::from_selection(ItemKind::Rule, rows(&["2.0.0", "1.0.0"]), &[0, 1]);
        let report = batch.run(&deleter, Duration::from_secs(1)).await;

        assert!(report.is_success());
        assert_eq!(report.deleted, 2);
        assert_eq!(report.not_attempted, 0);
        assert_eq!(deleter.calls(), vec![0, 1]);
    }

    #[tokio::test]
    async fn first_failure_aborts_remaining_items() {
        let deleter = ScriptedDeleter::failing_on(vec![1]);
        let batch = DeletionBatch::from_selection(
            ItemKind::Rule,
            rows(&["3.0.0", "2.0.0", "1.0.0"]),
            &[0, 1, 2],
        );
        let report = batch.run(&deleter, Duration::from_secs(1)).await;

        assert_eq!(report.state, BatchState::Aborted);
        assert_eq!(report.attempted, 2);
        assert_eq!(report.deleted, 1);
        assert_eq!(report.not_attempted, 1);
        assert_eq!(deleter.calls(), vec![0, 1]);

        let failure = report.failure.expect("failure should be recorded");
        assert_eq!(failure.index, 1);
        assert_eq!(failure.version, "2.0.0");
        assert_eq!(failure.reason, DeleteFailure::Rejected("nope".into()));
    }

    #[tokio::test]
    async fn empty_selection_completes_without_calls() {
        let deleter = ScriptedDeleter::failing_on(vec![]);
        let batch = DeletionBatch::from_selection(ItemKind::Rule, rows(&["1.0.0"]), &[]);
        assert!(batch.is_empty());
        let report = batch.run(&deleter, Duration::from_secs(1)).await;
        assert!(report.is_success());
        assert!(deleter.calls().is_empty());
    }
}
