//! Operator entry points.
//!
//! [`ReleasePruner`] wires the host grids, host API and notification sink
//! together and exposes the four operations the admin UI binds to buttons:
//! select/delete deletable rules and select/delete deletable versions.

use std::sync::Arc;
use std::time::Duration;

use apprel_core::baseline::{snapshot_rows, Parsed};
use apprel_core::eligibility::max_deletable_date;
use apprel_core::models::{ReleaseVersion, Rule, Versioned};
use apprel_core::CoreError;
use apprel_events::{Notification, NotificationSink};
use apprel_host::{Grid, ReleaseApi};
use async_trait::async_trait;

use crate::batch::{BatchReport, DeletionBatch, ItemDeleter, ItemKind};
use crate::config::PrunerConfig;
use crate::delete::{self, DeleteFailure};
use crate::selection::{plan_rule_selection, plan_version_selection, SelectionReport};

// Titles match the host admin UI's existing toasts word for word.
const RULES_SELECTED: &str = "All deletable rules have been selected.";
const VERSIONS_SELECTED: &str = "All deletable version have been selected.";
const RULES_DELETED: &str = "All selected rule have been deleted.";
const VERSIONS_DELETED: &str = "All selected version have been deleted.";

/// Bulk selection and deletion of rules and versions for the selected app.
pub struct ReleasePruner {
    api: Arc<dyn ReleaseApi>,
    rules: Arc<dyn Grid<Rule>>,
    versions: Arc<dyn Grid<ReleaseVersion>>,
    notifier: Arc<dyn NotificationSink>,
    config: PrunerConfig,
}

impl ReleasePruner {
    pub fn new(
        api: Arc<dyn ReleaseApi>,
        rules: Arc<dyn Grid<Rule>>,
        versions: Arc<dyn Grid<ReleaseVersion>>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            api,
            rules,
            versions,
            notifier,
            config: PrunerConfig::default(),
        }
    }

    /// Replace the default configuration.
    pub fn with_config(mut self, config: PrunerConfig) -> Self {
        self.config = config;
        self
    }

    /// Timeout used when a delete entry point is given `None`.
    pub fn delete_timeout(&self) -> Duration {
        self.config.delete_timeout
    }

    // ---- selection ----

    /// Select every rule that is safe to delete.
    ///
    /// Fails without touching the grid if a version is malformed or the
    /// rules grid is sorted. Selects nothing when no baseline is known.
    pub fn select_deletable_rules(&self) -> Result<SelectionReport, CoreError> {
        let rules = snapshot_rows(self.rules.rows())?;
        let report = plan_rule_selection(&rules)?;
        self.apply_selection(self.rules.as_ref(), &report, RULES_SELECTED);
        Ok(report)
    }

    /// Select every version that is safe to delete.
    ///
    /// Uses the host's page-load time and rule-deletion wait period to
    /// decide which versions have waited long enough.
    pub fn select_deletable_versions(&self) -> Result<SelectionReport, CoreError> {
        let versions = snapshot_rows(self.versions.rows())?;
        let rules = snapshot_rows(self.rules.rows())?;
        let cutoff = max_deletable_date(
            self.api.page_load_time(),
            self.api.rule_deleted_wait_days(),
        );
        let report = plan_version_selection(&rules, &versions, cutoff)?;
        self.apply_selection(self.versions.as_ref(), &report, VERSIONS_SELECTED);
        Ok(report)
    }

    fn apply_selection<T>(&self, grid: &dyn Grid<T>, report: &SelectionReport, title: &str) {
        match report {
            SelectionReport::Selected { baseline, indices } => {
                grid.set_selected_rows(indices);
                tracing::info!(baseline = %baseline, count = indices.len(), "{title}");
                self.notifier
                    .notify(Notification::info(title, format!("{} items", indices.len())));
            }
            SelectionReport::NoBaseline => {
                tracing::info!("No released baseline, nothing selected");
            }
        }
    }

    // ---- deletion ----

    /// Delete the selected rules one by one, stopping at the first failure.
    ///
    /// `timeout` bounds each delete; `None` uses the configured
    /// [`PrunerConfig::delete_timeout`]. Afterwards the rules and versions
    /// are reloaded from the host and the selection is cleared, whatever
    /// the outcome.
    pub async fn delete_selected_rules(
        &self,
        timeout: impl Into<Option<Duration>>,
    ) -> Result<BatchReport, CoreError> {
        let timeout = timeout.into().unwrap_or(self.config.delete_timeout);
        let deleter = RuleDeleter {
            api: self.api.as_ref(),
            notifier: self.notifier.as_ref(),
        };
        let report = self
            .run_batch(ItemKind::Rule, self.rules.as_ref(), &deleter, timeout)
            .await?;

        let app = self.api.selected_app();
        self.api.load_all_rules(&app.name);
        self.api.load_versions(&app.name, &app.app_type);
        self.finish_batch(self.rules.as_ref(), &report, RULES_DELETED);
        Ok(report)
    }

    /// Delete the selected versions one by one, stopping at the first
    /// failure.
    ///
    /// `timeout` works as in [`Self::delete_selected_rules`]. Afterwards
    /// the versions are reloaded from the host and the selection is
    /// cleared, whatever the outcome.
    pub async fn delete_selected_versions(
        &self,
        timeout: impl Into<Option<Duration>>,
    ) -> Result<BatchReport, CoreError> {
        let timeout = timeout.into().unwrap_or(self.config.delete_timeout);
        let deleter = VersionDeleter {
            api: self.api.as_ref(),
            notifier: self.notifier.as_ref(),
        };
        let report = self
            .run_batch(ItemKind::Version, self.versions.as_ref(), &deleter, timeout)
            .await?;

        let app = self.api.selected_app();
        self.api.load_versions(&app.name, &app.app_type);
        self.finish_batch(self.versions.as_ref(), &report, VERSIONS_DELETED);
        Ok(report)
    }

    async fn run_batch<T, D>(
        &self,
        kind: ItemKind,
        grid: &dyn Grid<T>,
        deleter: &D,
        timeout: Duration,
    ) -> Result<BatchReport, CoreError>
    where
        T: Versioned + Send + Sync,
        D: ItemDeleter<T>,
    {
        let rows = snapshot_rows(grid.rows())?;
        let batch = DeletionBatch::from_selection(kind, rows, &grid.selected_rows());
        Ok(batch.run(deleter, timeout).await)
    }

    fn finish_batch<T>(&self, grid: &dyn Grid<T>, report: &BatchReport, title: &str) {
        grid.set_selected_rows(&[]);
        if report.is_success() {
            self.notifier
                .notify(Notification::info(title, format!("{} items", report.selected)));
        }
    }
}

// ---------------------------------------------------------------------------
// Deleters
// ---------------------------------------------------------------------------

struct RuleDeleter<'a> {
    api: &'a dyn ReleaseApi,
    notifier: &'a dyn NotificationSink,
}

#[async_trait]
impl<'a> ItemDeleter<Rule> for RuleDeleter<'a> {
    async fn delete(&self, item: &Parsed<Rule>, timeout: Duration) -> Result<(), DeleteFailure> {
        delete::delete_rule(self.api, self.notifier, &item.item, timeout).await
    }
}

struct VersionDeleter<'a> {
    api: &'a dyn ReleaseApi,
    notifier: &'a dyn NotificationSink,
}

#[async_trait]
impl<'a> ItemDeleter<ReleaseVersion> for VersionDeleter<'a> {
    async fn delete(
        &self,
        item: &Parsed<ReleaseVersion>,
        timeout: Duration,
    ) -> Result<(), DeleteFailure> {
        delete::delete_version(self.api, self.notifier, item, timeout).await
    }
}
