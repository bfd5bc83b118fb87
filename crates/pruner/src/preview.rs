//! Read-only preview of what the selection operations would pick.
//!
//! Runs the same planning as [`ReleasePruner`](crate::ReleasePruner) over
//! plain row snapshots, without grids or a host.

use apprel_core::baseline::{resolve_released_versions, snapshot_rows, ReleasedVersions};
use apprel_core::eligibility::max_deletable_date;
use apprel_core::models::{ReleaseVersion, Rule};
use apprel_core::types::Timestamp;
use apprel_core::CoreError;
use serde::Serialize;

use crate::selection::{plan_rule_selection, plan_version_selection, SelectionReport};

/// What a selection run would pick, with the rows themselves.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewReport {
    pub released: ReleasedVersions,
    pub max_deletable_date: Timestamp,
    pub rules: SelectionReport,
    pub versions: SelectionReport,
    pub deletable_rules: Vec<Rule>,
    pub deletable_versions: Vec<ReleaseVersion>,
}

/// Plan both selections over the given snapshots.
pub fn build_preview(
    rules: Vec<Rule>,
    versions: Vec<ReleaseVersion>,
    page_load_time: Timestamp,
    wait_days: i64,
) -> Result<PreviewReport, CoreError> {
    let rules = snapshot_rows(rules)?;
    let versions = snapshot_rows(versions)?;
    let cutoff = max_deletable_date(page_load_time, wait_days);

    let released = resolve_released_versions(&rules)?;
    let rule_report = plan_rule_selection(&rules)?;
    let version_report = plan_version_selection(&rules, &versions, cutoff)?;

    let deletable_rules = rules
        .iter()
        .filter(|row| rule_report.indices().contains(&row.index))
        .map(|row| row.item.clone())
        .collect();
    let deletable_versions = versions
        .iter()
        .filter(|row| version_report.indices().contains(&row.index))
        .map(|row| row.item.clone())
        .collect();

    Ok(PreviewReport {
        released,
        max_deletable_date: cutoff,
        rules: rule_report,
        versions: version_report,
        deletable_rules,
        deletable_versions,
    })
}
