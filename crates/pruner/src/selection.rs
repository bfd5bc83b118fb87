//! Deletion candidate planning.
//!
//! Works on row snapshots only, so it can drive both the live grids and
//! the offline preview.

use apprel_core::baseline::{ensure_descending, resolve_released_versions, Parsed};
use apprel_core::eligibility::{is_deletable_rule, is_deletable_version};
use apprel_core::models::{ReleaseVersion, Rule};
use apprel_core::types::{GridName, RowIndex, Timestamp};
use apprel_core::version::ParsedVersion;
use apprel_core::CoreError;
use serde::Serialize;

/// Result of a selection pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SelectionReport {
    /// Rows at `indices` are safe to delete under `baseline`.
    Selected {
        baseline: ParsedVersion,
        indices: Vec<RowIndex>,
    },
    /// Neither an everyone nor an internal rule exists, so no floor is
    /// known and nothing is selected.
    NoBaseline,
}

impl SelectionReport {
    pub fn indices(&self) -> &[RowIndex] {
        match self {
            SelectionReport::Selected { indices, .. } => indices,
            SelectionReport::NoBaseline => &[],
        }
    }
}

/// Plan which rules can be deleted.
pub fn plan_rule_selection(rules: &[Parsed<Rule>]) -> Result<SelectionReport, CoreError> {
    let released = resolve_released_versions(rules)?;
    let Some(baseline) = released.min_released() else {
        return Ok(SelectionReport::NoBaseline);
    };

    Ok(SelectionReport::Selected {
        indices: matching_indices(rules, |rule| is_deletable_rule(rule, baseline)),
        baseline: baseline.clone(),
    })
}

/// Plan which versions can be deleted.
///
/// `max_deletable_date` is the latest rules-cleared date that qualifies;
/// see [`apprel_core::eligibility::max_deletable_date`].
pub fn plan_version_selection(
    rules: &[Parsed<Rule>],
    versions: &[Parsed<ReleaseVersion>],
    max_deletable_date: Timestamp,
) -> Result<SelectionReport, CoreError> {
    ensure_descending(GridName::Versions, versions)?;

    let released = resolve_released_versions(rules)?;
    let Some(baseline) = released.min_released() else {
        return Ok(SelectionReport::NoBaseline);
    };

    Ok(SelectionReport::Selected {
        indices: matching_indices(versions, |version| {
            is_deletable_version(version, baseline, max_deletable_date)
        }),
        baseline: baseline.clone(),
    })
}

fn matching_indices<T>(rows: &[Parsed<T>], predicate: impl Fn(&Parsed<T>) -> bool) -> Vec<RowIndex> {
    rows.iter()
        .filter(|row| predicate(*row))
        .map(|row| row.index)
        .collect()
}
