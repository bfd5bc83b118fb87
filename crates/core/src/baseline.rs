//! Row snapshots and released-baseline resolution.
//!
//! The baseline is the lowest version that must stay releasable: the
//! version of the "everyone" rule, or failing that the "internal-only"
//! rule. Everything at or below it is a deletion candidate.

use serde::Serialize;

use crate::error::CoreError;
use crate::models::{Rule, Versioned};
use crate::types::{GridName, RowIndex};
use crate::version::{is_greater_version, parse_version, ParsedVersion};

// ---------------------------------------------------------------------------
// Row snapshots
// ---------------------------------------------------------------------------

/// A grid row paired with its original index and parsed version.
#[derive(Debug, Clone, Serialize)]
pub struct Parsed<T> {
    pub index: RowIndex,
    pub item: T,
    pub version: ParsedVersion,
}

/// Snapshot grid rows, parsing every row's version.
///
/// Fails on the first malformed version; the caller must not act on a
/// partial snapshot.
pub fn snapshot_rows<T: Versioned>(rows: Vec<T>) -> Result<Vec<Parsed<T>>, CoreError> {
    rows.into_iter()
        .enumerate()
        .map(|(index, item)| {
            let version = parse_version(item.version())?;
            Ok(Parsed {
                index,
                item,
                version,
            })
        })
        .collect()
}

/// Check that rows are in descending version order (index 0 highest).
///
/// Grids are loaded in that order; any other order means the operator has
/// sorted a column and row positions can no longer be trusted.
pub fn ensure_descending<T>(grid: GridName, rows: &[Parsed<T>]) -> Result<(), CoreError> {
    let unsorted = rows
        .windows(2)
        .any(|pair| is_greater_version(&pair[1].version, &pair[0].version));
    if unsorted {
        return Err(CoreError::UnsortedGrid { grid });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Baseline
// ---------------------------------------------------------------------------

/// Versions currently released through the system rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReleasedVersions {
    pub everyone: Option<ParsedVersion>,
    pub internal: Option<ParsedVersion>,
}

impl ReleasedVersions {
    /// The baseline: the everyone version, else the internal version.
    ///
    /// `None` means no floor is known and nothing may be deleted.
    pub fn min_released(&self) -> Option<&ParsedVersion> {
        self.everyone.as_ref().or(self.internal.as_ref())
    }
}

/// Resolve the released versions from a rule snapshot.
///
/// Validates the rules grid order first, so an unsorted grid is reported
/// before any baseline is computed.
pub fn resolve_released_versions(rules: &[Parsed<Rule>]) -> Result<ReleasedVersions, CoreError> {
    ensure_descending(GridName::Rules, rules)?;

    let first_matching = |pred: fn(&Rule) -> bool| {
        rules
            .iter()
            .find(|row| pred(&row.item))
            .map(|row| row.version.clone())
    };

    Ok(ReleasedVersions {
        everyone: first_matching(Rule::is_everyone),
        internal: first_matching(Rule::is_internal),
    })
}
