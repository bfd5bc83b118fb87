//! Deletion eligibility predicates for rules and versions.
//!
//! Pure functions: callers snapshot the grids, resolve the baseline and
//! compute the cutoff date once, then filter rows with these predicates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use crate::baseline::Parsed;
use crate::models::{ReleaseVersion, Rule};
use crate::types::Timestamp;
use crate::version::{is_greater_version, ParsedVersion};

/// Naive formats accepted for host timestamps, interpreted as UTC.
const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Whether a rule row may be deleted given the released baseline.
///
/// Custom rules are always deletable. The everyone and internal rules
/// never are. Any other rule is deletable when its version is not above
/// the baseline.
pub fn is_deletable_rule(rule: &Parsed<Rule>, baseline: &ParsedVersion) -> bool {
    if rule.item.is_custom() {
        return true;
    }
    if rule.item.is_everyone() || rule.item.is_internal() {
        return false;
    }
    !is_greater_version(&rule.version, baseline)
}

/// Whether a version row may be deleted given the baseline and cutoff.
///
/// The version must pass [`has_cleared_wait_period`]. Custom versions
/// (major 0) are then always deletable; others only when not above the
/// baseline.
pub fn is_deletable_version(
    version: &Parsed<ReleaseVersion>,
    baseline: &ParsedVersion,
    max_deletable_date: Timestamp,
) -> bool {
    if !has_cleared_wait_period(&version.item, max_deletable_date) {
        return false;
    }
    if version.version.is_custom() {
        return true;
    }
    !is_greater_version(&version.version, baseline)
}

/// Timing half of version eligibility.
///
/// `true` when the version is not deleted yet, its rules have been cleared,
/// and the clear date is strictly before `max_deletable_date`.
pub fn has_cleared_wait_period(version: &ReleaseVersion, max_deletable_date: Timestamp) -> bool {
    if version.is_deleted() {
        return false;
    }
    let Some(raw) = version.rules_cleared_at() else {
        return false;
    };
    match parse_host_timestamp(raw) {
        Some(cleared_at) => cleared_at < max_deletable_date,
        None => false,
    }
}

/// The latest rules-cleared date that still qualifies for deletion.
///
/// A wait period too large to represent yields the earliest possible
/// timestamp, so no version qualifies.
pub fn max_deletable_date(page_load_time: Timestamp, wait_days: i64) -> Timestamp {
    TimeDelta::try_days(wait_days)
        .and_then(|wait| page_load_time.checked_sub_signed(wait))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Parse a timestamp the way the host emits them.
///
/// Accepts RFC 3339, naive date-times (as UTC) and bare dates (UTC
/// midnight). Returns `None` for anything else.
pub fn parse_host_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in NAIVE_DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
