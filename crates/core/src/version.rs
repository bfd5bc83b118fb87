//! Release version parsing and ordering.
//!
//! Release versions are always three dot-separated base-10 numbers
//! (`major.minor.patch`). Anything else is rejected with
//! [`CoreError::InvalidVersion`]; there is no lenient fallback for
//! non-numeric segments.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of segments a release version must have.
const SEGMENT_COUNT: usize = 3;

// ---------------------------------------------------------------------------
// ParsedVersion
// ---------------------------------------------------------------------------

/// A `major.minor.patch` version together with the string it came from.
///
/// Ordering and equality only look at the numeric triple; the raw string
/// is kept for messages and host requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    /// The string exactly as it appeared in the grid row.
    pub raw: String,
}

impl ParsedVersion {
    /// The numeric `(major, minor, patch)` key used for comparisons.
    pub fn triple(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch)
    }

    /// Major version 0 marks a custom build, which is never compared
    /// against the released baseline.
    pub fn is_custom(&self) -> bool {
        self.major == 0
    }
}

impl PartialEq for ParsedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.triple() == other.triple()
    }
}

impl Eq for ParsedVersion {}

impl PartialOrd for ParsedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ParsedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple().cmp(&other.triple())
    }
}

impl fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a `major.minor.patch` string.
///
/// Fails when the string does not split into exactly three segments or
/// when a segment is not a plain base-10 number (no sign, no whitespace).
pub fn parse_version(version: &str) -> Result<ParsedVersion, CoreError> {
    let segments: Vec<&str> = version.split('.').collect();
    if segments.len() != SEGMENT_COUNT {
        return Err(CoreError::InvalidVersion {
            version: version.to_string(),
            reason: format!(
                "expected {SEGMENT_COUNT} segments, found {}",
                segments.len()
            ),
        });
    }

    Ok(ParsedVersion {
        major: parse_segment(version, "major", segments[0])?,
        minor: parse_segment(version, "minor", segments[1])?,
        patch: parse_segment(version, "patch", segments[2])?,
        raw: version.to_string(),
    })
}

fn parse_segment(version: &str, name: &str, segment: &str) -> Result<u32, CoreError> {
    let invalid = |reason: String| CoreError::InvalidVersion {
        version: version.to_string(),
        reason,
    };

    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("{name} segment {segment:?} is not a number")));
    }
    segment
        .parse::<u32>()
        .map_err(|e| invalid(format!("{name} segment {segment:?}: {e}")))
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// `true` iff `target` is strictly greater than `base`, comparing major,
/// then minor, then patch.
pub fn is_greater_version(target: &ParsedVersion, base: &ParsedVersion) -> bool {
    target.triple() > base.triple()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> ParsedVersion {
        parse_version(s).expect("test version should parse")
    }

    #[test]
    fn parses_three_part_version() {
        let parsed = v("1.2.3");
        assert_eq!(parsed.triple(), (1, 2, 3));
        assert_eq!(parsed.raw, "1.2.3");
    }

    #[test]
    fn keeps_raw_string_with_leading_zeros() {
        let parsed = v("01.002.3");
        assert_eq!(parsed.triple(), (1, 2, 3));
        assert_eq!(parsed.raw, "01.002.3");
        assert_eq!(parsed.to_string(), "1.2.3");
    }

    #[test]
    fn rejects_two_segments() {
        let err = parse_version("1.2").unwrap_err();
        assert!(matches!(err, CoreError::InvalidVersion { .. }));
    }

    #[test]
    fn rejects_four_segments() {
        assert!(parse_version("1.2.3.4").is_err());
    }

    #[test]
    fn rejects_empty_string() {
        assert!(parse_version("").is_err());
    }

    #[test]
    fn rejects_non_numeric_segment() {
        let err = parse_version("1.x.3").unwrap_err();
        match err {
            CoreError::InvalidVersion { reason, .. } => assert!(reason.contains("minor")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_signed_and_padded_segments() {
        assert!(parse_version("1.-2.3").is_err());
        assert!(parse_version("1. 2.3").is_err());
        assert!(parse_version("1..3").is_err());
    }

    #[test]
    fn rejects_overflowing_segment() {
        assert!(parse_version("1.2.99999999999").is_err());
    }

    #[test]
    fn greater_major_wins_over_lower_minor_and_patch() {
        assert!(is_greater_version(&v("2.0.0"), &v("1.9.9")));
    }

    #[test]
    fn equal_versions_are_not_greater() {
        assert!(!is_greater_version(&v("1.2.3"), &v("1.2.3")));
    }

    #[test]
    fn lower_patch_is_not_greater() {
        assert!(!is_greater_version(&v("1.2.2"), &v("1.2.3")));
    }

    #[test]
    fn minor_decides_when_major_equal() {
        assert!(is_greater_version(&v("1.3.0"), &v("1.2.9")));
        assert!(!is_greater_version(&v("1.1.9"), &v("1.2.0")));
    }

    #[test]
    fn ordering_ignores_raw_string() {
        assert_eq!(v("1.02.3"), v("1.2.3"));
        assert!(v("0.1.0") < v("0.1.1"));
    }

    #[test]
    fn major_zero_is_custom() {
        assert!(v("0.4.1").is_custom());
        assert!(!v("1.0.0").is_custom());
    }
}
