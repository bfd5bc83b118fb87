use crate::types::GridName;

/// Message shown when a version string does not have three dot-separated parts.
pub const VERSION_FORMAT_MESSAGE: &str = r#"Invalid version: It must follow "major.minor.patch" pattern"#;

/// Fatal errors that abort a whole selection or deletion run.
///
/// Both variants are meant to be surfaced to the operator as-is, so their
/// `Display` output is the user-facing text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A row carries a version string that is not `major.minor.patch`.
    #[error("{} (got {version:?}: {reason})", VERSION_FORMAT_MESSAGE)]
    InvalidVersion { version: String, reason: String },

    /// A grid is not in descending version order, usually because the
    /// operator sorted one of its columns.
    #[error(
        "Please remove sorting from `{}` table by reselecting the same app in `COMPONENTS` table.",
        .grid.label()
    )]
    UnsortedGrid { grid: GridName },
}
