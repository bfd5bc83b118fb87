use serde::{Deserialize, Serialize};

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Zero-based position of a row in its grid's data view.
pub type RowIndex = usize;

/// The two grids the pruner reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridName {
    Rules,
    Versions,
}

impl GridName {
    /// Table caption as the admin UI shows it.
    pub fn label(self) -> &'static str {
        match self {
            GridName::Rules => "ALL RULES",
            GridName::Versions => "VERSIONS",
        }
    }
}
