//! Grid row models for rules and versions.
//!
//! Field names follow the host's JSON so snapshots can be read directly
//! and rules can be handed back to the host unchanged on delete.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Anything that carries a release version string.
pub trait Versioned {
    fn version(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// A release rule row from the `ALL RULES` grid.
///
/// A rule with an empty `uuid` and `location_id` is a system rule; a rule
/// with a `uuid` is a custom rule scoped to that uuid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub uuid: String,
    #[serde(default)]
    pub location_id: String,
    #[serde(default)]
    pub everyone: bool,
    #[serde(default, rename = "internalonly")]
    pub internal_only: bool,
    #[serde(default, rename = "appcritical")]
    pub app_critical: bool,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub company: String,
    #[serde(default, rename = "sortableid")]
    pub sortable_id: String,
    pub version: String,
    #[serde(default, rename = "appname")]
    pub app_name: String,
    #[serde(default)]
    pub created_dt_lcl: String,
    #[serde(default, rename = "createdDtGMT")]
    pub created_dt_gmt: String,
    #[serde(default)]
    pub rollback_version: String,
    #[serde(default)]
    pub is_rollback: bool,
    #[serde(default)]
    pub is_risky_release: bool,
    #[serde(default)]
    pub datacenters: Vec<String>,
    /// Host columns not modelled above, passed back on delete as received.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Rule {
    /// System rule with no uuid or location scope.
    pub fn is_system(&self) -> bool {
        self.uuid.is_empty() && self.location_id.is_empty()
    }

    /// The system rule that releases a version to everyone.
    pub fn is_everyone(&self) -> bool {
        self.everyone && self.is_system()
    }

    /// The system rule that releases a version to internal users only.
    pub fn is_internal(&self) -> bool {
        self.internal_only && self.is_system()
    }

    /// A rule scoped to a specific uuid.
    ///
    /// The version plays no part: a uuid-scoped rule above the released
    /// baseline is still custom, and so still deletable.
    pub fn is_custom(&self) -> bool {
        !self.uuid.is_empty()
    }
}

impl Versioned for Rule {
    fn version(&self) -> &str {
        &self.version
    }
}

// ---------------------------------------------------------------------------
// ReleaseVersion
// ---------------------------------------------------------------------------

/// A version row from the `VERSIONS` grid.
///
/// The optional timestamps are kept as the host's raw strings; an empty
/// string means the same as an absent value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseVersion {
    #[serde(default)]
    pub id: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_date: String,
    #[serde(default)]
    pub has_rules: bool,
    #[serde(default, rename = "Type", skip_serializing_if = "Option::is_none")]
    pub release_type: Option<Value>,
    #[serde(default)]
    pub rules_cleared_date_time: Option<String>,
    #[serde(default)]
    pub deleted_date_time: Option<String>,
    #[serde(default)]
    pub deploy_deleted_date_time: Option<String>,
    #[serde(default)]
    pub datacenter: String,
    #[serde(default)]
    pub deploy_size: i64,
    #[serde(default)]
    pub is_concurrent: bool,
    #[serde(default)]
    pub internal_release_period: i64,
    #[serde(default)]
    pub pool: String,
    #[serde(default)]
    pub datacenters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_centers_map: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReleaseVersion {
    pub fn is_deleted(&self) -> bool {
        present(&self.deleted_date_time).is_some()
    }

    /// The raw rules-cleared timestamp, if the host set one.
    pub fn rules_cleared_at(&self) -> Option<&str> {
        present(&self.rules_cleared_date_time)
    }
}

impl Versioned for ReleaseVersion {
    fn version(&self) -> &str {
        &self.version
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
