//! Host release-management API seam.
//!
//! Every call here is fire-and-forget from the pruner's point of view:
//! outcomes arrive later through the invoke slot (rule deletion) or a
//! per-call callback (version deletion).

use std::fmt;
use std::sync::Arc;

use apprel_core::models::Rule;
use apprel_core::types::Timestamp;
use apprel_core::version::ParsedVersion;
use serde::{Deserialize, Serialize};

use crate::invoke::InvokeSlot;

/// Callback for [`ReleaseApi::delete_or_undelete_version`].
pub type DeleteVersionCallback = Box<dyn FnOnce(DeleteVersionResponse) + Send>;

/// The app currently selected in the admin UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRef {
    pub name: String,
    pub app_type: String,
}

/// Method name passed to `delete_or_undelete_version`. The pruner only
/// ever deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionMethod {
    DeleteVersion,
}

impl VersionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            VersionMethod::DeleteVersion => "DeleteVersion",
        }
    }
}

impl fmt::Display for VersionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version coordinates as the host expects them: decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionCoordinates {
    pub major: String,
    pub minor: String,
    pub patch: String,
    pub revision: Option<String>,
}

impl From<&ParsedVersion> for VersionCoordinates {
    fn from(version: &ParsedVersion) -> Self {
        Self {
            major: version.major.to_string(),
            minor: version.minor.to_string(),
            patch: version.patch.to_string(),
            revision: None,
        }
    }
}

/// Outcome reported by the host for a version delete/undelete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteVersionResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Calls the pruner makes into the host application.
pub trait ReleaseApi: Send + Sync {
    /// The app whose rules and versions are loaded.
    fn selected_app(&self) -> AppRef;

    /// Days a version must wait after its rules are cleared before it may
    /// be deleted.
    fn rule_deleted_wait_days(&self) -> i64;

    /// When the admin page was loaded; the wait period counts back from it.
    fn page_load_time(&self) -> Timestamp;

    /// The host's shared completion channel.
    fn invoke_slot(&self) -> Arc<InvokeSlot>;

    /// Delete a rule. Completion is reported through [`Self::invoke_slot`].
    fn delete_rule(&self, rule: &Rule, datacenters: &[String]);

    /// Delete or undelete a version; `callback` receives the outcome.
    fn delete_or_undelete_version(
        &self,
        method: VersionMethod,
        app_name: &str,
        version: &VersionCoordinates,
        datacenters: &[String],
        callback: DeleteVersionCallback,
    );

    /// Reload the rules grid from the host's source of truth.
    fn load_all_rules(&self, app_name: &str);

    /// Reload the versions grid from the host's source of truth.
    fn load_versions(&self, app_name: &str, app_type: &str);
}
