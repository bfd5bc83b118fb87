//! Single-item deletes raced against a timeout.
//!
//! Each delete issues exactly one host request and then waits for either
//! the host's completion or the timeout, whichever comes first. Failures
//! are reported to the operator and logged here; successes are only
//! logged.

use std::time::Duration;

use apprel_core::baseline::Parsed;
use apprel_core::models::{ReleaseVersion, Rule};
use apprel_events::{Notification, NotificationSink};
use apprel_host::{
    DeleteVersionResponse, InvokeResponse, InvokeSlotError, ReleaseApi, VersionCoordinates,
    VersionMethod,
};
use tokio::sync::oneshot;

/// Default time to wait for the host to confirm a single delete.
pub const DEFAULT_DELETE_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Reason reported when the host rejects a version delete without a message.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Why a single delete did not succeed.
///
/// `Display` is the operator-facing reason shown in the error toast.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeleteFailure {
    /// The host did not answer within the timeout.
    #[error("Due to timeout reached ({}s.)", .timeout.as_secs_f64().round())]
    TimedOut { timeout: Duration },

    /// The host answered with a failure message.
    #[error("{0}")]
    Rejected(String),

    /// The invoke slot was still intercepted by an earlier request.
    #[error("{0}")]
    ChannelBusy(#[from] InvokeSlotError),
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Delete one rule, reporting the outcome.
pub async fn delete_rule(
    api: &dyn ReleaseApi,
    notifier: &dyn NotificationSink,
    rule: &Rule,
    timeout: Duration,
) -> Result<(), DeleteFailure> {
    let outcome = request_rule_delete(api, rule, timeout).await;

    match &outcome {
        Ok(()) => tracing::info!(version = %rule.version, uuid = %rule.uuid, "Deleted rule"),
        Err(failure) => {
            notifier.notify(Notification::error(
                format!("Unable to delete rule of {}({})", rule.version, rule.uuid),
                failure.to_string(),
            ));
            tracing::error!(
                version = %rule.version,
                uuid = %rule.uuid,
                error = %failure,
                "Failed to delete rule",
            );
        }
    }
    outcome
}

/// Intercept the invoke slot, trigger the host delete, and wait.
///
/// The interception is installed before the host call and dropped as soon
/// as the race settles, so a late completion falls through to the host's
/// own handler.
async fn request_rule_delete(
    api: &dyn ReleaseApi,
    rule: &Rule,
    timeout: Duration,
) -> Result<(), DeleteFailure> {
    let (tx, rx) = oneshot::channel::<InvokeResponse>();
    let slot = api.invoke_slot();
    let interception = slot.install(move |response| {
        if tx.send(response).is_err() {
            tracing::debug!("Rule delete completed after its waiter gave up");
        }
    })?;

    api.delete_rule(rule, &rule.datacenters);

    let response = race_timeout(rx, timeout).await;
    drop(interception);

    match response {
        Some(response) if response.is_success() => Ok(()),
        Some(response) => Err(DeleteFailure::Rejected(response.message)),
        None => Err(DeleteFailure::TimedOut { timeout }),
    }
}

// ---------------------------------------------------------------------------
// Versions
// ---------------------------------------------------------------------------

/// Delete one version, reporting the outcome.
pub async fn delete_version(
    api: &dyn ReleaseApi,
    notifier: &dyn NotificationSink,
    version: &Parsed<ReleaseVersion>,
    timeout: Duration,
) -> Result<(), DeleteFailure> {
    let outcome = request_version_delete(api, version, timeout).await;
    let raw = &version.item.version;

    match &outcome {
        Ok(()) => tracing::info!(version = %raw, "Deleted version"),
        Err(failure) => {
            notifier.notify(Notification::error(
                format!("Unable to delete version - {raw}"),
                failure.to_string(),
            ));
            tracing::error!(version = %raw, error = %failure, "Failed to delete version");
        }
    }
    outcome
}

async fn request_version_delete(
    api: &dyn ReleaseApi,
    version: &Parsed<ReleaseVersion>,
    timeout: Duration,
) -> Result<(), DeleteFailure> {
    let app = api.selected_app();
    let coordinates = VersionCoordinates::from(&version.version);
    let (tx, rx) = oneshot::channel::<DeleteVersionResponse>();

    api.delete_or_undelete_version(
        VersionMethod::DeleteVersion,
        &app.name,
        &coordinates,
        &version.item.datacenters,
        Box::new(move |response| {
            if tx.send(response).is_err() {
                tracing::debug!("Version delete completed after its waiter gave up");
            }
        }),
    );

    match race_timeout(rx, timeout).await {
        Some(response) if response.success => Ok(()),
        Some(response) => Err(DeleteFailure::Rejected(
            response
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        )),
        None => Err(DeleteFailure::TimedOut { timeout }),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Wait for a completion or the timeout. `None` means the timeout won.
///
/// A callback dropped without being called means no answer will ever
/// come, which is treated the same as silence: wait out the timeout.
async fn race_timeout<T>(rx: oneshot::Receiver<T>, timeout: Duration) -> Option<T> {
    let completion = async move {
        match rx.await {
            Ok(value) => value,
            Err(_) => std::future::pending().await,
        }
    };
    tokio::time::timeout(timeout, completion).await.ok()
}
