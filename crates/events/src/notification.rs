//! Operator-facing notifications (the admin UI's toasts).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a notification, mapped by the host to toast styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Error,
}

/// A single toast shown to the operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    /// Short headline, e.g. `"All deletable rules have been selected."`.
    pub title: String,
    /// Secondary line, e.g. `"3 items"` or a failure reason.
    pub detail: String,
    /// When the notification was raised (UTC).
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            detail: detail.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn info(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, title, detail)
    }

    pub fn error(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, title, detail)
    }
}

/// Where notifications go. Implemented by the host's toast mechanism,
/// or by [`NotificationBus`](crate::bus::NotificationBus).
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}
