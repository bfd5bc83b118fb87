//! In-process notification bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`NotificationBus`] fans every [`Notification`] out to all subscribers.
//! It is designed to be shared via `Arc<NotificationBus>` and handed to the
//! pruner as its [`NotificationSink`].

use tokio::sync::broadcast;

use crate::notification::{Notification, NotificationLevel, NotificationSink};

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out notification bus.
///
/// # Usage
///
/// ```rust
/// use apprel_events::{Notification, NotificationBus, NotificationSink};
///
/// let bus = NotificationBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.notify(Notification::info("All deletable rules have been selected.", "2 items"));
/// ```
pub struct NotificationBus {
    sender: broadcast::Sender<Notification>,
}

impl NotificationBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed notifications are
    /// dropped and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to all notifications published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl NotificationSink for NotificationBus {
    /// Publish to all current subscribers.
    ///
    /// With no subscribers the notification is only traced.
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => tracing::debug!(
                title = %notification.title,
                detail = %notification.detail,
                "Notification published",
            ),
            NotificationLevel::Error => tracing::debug!(
                title = %notification.title,
                detail = %notification.detail,
                "Error notification published",
            ),
        }
        // SendError only means there are zero receivers.
        let _ = self.sender.send(notification);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = NotificationBus::default();
        let mut rx = bus.subscribe();

        bus.notify(Notification::error("Unable to delete version - 1.0.0", "Unknown error"));

        let received = rx.recv().await.expect("should receive the notification");
        assert_eq!(received.level, NotificationLevel::Error);
        assert_eq!(received.title, "Unable to delete version - 1.0.0");
        assert_eq!(received.detail, "Unknown error");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_notification() {
        let bus = NotificationBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.notify(Notification::info("multi", "1 items"));

        let n1 = rx1.recv().await.expect("subscriber 1 should receive");
        let n2 = rx2.recv().await.expect("subscriber 2 should receive");
        assert_eq!(n1.title, "multi");
        assert_eq!(n2.title, "multi");
    }

    #[test]
    fn notify_with_no_subscribers_does_not_panic() {
        let bus = NotificationBus::default();
        bus.notify(Notification::info("orphan", ""));
    }
}
