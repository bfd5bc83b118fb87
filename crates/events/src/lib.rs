//! Operator notification infrastructure for the release pruner.
//!
//! - [`Notification`] -- a toast with level, title and detail.
//! - [`NotificationSink`] -- the seam the pruner reports through.
//! - [`NotificationBus`] -- in-process publish/subscribe sink backed by
//!   `tokio::sync::broadcast`.

pub mod bus;
pub mod notification;

pub use bus::NotificationBus;
pub use notification::{Notification, NotificationLevel, NotificationSink};
