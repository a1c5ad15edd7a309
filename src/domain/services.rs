//! Collaborator interfaces for the submission workflow.
//!
//! The controller talks to the outside world only through these traits:
//! the rewriting service, the clipboard, the notification sink and a clock.
//! Production implementations live in the infrastructure layer; tests
//! substitute stubs.

use super::errors::{ClipboardError, ServiceError};
use super::models::Notification;
use std::time::Instant;

/// A remote service that turns raw text into formal academic phrasing.
///
/// Implementations block until the service answers. They are run on a
/// worker thread, never on the UI thread.
pub trait RewriteService {
    fn rewrite(&self, text: &str) -> Result<String, ServiceError>;
}

/// Write access to the host clipboard.
pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Fire-and-forget destination for user-facing notifications.
pub trait NotificationSink {
    fn notify(&mut self, notification: Notification);
}

impl NotificationSink for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Source of monotonic time for timed UI state.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
