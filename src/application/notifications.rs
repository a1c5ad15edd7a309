//! Toast queue backing the notification sink in the terminal UI.

use crate::domain::{Clock, Notification, NotificationSink, Severity, SystemClock};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// How long a toast stays on screen.
pub const TOAST_LIFETIME: Duration = Duration::from_secs(4);

/// Toasts beyond this count push out the oldest one.
pub const MAX_VISIBLE_TOASTS: usize = 3;

#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

/// Bounded queue of recent notifications, newest last.
///
/// Toasts are stamped and aged by the queue's clock, the same clock the
/// controller uses for the copy confirmation.
#[derive(Debug)]
pub struct ToastQueue<K: Clock = SystemClock> {
    toasts: VecDeque<Toast>,
    clock: K,
}

impl Default for ToastQueue<SystemClock> {
    fn default() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl ToastQueue<SystemClock> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K: Clock> ToastQueue<K> {
    pub fn with_clock(clock: K) -> Self {
        Self {
            toasts: VecDeque::new(),
            clock,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        match notification.severity {
            Severity::Info => info!(title = %notification.title, "{}", notification.description),
            Severity::Error => warn!(title = %notification.title, "{}", notification.description),
        }

        self.toasts.push_back(Toast {
            notification,
            shown_at: self.clock.now(),
        });
        while self.toasts.len() > MAX_VISIBLE_TOASTS {
            self.toasts.pop_front();
        }
    }

    /// Drops toasts older than [`TOAST_LIFETIME`]. Returns whether any were removed.
    pub fn expire(&mut self) -> bool {
        let now = self.clock.now();
        let before = self.toasts.len();
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.shown_at) < TOAST_LIFETIME);
        self.toasts.len() != before
    }

    pub fn dismiss_all(&mut self) {
        self.toasts.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn latest(&self) -> Option<&Notification> {
        self.toasts.back().map(|toast| &toast.notification)
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl<K: Clock> NotificationSink for ToastQueue<K> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}
