//! User-visible notifications.

use std::sync::Mutex;
use std::time::Duration;

/// How long a notification stays up unless dismissed.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

/// Severity shown with a notification. The client only notifies failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationStatus {
    Error,
}

/// A one-shot, dismissible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub status: NotificationStatus,
    pub duration: Duration,
    pub closable: bool,
}

impl Notification {
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            status: NotificationStatus::Error,
            duration: DEFAULT_DURATION,
            closable: true,
        }
    }
}

/// Surface that shows notifications to the user.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification)
    }
}

/// Keeps every notification it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.title).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_notifications_are_dismissible_toasts() {
        let n = Notification::error("Failed to delete event", "Something went wrong");
        assert_eq!(n.status, NotificationStatus::Error);
        assert_eq!(n.duration, Duration::from_secs(3));
        assert!(n.closable);
    }

    #[test]
    fn recording_keeps_order_through_references() {
        let recorder = RecordingNotifier::new();
        let by_ref = &recorder;
        by_ref.notify(Notification::error("Login failed", "bad password"));
        by_ref.notify(Notification::error("Failed to load events", "timeout"));

        assert_eq!(recorder.titles(), vec!["Login failed", "Failed to load events"]);
    }
}
