//! Terminal rendering of client notifications.

use colored::Colorize;
use evman_client::{Notification, NotificationStatus, Notifier};

/// Writes notifications to stderr, one per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        eprintln!("{}", render(&notification));
    }
}

fn render(notification: &Notification) -> String {
    let title = format!("{}:", notification.title);
    let title = match notification.status {
        NotificationStatus::Error => title.red().bold(),
    };
    format!("{} {}", title, notification.description)
}
