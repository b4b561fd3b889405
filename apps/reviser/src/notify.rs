use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Success,
    Error,
}

/// A user-facing toast.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

/// Delivery of notifications is platform-specific; the core only emits them.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Terminal notifier: logs the notification and echoes it on stderr.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            Level::Success => info!(message = %notification.message, "notification"),
            Level::Error => error!(message = %notification.message, "notification"),
        }
        eprintln!(
            "[{}] {}",
            notification.at.format("%H:%M:%S"),
            notification.message
        );
    }
}

/// Keeps every notification in memory.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: std::sync::Mutex<Vec<Notification>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|n| n.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, level: Level) -> usize {
        self.notifications()
            .iter()
            .filter(|n| n.level == level)
            .count()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut n) = self.notifications.lock() {
            n.push(notification);
        }
    }
}
