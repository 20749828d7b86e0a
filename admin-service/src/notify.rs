use std::time::Duration;

use serde::Serialize;
use tracing::warn;

pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(5);

/// A transient toast shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    #[serde(skip)]
    pub duration: Duration,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            duration: NOTIFICATION_DURATION,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Surfaces notifications through the service log.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        warn!(
            title = %notification.title,
            duration_ms = notification.duration.as_millis() as u64,
            "{}",
            notification.description
        );
    }
}
