//! Notification collaborator
//!
//! The transfer coordinator signals each leg of a completed transfer to an
//! external notification channel. Delivery is fire-and-forget: the trait is
//! infallible from the coordinator's perspective, and implementations are
//! expected to swallow and log their own failures.

use async_trait::async_trait;
use tracing::info;

/// Outbound notification channel for account holders.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Inform the holder of `account_id` about one leg of a transfer.
    ///
    /// Invoked exactly once per leg of a successful transfer. Must not
    /// panic; failures stay inside the implementation.
    async fn notify_about_transfer(&self, account_id: &str, description: &str);
}

/// Default notifier: emits one tracing event per notification.
///
/// Stands in for an email/push gateway in this in-memory service.
#[derive(Debug, Default)]
pub struct LogNotificationService;

impl LogNotificationService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationService for LogNotificationService {
    async fn notify_about_transfer(&self, account_id: &str, description: &str) {
        info!(account_id = %account_id, "Notifying: {}", description);
    }
}

/// Recording notifier for tests: captures every (account, message) pair.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: std::sync::Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total notifications recorded so far.
    pub fn count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    /// Messages delivered to one account, in order.
    pub fn messages_for(&self, account_id: &str) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == account_id)
            .map(|(_, message)| message.clone())
            .collect()
    }
}

#[async_trait]
impl NotificationService for RecordingNotifier {
    async fn notify_about_transfer(&self, account_id: &str, description: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push((account_id.to_string(), description.to_string()));
    }
}
