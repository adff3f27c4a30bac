use super::INotificationSender;
use appointer_domain::Notification;
use std::sync::Mutex;

/// Records every delivered `Notification`. Used for testing.
pub struct InMemoryNotificationSender {
    sent: Mutex<Vec<Notification>>,
    failing_recipients: Mutex<Vec<String>>,
}

impl InMemoryNotificationSender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(vec![]),
            failing_recipients: Mutex::new(vec![]),
        }
    }

    /// Every delivery to this address will fail until `recover` is called
    pub fn fail_for(&self, address: &str) {
        if let Ok(mut failing) = self.failing_recipients.lock() {
            failing.push(address.to_string());
        }
    }

    pub fn recover(&self, address: &str) {
        if let Ok(mut failing) = self.failing_recipients.lock() {
            failing.retain(|a| a != address);
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl INotificationSender for InMemoryNotificationSender {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
        let failing = self
            .failing_recipients
            .lock()
            .map(|failing| failing.contains(&notification.to))
            .unwrap_or(false);
        if failing {
            anyhow::bail!("Mail transport rejected recipient: {}", notification.to);
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(notification.clone());
        }
        Ok(())
    }
}
