mod inmemory;
mod smtp;

use appointer_domain::Notification;
pub use inmemory::InMemoryNotificationSender;
pub use smtp::SmtpNotificationSender;

/// Delivers `Notification`s. An `Ok` means the transport accepted the message.
#[async_trait::async_trait]
pub trait INotificationSender: Send + Sync {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()>;
}
