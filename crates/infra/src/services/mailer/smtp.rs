use super::INotificationSender;
use crate::config::SmtpConfig;
use appointer_domain::Notification;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::info;

pub struct SmtpNotificationSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotificationSender {
    pub fn new(config: &SmtpConfig) -> anyhow::Result<Self> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| anyhow::anyhow!("Invalid SMTP_FROM: {}. Error: {}", config.from, e))?;

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?.port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }
        info!(
            "Sending notifications through SMTP relay {}:{}",
            config.host, config.port
        );

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait::async_trait]
impl INotificationSender for SmtpNotificationSender {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
        let to = notification
            .to
            .parse::<Mailbox>()
            .map_err(|e| anyhow::anyhow!("Invalid recipient: {}. Error: {}", notification.to, e))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(notification.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(notification.body.clone())?;

        self.transport.send(email).await?;
        Ok(())
    }
}
