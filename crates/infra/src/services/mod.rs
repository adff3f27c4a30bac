mod mailer;
mod user_directory;

pub use mailer::{INotificationSender, InMemoryNotificationSender, SmtpNotificationSender};
pub use user_directory::{
    IUserDirectory, InMemoryUserDirectory, SupabaseUserDirectory, UserContact, UserLookupError,
};

use crate::Config;
use std::sync::Arc;

/// External systems the application talks to besides its own store
#[derive(Clone)]
pub struct Services {
    pub mailer: Arc<dyn INotificationSender>,
    pub users: Arc<dyn IUserDirectory>,
}

impl Services {
    pub fn create(config: &Config) -> anyhow::Result<Self> {
        let smtp = config
            .smtp
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("SMTP_HOST env var to be present."))?;
        let user_directory = config.user_directory.as_ref().ok_or_else(|| {
            anyhow::anyhow!("SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY env vars to be present.")
        })?;

        Ok(Self {
            mailer: Arc::new(SmtpNotificationSender::new(smtp)?),
            users: Arc::new(SupabaseUserDirectory::new(user_directory)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            mailer: Arc::new(InMemoryNotificationSender::new()),
            users: Arc::new(InMemoryUserDirectory::new()),
        }
    }
}
