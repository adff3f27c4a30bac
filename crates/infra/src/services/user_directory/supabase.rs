use super::{IUserDirectory, UserContact, UserLookupError};
use crate::config::UserDirectoryConfig;
use appointer_domain::ID;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

/// Looks up `User`s through the admin api of the hosted auth provider
pub struct SupabaseUserDirectory {
    client: Client,
    base_url: String,
    service_role_key: String,
}

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    #[serde(default)]
    email: Option<String>,
}

impl SupabaseUserDirectory {
    pub fn new(config: &UserDirectoryConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|e| {
                warn!("Unable to build user directory http client: {:?}", e);
                Client::new()
            });
        Self {
            client,
            base_url: config.base_url.clone(),
            service_role_key: config.service_role_key.clone(),
        }
    }

    fn user_url(&self, user_id: &ID) -> String {
        format!("{}/auth/v1/admin/users/{}", self.base_url, user_id)
    }
}

#[async_trait::async_trait]
impl IUserDirectory for SupabaseUserDirectory {
    async fn get_contact(&self, user_id: &ID) -> Result<UserContact, UserLookupError> {
        let res = self
            .client
            .get(self.user_url(user_id))
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .send()
            .await
            .map_err(|e| UserLookupError::Unavailable(e.to_string()))?;

        match res.status() {
            StatusCode::NOT_FOUND => return Err(UserLookupError::NotFound(user_id.clone())),
            status if !status.is_success() => {
                return Err(UserLookupError::Unavailable(format!(
                    "Unexpected status code: {}",
                    status
                )))
            }
            _ => (),
        }

        let user = res
            .json::<SupabaseUser>()
            .await
            .map_err(|e| UserLookupError::Unavailable(e.to_string()))?;

        match user.email {
            Some(email) if !email.trim().is_empty() => Ok(UserContact {
                user_id: user_id.clone(),
                email,
            }),
            _ => Err(UserLookupError::NotFound(user_id.clone())),
        }
    }
}
