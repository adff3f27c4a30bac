use super::{IUserDirectory, UserContact, UserLookupError};
use appointer_domain::ID;
use std::sync::Mutex;

pub struct InMemoryUserDirectory {
    users: Mutex<Vec<UserContact>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(vec![]),
        }
    }

    pub fn insert(&self, contact: UserContact) {
        if let Ok(mut users) = self.users.lock() {
            users.retain(|u| u.user_id != contact.user_id);
            users.push(contact);
        }
    }

    pub fn remove(&self, user_id: &ID) {
        if let Ok(mut users) = self.users.lock() {
            users.retain(|u| u.user_id != *user_id);
        }
    }
}

#[async_trait::async_trait]
impl IUserDirectory for InMemoryUserDirectory {
    async fn get_contact(&self, user_id: &ID) -> Result<UserContact, UserLookupError> {
        let users = self
            .users
            .lock()
            .map_err(|_| UserLookupError::Unavailable("Poisoned user directory".into()))?;
        users
            .iter()
            .find(|u| u.user_id == *user_id)
            .cloned()
            .ok_or_else(|| UserLookupError::NotFound(user_id.clone()))
    }
}
