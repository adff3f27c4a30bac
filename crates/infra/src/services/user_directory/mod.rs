mod inmemory;
mod supabase;

use appointer_domain::ID;
pub use inmemory::InMemoryUserDirectory;
pub use supabase::SupabaseUserDirectory;
use thiserror::Error;

/// How to reach a `User`. Resolved on demand and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct UserContact {
    pub user_id: ID,
    pub email: String,
}

#[derive(Error, Debug)]
pub enum UserLookupError {
    #[error("User with id: {0} was not found")]
    NotFound(ID),
    #[error("User directory is unavailable. Error message: `{0}`")]
    Unavailable(String),
}

/// Resolves the contact address of the externally managed `User`s
#[async_trait::async_trait]
pub trait IUserDirectory: Send + Sync {
    async fn get_contact(&self, user_id: &ID) -> Result<UserContact, UserLookupError>;
}
