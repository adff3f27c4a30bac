mod inmemory;
mod postgres;

use appointer_domain::{Category, ID};
pub use inmemory::InMemoryCategoryRepo;
pub use postgres::PostgresCategoryRepo;

#[async_trait::async_trait]
pub trait ICategoryRepo: Send + Sync {
    /// Inserts the `Category` unless one with the same name exists, in which case
    /// the existing `Category` is returned
    async fn insert_or_get(&self, category: &Category) -> anyhow::Result<Category>;
    /// Every `Category` ordered by name
    async fn find_all(&self) -> anyhow::Result<Vec<Category>>;
    async fn find(&self, category_id: &ID) -> Option<Category>;
}
