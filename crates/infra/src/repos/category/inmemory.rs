use super::ICategoryRepo;
use crate::repos::shared::inmemory_repo::*;
use appointer_domain::{Category, ID};
use std::sync::Mutex;

pub struct InMemoryCategoryRepo {
    categories: Mutex<Vec<Category>>,
}

impl InMemoryCategoryRepo {
    pub fn new() -> Self {
        Self {
            categories: Mutex::new(vec![]),
        }
    }
}

#[async_trait::async_trait]
impl ICategoryRepo for InMemoryCategoryRepo {
    async fn insert_or_get(&self, category: &Category) -> anyhow::Result<Category> {
        Ok(find_or_insert(category, &self.categories, |c| {
            c.name == category.name
        }))
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Category>> {
        let mut categories = find_by(&self.categories, |_| true);
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find(&self, category_id: &ID) -> Option<Category> {
        find(category_id, &self.categories)
    }
}
