use super::ICategoryRepo;
use appointer_domain::{Category, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresCategoryRepo {
    pool: PgPool,
}

impl PostgresCategoryRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRaw {
    category_uid: Uuid,
    category_name: String,
}

impl From<CategoryRaw> for Category {
    fn from(raw: CategoryRaw) -> Self {
        Category {
            id: raw.category_uid.into(),
            name: raw.category_name,
        }
    }
}

#[async_trait::async_trait]
impl ICategoryRepo for PostgresCategoryRepo {
    async fn insert_or_get(&self, category: &Category) -> anyhow::Result<Category> {
        // The no-op update makes RETURNING yield the existing row on conflict
        let category = sqlx::query_as::<_, CategoryRaw>(
            r#"
            INSERT INTO categories(category_uid, category_name)
            VALUES($1, $2)
            ON CONFLICT (category_name)
            DO UPDATE SET category_name = EXCLUDED.category_name
            RETURNING *
            "#,
        )
        .bind(category.id.inner_ref())
        .bind(&category.name)
        .fetch_one(&self.pool)
        .await?;

        Ok(category.into())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, CategoryRaw>(
            r#"
            SELECT * FROM categories AS c
            ORDER BY c.category_name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    async fn find(&self, category_id: &ID) -> Option<Category> {
        match sqlx::query_as::<_, CategoryRaw>(
            r#"
            SELECT * FROM categories AS c
            WHERE c.category_uid = $1
            "#,
        )
        .bind(category_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        {
            Ok(category) => category.map(|c| c.into()),
            Err(e) => {
                error!("Unable to find category {}. Err: {:?}", category_id, e);
                None
            }
        }
    }
}
