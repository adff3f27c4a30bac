use crate::shared::usecase::UseCase;
use appointer_domain::Category;
use appointer_infra::AppointerContext;
use tracing::error;

/// Creates a `Category`, or returns the existing one with the same name
#[derive(Debug)]
pub struct CreateCategoryUseCase {
    pub name: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    EmptyName,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateCategoryUseCase {
    type Response = Category;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "CreateCategory";

    async fn execute(&mut self, ctx: &AppointerContext) -> Result<Self::Response, Self::Errors> {
        let category = Category::new(&self.name).ok_or(UseCaseErrors::EmptyName)?;

        ctx.repos
            .categories
            .insert_or_get(&category)
            .await
            .map_err(|e| {
                error!("Unable to insert category {}. Err: {:?}", category.name, e);
                UseCaseErrors::StorageError
            })
    }
}
