use crate::shared::usecase::UseCase;
use appointer_domain::Category;
use appointer_infra::AppointerContext;
use tracing::error;

#[derive(Debug, Default)]
pub struct GetCategoriesUseCase {}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetCategoriesUseCase {
    type Response = Vec<Category>;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetCategories";

    async fn execute(&mut self, ctx: &AppointerContext) -> Result<Self::Response, Self::Errors> {
        ctx.repos.categories.find_all().await.map_err(|e| {
            error!("Unable to find categories. Err: {:?}", e);
            UseCaseErrors::StorageError
        })
    }
}
