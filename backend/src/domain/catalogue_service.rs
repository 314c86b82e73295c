//! Catalogue read service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CatalogueQuery, CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{Error, Ingredient, IngredientId, Tag, TagId};

/// Serves ingredients and tags straight from the catalogue repository.
#[derive(Clone)]
pub struct CatalogueService<C> {
    repo: Arc<C>,
}

impl<C> CatalogueService<C> {
    pub fn new(repo: Arc<C>) -> Self {
        Self { repo }
    }
}

pub(crate) fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("catalogue repository unavailable: {message}"))
        }
        CatalogueRepositoryError::Query { message } => {
            Error::internal(format!("catalogue repository error: {message}"))
        }
    }
}

#[async_trait]
impl<C> CatalogueQuery for CatalogueService<C>
where
    C: CatalogueRepository,
{
    async fn ingredients(&self, name_prefix: &str) -> Result<Vec<Ingredient>, Error> {
        self.repo
            .list_ingredients(name_prefix)
            .await
            .map_err(map_catalogue_error)
    }

    async fn ingredient(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.repo
            .find_ingredient(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("ingredient {} not found", id.get())))
    }

    async fn tags(&self) -> Result<Vec<Tag>, Error> {
        self.repo.list_tags().await.map_err(map_catalogue_error)
    }

    async fn tag(&self, id: TagId) -> Result<Tag, Error> {
        self.repo
            .find_tag(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("tag {} not found", id.get())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockCatalogueRepository;
    use rstest::rstest;

    fn salt() -> Ingredient {
        Ingredient {
            id: IngredientId::new(7),
            name: "salt".to_owned(),
            measurement_unit: "g".to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn ingredients_pass_the_prefix_through() {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_list_ingredients()
            .withf(|prefix| prefix.eq_ignore_ascii_case("sa"))
            .times(1)
            .return_once(|_| Ok(vec![salt()]));

        let service = CatalogueService::new(Arc::new(repo));
        let found = service.ingredients("sa").await.expect("ingredients");
        assert_eq!(found, vec![salt()]);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_tag_is_not_found() {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_find_tag().times(1).return_once(|_| Ok(None));

        let service = CatalogueService::new(Arc::new(repo));
        let error = service.tag(TagId::new(3)).await.expect_err("missing tag");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(CatalogueRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(CatalogueRepositoryError::query("bad row"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn repository_failures_are_mapped(
        #[case] failure: CatalogueRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockCatalogueRepository::new();
        repo.expect_list_tags().times(1).return_once(move || Err(failure));

        let service = CatalogueService::new(Arc::new(repo));
        let error = service.tags().await.expect_err("failure");
        assert_eq!(error.code(), expected);
    }
}
