//! Driving port for ingredient and tag lookups.

use async_trait::async_trait;

use crate::domain::{Error, Ingredient, IngredientId, Tag, TagId};

/// Read-only catalogue use cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Ingredients whose name starts with `name_prefix`, ignoring case.
    async fn ingredients(&self, name_prefix: &str) -> Result<Vec<Ingredient>, Error>;

    async fn ingredient(&self, id: IngredientId) -> Result<Ingredient, Error>;

    async fn tags(&self) -> Result<Vec<Tag>, Error>;

    async fn tag(&self, id: TagId) -> Result<Tag, Error>;
}

/// Empty catalogue used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogueQuery;

#[async_trait]
impl CatalogueQuery for FixtureCatalogueQuery {
    async fn ingredients(&self, _name_prefix: &str) -> Result<Vec<Ingredient>, Error> {
        Ok(Vec::new())
    }

    async fn ingredient(&self, id: IngredientId) -> Result<Ingredient, Error> {
        Err(Error::not_found(format!("ingredient {} not found", id.get())))
    }

    async fn tags(&self) -> Result<Vec<Tag>, Error> {
        Ok(Vec::new())
    }

    async fn tag(&self, id: TagId) -> Result<Tag, Error> {
        Err(Error::not_found(format!("tag {} not found", id.get())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn fixture_catalogue_is_empty() {
        let query = FixtureCatalogueQuery;
        assert!(query.ingredients("").await.expect("ingredients").is_empty());
        assert!(query.tags().await.expect("tags").is_empty());
        let error = query.tag(TagId::new(1)).await.expect_err("no tags");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
