//! Read-side port for ingredients and tags.

use async_trait::async_trait;

use crate::domain::{Ingredient, IngredientId, Tag, TagId};

use super::define_port_error;

define_port_error! {
    /// Errors raised when reading the catalogue.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "catalogue read connection failed: {message}",
        /// Query failed during execution or row conversion.
        Query { message: String } =>
            "catalogue read query failed: {message}",
    }
}

/// Port for reading ingredients and tags.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// Ingredients whose name starts with `name_prefix`, ignoring case,
    /// ordered by name. An empty prefix matches everything.
    async fn list_ingredients(
        &self,
        name_prefix: &str,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError>;

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError>;

    /// All tags ordered by name.
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError>;

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError>;

    /// Ids from `ids` with no matching ingredient row.
    async fn missing_ingredients(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, CatalogueRepositoryError>;

    /// Ids from `ids` with no matching tag row.
    async fn missing_tags(&self, ids: &[TagId]) -> Result<Vec<TagId>, CatalogueRepositoryError>;
}
