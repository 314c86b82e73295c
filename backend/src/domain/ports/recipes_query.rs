//! Driving port for recipe reads and short links.

use async_trait::async_trait;
use pagination::PageParams;

use crate::domain::{Error, Page, RecipeId, RecipeView, ShortCode, Slug, UserId};

/// Recipe list request as expressed by a client.
///
/// The relation flags only apply to authenticated viewers and are ignored
/// otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeListRequest {
    pub viewer: Option<UserId>,
    pub tags: Vec<Slug>,
    pub author: Option<UserId>,
    pub is_favorited: Option<bool>,
    pub is_in_shopping_cart: Option<bool>,
    pub page: PageParams,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipesQuery: Send + Sync {
    /// Fetch one recipe as seen by `viewer`.
    async fn recipe(&self, viewer: Option<UserId>, id: &RecipeId) -> Result<RecipeView, Error>;

    /// Newest-first page of recipes matching the request.
    async fn recipes(&self, request: RecipeListRequest) -> Result<Page<RecipeView>, Error>;

    /// Short code of an existing recipe.
    async fn short_code(&self, id: &RecipeId) -> Result<ShortCode, Error>;

    /// Recipe a short code points at.
    async fn resolve_short_code(&self, code: &ShortCode) -> Result<RecipeId, Error>;
}

/// Query port over an empty recipe store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipesQuery;

#[async_trait]
impl RecipesQuery for FixtureRecipesQuery {
    async fn recipe(&self, _viewer: Option<UserId>, id: &RecipeId) -> Result<RecipeView, Error> {
        Err(Error::not_found(format!("recipe {id} not found")))
    }

    async fn recipes(&self, _request: RecipeListRequest) -> Result<Page<RecipeView>, Error> {
        Ok(Page::empty())
    }

    async fn short_code(&self, id: &RecipeId) -> Result<ShortCode, Error> {
        Err(Error::not_found(format!("recipe {id} not found")))
    }

    async fn resolve_short_code(&self, code: &ShortCode) -> Result<RecipeId, Error> {
        Err(Error::not_found(format!("short link {code} not found")))
    }
}
