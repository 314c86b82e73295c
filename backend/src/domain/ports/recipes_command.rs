//! Driving port for recipe writes.

use async_trait::async_trait;

use crate::domain::{Error, RecipeDraft, RecipeId, RecipeView, UserId};

/// Recipe create, update and delete use cases. Only the author may update or
/// delete a recipe.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipesCommand: Send + Sync {
    /// Create a recipe authored by `author`.
    async fn create(&self, author: &UserId, draft: RecipeDraft) -> Result<RecipeView, Error>;

    /// Replace a recipe's fields, ingredients and tags.
    async fn update(
        &self,
        user: &UserId,
        id: &RecipeId,
        draft: RecipeDraft,
    ) -> Result<RecipeView, Error>;

    async fn delete(&self, user: &UserId, id: &RecipeId) -> Result<(), Error>;
}

/// Command port that rejects writes when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipesCommand;

fn store_unavailable() -> Error {
    Error::service_unavailable("recipe store is not configured")
}

#[async_trait]
impl RecipesCommand for FixtureRecipesCommand {
    async fn create(&self, _author: &UserId, _draft: RecipeDraft) -> Result<RecipeView, Error> {
        Err(store_unavailable())
    }

    async fn update(
        &self,
        _user: &UserId,
        _id: &RecipeId,
        _draft: RecipeDraft,
    ) -> Result<RecipeView, Error> {
        Err(store_unavailable())
    }

    async fn delete(&self, _user: &UserId, _id: &RecipeId) -> Result<(), Error> {
        Err(store_unavailable())
    }
}
