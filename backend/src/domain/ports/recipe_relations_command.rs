//! Driving port for favourites and the shopping cart.

use async_trait::async_trait;

use crate::domain::{Error, RecipeId, RecipeSummary, RelationAction, RelationOutcome, UserId};

/// Add or remove a recipe from one of the user's recipe sets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRelationsCommand: Send + Sync {
    async fn favorite(
        &self,
        user: &UserId,
        recipe: &RecipeId,
        action: RelationAction,
    ) -> Result<RelationOutcome<RecipeSummary>, Error>;

    async fn shopping_cart(
        &self,
        user: &UserId,
        recipe: &RecipeId,
        action: RelationAction,
    ) -> Result<RelationOutcome<RecipeSummary>, Error>;
}

/// Command port over an empty recipe store: every target is missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipeRelationsCommand;

#[async_trait]
impl RecipeRelationsCommand for FixtureRecipeRelationsCommand {
    async fn favorite(
        &self,
        _user: &UserId,
        recipe: &RecipeId,
        _action: RelationAction,
    ) -> Result<RelationOutcome<RecipeSummary>, Error> {
        Err(Error::not_found(format!("recipe {recipe} not found")))
    }

    async fn shopping_cart(
        &self,
        _user: &UserId,
        recipe: &RecipeId,
        _action: RelationAction,
    ) -> Result<RelationOutcome<RecipeSummary>, Error> {
        Err(Error::not_found(format!("recipe {recipe} not found")))
    }
}
