//! Favourites and shopping cart service.
//!
//! Both relations use the shared toggle in [`crate::domain::relation`] with
//! the recipe short representation as their add response.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{RecipeRelationsCommand, RecipeRepository, RelationRepository};
use crate::domain::recipes_service::map_recipe_error;
use crate::domain::relation::{self, TargetRepresentation};
use crate::domain::{
    Error, FAVORITE_MESSAGES, RecipeId, RecipeSummary, RelationAction, RelationOutcome,
    SHOPPING_CART_MESSAGES, UserId,
};

/// Builds [`RecipeSummary`] responses from the recipe store.
pub struct RecipeSummaries<R> {
    recipes: Arc<R>,
}

impl<R> RecipeSummaries<R> {
    pub fn new(recipes: Arc<R>) -> Self {
        Self { recipes }
    }
}

#[async_trait]
impl<R> TargetRepresentation<RecipeId> for RecipeSummaries<R>
where
    R: RecipeRepository,
{
    type Representation = RecipeSummary;

    async fn exists(&self, target: &RecipeId) -> Result<bool, Error> {
        Ok(self.represent(target).await?.is_some())
    }

    async fn represent(&self, target: &RecipeId) -> Result<Option<RecipeSummary>, Error> {
        let recipe = self
            .recipes
            .find_by_id(target)
            .await
            .map_err(map_recipe_error)?;
        Ok(recipe.as_ref().map(|recipe| recipe.summary()))
    }
}

/// Recipe relation service over the favourites and cart stores.
pub struct RecipeRelationsService<R, F, S> {
    summaries: RecipeSummaries<R>,
    favorites: Arc<F>,
    cart: Arc<S>,
}

impl<R, F, S> RecipeRelationsService<R, F, S> {
    pub fn new(recipes: Arc<R>, favorites: Arc<F>, cart: Arc<S>) -> Self {
        Self {
            summaries: RecipeSummaries::new(recipes),
            favorites,
            cart,
        }
    }
}

#[async_trait]
impl<R, F, S> RecipeRelationsCommand for RecipeRelationsService<R, F, S>
where
    R: RecipeRepository,
    F: RelationRepository<Target = RecipeId>,
    S: RelationRepository<Target = RecipeId>,
{
    async fn favorite(
        &self,
        user: &UserId,
        recipe: &RecipeId,
        action: RelationAction,
    ) -> Result<RelationOutcome<RecipeSummary>, Error> {
        relation::apply(
            self.favorites.as_ref(),
            &self.summaries,
            &FAVORITE_MESSAGES,
            user,
            recipe,
            action,
        )
        .await
    }

    async fn shopping_cart(
        &self,
        user: &UserId,
        recipe: &RecipeId,
        action: RelationAction,
    ) -> Result<RelationOutcome<RecipeSummary>, Error> {
        relation::apply(
            self.cart.as_ref(),
            &self.summaries,
            &SHOPPING_CART_MESSAGES,
            user,
            recipe,
            action,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{
        MockRecipeRepository, MockRelationRepository, RelationRepositoryError,
    };
    use crate::domain::{Email, Recipe, ShortCode, User, Username};
    use chrono::Utc;
    use rstest::rstest;

    fn recipe() -> Recipe {
        Recipe {
            id: RecipeId::random(),
            author: User {
                id: UserId::random(),
                email: Email::new("chef@example.com").expect("email"),
                username: Username::new("chef").expect("username"),
                first_name: "Chef".to_owned(),
                last_name: "Cook".to_owned(),
                avatar: None,
            },
            name: "Okroshka".to_owned(),
            image: "recipes/okroshka.png".to_owned(),
            text: "Serve cold.".to_owned(),
            cooking_time: 15,
            short_code: ShortCode::new("0a9f3").expect("code"),
            created_at: Utc::now(),
            ingredients: Vec::new(),
            tags: Vec::new(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn favorite_add_then_repeat_add_conflicts() {
        let stored = recipe();
        let id = stored.id;
        let expected = stored.summary();
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find_by_id()
            .times(2)
            .returning(move |_| Ok(Some(stored.clone())));
        let mut favorites = MockRelationRepository::new();
        let mut seq = mockall::Sequence::new();
        favorites
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_, _| Ok(()));
        favorites
            .expect_insert()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_, _| Err(RelationRepositoryError::already_exists()));

        let service = RecipeRelationsService::new(
            Arc::new(recipes),
            Arc::new(favorites),
            Arc::new(MockRelationRepository::new()),
        );
        let user = UserId::random();

        let first = service
            .favorite(&user, &id, RelationAction::Add)
            .await
            .expect("first add");
        assert_eq!(first, RelationOutcome::Added(expected));

        let second = service
            .favorite(&user, &id, RelationAction::Add)
            .await
            .expect_err("second add");
        assert_eq!(second.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn cart_remove_of_absent_recipe_is_not_found() {
        let stored = recipe();
        let id = stored.id;
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Ok(Some(stored)));
        let mut cart = MockRelationRepository::new();
        cart.expect_remove().times(1).return_once(|_, _| Ok(false));

        let service = RecipeRelationsService::new(
            Arc::new(recipes),
            Arc::new(MockRelationRepository::new()),
            Arc::new(cart),
        );

        let error = service
            .shopping_cart(&UserId::random(), &id, RelationAction::Remove)
            .await
            .expect_err("absent pair");
        assert_eq!(error.code(), ErrorCode::NotFound);
        assert_eq!(error.message(), SHOPPING_CART_MESSAGES.absent);
    }
}
