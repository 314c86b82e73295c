//! Recipe domain service.
//!
//! Implements [`RecipesCommand`] and [`RecipesQuery`]. Writes are validated
//! against the catalogue before reaching the repository, and every recipe
//! leaving the service is decorated with the viewer's favourite, cart and
//! subscription flags.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    CatalogueRepository, RecipeFilter, RecipeListRequest, RecipeRepository,
    RecipeRepositoryError, RecipesCommand, RecipesQuery, RelationFilter, RelationRepository,
    RelationRepositoryError,
};
use crate::domain::{
    Error, Page, Recipe, RecipeDraft, RecipeId, RecipeView, SHORT_CODE_ATTEMPTS, ShortCode,
    UserId, catalogue_service::map_catalogue_error,
};

/// Recipe service over the recipe store, the catalogue and the three
/// relation stores used for viewer flags.
#[derive(Clone)]
pub struct RecipesService<R, C, F, S, U> {
    recipes: Arc<R>,
    catalogue: Arc<C>,
    favorites: Arc<F>,
    cart: Arc<S>,
    subscriptions: Arc<U>,
}

impl<R, C, F, S, U> RecipesService<R, C, F, S, U> {
    pub fn new(
        recipes: Arc<R>,
        catalogue: Arc<C>,
        favorites: Arc<F>,
        cart: Arc<S>,
        subscriptions: Arc<U>,
    ) -> Self {
        Self {
            recipes,
            catalogue,
            favorites,
            cart,
            subscriptions,
        }
    }
}

pub(crate) fn map_recipe_error(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipeRepositoryError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
        RecipeRepositoryError::ShortCodeTaken => {
            Error::internal("could not allocate a unique short code")
        }
        RecipeRepositoryError::UnknownReference { message } => Error::invalid_request(message),
        RecipeRepositoryError::NotFound => Error::not_found("recipe not found"),
    }
}

/// Map failures of a read-only relation lookup.
pub(crate) fn map_flag_error(error: RelationRepositoryError) -> Error {
    match error {
        RelationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("relation repository unavailable: {message}"))
        }
        other => Error::internal(format!("relation repository error: {other}")),
    }
}

fn recipe_not_found(id: &RecipeId) -> Error {
    Error::not_found(format!("recipe {id} not found"))
}

fn unknown_references(field: &str, ids: Vec<i64>) -> Error {
    Error::invalid_request(format!("unknown {field}"))
        .with_details(json!({ "field": field, "code": "unknown_reference", "ids": ids }))
}

impl<R, C, F, S, U> RecipesService<R, C, F, S, U>
where
    R: RecipeRepository,
    C: CatalogueRepository,
    F: RelationRepository<Target = RecipeId>,
    S: RelationRepository<Target = RecipeId>,
    U: RelationRepository<Target = UserId>,
{
    async fn ensure_references_exist(&self, draft: &RecipeDraft) -> Result<(), Error> {
        let missing = self
            .catalogue
            .missing_ingredients(&draft.ingredient_ids())
            .await
            .map_err(map_catalogue_error)?;
        if !missing.is_empty() {
            let ids = missing.into_iter().map(|id| id.get()).collect();
            return Err(unknown_references("ingredients", ids));
        }

        let missing = self
            .catalogue
            .missing_tags(draft.tags())
            .await
            .map_err(map_catalogue_error)?;
        if !missing.is_empty() {
            let ids = missing.into_iter().map(|id| id.get()).collect();
            return Err(unknown_references("tags", ids));
        }
        Ok(())
    }

    async fn find(&self, id: &RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find_by_id(id)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| recipe_not_found(id))
    }

    async fn find_owned(&self, user: &UserId, id: &RecipeId) -> Result<Recipe, Error> {
        let recipe = self.find(id).await?;
        if &recipe.author.id != user {
            return Err(Error::forbidden("only the author may change this recipe"));
        }
        Ok(recipe)
    }

    async fn insert_with_fresh_code(
        &self,
        author: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, Error> {
        for _ in 0..SHORT_CODE_ATTEMPTS {
            let code = ShortCode::generate();
            match self
                .recipes
                .insert(RecipeId::random(), author, &code, draft)
                .await
            {
                Err(RecipeRepositoryError::ShortCodeTaken) => continue,
                result => return result.map_err(map_recipe_error),
            }
        }
        Err(map_recipe_error(RecipeRepositoryError::ShortCodeTaken))
    }

    /// Decorate recipes with the viewer's flags, preserving order.
    async fn views(
        &self,
        viewer: Option<&UserId>,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeView>, Error> {
        let Some(viewer) = viewer else {
            return Ok(recipes.into_iter().map(RecipeView::anonymous).collect());
        };
        if recipes.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<RecipeId> = recipes.iter().map(|recipe| recipe.id).collect();
        let authors: Vec<UserId> = recipes
            .iter()
            .map(|recipe| recipe.author.id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let favorited = self
            .favorites
            .targets_among(viewer, &ids)
            .await
            .map_err(map_flag_error)?;
        let in_cart = self
            .cart
            .targets_among(viewer, &ids)
            .await
            .map_err(map_flag_error)?;
        let subscribed = self
            .subscriptions
            .targets_among(viewer, &authors)
            .await
            .map_err(map_flag_error)?;

        Ok(recipes
            .into_iter()
            .map(|recipe| RecipeView {
                author_is_subscribed: subscribed.contains(&recipe.author.id),
                is_favorited: favorited.contains(&recipe.id),
                is_in_shopping_cart: in_cart.contains(&recipe.id),
                recipe,
            })
            .collect())
    }

    async fn view(&self, viewer: Option<&UserId>, recipe: Recipe) -> Result<RecipeView, Error> {
        let id = recipe.id;
        self.views(viewer, vec![recipe])
            .await?
            .pop()
            .ok_or_else(|| recipe_not_found(&id))
    }
}

#[async_trait]
impl<R, C, F, S, U> RecipesCommand for RecipesService<R, C, F, S, U>
where
    R: RecipeRepository,
    C: CatalogueRepository,
    F: RelationRepository<Target = RecipeId>,
    S: RelationRepository<Target = RecipeId>,
    U: RelationRepository<Target = UserId>,
{
    async fn create(&self, author: &UserId, draft: RecipeDraft) -> Result<RecipeView, Error> {
        self.ensure_references_exist(&draft).await?;
        let recipe = self.insert_with_fresh_code(author, &draft).await?;
        // Nobody can have related a recipe that did not exist a moment ago.
        Ok(RecipeView::anonymous(recipe))
    }

    async fn update(
        &self,
        user: &UserId,
        id: &RecipeId,
        draft: RecipeDraft,
    ) -> Result<RecipeView, Error> {
        self.find_owned(user, id).await?;
        self.ensure_references_exist(&draft).await?;
        let recipe = self
            .recipes
            .update(id, &draft)
            .await
            .map_err(map_recipe_error)?;
        self.view(Some(user), recipe).await
    }

    async fn delete(&self, user: &UserId, id: &RecipeId) -> Result<(), Error> {
        self.find_owned(user, id).await?;
        let deleted = self.recipes.delete(id).await.map_err(map_recipe_error)?;
        if deleted {
            Ok(())
        } else {
            Err(recipe_not_found(id))
        }
    }
}

#[async_trait]
impl<R, C, F, S, U> RecipesQuery for RecipesService<R, C, F, S, U>
where
    R: RecipeRepository,
    C: CatalogueRepository,
    F: RelationRepository<Target = RecipeId>,
    S: RelationRepository<Target = RecipeId>,
    U: RelationRepository<Target = UserId>,
{
    async fn recipe(&self, viewer: Option<UserId>, id: &RecipeId) -> Result<RecipeView, Error> {
        let recipe = self.find(id).await?;
        self.view(viewer.as_ref(), recipe).await
    }

    async fn recipes(&self, request: RecipeListRequest) -> Result<Page<RecipeView>, Error> {
        let RecipeListRequest {
            viewer,
            tags,
            author,
            is_favorited,
            is_in_shopping_cart,
            page,
        } = request;

        let relation = |present: Option<bool>| {
            viewer
                .as_ref()
                .zip(present)
                .map(|(user, present)| RelationFilter {
                    user: user.clone(),
                    present,
                })
        };
        let filter = RecipeFilter {
            tags,
            author,
            favorited: relation(is_favorited),
            in_shopping_cart: relation(is_in_shopping_cart),
        };

        let Page { items, total } = self
            .recipes
            .list(&filter, &page)
            .await
            .map_err(map_recipe_error)?;
        let items = self.views(viewer.as_ref(), items).await?;
        Ok(Page::new(items, total))
    }

    async fn short_code(&self, id: &RecipeId) -> Result<ShortCode, Error> {
        Ok(self.find(id).await?.short_code)
    }

    async fn resolve_short_code(&self, code: &ShortCode) -> Result<RecipeId, Error> {
        self.recipes
            .find_by_short_code(code)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| Error::not_found(format!("short link {code} not found")))
    }
}

#[cfg(test)]
#[path = "recipes_service_tests.rs"]
mod tests;
