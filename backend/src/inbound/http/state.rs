//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CatalogueQuery, FixtureCatalogueQuery, FixtureRecipeRelationsCommand, FixtureRecipesCommand,
    FixtureRecipesQuery, FixtureShoppingListQuery, FixtureSubscriptionsCommand,
    FixtureSubscriptionsQuery, FixtureUsersQuery, RecipeRelationsCommand, RecipesCommand,
    RecipesQuery, ShoppingListQuery, SubscriptionsCommand, SubscriptionsQuery, UsersQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub recipes: Arc<dyn RecipesCommand>,
    pub recipes_query: Arc<dyn RecipesQuery>,
    pub relations: Arc<dyn RecipeRelationsCommand>,
    pub shopping_list: Arc<dyn ShoppingListQuery>,
    pub users: Arc<dyn UsersQuery>,
    pub subscriptions: Arc<dyn SubscriptionsCommand>,
    pub subscriptions_query: Arc<dyn SubscriptionsQuery>,
}

impl HttpState {
    /// State backed entirely by fixture ports: an empty, read-only store.
    ///
    /// Tests replace individual fields with mocks using struct update syntax.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use foodgram_backend::domain::ports::FixtureUsersQuery;
    /// use foodgram_backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState {
    ///     users: Arc::new(FixtureUsersQuery),
    ///     ..HttpState::fixtures()
    /// };
    /// let _users = state.users.clone();
    /// ```
    pub fn fixtures() -> Self {
        Self {
            catalogue: Arc::new(FixtureCatalogueQuery),
            recipes: Arc::new(FixtureRecipesCommand),
            recipes_query: Arc::new(FixtureRecipesQuery),
            relations: Arc::new(FixtureRecipeRelationsCommand),
            shopping_list: Arc::new(FixtureShoppingListQuery),
            users: Arc::new(FixtureUsersQuery),
            subscriptions: Arc::new(FixtureSubscriptionsCommand),
            subscriptions_query: Arc::new(FixtureSubscriptionsQuery),
        }
    }
}
