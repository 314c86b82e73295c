//! Builders wiring repository adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;

use foodgram_backend::domain::{
    CatalogueService, RecipeRelationsService, RecipesService, ShoppingListService,
    SubscriptionsService, UsersService,
};
use foodgram_backend::inbound::http::state::HttpState;
use foodgram_backend::outbound::persistence::{
    DbPool, DieselCatalogueRepository, DieselFavoriteRepository, DieselRecipeRepository,
    DieselShoppingCartRepository, DieselShoppingListRepository, DieselSubscriptionRepository,
    DieselUserRepository,
};

use super::ServerConfig;

/// Services backed by PostgreSQL, sharing one set of repositories.
fn build_db_state(pool: &DbPool) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let catalogue = Arc::new(DieselCatalogueRepository::new(pool.clone()));
    let recipes = Arc::new(DieselRecipeRepository::new(pool.clone()));
    let favorites = Arc::new(DieselFavoriteRepository::new(pool.clone()));
    let cart = Arc::new(DieselShoppingCartRepository::new(pool.clone()));
    let subscriptions = Arc::new(DieselSubscriptionRepository::new(pool.clone()));
    let cart_lines = Arc::new(DieselShoppingListRepository::new(pool.clone()));

    let recipes_service = Arc::new(RecipesService::new(
        recipes.clone(),
        catalogue.clone(),
        favorites.clone(),
        cart.clone(),
        subscriptions.clone(),
    ));
    let subscriptions_service = Arc::new(SubscriptionsService::new(
        users.clone(),
        recipes.clone(),
        subscriptions.clone(),
    ));

    HttpState {
        catalogue: Arc::new(CatalogueService::new(catalogue)),
        recipes: recipes_service.clone(),
        recipes_query: recipes_service,
        relations: Arc::new(RecipeRelationsService::new(recipes, favorites, cart)),
        shopping_list: Arc::new(ShoppingListService::new(cart_lines)),
        users: Arc::new(UsersService::new(users, subscriptions)),
        subscriptions: subscriptions_service.clone(),
        subscriptions_query: subscriptions_service,
    }
}

/// Build the shared HTTP state from the configured pool, falling back to
/// fixtures when none is configured.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => build_db_state(pool),
        None => HttpState::fixtures(),
    };
    web::Data::new(state)
}
