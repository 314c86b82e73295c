//! HTTP inbound adapter exposing REST endpoints.

pub mod cache_control;
pub mod catalogue;
pub mod dto;
pub mod error;
pub mod health;
pub(crate) mod query;
pub mod recipes;
pub mod relations;
pub mod schemas;
pub mod session;
pub mod short_link;
pub mod state;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` handler on `cfg`.
///
/// Literal segments such as `/recipes/download_shopping_cart` and
/// `/users/me` are registered ahead of the `{id}` routes they would
/// otherwise be captured by.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use foodgram_backend::inbound::http::api_routes;
///
/// let app = App::new().service(web::scope("/api/v1").configure(api_routes));
/// ```
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(catalogue::list_ingredients)
        .service(catalogue::get_ingredient)
        .service(catalogue::list_tags)
        .service(catalogue::get_tag)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(relations::download_shopping_cart)
        .service(recipes::get_link)
        .service(relations::add_favorite)
        .service(relations::remove_favorite)
        .service(relations::add_to_shopping_cart)
        .service(relations::remove_from_shopping_cart)
        .service(recipes::get_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(users::list_users)
        .service(users::current_user)
        .service(users::list_subscriptions)
        .service(users::get_user)
        .service(users::subscribe)
        .service(users::unsubscribe);
}
