//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint of the inbound layer, the short-link
//!   redirect and the health probes
//! - **Schemas**: request and response DTOs plus the error wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`]) that document domain types
//!   without coupling them to utoipa
//! - **Security**: Session cookie authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::dto::{
    IngredientAmountRequest, IngredientResponse, RecipeIngredientResponse, RecipeRequest,
    RecipeResponse, RecipeSummaryResponse, SubscriptionResponse, TagResponse,
    UserProfileResponse,
};
use crate::inbound::http::recipes::ShortLinkResponse;
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, RecipePageSchema, SubscriptionPageSchema, UserPageSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie issued by the identity layer.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Foodgram backend API",
        description = "Recipe sharing: catalogue, recipes, favourites, shopping carts and subscriptions.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::catalogue::list_ingredients,
        crate::inbound::http::catalogue::get_ingredient,
        crate::inbound::http::catalogue::list_tags,
        crate::inbound::http::catalogue::get_tag,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::get_link,
        crate::inbound::http::relations::add_favorite,
        crate::inbound::http::relations::remove_favorite,
        crate::inbound::http::relations::add_to_shopping_cart,
        crate::inbound::http::relations::remove_from_shopping_cart,
        crate::inbound::http::relations::download_shopping_cart,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::list_subscriptions,
        crate::inbound::http::users::subscribe,
        crate::inbound::http::users::unsubscribe,
        crate::inbound::http::short_link::follow_short_link,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        UserProfileResponse,
        TagResponse,
        IngredientResponse,
        RecipeIngredientResponse,
        RecipeResponse,
        RecipeSummaryResponse,
        SubscriptionResponse,
        IngredientAmountRequest,
        RecipeRequest,
        ShortLinkResponse,
        RecipePageSchema,
        UserPageSchema,
        SubscriptionPageSchema,
    )),
    tags(
        (name = "catalogue", description = "Ingredients and tags"),
        (name = "recipes", description = "Recipes, favourites and shopping carts"),
        (name = "users", description = "User profiles and subscriptions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
