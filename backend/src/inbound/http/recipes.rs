//! Recipe endpoints.
//!
//! ```text
//! GET    /api/v1/recipes?tags=breakfast&author={id}&is_favorited=1&page=2
//! POST   /api/v1/recipes
//! GET    /api/v1/recipes/{id}
//! PATCH  /api/v1/recipes/{id}
//! DELETE /api/v1/recipes/{id}
//! GET    /api/v1/recipes/{id}/get-link
//! ```
//!
//! Reads are open to anonymous viewers; writes need a session and only the
//! author may change a recipe.

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::RecipeDraft;
use crate::domain::ports::RecipeListRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::dto::{RecipeRequest, RecipeResponse};
use crate::inbound::http::query::{QueryPairs, paginate};
use crate::inbound::http::schemas::{ErrorSchema, RecipePageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::short_link::short_link_path;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_flag, parse_recipe_id, parse_slugs, parse_user_id, recipe_validation_error,
};

const ID: FieldName = FieldName::new("id");
const TAGS: FieldName = FieldName::new("tags");
const AUTHOR: FieldName = FieldName::new("author");

/// Response of `GET /recipes/{id}/get-link`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    #[schema(example = "https://foodgram.example/s/a1b2c")]
    pub short_link: String,
}

/// List recipes newest first.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(
        ("tags" = Option<Vec<String>>, Query, description = "Tag slugs; any match qualifies"),
        ("author" = Option<String>, Query, description = "Author id"),
        ("is_favorited" = Option<u8>, Query, description = "1 or 0; ignored when anonymous"),
        ("is_in_shopping_cart" = Option<u8>, Query, description = "1 or 0; ignored when anonymous"),
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Recipes", body = RecipePageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes",
    security((), ("SessionCookie" = []))
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let query = QueryPairs::from_request(&req);
    let page = query.page_params()?;
    let request = RecipeListRequest {
        viewer: session.user_id()?,
        tags: parse_slugs(query.all("tags"), TAGS)?,
        author: query
            .first("author")
            .map(|raw| parse_user_id(raw, AUTHOR))
            .transpose()?,
        is_favorited: parse_flag(query.first("is_favorited")),
        is_in_shopping_cart: parse_flag(query.first("is_in_shopping_cart")),
        page,
    };

    let recipes = state.recipes_query.recipes(request).await?;
    let body = paginate(&req, recipes, page, RecipeResponse::from);
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe",
    security((), ("SessionCookie" = []))
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_recipe_id(&path, ID)?;
    let view = state.recipes_query.recipe(session.user_id()?, &id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(RecipeResponse::from(view)))
}

/// Create a recipe authored by the session user.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe",
    security(("SessionCookie" = []))
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let author = session.require_user_id()?;
    let draft = RecipeDraft::try_from(payload.into_inner()).map_err(recipe_validation_error)?;
    let view = state.recipes.create(&author, draft).await?;
    Ok(HttpResponse::Created().json(RecipeResponse::from(view)))
}

/// Replace a recipe's fields, ingredients and tags.
#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Updated", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe",
    security(("SessionCookie" = []))
)]
#[patch("/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let id = parse_recipe_id(&path, ID)?;
    let draft = RecipeDraft::try_from(payload.into_inner()).map_err(recipe_validation_error)?;
    let view = state.recipes.update(&user, &id, draft).await?;
    Ok(HttpResponse::Ok().json(RecipeResponse::from(view)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe",
    security(("SessionCookie" = []))
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let id = parse_recipe_id(&path, ID)?;
    state.recipes.delete(&user, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Absolute short link for a recipe, built from the request's scheme and
/// host.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}/get-link",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Short link", body = ShortLinkResponse),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipeLink",
    security([])
)]
#[get("/recipes/{id}/get-link")]
pub async fn get_link(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let id = parse_recipe_id(&path, ID)?;
    let code = state.recipes_query.short_code(&id).await?;
    let info = req.connection_info();
    let short_link = format!(
        "{}://{}{}",
        info.scheme(),
        info.host(),
        short_link_path(&code)
    );
    Ok(HttpResponse::Ok().json(ShortLinkResponse { short_link }))
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
