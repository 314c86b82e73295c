//! Favourites and shopping cart endpoints.
//!
//! ```text
//! POST   /api/v1/recipes/{id}/favorite
//! DELETE /api/v1/recipes/{id}/favorite
//! POST   /api/v1/recipes/{id}/shopping_cart
//! DELETE /api/v1/recipes/{id}/shopping_cart
//! GET    /api/v1/recipes/download_shopping_cart
//! ```

use actix_web::{HttpResponse, delete, get, http::header, post, web};

use crate::domain::{RecipeSummary, RelationAction, RelationOutcome, SHOPPING_LIST_FILENAME};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::RecipeSummaryResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_recipe_id};

const ID: FieldName = FieldName::new("id");

/// Which of the user's recipe sets a request targets.
#[derive(Debug, Clone, Copy)]
enum RecipeSet {
    Favorites,
    ShoppingCart,
}

/// `201` with the recipe summary after an add, `204` after a removal.
fn toggle_response(outcome: RelationOutcome<RecipeSummary>) -> HttpResponse {
    match outcome {
        RelationOutcome::Added(summary) => {
            HttpResponse::Created().json(RecipeSummaryResponse::from(summary))
        }
        RelationOutcome::Removed => HttpResponse::NoContent().finish(),
    }
}

async fn toggle(
    state: &HttpState,
    session: &SessionContext,
    raw_id: &str,
    set: RecipeSet,
    action: RelationAction,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let recipe = parse_recipe_id(raw_id, ID)?;
    let outcome = match set {
        RecipeSet::Favorites => state.relations.favorite(&user, &recipe, action).await?,
        RecipeSet::ShoppingCart => {
            state
                .relations
                .shopping_cart(&user, &recipe, action)
                .await?
        }
    };
    Ok(toggle_response(outcome))
}

#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/favorite",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added to favourites", body = RecipeSummaryResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Recipe not found", body = ErrorSchema),
        (status = 409, description = "Already a favourite", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "addFavorite",
    security(("SessionCookie" = []))
)]
#[post("/recipes/{id}/favorite")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    toggle(
        &state,
        &session,
        &path,
        RecipeSet::Favorites,
        RelationAction::Add,
    )
    .await
}

#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}/favorite",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed from favourites"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Recipe or favourite not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "removeFavorite",
    security(("SessionCookie" = []))
)]
#[delete("/recipes/{id}/favorite")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    toggle(
        &state,
        &session,
        &path,
        RecipeSet::Favorites,
        RelationAction::Remove,
    )
    .await
}

#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/shopping_cart",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added to the cart", body = RecipeSummaryResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Recipe not found", body = ErrorSchema),
        (status = 409, description = "Already in the cart", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "addToShoppingCart",
    security(("SessionCookie" = []))
)]
#[post("/recipes/{id}/shopping_cart")]
pub async fn add_to_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    toggle(
        &state,
        &session,
        &path,
        RecipeSet::ShoppingCart,
        RelationAction::Add,
    )
    .await
}

#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}/shopping_cart",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed from the cart"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Recipe or cart entry not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "removeFromShoppingCart",
    security(("SessionCookie" = []))
)]
#[delete("/recipes/{id}/shopping_cart")]
pub async fn remove_from_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    toggle(
        &state,
        &session,
        &path,
        RecipeSet::ShoppingCart,
        RelationAction::Remove,
    )
    .await
}

/// Download the aggregated shopping list as a plain-text attachment.
///
/// Must be registered before `GET /recipes/{id}`.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/download_shopping_cart",
    responses(
        (status = 200, description = "Shopping list", content_type = "text/plain", body = String,
            headers(("Content-Disposition" = String, description = "Attachment file name"))),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Cart is empty", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "downloadShoppingCart",
    security(("SessionCookie" = []))
)]
#[get("/recipes/download_shopping_cart")]
pub async fn download_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let list = state.shopping_list.shopping_list(&user).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header(header::ContentDisposition::attachment(SHOPPING_LIST_FILENAME))
        .body(list.render()))
}
