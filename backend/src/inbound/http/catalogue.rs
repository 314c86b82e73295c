//! Ingredient and tag read endpoints.
//!
//! ```text
//! GET /api/v1/ingredients?name=sug
//! GET /api/v1/ingredients/{id}
//! GET /api/v1/tags
//! GET /api/v1/tags/{id}
//! ```
//!
//! The catalogue is public; no session is required.

use actix_web::{HttpRequest, HttpResponse, get, web};

use crate::domain::{IngredientId, TagId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{IngredientResponse, TagResponse};
use crate::inbound::http::query::QueryPairs;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_catalogue_id};

const ID: FieldName = FieldName::new("id");

/// List ingredients, optionally filtered by a case-insensitive name prefix.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    params(("name" = Option<String>, Query, description = "Name prefix")),
    responses(
        (status = 200, description = "Ingredients ordered by name", body = [IngredientResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listIngredients",
    security([])
)]
#[get("/ingredients")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let query = QueryPairs::from_request(&req);
    let prefix = query.first("name").unwrap_or_default();
    let ingredients = state.catalogue.ingredients(prefix).await?;
    let body: Vec<IngredientResponse> = ingredients.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    get,
    path = "/api/v1/ingredients/{id}",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getIngredient",
    security([])
)]
#[get("/ingredients/{id}")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = IngredientId::new(parse_catalogue_id(&path, ID)?);
    let ingredient = state.catalogue.ingredient(id).await?;
    Ok(HttpResponse::Ok().json(IngredientResponse::from(ingredient)))
}

#[utoipa::path(
    get,
    path = "/api/v1/tags",
    responses(
        (status = 200, description = "Tags ordered by name", body = [TagResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listTags",
    security([])
)]
#[get("/tags")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let tags = state.catalogue.tags().await?;
    let body: Vec<TagResponse> = tags.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    get,
    path = "/api/v1/tags/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getTag",
    security([])
)]
#[get("/tags/{id}")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = TagId::new(parse_catalogue_id(&path, ID)?);
    let tag = state.catalogue.tag(id).await?;
    Ok(HttpResponse::Ok().json(TagResponse::from(tag)))
}
