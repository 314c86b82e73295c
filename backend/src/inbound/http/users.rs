//! Users and subscriptions API handlers.
//!
//! ```text
//! GET    /api/v1/users?page=2&limit=10
//! GET    /api/v1/users/me
//! GET    /api/v1/users/subscriptions?recipes_limit=3
//! GET    /api/v1/users/{id}
//! POST   /api/v1/users/{id}/subscribe?recipes_limit=3
//! DELETE /api/v1/users/{id}/subscribe
//! ```
//!
//! `/users/me` and `/users/subscriptions` must be registered before
//! `/users/{id}`.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};

use crate::domain::{RelationAction, RelationOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::dto::{SubscriptionResponse, UserProfileResponse};
use crate::inbound::http::query::{QueryPairs, paginate};
use crate::inbound::http::schemas::{ErrorSchema, SubscriptionPageSchema, UserPageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_recipes_limit, parse_user_id};

const ID: FieldName = FieldName::new("id");
const RECIPES_LIMIT: FieldName = FieldName::new("recipes_limit");

/// List users ordered by username.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use foodgram_backend::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Users", body = UserPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security((), ("SessionCookie" = []))
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let page = QueryPairs::from_request(&req).page_params()?;
    let users = state.users.users(session.user_id()?, page).await?;
    let body = paginate(&req, users, page, UserProfileResponse::from);
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

/// Profile of the session user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("SessionCookie" = []))
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let profile = state.users.user(Some(user_id.clone()), &user_id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(UserProfileResponse::from(profile)))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserProfileResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser",
    security((), ("SessionCookie" = []))
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path, ID)?;
    let profile = state.users.user(session.user_id()?, &id).await?;
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(UserProfileResponse::from(profile)))
}

/// Authors the session user follows, each with a recipe preview.
#[utoipa::path(
    get,
    path = "/api/v1/users/subscriptions",
    params(
        ("recipes_limit" = Option<u32>, Query, description = "Recipes shown per author"),
        ("page" = Option<u32>, Query, description = "1-based page number"),
        ("limit" = Option<u32>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Followed authors", body = SubscriptionPageSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listSubscriptions",
    security(("SessionCookie" = []))
)]
#[get("/users/subscriptions")]
pub async fn list_subscriptions(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let query = QueryPairs::from_request(&req);
    let page = query.page_params()?;
    let recipes_limit = parse_recipes_limit(query.first("recipes_limit"), RECIPES_LIMIT)?;
    let subscriptions = state
        .subscriptions_query
        .subscriptions(&user, page, recipes_limit)
        .await?;
    let body = paginate(&req, subscriptions, page, SubscriptionResponse::from);
    Ok(HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body))
}

async fn toggle_subscription(
    state: &HttpState,
    session: &SessionContext,
    req: &HttpRequest,
    action: RelationAction,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let author = parse_user_id(req.match_info().query("id"), ID)?;
    let recipes_limit = parse_recipes_limit(
        QueryPairs::from_request(req).first("recipes_limit"),
        RECIPES_LIMIT,
    )?;
    let outcome = state
        .subscriptions
        .subscription(&user, &author, action, recipes_limit)
        .await?;
    Ok(match outcome {
        RelationOutcome::Added(profile) => {
            HttpResponse::Created().json(SubscriptionResponse::from(profile))
        }
        RelationOutcome::Removed => HttpResponse::NoContent().finish(),
    })
}

/// Follow an author.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/subscribe",
    params(
        ("id" = String, Path, description = "Author id"),
        ("recipes_limit" = Option<u32>, Query, description = "Recipes shown in the preview")
    ),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Author not found", body = ErrorSchema),
        (status = 409, description = "Already subscribed or self-subscription", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "subscribe",
    security(("SessionCookie" = []))
)]
#[post("/users/{id}/subscribe")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    toggle_subscription(&state, &session, &req, RelationAction::Add).await
}

/// Stop following an author.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/subscribe",
    params(("id" = String, Path, description = "Author id")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Author or subscription not found", body = ErrorSchema),
        (status = 409, description = "Self-subscription", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "unsubscribe",
    security(("SessionCookie" = []))
)]
#[delete("/users/{id}/subscribe")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    toggle_subscription(&state, &session, &req, RelationAction::Remove).await
}
