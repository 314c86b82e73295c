//! Shared harness for end-to-end HTTP tests over the in-memory store.

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use serde_json::{Value, json};

use foodgram_backend::Trace;
use foodgram_backend::domain::{Ingredient, Tag, UserId};
use foodgram_backend::inbound::http::api_routes;
use foodgram_backend::inbound::http::error::json_error_handler;
use foodgram_backend::inbound::http::short_link::follow_short_link;
use foodgram_backend::inbound::http::test_utils::{
    session_cookie, sign_in, sign_in_uri, test_session_middleware,
};
use foodgram_backend::test_support::InMemoryStore;

/// Application wired like the server, with a test sign-in route.
pub fn app(
    store: &InMemoryStore,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::new(store.http_state()))
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Trace)
        .wrap(test_session_middleware())
        .service(sign_in)
        .service(web::scope("/api/v1").configure(api_routes))
        .service(follow_short_link)
}

/// Session cookie for `user`.
pub async fn signed_in(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    user: &UserId,
) -> Cookie<'static> {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri(&sign_in_uri(user))
            .to_request(),
    )
    .await;
    session_cookie(&res).expect("session cookie")
}

/// Recipe payload using `amount` of each ingredient.
pub fn recipe_body(name: &str, ingredients: &[&Ingredient], amount: u32, tags: &[&Tag]) -> Value {
    json!({
        "ingredients": ingredients
            .iter()
            .map(|ingredient| json!({"id": ingredient.id.get(), "amount": amount}))
            .collect::<Vec<_>>(),
        "tags": tags.iter().map(|tag| tag.id.get()).collect::<Vec<_>>(),
        "image": format!("recipes/{name}.png"),
        "name": name,
        "text": "Combine and cook.",
        "cooking_time": 15,
    })
}

/// Create a recipe as the cookie's user and return the response body.
pub async fn create_recipe(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    cookie: &Cookie<'static>,
    body: Value,
) -> Value {
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/recipes")
            .cookie(cookie.clone())
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), actix_web::http::StatusCode::CREATED);
    actix_test::read_body_json(res).await
}

/// Send `req` with `cookie` attached.
pub async fn call_as(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    cookie: &Cookie<'static>,
    req: actix_test::TestRequest,
) -> ServiceResponse {
    actix_test::call_service(app, req.cookie(cookie.clone()).to_request()).await
}
