//! Handler coverage for the recipe endpoints.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{MockRecipesCommand, MockRecipesQuery};
use crate::domain::{
    Email, Error, Ingredient, IngredientId, Page, Recipe, RecipeId, RecipeIngredient, RecipeView,
    ShortCode, Slug, Tag, TagId, User, UserId, Username,
};
use crate::inbound::http::test_utils::{
    session_cookie, sign_in, sign_in_uri, test_session_middleware,
};

const AUTHOR: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn author() -> User {
    User {
        id: UserId::new(AUTHOR).expect("author id"),
        email: Email::new("chef@example.com").expect("email"),
        username: Username::new("chef").expect("username"),
        first_name: "Julia".to_owned(),
        last_name: "Child".to_owned(),
        avatar: None,
    }
}

fn view() -> RecipeView {
    RecipeView {
        recipe: Recipe {
            id: RecipeId::random(),
            author: author(),
            name: "Omelette".to_owned(),
            image: "recipes/omelette.png".to_owned(),
            text: "Whisk and fry.".to_owned(),
            cooking_time: 10,
            short_code: ShortCode::new("a1b2c").expect("short code"),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).single().expect("timestamp"),
            ingredients: vec![RecipeIngredient {
                ingredient: Ingredient {
                    id: IngredientId::new(1),
                    name: "eggs".to_owned(),
                    measurement_unit: "pcs".to_owned(),
                },
                amount: 3,
            }],
            tags: vec![Tag {
                id: TagId::new(2),
                name: "Breakfast".to_owned(),
                slug: Slug::new("breakfast").expect("slug"),
            }],
        },
        author_is_subscribed: false,
        is_favorited: true,
        is_in_shopping_cart: false,
    }
}

fn recipe_body(cooking_time: i64) -> Value {
    json!({
        "ingredients": [{"id": 1, "amount": 3}],
        "tags": [2],
        "image": "recipes/omelette.png",
        "name": "Omelette",
        "text": "Whisk and fry.",
        "cooking_time": cooking_time,
    })
}

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(sign_in)
        .service(
            web::scope("/api/v1")
                .service(list_recipes)
                .service(create_recipe)
                .service(get_link)
                .service(get_recipe)
                .service(update_recipe)
                .service(delete_recipe),
        )
}

async fn signed_in(
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

#[actix_web::test]
async fn anonymous_list_forwards_filters_and_wraps_page() {
    let mut query = MockRecipesQuery::new();
    query
        .expect_recipes()
        .withf(|request| {
            request.viewer.is_none()
                && request.tags.len() == 2
                && request.author.is_none()
                && request.is_favorited == Some(true)
                && request.is_in_shopping_cart.is_none()
                && request.page.page() == 1
                && request.page.limit() == 1
        })
        .times(1)
        .return_once(|_| Ok(Page::new(vec![view()], 4)));
    let state = HttpState {
        recipes_query: Arc::new(query),
        ..HttpState::fixtures()
    };
    let app = actix_test::init_service(test_app(state)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/recipes?tags=breakfast&tags=lunch&is_favorited=1&is_in_shopping_cart=yes&limit=1")
            .insert_header(("Host", "food.example"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["count"], 4);
    assert_eq!(body["previous"], Value::Null);
    assert_eq!(
        body["next"],
        "http://food.example/api/v1/recipes?tags=breakfast&tags=lunch&is_favorited=1&is_in_shopping_cart=yes&limit=1&page=2"
    );
    let first = &body["results"][0];
    assert_eq!(first["author"]["username"], "chef");
    assert_eq!(first["ingredients"][0]["measurement_unit"], "pcs");
    assert_eq!(first["tags"][0]["slug"], "breakfast");
    assert_eq!(first["is_favorited"], true);
}

#[rstest]
#[case("/api/v1/recipes?author=someone")]
#[case("/api/v1/recipes?tags=not%20a%20slug")]
#[case("/api/v1/recipes?page=0")]
#[actix_web::test]
async fn malformed_list_queries_are_rejected(#[case] uri: &str) {
    let mut query = MockRecipesQuery::new();
    query.expect_recipes().never();
    let state = HttpState {
        recipes_query: Arc::new(query),
        ..HttpState::fixtures()
    };
    let app = actix_test::init_service(test_app(state)).await;

    let res =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn create_requires_a_session() {
    let mut command = MockRecipesCommand::new();
    command.expect_create().never();
    let state = HttpState {
        recipes: Arc::new(command),
        ..HttpState::fixtures()
    };
    let app = actix_test::init_service(test_app(state)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/recipes")
            .set_json(recipe_body(10))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_validates_before_calling_the_service() {
    let mut command = MockRecipesCommand::new();
    command.expect_create().never();
    let state = HttpState {
        recipes: Arc::new(command),
        ..HttpState::fixtures()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = signed_in(&app, &author().id).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/recipes")
            .cookie(cookie)
            .set_json(recipe_body(0))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "cooking_time");
}

#[actix_web::test]
async fn create_returns_created_recipe_for_session_user() {
    let mut command = MockRecipesCommand::new();
    command
        .expect_create()
        .withf(|author, draft| author.as_ref() == AUTHOR && draft.name() == "Omelette")
        .times(1)
        .return_once(|_, _| Ok(view()));
    let state = HttpState {
        recipes: Arc::new(command),
        ..HttpState::fixtures()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = signed_in(&app, &author().id).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/recipes")
            .cookie(cookie)
            .set_json(recipe_body(10))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["name"], "Omelette");
    assert_eq!(body["created_at"], "2024-05-01T09:00:00Z");
}

#[rstest]
#[case(Error::forbidden("only the author may change this recipe"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("recipe not found"), StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn delete_surfaces_service_refusals(#[case] error: Error, #[case] expected: StatusCode) {
    let mut command = MockRecipesCommand::new();
    command
        .expect_delete()
        .times(1)
        .return_once(move |_, _| Err(error));
    let state = HttpState {
        recipes: Arc::new(command),
        ..HttpState::fixtures()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = signed_in(&app, &UserId::random()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/recipes/{}", RecipeId::random()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), expected);
}

#[actix_web::test]
async fn delete_by_author_is_no_content() {
    let mut command = MockRecipesCommand::new();
    command.expect_delete().times(1).return_once(|_, _| Ok(()));
    let state = HttpState {
        recipes: Arc::new(command),
        ..HttpState::fixtures()
    };
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = signed_in(&app, &author().id).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/recipes/{}", RecipeId::random()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn get_link_builds_absolute_short_url() {
    let mut query = MockRecipesQuery::new();
    query
        .expect_short_code()
        .times(1)
        .return_once(|_| Ok(ShortCode::new("a1b2c").expect("code")));
    let state = HttpState {
        recipes_query: Arc::new(query),
        ..HttpState::fixtures()
    };
    let app = actix_test::init_service(test_app(state)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/recipes/{}/get-link", RecipeId::random()))
            .insert_header(("Host", "food.example"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({"short-link": "http://food.example/s/a1b2c"}));
}

#[actix_web::test]
async fn anonymous_reader_gets_recipe() {
    let expected = view();
    let id = expected.recipe.id;
    let mut query = MockRecipesQuery::new();
    query
        .expect_recipe()
        .withf(move |viewer, requested| viewer.is_none() && *requested == id)
        .times(1)
        .return_once(move |_, _| Ok(expected));
    let state = HttpState {
        recipes_query: Arc::new(query),
        ..HttpState::fixtures()
    };
    let app = actix_test::init_service(test_app(state)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/recipes/{id}"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["id"], id.to_string());
}
