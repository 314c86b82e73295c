//! User profiles and subscriptions end to end.

mod support;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use serde_json::Value;

use foodgram_backend::domain::SELF_SUBSCRIPTION_MESSAGE;
use foodgram_backend::test_support::InMemoryStore;
use support::{app, call_as, create_recipe, recipe_body, signed_in};

#[actix_web::test]
async fn subscribing_shows_author_with_recipe_preview() {
    let store = InMemoryStore::new();
    let reader = store.add_user("reader");
    let chef = store.add_user("chef");
    let eggs = store.add_ingredient("eggs", "pcs");
    let breakfast = store.add_tag("Breakfast", "breakfast");
    let app = actix_test::init_service(app(&store)).await;
    let reader_cookie = signed_in(&app, &reader.id).await;
    let chef_cookie = signed_in(&app, &chef.id).await;
    for name in ["omelette", "frittata", "shakshuka"] {
        create_recipe(
            &app,
            &chef_cookie,
            recipe_body(name, &[&eggs], 2, &[&breakfast]),
        )
        .await;
    }

    let res = call_as(
        &app,
        &reader_cookie,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/users/{}/subscribe?recipes_limit=2", chef.id)),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["username"], "chef");
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes_count"], 3);
    assert_eq!(body["recipes"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["recipes"][0]["name"], "shakshuka");

    let res = call_as(
        &app,
        &reader_cookie,
        actix_test::TestRequest::post().uri(&format!("/api/v1/users/{}/subscribe", chef.id)),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = call_as(
        &app,
        &reader_cookie,
        actix_test::TestRequest::get().uri("/api/v1/users/subscriptions?recipes_limit=1"),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["results"][0]["username"], "chef");
    assert_eq!(body["results"][0]["recipes"].as_array().map(Vec::len), Some(1));

    let res = call_as(
        &app,
        &reader_cookie,
        actix_test::TestRequest::get().uri(&format!("/api/v1/users/{}", chef.id)),
    )
    .await;
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["is_subscribed"], true);
}

#[actix_web::test]
async fn recipe_author_flag_follows_subscription() {
    let store = InMemoryStore::new();
    let reader = store.add_user("reader");
    let chef = store.add_user("chef");
    let eggs = store.add_ingredient("eggs", "pcs");
    let breakfast = store.add_tag("Breakfast", "breakfast");
    let app = actix_test::init_service(app(&store)).await;
    let reader_cookie = signed_in(&app, &reader.id).await;
    let chef_cookie = signed_in(&app, &chef.id).await;
    let created = create_recipe(
        &app,
        &chef_cookie,
        recipe_body("omelette", &[&eggs], 2, &[&breakfast]),
    )
    .await;
    let recipe_uri = format!("/api/v1/recipes/{}", created["id"].as_str().expect("id"));
    let subscribe_uri = format!("/api/v1/users/{}/subscribe", chef.id);

    let res = call_as(
        &app,
        &reader_cookie,
        actix_test::TestRequest::post().uri(&subscribe_uri),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let res = call_as(&app, &reader_cookie, actix_test::TestRequest::get().uri(&recipe_uri)).await;
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["author"]["is_subscribed"], true);

    let res = call_as(
        &app,
        &reader_cookie,
        actix_test::TestRequest::delete().uri(&subscribe_uri),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = call_as(&app, &reader_cookie, actix_test::TestRequest::get().uri(&recipe_uri)).await;
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["author"]["is_subscribed"], false);
}

#[actix_web::test]
async fn self_and_unknown_subscriptions_are_refused() {
    let store = InMemoryStore::new();
    let reader = store.add_user("reader");
    let app = actix_test::init_service(app(&store)).await;
    let cookie = signed_in(&app, &reader.id).await;

    let res = call_as(
        &app,
        &cookie,
        actix_test::TestRequest::post().uri(&format!("/api/v1/users/{}/subscribe", reader.id)),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], SELF_SUBSCRIPTION_MESSAGE);

    let res = call_as(
        &app,
        &cookie,
        actix_test::TestRequest::post().uri(&format!(
            "/api/v1/users/{}/subscribe",
            foodgram_backend::domain::UserId::random()
        )),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn users_are_listed_by_username() {
    let store = InMemoryStore::new();
    let zoe = store.add_user("zoe");
    store.add_user("adam");
    store.add_user("mia");
    let app = actix_test::init_service(app(&store)).await;
    let cookie = signed_in(&app, &zoe.id).await;

    let res = call_as(
        &app,
        &cookie,
        actix_test::TestRequest::get().uri("/api/v1/users?limit=2"),
    )
    .await;
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["results"][0]["username"], "adam");
    assert_eq!(body["results"][1]["username"], "mia");

    let res = call_as(&app, &cookie, actix_test::TestRequest::get().uri("/api/v1/users/me")).await;
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["username"], "zoe");
    assert_eq!(body["email"], "zoe@example.com");
}
