//! Seeding the catalogue from CSV and using the result through HTTP.

mod support;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use serde_json::{Value, json};

use foodgram_backend::domain::{ImportSummary, IngredientImportService, read_ingredient_csv};
use foodgram_backend::test_support::InMemoryStore;
use support::{app, create_recipe, signed_in};

const SEED: &str = "eggs,pcs\nsugar,g\n sugar , g \nsugar,tbsp\n";

#[actix_web::test]
async fn imported_ingredients_are_listed_and_usable_in_recipes() {
    let store = InMemoryStore::new();
    store.add_ingredient("eggs", "pcs");
    let cook = store.add_user("cook");
    let baking = store.add_tag("Baking", "baking");
    let service = IngredientImportService::new(Arc::new(store.clone()));

    let rows = read_ingredient_csv(SEED.as_bytes()).expect("seed parses");
    let summary = service.import(&rows).await.expect("import succeeds");
    assert_eq!(
        summary,
        ImportSummary {
            submitted: 3,
            inserted: 2
        }
    );

    let app = actix_test::init_service(app(&store)).await;
    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/ingredients?name=sug")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let listed: Value = actix_test::read_body_json(res).await;
    let units: Vec<_> = listed
        .as_array()
        .expect("ingredient list")
        .iter()
        .map(|ingredient| ingredient["measurement_unit"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(units.len(), 2);
    assert!(units.contains(&"g") && units.contains(&"tbsp"));

    let sugar_id = listed[0]["id"].clone();
    let cookie = signed_in(&app, &cook.id).await;
    let created = create_recipe(
        &app,
        &cookie,
        json!({
            "ingredients": [{"id": sugar_id, "amount": 50}],
            "tags": [baking.id.get()],
            "image": "recipes/meringue.png",
            "name": "meringue",
            "text": "Whisk and bake.",
            "cooking_time": 90,
        }),
    )
    .await;
    assert_eq!(created["ingredients"][0]["name"], "sugar");
}

#[actix_web::test]
async fn repeating_an_import_adds_nothing() {
    let store = InMemoryStore::new();
    let service = IngredientImportService::new(Arc::new(store.clone()));
    let rows = read_ingredient_csv(SEED.as_bytes()).expect("seed parses");

    let first = service.import(&rows).await.expect("first import");
    let second = service.import(&rows).await.expect("second import");

    assert_eq!(first.inserted, 3);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.submitted, 3);
}
