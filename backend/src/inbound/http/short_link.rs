//! Short-link redirect.
//!
//! ```text
//! GET /s/{code} -> 302 Location: /recipes/{id}
//! ```
//!
//! Mounted at the application root rather than under `/api/v1` so links stay
//! short.

use actix_web::{HttpResponse, get, http::header, web};

use crate::domain::{Error, RecipeId, ShortCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Path a short code is served from.
pub fn short_link_path(code: &ShortCode) -> String {
    format!("/s/{code}")
}

/// Front-end page of a recipe.
pub fn recipe_page_path(id: &RecipeId) -> String {
    format!("/recipes/{id}")
}

/// Redirect a short code to the recipe page it points at.
#[utoipa::path(
    get,
    path = "/s/{code}",
    params(("code" = String, Path, description = "Five-character short code")),
    responses(
        (status = 302, description = "Redirect to the recipe page",
            headers(("Location" = String, description = "Recipe page path"))),
        (status = 404, description = "Unknown short code", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "followShortLink",
    security([])
)]
#[get("/s/{code}")]
pub async fn follow_short_link(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    // A malformed code cannot exist, so it is simply not found.
    let code = ShortCode::new(path.into_inner())
        .map_err(|_| Error::not_found("short link not found"))?;
    let id = state.recipes_query.resolve_short_code(&code).await?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, recipe_page_path(&id)))
        .finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;

    use crate::domain::ports::MockRecipesQuery;

    #[actix_web::test]
    async fn known_code_redirects_to_recipe_page() {
        let id = RecipeId::random();
        let mut recipes = MockRecipesQuery::new();
        recipes
            .expect_resolve_short_code()
            .withf(|code| code.as_ref() == "a1b2c")
            .times(1)
            .return_once(move |_| Ok(id));
        let state = HttpState {
            recipes_query: Arc::new(recipes),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(follow_short_link),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/s/a1b2c").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::FOUND);
        let location = res
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok());
        assert_eq!(location, Some(format!("/recipes/{id}").as_str()));
    }

    #[rstest]
    #[case("/s/zzzzz")]
    #[case("/s/too-long-code")]
    #[actix_web::test]
    async fn unknown_or_malformed_codes_are_not_found(#[case] uri: &str) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(HttpState::fixtures()))
                .service(follow_short_link),
        )
        .await;

        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[rstest]
    fn short_link_path_embeds_code() {
        let code = ShortCode::new("a1b2c").expect("code");
        assert_eq!(short_link_path(&code), "/s/a1b2c");
    }
}
