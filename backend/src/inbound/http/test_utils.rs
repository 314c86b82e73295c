//! Test helpers for inbound HTTP components.
//!
//! Sessions are minted by the identity layer in production. Tests mount
//! [`sign_in`] instead to obtain a session cookie for a chosen user.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::{HttpResponse, post, web};

use crate::domain::UserId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::validation::{FieldName, parse_user_id};

/// Path of the test-only sign-in route.
pub const SIGN_IN_PATH: &str = "/test/sign-in";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Store the user id from the path in the session cookie.
#[post("/test/sign-in/{id}")]
pub async fn sign_in(session: SessionContext, path: web::Path<String>) -> ApiResult<HttpResponse> {
    let id = parse_user_id(&path, FieldName::new("id"))?;
    session.persist_user(&id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Pull the session cookie out of a response's `Set-Cookie` headers.
pub fn session_cookie(response: &actix_web::dev::ServiceResponse) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Sign-in request URI for `user`.
pub fn sign_in_uri(user: &UserId) -> String {
    format!("{SIGN_IN_PATH}/{user}")
}
