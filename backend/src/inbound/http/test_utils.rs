//! Session helpers shared by the HTTP handler tests.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;

use crate::inbound::http::users::LoginRequest;

/// Name of the cookie carrying the owner session.
pub const SESSION_COOKIE: &str = "session";

/// Cookie session middleware with a fresh key and the `Secure` flag off so
/// plain HTTP test requests keep their session.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Owned copy of the session cookie set by `response`.
///
/// # Panics
/// Panics when the response carries no session cookie.
pub fn session_cookie(response: &ServiceResponse) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Log in as `owner_id` through `POST /api/v1/login` and return the session
/// cookie.
///
/// # Panics
/// Panics when the login is rejected.
pub async fn login_as<S>(app: &S, owner_id: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(&LoginRequest {
                owner_id: Some(owner_id.to_owned()),
            })
            .to_request(),
    )
    .await;
    assert!(response.status().is_success(), "login rejected");
    session_cookie(&response)
}
