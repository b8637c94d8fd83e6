//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, ServerSettings};

use state_builders::build_http_state;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use flipbook_backend::domain::all_tiers;
use flipbook_backend::inbound::http::documents::{
    delete_document, list_documents, lock_document, open_public_document, set_visibility,
    unlock_document, upload_document,
};
use flipbook_backend::inbound::http::health::{HealthState, live, ready};
use flipbook_backend::inbound::http::plans::{change_plan, current_plan, list_plans};
use flipbook_backend::inbound::http::state::HttpState;
use flipbook_backend::inbound::http::users::{login, logout};
use flipbook_backend::middleware::Trace;

/// Slack above the largest tier ceiling so oversize uploads reach the quota
/// evaluator and get a typed rejection instead of a payload error.
const UPLOAD_LIMIT_SLACK_BYTES: u64 = 1024 * 1024;

/// Largest request body accepted for uploads.
fn upload_limit_bytes() -> usize {
    let largest = all_tiers()
        .iter()
        .map(|tier| tier.max_file_size_bytes())
        .max()
        .unwrap_or_default();
    usize::try_from(largest.saturating_add(UPLOAD_LIMIT_SLACK_BYTES)).unwrap_or(usize::MAX)
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .app_data(web::PayloadConfig::new(upload_limit_bytes()))
        .service(login)
        .service(logout)
        .service(list_plans)
        .service(current_plan)
        .service(change_plan)
        .service(list_documents)
        .service(upload_document)
        .service(lock_document)
        .service(unlock_document)
        .service(set_visibility)
        .service(delete_document)
        .service(open_public_document);

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live)
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when the storage root cannot be opened or
/// the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config)?;
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
