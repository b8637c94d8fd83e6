//! Builders wiring adapters into the HTTP state.
//!
//! With a database pool the Diesel adapters back documents and
//! subscriptions; without one both live in memory. Uploaded bytes go to the
//! filesystem store when a storage root is configured.

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use flipbook_backend::domain::ports::{DocumentRepository, ObjectStore, SubscriptionSource};
use flipbook_backend::domain::{DocumentService, PlanService};
use flipbook_backend::inbound::http::state::HttpState;
use flipbook_backend::outbound::memory::{
    InMemoryDocumentRepository, InMemoryObjectStore, InMemorySubscriptionSource,
};
use flipbook_backend::outbound::persistence::{DieselDocumentRepository, DieselSubscriptionSource};
use flipbook_backend::outbound::storage::FilesystemObjectStore;

use super::ServerConfig;

/// Compose document and plan services over the given adapters.
fn build_services<R, S, T>(
    documents: Arc<R>,
    objects: Arc<S>,
    subscriptions: Arc<T>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    R: DocumentRepository + 'static,
    S: ObjectStore + 'static,
    T: SubscriptionSource + 'static,
{
    let document_service = Arc::new(DocumentService::new(
        Arc::clone(&documents),
        objects,
        Arc::clone(&subscriptions),
        clock,
    ));
    let plan_service = Arc::new(PlanService::new(documents, subscriptions));
    HttpState::from_services(Arc::clone(&document_service), document_service, plan_service)
}

fn build_with_objects<S>(config: &ServerConfig, objects: Arc<S>) -> HttpState
where
    S: ObjectStore + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => build_services(
            Arc::new(DieselDocumentRepository::new(pool.clone())),
            objects,
            Arc::new(DieselSubscriptionSource::new(pool.clone(), Arc::clone(&clock))),
            clock,
        ),
        None => build_services(
            Arc::new(InMemoryDocumentRepository::new()),
            objects,
            Arc::new(InMemorySubscriptionSource::new()),
            clock,
        ),
    }
}

/// Build the HTTP state for `config`.
///
/// # Errors
/// Returns [`io::Error`] when the storage root cannot be opened.
pub(crate) fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let state = match &config.storage_root {
        Some(root) => build_with_objects(
            config,
            Arc::new(FilesystemObjectStore::open(root, config.public_base_url.as_str())?),
        ),
        None => build_with_objects(
            config,
            Arc::new(InMemoryObjectStore::new(config.public_base_url.as_str())),
        ),
    };
    Ok(web::Data::new(state))
}
