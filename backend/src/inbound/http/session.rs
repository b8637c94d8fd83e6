//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session and exposes it as the domain's
//! [`IdentityProvider`], so handlers resolve the calling owner through
//! [`require_owner`](crate::domain::ports::require_owner).

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{Error, OwnerId};

pub(crate) const OWNER_ID_KEY: &str = "owner_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated owner's id in the session cookie.
    pub fn persist_owner(&self, owner_id: &OwnerId) -> Result<(), Error> {
        self.0
            .insert(OWNER_ID_KEY, owner_id.as_ref())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Remove every session entry and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl IdentityProvider for SessionContext {
    fn current_user(&self) -> Result<Option<OwnerId>, IdentityProviderError> {
        let raw = self
            .0
            .get::<String>(OWNER_ID_KEY)
            .map_err(|error| IdentityProviderError::corrupt(error.to_string()))?;
        match raw {
            Some(raw) => OwnerId::new(raw).map(Some).map_err(|error| {
                tracing::warn!("invalid owner id in session cookie: {error}");
                IdentityProviderError::corrupt(error.to_string())
            }),
            None => Ok(None),
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
