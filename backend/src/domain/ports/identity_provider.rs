//! Port answering "who is making this request".

use crate::domain::{DocumentPolicyError, OwnerId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The stored identity could not be read.
        Corrupt { message: String } =>
            "identity could not be read: {message}",
    }
}

/// Request-scoped view of the authenticated owner.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityProvider {
    /// Authenticated owner, or `None` for anonymous callers.
    fn current_user(&self) -> Result<Option<OwnerId>, IdentityProviderError>;
}

/// Authenticated owner of `provider`, failing with
/// [`DocumentPolicyError::Unauthorized`] for anonymous callers and
/// unreadable identities.
pub fn require_owner<P>(provider: &P) -> Result<OwnerId, DocumentPolicyError>
where
    P: IdentityProvider + ?Sized,
{
    match provider.current_user() {
        Ok(Some(owner_id)) => Ok(owner_id),
        Ok(None) | Err(_) => Err(DocumentPolicyError::Unauthorized),
    }
}

/// Fixture implementation with a fixed answer.
#[derive(Debug, Default, Clone)]
pub struct FixtureIdentityProvider(pub Option<OwnerId>);

impl IdentityProvider for FixtureIdentityProvider {
    fn current_user(&self) -> Result<Option<OwnerId>, IdentityProviderError> {
        Ok(self.0.clone())
    }
}
