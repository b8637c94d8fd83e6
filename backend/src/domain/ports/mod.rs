//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`DocumentRepository`], [`ObjectStore`],
//! [`SubscriptionSource`], [`IdentityProvider`]) describe the external
//! collaborators; driving ports ([`DocumentCommand`], [`DocumentQuery`],
//! [`PlanCommand`], [`PlanQuery`]) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod document_command;
mod document_query;
mod document_repository;
mod identity_provider;
mod object_store;
mod plan_command;
mod subscription_source;

#[cfg(test)]
pub use document_command::MockDocumentCommand;
pub use document_command::{
    DocumentCommand, DocumentMutationResponse, FixtureDocumentCommand, UploadDocumentRequest,
};
#[cfg(test)]
pub use document_query::MockDocumentQuery;
pub use document_query::{DocumentQuery, DocumentView, FixtureDocumentQuery, PublicDocumentView};
#[cfg(test)]
pub use document_repository::MockDocumentRepository;
pub use document_repository::{
    DocumentRepository, DocumentRepositoryError, FixtureDocumentRepository,
};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{
    FixtureIdentityProvider, IdentityProvider, IdentityProviderError, require_owner,
};
#[cfg(test)]
pub use object_store::MockObjectStore;
pub use object_store::{FixtureObjectStore, ObjectStore, ObjectStoreError};
#[cfg(test)]
pub use plan_command::{MockPlanCommand, MockPlanQuery};
pub use plan_command::{FixturePlanService, PlanChangeResponse, PlanCommand, PlanQuery};
#[cfg(test)]
pub use subscription_source::MockSubscriptionSource;
pub use subscription_source::{
    FixtureSubscriptionSource, SubscriptionSource, SubscriptionSourceError,
};
