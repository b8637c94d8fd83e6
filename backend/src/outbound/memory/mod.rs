//! In-process adapters backed by `std::sync::Mutex`-guarded maps.
//!
//! Used when no database is configured and by behaviour tests. State lives
//! for the lifetime of the adapter value.

mod document_repository;
mod object_store;
mod subscription_source;

pub use document_repository::InMemoryDocumentRepository;
pub use object_store::InMemoryObjectStore;
pub use subscription_source::InMemorySubscriptionSource;
