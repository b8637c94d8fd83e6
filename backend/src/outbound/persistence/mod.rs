//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the document repository and subscription
//! source ports, backed by PostgreSQL via `diesel-async` and `bb8`.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Quota and lock decisions stay in the domain.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: Diesel and pool failures map to each port's error
//!   enum.
//!
//! # Example
//!
//! ```ignore
//! use flipbook_backend::outbound::persistence::{DbPool, DieselDocumentRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/flipbook")).await?;
//! let documents = DieselDocumentRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_document_repository;
mod diesel_subscription_source;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_document_repository::DieselDocumentRepository;
pub use diesel_subscription_source::DieselSubscriptionSource;
pub use migrations::run_pending_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
