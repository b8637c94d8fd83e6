//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL document and subscription stores (Diesel)
//! - **storage**: filesystem object store scoped by a `cap-std` directory
//! - **memory**: in-process adapters used without a database and in tests
//!
//! Adapters convert between domain types and infrastructure representations
//! and contain no quota or lock logic.

pub mod memory;
pub mod persistence;
pub mod storage;
