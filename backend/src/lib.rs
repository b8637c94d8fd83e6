//! Plan quotas and document lock lifecycle for the PDF flipbook service.
//!
//! - [`domain`]: plan catalog, quota evaluation, lock state machine,
//!   reconciliation and the document and plan services.
//! - [`inbound`]: Actix Web handlers.
//! - [`outbound`]: Diesel, filesystem and in-memory adapters.
//! - [`middleware`]: request tracing.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
