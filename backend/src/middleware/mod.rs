//! Actix middleware applied to every request.
//!
//! [`Trace`] opens the per-request span that service and adapter events are
//! recorded under.

pub mod trace;

pub use trace::{REQUEST_ID_HEADER, Trace};
