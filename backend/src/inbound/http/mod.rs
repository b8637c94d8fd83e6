//! HTTP inbound adapter exposing the REST endpoints.

pub mod documents;
pub mod error;
pub mod health;
pub mod plans;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

pub use error::ApiResult;
