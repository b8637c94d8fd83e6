//! Session handlers.
//!
//! ```text
//! POST /api/v1/login {"ownerId":"3fa85f64-5717-4562-b3fc-2c963f66afa6"}
//! POST /api/v1/logout
//! ```
//!
//! Credential checks belong to the upstream identity provider; these
//! endpoints only bind a verified owner id to the session cookie.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{Error, OwnerId, OwnerIdValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::validation::missing_field_error;

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Owner identifier issued by the identity provider.
    pub owner_id: Option<String>,
}

fn map_owner_id_error(raw: &str, err: &OwnerIdValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": "ownerId",
        "value": raw,
        "code": "invalid_owner_id",
    }))
}

/// Establish a session for the given owner.
#[post("/login")]
pub async fn login(
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let raw = payload
        .into_inner()
        .owner_id
        .ok_or_else(|| missing_field_error("ownerId"))?;
    let owner_id = OwnerId::new(&raw).map_err(|err| map_owner_id_error(&raw, &err))?;
    session.persist_owner(&owner_id)?;
    tracing::info!(owner_id = %owner_id, "session established");
    Ok(HttpResponse::Ok().finish())
}

/// Drop the session.
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}
