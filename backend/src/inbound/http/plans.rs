//! Plan HTTP handlers.
//!
//! ```text
//! GET /api/v1/plans
//! GET /api/v1/plan
//! PUT /api/v1/plan {"tier":"starter"}
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::PlanTier;
use crate::domain::ports::{PlanChangeResponse, require_owner};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, parse_tier_id};

/// Request body for plan changes.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePlanRequest {
    /// Target tier identifier, e.g. `business`.
    pub tier: Option<String>,
}

/// Every tier, cheapest first. Public.
#[get("/plans")]
pub async fn list_plans(state: web::Data<HttpState>) -> web::Json<Vec<PlanTier>> {
    web::Json(state.plans_query.catalog())
}

/// The caller's current tier.
#[get("/plan")]
pub async fn current_plan(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<PlanTier>> {
    let owner_id = require_owner(&session)?;
    let tier = state.plans_query.current_plan(&owner_id).await?;
    Ok(web::Json(tier))
}

/// Move the caller to another tier and reconcile their documents.
#[put("/plan")]
pub async fn change_plan(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ChangePlanRequest>,
) -> ApiResult<web::Json<PlanChangeResponse>> {
    let owner_id = require_owner(&session)?;
    let raw = payload
        .into_inner()
        .tier
        .ok_or_else(|| missing_field_error("tier"))?;
    let tier = parse_tier_id(&raw)?;
    let response = state.plans.change_plan(&owner_id, tier).await?;
    Ok(web::Json(response))
}
