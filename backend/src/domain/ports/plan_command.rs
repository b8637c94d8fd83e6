//! Driving ports for plan reads and plan changes.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{
    DocumentPolicyError, OwnerId, PlanTier, PlanTierId, ReconciliationOutcome, all_tiers,
    default_tier,
};

/// Result of a plan change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanChangeResponse {
    pub tier: PlanTier,
    pub reconciliation: ReconciliationOutcome,
}

/// Driving port for plan reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanQuery: Send + Sync {
    /// Every tier, cheapest first.
    fn catalog(&self) -> Vec<PlanTier>;

    /// Tier the owner is currently on.
    async fn current_plan(&self, owner_id: &OwnerId) -> Result<PlanTier, DocumentPolicyError>;
}

/// Driving port for plan changes confirmed by the payment provider or a
/// cancellation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlanCommand: Send + Sync {
    /// Move the owner to `tier` and reconcile their documents.
    async fn change_plan(
        &self,
        owner_id: &OwnerId,
        tier: PlanTierId,
    ) -> Result<PlanChangeResponse, DocumentPolicyError>;
}

/// Fixture implementation that keeps every owner on the default tier.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePlanService;

#[async_trait]
impl PlanQuery for FixturePlanService {
    fn catalog(&self) -> Vec<PlanTier> {
        all_tiers().to_vec()
    }

    async fn current_plan(&self, _owner_id: &OwnerId) -> Result<PlanTier, DocumentPolicyError> {
        Ok(default_tier())
    }
}

#[async_trait]
impl PlanCommand for FixturePlanService {
    async fn change_plan(
        &self,
        _owner_id: &OwnerId,
        tier: PlanTierId,
    ) -> Result<PlanChangeResponse, DocumentPolicyError> {
        Ok(PlanChangeResponse {
            tier: crate::domain::tier_for(tier),
            reconciliation: ReconciliationOutcome::default(),
        })
    }
}
