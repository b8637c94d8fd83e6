//! Port for reading and recording an owner's subscription tier.

use async_trait::async_trait;

use crate::domain::{OwnerId, PlanTierId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by subscription source adapters.
    pub enum SubscriptionSourceError {
        /// Source connection could not be established.
        Connection { message: String } =>
            "subscription source connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "subscription source query failed: {message}",
    }
}

/// Port for the owner's current plan.
///
/// Owners without a recorded subscription are on the default tier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionSource: Send + Sync {
    /// Tier the owner is currently on.
    async fn current_tier(&self, owner_id: &OwnerId) -> Result<PlanTierId, SubscriptionSourceError>;

    /// Record a new tier for the owner.
    async fn set_tier(
        &self,
        owner_id: &OwnerId,
        tier: PlanTierId,
    ) -> Result<(), SubscriptionSourceError>;
}

/// Fixture implementation that reports every owner on one fixed tier.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSubscriptionSource(pub PlanTierId);

#[async_trait]
impl SubscriptionSource for FixtureSubscriptionSource {
    async fn current_tier(
        &self,
        _owner_id: &OwnerId,
    ) -> Result<PlanTierId, SubscriptionSourceError> {
        Ok(self.0)
    }

    async fn set_tier(
        &self,
        _owner_id: &OwnerId,
        _tier: PlanTierId,
    ) -> Result<(), SubscriptionSourceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Fixture behaviour.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn default_fixture_reports_free_tier() {
        let tier = FixtureSubscriptionSource::default()
            .current_tier(&OwnerId::random())
            .await
            .expect("fixture lookup succeeds");
        assert_eq!(tier, PlanTierId::Free);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_reports_configured_tier() {
        let source = FixtureSubscriptionSource(PlanTierId::Hobby);
        let tier = source
            .current_tier(&OwnerId::random())
            .await
            .expect("fixture lookup succeeds");
        assert_eq!(tier, PlanTierId::Hobby);
    }
}
