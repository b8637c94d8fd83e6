//! In-memory subscription source.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{SubscriptionSource, SubscriptionSourceError};
use crate::domain::{OwnerId, PlanTierId};

/// Subscription source holding each owner's tier in a map; owners without
/// an entry are on the default tier.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionSource {
    tiers: Mutex<HashMap<OwnerId, PlanTierId>>,
}

impl InMemorySubscriptionSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionSource for InMemorySubscriptionSource {
    async fn current_tier(
        &self,
        owner_id: &OwnerId,
    ) -> Result<PlanTierId, SubscriptionSourceError> {
        let guard = self
            .tiers
            .lock()
            .map_err(|_| SubscriptionSourceError::connection("subscription store poisoned"))?;
        Ok(guard.get(owner_id).copied().unwrap_or_default())
    }

    async fn set_tier(
        &self,
        owner_id: &OwnerId,
        tier: PlanTierId,
    ) -> Result<(), SubscriptionSourceError> {
        let mut guard = self
            .tiers
            .lock()
            .map_err(|_| SubscriptionSourceError::connection("subscription store poisoned"))?;
        guard.insert(owner_id.clone(), tier);
        Ok(())
    }
}
