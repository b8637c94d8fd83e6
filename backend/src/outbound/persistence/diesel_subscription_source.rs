//! PostgreSQL-backed `SubscriptionSource` implementation using Diesel ORM.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use tracing::warn;

use crate::domain::ports::{SubscriptionSource, SubscriptionSourceError};
use crate::domain::{OwnerId, PlanTierId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewSubscriptionRow;
use super::pool::{DbPool, PoolError};
use super::schema::subscriptions;

/// Diesel-backed implementation of the subscription source port.
#[derive(Clone)]
pub struct DieselSubscriptionSource {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselSubscriptionSource {
    /// Create a new source with the given connection pool and clock used to
    /// stamp updates.
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> SubscriptionSourceError {
    map_basic_pool_error(error, SubscriptionSourceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SubscriptionSourceError {
    map_basic_diesel_error(
        error,
        SubscriptionSourceError::query,
        SubscriptionSourceError::connection,
    )
}

/// Interpret a stored tier name; unknown names fall back to the default tier.
fn stored_tier(owner_id: &OwnerId, raw: Option<String>) -> PlanTierId {
    let Some(raw) = raw else {
        return PlanTierId::default();
    };
    raw.parse().unwrap_or_else(|_| {
        warn!(owner_id = %owner_id, tier = %raw, "unknown stored tier; using default");
        PlanTierId::default()
    })
}

#[async_trait]
impl SubscriptionSource for DieselSubscriptionSource {
    async fn current_tier(
        &self,
        owner_id: &OwnerId,
    ) -> Result<PlanTierId, SubscriptionSourceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let raw = subscriptions::table
            .filter(subscriptions::owner_id.eq(owner_id.as_uuid()))
            .select(subscriptions::tier)
            .first::<String>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(stored_tier(owner_id, raw))
    }

    async fn set_tier(
        &self,
        owner_id: &OwnerId,
        tier: PlanTierId,
    ) -> Result<(), SubscriptionSourceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewSubscriptionRow {
            owner_id: *owner_id.as_uuid(),
            tier: tier.as_str(),
            updated_at: self.clock.utc(),
        };

        diesel::insert_into(subscriptions::table)
            .values(&row)
            .on_conflict(subscriptions::owner_id)
            .do_update()
            .set((
                subscriptions::tier.eq(excluded(subscriptions::tier)),
                subscriptions::updated_at.eq(excluded(subscriptions::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}
