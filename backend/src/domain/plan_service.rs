//! Plan service: catalog reads and plan changes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::document_service_support::{
    current_tier, map_subscription_error, reconcile_owner,
};
use crate::domain::ports::{
    DocumentRepository, PlanChangeResponse, PlanCommand, PlanQuery, SubscriptionSource,
};
use crate::domain::{DocumentPolicyError, OwnerId, PlanTier, PlanTierId, all_tiers, tier_for};

/// Plan service implementing [`PlanQuery`] and [`PlanCommand`].
#[derive(Clone)]
pub struct PlanService<R, T> {
    documents: Arc<R>,
    subscriptions: Arc<T>,
}

impl<R, T> PlanService<R, T> {
    /// Create a service over the document repository and subscription
    /// source.
    pub fn new(documents: Arc<R>, subscriptions: Arc<T>) -> Self {
        Self {
            documents,
            subscriptions,
        }
    }
}

#[async_trait]
impl<R, T> PlanQuery for PlanService<R, T>
where
    R: DocumentRepository,
    T: SubscriptionSource,
{
    fn catalog(&self) -> Vec<PlanTier> {
        all_tiers().to_vec()
    }

    async fn current_plan(&self, owner_id: &OwnerId) -> Result<PlanTier, DocumentPolicyError> {
        current_tier(self.subscriptions.as_ref(), owner_id).await
    }
}

#[async_trait]
impl<R, T> PlanCommand for PlanService<R, T>
where
    R: DocumentRepository,
    T: SubscriptionSource,
{
    async fn change_plan(
        &self,
        owner_id: &OwnerId,
        tier: PlanTierId,
    ) -> Result<PlanChangeResponse, DocumentPolicyError> {
        self.subscriptions
            .set_tier(owner_id, tier)
            .await
            .map_err(map_subscription_error)?;
        let tier = tier_for(tier);
        info!(owner_id = %owner_id, tier = %tier.id(), "plan changed");

        let reconciliation = reconcile_owner(self.documents.as_ref(), owner_id, &tier).await?;
        Ok(PlanChangeResponse {
            tier,
            reconciliation,
        })
    }
}

#[cfg(test)]
mod tests {
    //! Plan reads and reconciliation on plan change.

    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{
        DocumentRepositoryError, MockDocumentRepository, MockSubscriptionSource,
        SubscriptionSourceError,
    };
    use crate::domain::{
        Document, DocumentDraft, DocumentId, DocumentTitle, LockState, StorageKey,
    };

    const MIB: u64 = 1024 * 1024;

    fn document(owner_id: &OwnerId, hours: i64, size_bytes: u64) -> Document {
        let id = DocumentId::random();
        let epoch = Utc
            .with_ymd_and_hms(2026, 2, 1, 8, 0, 0)
            .single()
            .expect("valid timestamp");
        Document::new(DocumentDraft {
            id,
            owner_id: owner_id.clone(),
            title: DocumentTitle::new("Menu").expect("valid title"),
            storage_key: StorageKey::for_upload(owner_id, id),
            size_bytes,
            created_at: epoch + Duration::hours(hours),
            lock_state: LockState::Unlocked,
            view_count: 0,
            is_public: false,
        })
    }

    #[rstest]
    fn catalog_lists_every_tier() {
        let service = PlanService::new(
            Arc::new(MockDocumentRepository::new()),
            Arc::new(MockSubscriptionSource::new()),
        );
        let ids: Vec<PlanTierId> = service.catalog().iter().map(PlanTier::id).collect();
        assert_eq!(ids, PlanTierId::ALL.to_vec());
    }

    #[tokio::test]
    async fn current_plan_resolves_through_the_catalog() {
        let mut subscriptions = MockSubscriptionSource::new();
        subscriptions
            .expect_current_tier()
            .returning(|_| Ok(PlanTierId::Hobby));
        let service = PlanService::new(
            Arc::new(MockDocumentRepository::new()),
            Arc::new(subscriptions),
        );

        let tier = service
            .current_plan(&OwnerId::random())
            .await
            .expect("tier resolves");

        assert_eq!(tier.max_documents().limit(), Some(15));
    }

    #[tokio::test]
    async fn downgrade_locks_documents_the_new_tier_cannot_hold() {
        let owner_id = OwnerId::random();
        let small_old = document(&owner_id, 0, MIB);
        let large = document(&owner_id, 1, 3 * MIB);
        let small_new = document(&owner_id, 2, MIB);
        let expected = [
            (large.id(), LockState::LockedSizeLimit),
            (small_new.id(), LockState::LockedPlanLimit),
        ];
        let snapshot = vec![small_old, large, small_new];

        let mut subscriptions = MockSubscriptionSource::new();
        subscriptions
            .expect_set_tier()
            .times(1)
            .withf(|_, tier| *tier == PlanTierId::Free)
            .returning(|_, _| Ok(()));
        let mut repo = MockDocumentRepository::new();
        repo.expect_list_for_owner()
            .returning(move |_| Ok(snapshot.clone()));
        repo.expect_update_lock_state()
            .times(2)
            .withf(move |id, state| expected.contains(&(*id, *state)))
            .returning(|_, _| Ok(()));

        let response = PlanService::new(Arc::new(repo), Arc::new(subscriptions))
            .change_plan(&owner_id, PlanTierId::Free)
            .await
            .expect("downgrade succeeds");

        assert_eq!(response.tier.id(), PlanTierId::Free);
        assert_eq!(response.reconciliation.len(), 2);
    }

    #[tokio::test]
    async fn partial_reconciliation_failure_surfaces_after_earlier_writes() {
        let owner_id = OwnerId::random();
        let snapshot = vec![
            document(&owner_id, 0, MIB),
            document(&owner_id, 1, MIB),
            document(&owner_id, 2, MIB),
        ];
        let mut subscriptions = MockSubscriptionSource::new();
        subscriptions.expect_set_tier().returning(|_, _| Ok(()));
        let mut repo = MockDocumentRepository::new();
        repo.expect_list_for_owner()
            .returning(move |_| Ok(snapshot.clone()));
        repo.expect_update_lock_state()
            .times(1)
            .returning(|_, _| Ok(()));
        repo.expect_update_lock_state()
            .times(1)
            .returning(|_, _| Err(DocumentRepositoryError::connection("reset by peer")));

        let err = PlanService::new(Arc::new(repo), Arc::new(subscriptions))
            .change_plan(&owner_id, PlanTierId::Free)
            .await
            .expect_err("second write fails");

        assert!(matches!(err, DocumentPolicyError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn subscription_failure_skips_reconciliation() {
        let mut subscriptions = MockSubscriptionSource::new();
        subscriptions
            .expect_set_tier()
            .returning(|_, _| Err(SubscriptionSourceError::query("constraint violated")));
        let mut repo = MockDocumentRepository::new();
        repo.expect_list_for_owner().times(0);

        let err = PlanService::new(Arc::new(repo), Arc::new(subscriptions))
            .change_plan(&OwnerId::random(), PlanTierId::Pro)
            .await
            .expect_err("subscription write fails");

        assert!(matches!(err, DocumentPolicyError::Internal { .. }));
    }
}
