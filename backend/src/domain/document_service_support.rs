//! Shared helpers for the document and plan services: port error mapping
//! and the apply step of a reconciliation pass.

use tracing::{info, warn};

use crate::domain::ports::{
    DocumentRepository, DocumentRepositoryError, ObjectStoreError, SubscriptionSource,
    SubscriptionSourceError,
};
use crate::domain::{
    DocumentPolicyError, OwnerId, PlanTier, ReconciliationOutcome, plan_reconciliation, tier_for,
};

pub(crate) fn map_repository_error(error: DocumentRepositoryError) -> DocumentPolicyError {
    match error {
        DocumentRepositoryError::Connection { message } => {
            DocumentPolicyError::unavailable(format!("document repository unavailable: {message}"))
        }
        DocumentRepositoryError::Query { message } => {
            DocumentPolicyError::internal(format!("document repository error: {message}"))
        }
        DocumentRepositoryError::Missing { .. } => DocumentPolicyError::NotFound,
    }
}

pub(crate) fn map_subscription_error(error: SubscriptionSourceError) -> DocumentPolicyError {
    match error {
        SubscriptionSourceError::Connection { message } => DocumentPolicyError::unavailable(
            format!("subscription source unavailable: {message}"),
        ),
        SubscriptionSourceError::Query { message } => {
            DocumentPolicyError::internal(format!("subscription source error: {message}"))
        }
    }
}

pub(crate) fn map_object_store_error(error: ObjectStoreError) -> DocumentPolicyError {
    match error {
        ObjectStoreError::Connection { message } => {
            DocumentPolicyError::unavailable(format!("object store unavailable: {message}"))
        }
        ObjectStoreError::Write { key, message } => DocumentPolicyError::StorageWriteFailed {
            message: format!("{key}: {message}"),
        },
    }
}

/// Resolve the owner's tier from the catalog.
pub(crate) async fn current_tier<T>(
    subscriptions: &T,
    owner_id: &OwnerId,
) -> Result<PlanTier, DocumentPolicyError>
where
    T: SubscriptionSource + ?Sized,
{
    let id = subscriptions
        .current_tier(owner_id)
        .await
        .map_err(map_subscription_error)?;
    Ok(tier_for(id))
}

/// Load the owner's documents, plan the transitions `tier` requires and
/// persist them one by one.
///
/// A failed write stops the pass; transitions already written stay
/// written and the next pass picks up the rest.
pub(crate) async fn reconcile_owner<R>(
    documents: &R,
    owner_id: &OwnerId,
    tier: &PlanTier,
) -> Result<ReconciliationOutcome, DocumentPolicyError>
where
    R: DocumentRepository + ?Sized,
{
    let snapshot = documents
        .list_for_owner(owner_id)
        .await
        .map_err(map_repository_error)?;
    let outcome = plan_reconciliation(tier, &snapshot);

    for (applied, transition) in outcome.transitions().iter().enumerate() {
        if let Err(error) = documents
            .update_lock_state(transition.document_id, transition.to)
            .await
        {
            warn!(
                owner_id = %owner_id,
                document_id = %transition.document_id,
                applied,
                error = %error,
                "reconciliation stopped after a failed lock write",
            );
            return Err(map_repository_error(error));
        }
        info!(
            owner_id = %owner_id,
            document_id = %transition.document_id,
            from = %transition.from,
            to = %transition.to,
            tier = %tier.id(),
            "document lock reconciled",
        );
    }

    Ok(outcome)
}
