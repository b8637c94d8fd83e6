//! Document lifecycle service.
//!
//! Implements the document driving ports: the upload admission pipeline,
//! owner lock changes, deletion, sharing and public viewing. Mutations that
//! change which documents are active finish with a reconciliation pass.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info, warn};

use crate::domain::document_service_support::{
    current_tier, map_object_store_error, map_repository_error, reconcile_owner,
};
use crate::domain::ports::{
    DocumentCommand, DocumentMutationResponse, DocumentQuery, DocumentRepository, DocumentView,
    ObjectStore, PublicDocumentView, SubscriptionSource, UploadDocumentRequest,
};
use crate::domain::{
    Document, DocumentDraft, DocumentId, DocumentPolicyError, DocumentTitle, LockState, OwnerId,
    QuotaDecision, ReconciliationOutcome, StorageKey, evaluate,
};

/// Leading bytes of every PDF file.
pub const PDF_MAGIC: &[u8] = b"%PDF-";

/// Document service implementing [`DocumentCommand`] and [`DocumentQuery`].
#[derive(Clone)]
pub struct DocumentService<R, S, T> {
    documents: Arc<R>,
    objects: Arc<S>,
    subscriptions: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<R, S, T> DocumentService<R, S, T> {
    /// Create a service over the given adapters.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use flipbook_backend::domain::DocumentService;
    /// # use flipbook_backend::domain::ports::{
    /// #     FixtureDocumentRepository, FixtureObjectStore, FixtureSubscriptionSource,
    /// # };
    /// # use mockable::DefaultClock;
    /// let service = DocumentService::new(
    ///     Arc::new(FixtureDocumentRepository),
    ///     Arc::new(FixtureObjectStore),
    ///     Arc::new(FixtureSubscriptionSource::default()),
    ///     Arc::new(DefaultClock),
    /// );
    /// # let _ = service;
    /// ```
    pub fn new(
        documents: Arc<R>,
        objects: Arc<S>,
        subscriptions: Arc<T>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            documents,
            objects,
            subscriptions,
            clock,
        }
    }
}

struct ValidatedUpload {
    title: DocumentTitle,
    size_bytes: u64,
}

fn validate_upload(
    request: &UploadDocumentRequest,
) -> Result<ValidatedUpload, DocumentPolicyError> {
    let title = DocumentTitle::new(request.title.as_str())
        .map_err(|err| DocumentPolicyError::invalid_upload(err.to_string()))?;
    if request.bytes.is_empty() {
        return Err(DocumentPolicyError::invalid_upload("payload is empty"));
    }
    if !request.bytes.starts_with(PDF_MAGIC) {
        return Err(DocumentPolicyError::invalid_upload("payload is not a PDF"));
    }
    let size_bytes = u64::try_from(request.bytes.len())
        .map_err(|_| DocumentPolicyError::invalid_upload("payload is too large"))?;
    Ok(ValidatedUpload { title, size_bytes })
}

impl<R, S, T> DocumentService<R, S, T>
where
    R: DocumentRepository,
    S: ObjectStore,
    T: SubscriptionSource,
{
    fn view(&self, document: &Document) -> DocumentView {
        DocumentView::from_document(document, self.objects.public_url(document.storage_key()))
    }

    async fn owned_document(
        &self,
        owner_id: &OwnerId,
        id: DocumentId,
    ) -> Result<Document, DocumentPolicyError> {
        self.documents
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .filter(|document| document.owner_id() == owner_id)
            .ok_or(DocumentPolicyError::NotFound)
    }

    async fn reconcile(
        &self,
        owner_id: &OwnerId,
    ) -> Result<ReconciliationOutcome, DocumentPolicyError> {
        let tier = current_tier(self.subscriptions.as_ref(), owner_id).await?;
        reconcile_owner(self.documents.as_ref(), owner_id, &tier).await
    }

    async fn persist_lock_state(
        &self,
        document: &Document,
        next: LockState,
    ) -> Result<(), DocumentPolicyError> {
        if next == document.lock_state() {
            return Ok(());
        }
        self.documents
            .update_lock_state(document.id(), next)
            .await
            .map_err(map_repository_error)?;
        info!(
            owner_id = %document.owner_id(),
            document_id = %document.id(),
            from = %document.lock_state(),
            to = %next,
            "document lock changed by owner",
        );
        Ok(())
    }

    /// Undo a storage write whose record could not be created.
    async fn release_orphan(&self, key: &StorageKey) -> bool {
        match self.objects.delete(key).await {
            Ok(()) => true,
            Err(err) => {
                error!(
                    storage_key = %key,
                    error = %err,
                    "failed to release stored bytes after record write failure",
                );
                false
            }
        }
    }
}

#[async_trait]
impl<R, S, T> DocumentCommand for DocumentService<R, S, T>
where
    R: DocumentRepository,
    S: ObjectStore,
    T: SubscriptionSource,
{
    async fn upload_document(
        &self,
        request: UploadDocumentRequest,
    ) -> Result<DocumentView, DocumentPolicyError> {
        let ValidatedUpload { title, size_bytes } = validate_upload(&request)?;
        let owner_id = request.owner_id;

        let tier = current_tier(self.subscriptions.as_ref(), &owner_id).await?;
        let active = self
            .documents
            .list_for_owner(&owner_id)
            .await
            .map_err(map_repository_error)?
            .iter()
            .filter(|document| !document.is_locked())
            .count();

        if let QuotaDecision::Rejected(reason) = evaluate(&tier, active, size_bytes) {
            info!(
                owner_id = %owner_id,
                tier = %tier.id(),
                active,
                size_bytes,
                reason = %reason,
                "upload rejected by quota",
            );
            return Err(DocumentPolicyError::QuotaExceeded { reason });
        }

        let id = DocumentId::random();
        let storage_key = StorageKey::for_upload(&owner_id, id);
        self.objects
            .put(&storage_key, &request.bytes)
            .await
            .map_err(map_object_store_error)?;

        let document = Document::new(DocumentDraft {
            id,
            owner_id,
            title,
            storage_key,
            size_bytes,
            created_at: self.clock.utc(),
            lock_state: LockState::Unlocked,
            view_count: 0,
            is_public: false,
        });

        if let Err(err) = self.documents.create(&document).await {
            warn!(
                document_id = %document.id(),
                error = %err,
                "document record write failed; releasing stored bytes",
            );
            let storage_released = self.release_orphan(document.storage_key()).await;
            return Err(DocumentPolicyError::RecordWriteFailed { storage_released });
        }

        info!(
            owner_id = %document.owner_id(),
            document_id = %document.id(),
            size_bytes,
            tier = %tier.id(),
            "document uploaded",
        );
        Ok(self.view(&document))
    }

    async fn lock_document(
        &self,
        owner_id: &OwnerId,
        id: DocumentId,
    ) -> Result<DocumentMutationResponse, DocumentPolicyError> {
        let document = self.owned_document(owner_id, id).await?;
        let next = document.lock_state().manual_lock();
        self.persist_lock_state(&document, next).await?;
        let reconciliation = self.reconcile(owner_id).await?;

        Ok(DocumentMutationResponse {
            document: self.view(&document.with_lock_state(next)),
            reconciliation,
        })
    }

    async fn unlock_document(
        &self,
        owner_id: &OwnerId,
        id: DocumentId,
    ) -> Result<DocumentMutationResponse, DocumentPolicyError> {
        let document = self.owned_document(owner_id, id).await?;
        let next = document.lock_state().manual_unlock()?;
        self.persist_lock_state(&document, next).await?;
        let reconciliation = self.reconcile(owner_id).await?;
        let settled = reconciliation
            .transitions()
            .iter()
            .find(|transition| transition.document_id == id)
            .map_or(next, |transition| transition.to);

        Ok(DocumentMutationResponse {
            document: self.view(&document.with_lock_state(settled)),
            reconciliation,
        })
    }

    async fn set_visibility(
        &self,
        owner_id: &OwnerId,
        id: DocumentId,
        is_public: bool,
    ) -> Result<DocumentMutationResponse, DocumentPolicyError> {
        let document = self.owned_document(owner_id, id).await?;
        if document.is_public() != is_public {
            self.documents
                .update_visibility(id, is_public)
                .await
                .map_err(map_repository_error)?;
        }

        Ok(DocumentMutationResponse {
            document: self.view(&document.with_visibility(is_public)),
            reconciliation: ReconciliationOutcome::default(),
        })
    }

    async fn delete_document(
        &self,
        owner_id: &OwnerId,
        id: DocumentId,
    ) -> Result<ReconciliationOutcome, DocumentPolicyError> {
        let document = self.owned_document(owner_id, id).await?;
        self.objects
            .delete(document.storage_key())
            .await
            .map_err(map_object_store_error)?;
        self.documents
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        info!(owner_id = %owner_id, document_id = %id, "document deleted");

        self.reconcile(owner_id).await
    }
}

#[async_trait]
impl<R, S, T> DocumentQuery for DocumentService<R, S, T>
where
    R: DocumentRepository,
    S: ObjectStore,
    T: SubscriptionSource,
{
    async fn list_documents(
        &self,
        owner_id: &OwnerId,
    ) -> Result<Vec<DocumentView>, DocumentPolicyError> {
        let mut documents = self
            .documents
            .list_for_owner(owner_id)
            .await
            .map_err(map_repository_error)?;
        documents.sort_by_key(|document| (document.created_at(), document.id()));
        Ok(documents.iter().map(|document| self.view(document)).collect())
    }

    async fn open_public_document(
        &self,
        id: DocumentId,
    ) -> Result<PublicDocumentView, DocumentPolicyError> {
        let document = self
            .documents
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .filter(|document| document.is_public() && !document.is_locked())
            .ok_or(DocumentPolicyError::NotFound)?;
        let view_count = self
            .documents
            .increment_view_count(id)
            .await
            .map_err(map_repository_error)?;

        Ok(PublicDocumentView {
            id,
            title: document.title().as_str().to_owned(),
            public_url: self.objects.public_url(document.storage_key()),
            view_count,
        })
    }
}

#[cfg(test)]
#[path = "document_service_tests.rs"]
mod tests;
