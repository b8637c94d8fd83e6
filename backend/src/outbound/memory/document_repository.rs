//! In-memory document repository.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{DocumentRepository, DocumentRepositoryError};
use crate::domain::{Document, DocumentId, LockState, OwnerId};

/// Document repository holding records in a map keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryDocumentRepository {
    store: Mutex<HashMap<DocumentId, Document>>,
    failing_creates: AtomicBool,
}

impl InMemoryDocumentRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent [`DocumentRepository::create`] fail with a
    /// query error until reset.
    pub fn fail_creates(&self, failing: bool) {
        self.failing_creates.store(failing, Ordering::SeqCst);
    }

    fn guard(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<DocumentId, Document>>, DocumentRepositoryError> {
        self.store
            .lock()
            .map_err(|_| DocumentRepositoryError::connection("document store poisoned"))
    }

    fn update<F>(&self, id: DocumentId, apply: F) -> Result<Document, DocumentRepositoryError>
    where
        F: FnOnce(Document) -> Document,
    {
        let mut guard = self.guard()?;
        let current = guard
            .remove(&id)
            .ok_or_else(|| DocumentRepositoryError::missing(id.to_string()))?;
        let updated = apply(current);
        guard.insert(id, updated.clone());
        Ok(updated)
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn list_for_owner(
        &self,
        owner_id: &OwnerId,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        let guard = self.guard()?;
        Ok(guard
            .values()
            .filter(|document| document.owner_id() == owner_id)
            .cloned()
            .collect())
    }

    async fn find_by_id(
        &self,
        id: DocumentId,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        Ok(self.guard()?.get(&id).cloned())
    }

    async fn create(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        if self.failing_creates.load(Ordering::SeqCst) {
            return Err(DocumentRepositoryError::query("insert rejected"));
        }
        let mut guard = self.guard()?;
        if guard.contains_key(&document.id()) {
            return Err(DocumentRepositoryError::query(format!(
                "duplicate document id {}",
                document.id()
            )));
        }
        guard.insert(document.id(), document.clone());
        Ok(())
    }

    async fn update_lock_state(
        &self,
        id: DocumentId,
        lock_state: LockState,
    ) -> Result<(), DocumentRepositoryError> {
        self.update(id, |document| document.with_lock_state(lock_state))
            .map(drop)
    }

    async fn update_visibility(
        &self,
        id: DocumentId,
        is_public: bool,
    ) -> Result<(), DocumentRepositoryError> {
        self.update(id, |document| document.with_visibility(is_public))
            .map(drop)
    }

    async fn increment_view_count(&self, id: DocumentId) -> Result<u64, DocumentRepositoryError> {
        self.update(id, |document| {
            let next = document.view_count().saturating_add(1);
            document.with_view_count(next)
        })
        .map(|document| document.view_count())
    }

    async fn delete(&self, id: DocumentId) -> Result<(), DocumentRepositoryError> {
        self.guard()?.remove(&id);
        Ok(())
    }
}
