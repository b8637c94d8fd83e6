//! Port for document record persistence.

use async_trait::async_trait;

use crate::domain::{Document, DocumentId, LockState, OwnerId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by document repository adapters.
    pub enum DocumentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "document repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "document repository query failed: {message}",
        /// The targeted record does not exist.
        Missing { id: String } =>
            "document {id} does not exist",
    }
}

/// Port for reading and mutating document records.
///
/// Each mutation is an independent write; adapters do not coordinate
/// across documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Every document of `owner_id`, in no particular order.
    async fn list_for_owner(
        &self,
        owner_id: &OwnerId,
    ) -> Result<Vec<Document>, DocumentRepositoryError>;

    /// Find a document by id regardless of owner.
    async fn find_by_id(
        &self,
        id: DocumentId,
    ) -> Result<Option<Document>, DocumentRepositoryError>;

    /// Insert a new record.
    async fn create(&self, document: &Document) -> Result<(), DocumentRepositoryError>;

    /// Overwrite the lock flag and reason.
    async fn update_lock_state(
        &self,
        id: DocumentId,
        lock_state: LockState,
    ) -> Result<(), DocumentRepositoryError>;

    /// Overwrite the public flag.
    async fn update_visibility(
        &self,
        id: DocumentId,
        is_public: bool,
    ) -> Result<(), DocumentRepositoryError>;

    /// Add one view and return the new total.
    async fn increment_view_count(&self, id: DocumentId) -> Result<u64, DocumentRepositoryError>;

    /// Remove the record. Removing a missing record succeeds.
    async fn delete(&self, id: DocumentId) -> Result<(), DocumentRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDocumentRepository;

#[async_trait]
impl DocumentRepository for FixtureDocumentRepository {
    async fn list_for_owner(
        &self,
        _owner_id: &OwnerId,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(
        &self,
        _id: DocumentId,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        Ok(None)
    }

    async fn create(&self, _document: &Document) -> Result<(), DocumentRepositoryError> {
        Ok(())
    }

    async fn update_lock_state(
        &self,
        id: DocumentId,
        _lock_state: LockState,
    ) -> Result<(), DocumentRepositoryError> {
        Err(DocumentRepositoryError::missing(id.to_string()))
    }

    async fn update_visibility(
        &self,
        id: DocumentId,
        _is_public: bool,
    ) -> Result<(), DocumentRepositoryError> {
        Err(DocumentRepositoryError::missing(id.to_string()))
    }

    async fn increment_view_count(&self, id: DocumentId) -> Result<u64, DocumentRepositoryError> {
        Err(DocumentRepositoryError::missing(id.to_string()))
    }

    async fn delete(&self, _id: DocumentId) -> Result<(), DocumentRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Fixture behaviour and error formatting.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_lists_nothing() {
        let documents = FixtureDocumentRepository
            .list_for_owner(&OwnerId::random())
            .await
            .expect("fixture list succeeds");
        assert!(documents.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_updates_report_missing_records() {
        let id = DocumentId::random();
        let err = FixtureDocumentRepository
            .update_lock_state(id, LockState::LockedManual)
            .await
            .expect_err("fixture has no records");
        assert_eq!(err, DocumentRepositoryError::missing(id.to_string()));
    }

    #[rstest]
    fn query_error_formats_message() {
        let err = DocumentRepositoryError::query("broken sql");
        assert!(err.to_string().contains("broken sql"));
    }
}
