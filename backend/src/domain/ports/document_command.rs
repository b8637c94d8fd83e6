//! Driving port for document mutations.
//!
//! Every mutation that can change which documents are active runs a
//! reconciliation pass afterwards and reports the transitions it applied.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;

use crate::domain::{
    DocumentId, DocumentPolicyError, LockReason, OwnerId, ReconciliationOutcome,
};

use super::DocumentView;

/// Candidate upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDocumentRequest {
    pub owner_id: OwnerId,
    pub title: String,
    pub bytes: Vec<u8>,
}

/// Result of a lock, unlock or visibility change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMutationResponse {
    pub document: DocumentView,
    pub reconciliation: ReconciliationOutcome,
}

/// Driving port for document write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentCommand: Send + Sync {
    /// Admit, store and record a new PDF.
    async fn upload_document(
        &self,
        request: UploadDocumentRequest,
    ) -> Result<DocumentView, DocumentPolicyError>;

    /// Lock a document on the owner's request.
    async fn lock_document(
        &self,
        owner_id: &OwnerId,
        id: DocumentId,
    ) -> Result<DocumentMutationResponse, DocumentPolicyError>;

    /// Clear a manual lock.
    async fn unlock_document(
        &self,
        owner_id: &OwnerId,
        id: DocumentId,
    ) -> Result<DocumentMutationResponse, DocumentPolicyError>;

    /// Toggle public sharing.
    async fn set_visibility(
        &self,
        owner_id: &OwnerId,
        id: DocumentId,
        is_public: bool,
    ) -> Result<DocumentMutationResponse, DocumentPolicyError>;

    /// Delete the document and release its stored bytes.
    async fn delete_document(
        &self,
        owner_id: &OwnerId,
        id: DocumentId,
    ) -> Result<ReconciliationOutcome, DocumentPolicyError>;
}

/// Fixture implementation that echoes requests without persisting them.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDocumentCommand;

#[async_trait]
impl DocumentCommand for FixtureDocumentCommand {
    async fn upload_document(
        &self,
        request: UploadDocumentRequest,
    ) -> Result<DocumentView, DocumentPolicyError> {
        Ok(DocumentView {
            id: DocumentId::random(),
            title: request.title,
            size_bytes: u64::try_from(request.bytes.len()).unwrap_or(u64::MAX),
            created_at: Utc::now(),
            is_locked: false,
            lock_reason: LockReason::None,
            view_count: 0,
            is_public: false,
            public_url: String::new(),
        })
    }

    async fn lock_document(
        &self,
        _owner_id: &OwnerId,
        _id: DocumentId,
    ) -> Result<DocumentMutationResponse, DocumentPolicyError> {
        Err(DocumentPolicyError::NotFound)
    }

    async fn unlock_document(
        &self,
        _owner_id: &OwnerId,
        _id: DocumentId,
    ) -> Result<DocumentMutationResponse, DocumentPolicyError> {
        Err(DocumentPolicyError::NotFound)
    }

    async fn set_visibility(
        &self,
        _owner_id: &OwnerId,
        _id: DocumentId,
        _is_public: bool,
    ) -> Result<DocumentMutationResponse, DocumentPolicyError> {
        Err(DocumentPolicyError::NotFound)
    }

    async fn delete_document(
        &self,
        _owner_id: &OwnerId,
        _id: DocumentId,
    ) -> Result<ReconciliationOutcome, DocumentPolicyError> {
        Err(DocumentPolicyError::NotFound)
    }
}
