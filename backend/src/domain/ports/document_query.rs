//! Driving port for document reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Document, DocumentId, DocumentPolicyError, LockReason, OwnerId};

/// Owner-facing projection of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub id: DocumentId,
    pub title: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    pub is_locked: bool,
    pub lock_reason: LockReason,
    pub view_count: u64,
    pub is_public: bool,
    pub public_url: String,
}

impl DocumentView {
    /// Project `document`, resolving its public URL.
    pub fn from_document(document: &Document, public_url: String) -> Self {
        Self {
            id: document.id(),
            title: document.title().as_str().to_owned(),
            size_bytes: document.size_bytes(),
            created_at: document.created_at(),
            is_locked: document.is_locked(),
            lock_reason: document.lock_reason(),
            view_count: document.view_count(),
            is_public: document.is_public(),
            public_url,
        }
    }
}

/// Anonymous-viewer payload for a shared flipbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicDocumentView {
    pub id: DocumentId,
    pub title: String,
    pub public_url: String,
    pub view_count: u64,
}

/// Driving port for document read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentQuery: Send + Sync {
    /// The owner's documents, oldest first.
    async fn list_documents(
        &self,
        owner_id: &OwnerId,
    ) -> Result<Vec<DocumentView>, DocumentPolicyError>;

    /// Open a shared document and count the view.
    ///
    /// Private and locked documents are reported as
    /// [`DocumentPolicyError::NotFound`].
    async fn open_public_document(
        &self,
        id: DocumentId,
    ) -> Result<PublicDocumentView, DocumentPolicyError>;
}

/// Fixture implementation with no documents.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDocumentQuery;

#[async_trait]
impl DocumentQuery for FixtureDocumentQuery {
    async fn list_documents(
        &self,
        _owner_id: &OwnerId,
    ) -> Result<Vec<DocumentView>, DocumentPolicyError> {
        Ok(Vec::new())
    }

    async fn open_public_document(
        &self,
        _id: DocumentId,
    ) -> Result<PublicDocumentView, DocumentPolicyError> {
        Err(DocumentPolicyError::NotFound)
    }
}
