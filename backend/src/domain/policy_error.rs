//! Failure taxonomy of the document policy engine.
//!
//! Expected rejections (quota, illegal unlock, invalid upload) are variants
//! callers match on; infrastructure failures carry a message for logs. Every
//! variant converts into the transport-agnostic [`Error`].

use serde_json::json;

use super::document::{LockReason, LockTransitionError};
use super::error::Error;
use super::quota::QuotaRejection;

/// Errors returned by document and plan services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentPolicyError {
    /// The owner's tier does not admit the document.
    #[error("plan limit reached: {reason}")]
    QuotaExceeded {
        /// Which ceiling was breached.
        reason: QuotaRejection,
    },
    /// The lock can only be cleared by a plan change.
    #[error("document locked for {reason} cannot be unlocked manually")]
    IllegalUnlock {
        /// Cause of the blocking lock.
        reason: LockReason,
    },
    /// Writing the PDF bytes failed; nothing was persisted.
    #[error("storage write failed: {message}")]
    StorageWriteFailed {
        /// Adapter failure description.
        message: String,
    },
    /// Creating the document record failed after the bytes were stored.
    #[error("document record write failed (storage released: {storage_released})")]
    RecordWriteFailed {
        /// Whether the compensating delete removed the stored bytes.
        storage_released: bool,
    },
    /// The document does not exist or belongs to someone else.
    #[error("document not found")]
    NotFound,
    /// No authenticated owner.
    #[error("login required")]
    Unauthorized,
    /// The upload candidate failed validation.
    #[error("invalid upload: {message}")]
    InvalidUpload {
        /// Validation failure.
        message: String,
    },
    /// A backing service could not be reached.
    #[error("service unavailable: {message}")]
    Unavailable {
        /// Adapter failure description.
        message: String,
    },
    /// A backing service rejected an operation unexpectedly.
    #[error("internal error: {message}")]
    Internal {
        /// Adapter failure description.
        message: String,
    },
}

impl DocumentPolicyError {
    /// Build an [`DocumentPolicyError::InvalidUpload`].
    pub fn invalid_upload(message: impl Into<String>) -> Self {
        Self::InvalidUpload {
            message: message.into(),
        }
    }

    /// Build an [`DocumentPolicyError::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Build an [`DocumentPolicyError::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<LockTransitionError> for DocumentPolicyError {
    fn from(value: LockTransitionError) -> Self {
        match value {
            LockTransitionError::IllegalUnlock { reason } => Self::IllegalUnlock { reason },
        }
    }
}

impl From<DocumentPolicyError> for Error {
    fn from(value: DocumentPolicyError) -> Self {
        match value {
            DocumentPolicyError::QuotaExceeded { reason } => {
                let message = match reason {
                    QuotaRejection::CountExceeded => {
                        "document limit reached for the current plan"
                    }
                    QuotaRejection::SizeExceeded => {
                        "file exceeds the size limit of the current plan"
                    }
                };
                Self::quota_exceeded(message).with_details(json!({ "reason": reason }))
            }
            DocumentPolicyError::IllegalUnlock { reason } => Self::illegal_unlock(
                "this document can only be unlocked by changing plan",
            )
            .with_details(json!({ "reason": reason })),
            DocumentPolicyError::StorageWriteFailed { .. } => {
                Self::service_unavailable("document storage is unavailable")
            }
            DocumentPolicyError::RecordWriteFailed { storage_released } => {
                Self::service_unavailable("document could not be saved")
                    .with_details(json!({ "storageReleased": storage_released }))
            }
            DocumentPolicyError::NotFound => Self::not_found("document not found"),
            DocumentPolicyError::Unauthorized => Self::unauthorized("login required"),
            DocumentPolicyError::InvalidUpload { message } => Self::invalid_request(message),
            DocumentPolicyError::Unavailable { message } => Self::service_unavailable(message),
            DocumentPolicyError::Internal { message } => Self::internal(message),
        }
    }
}
