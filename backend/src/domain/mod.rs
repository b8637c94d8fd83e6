//! Domain primitives, policies and services.
//!
//! Purpose: hold the quota and lock lifecycle rules for uploaded documents
//! independent of any transport or storage technology. Pure decisions live in
//! [`plan`], [`quota`], [`document`] and [`reconciliation`]; the services
//! apply them through the driven ports in [`ports`].
//!
//! Public surface:
//! - `PlanTier`, `tier_for`, `all_tiers`: the subscription catalog.
//! - `evaluate`, `QuotaDecision`: admission decisions.
//! - `Document`, `LockState`: the document aggregate and its lock machine.
//! - `plan_reconciliation`: lock transitions a tier requires.
//! - `DocumentService`, `PlanService`: driving port implementations.
//! - `Error`, `ErrorCode`, `DocumentPolicyError`: failure reporting.

pub mod document;
pub(crate) mod document_service_support;
pub mod error;
pub mod owner;
pub mod plan;
pub mod policy_error;
pub mod ports;
pub mod quota;
pub mod reconciliation;
pub mod viewer;

mod document_service;
mod plan_service;

pub use self::document::{
    DOCUMENT_TITLE_MAX, Document, DocumentDraft, DocumentId, DocumentTitle,
    DocumentValidationError, LockReason, LockState, LockTransitionError, StorageKey,
};
pub use self::document_service::{DocumentService, PDF_MAGIC};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::owner::{OwnerId, OwnerIdValidationError};
pub use self::plan::{
    DocumentCeiling, PlanTier, PlanTierId, UnknownPlanTier, all_tiers, default_tier, tier_for,
    tier_for_name,
};
pub use self::plan_service::PlanService;
pub use self::policy_error::DocumentPolicyError;
pub use self::quota::{QuotaDecision, QuotaRejection, evaluate};
pub use self::reconciliation::{LockTransition, ReconciliationOutcome, plan_reconciliation};
pub use self::viewer::{MAX_ZOOM, MIN_ZOOM, PageCursor, PageMode, PageViewer, ViewingSession};

