//! Uploaded document aggregate and its lock state machine.
//!
//! A document's lock flag and lock reason live in one [`LockState`] value,
//! so "locked iff a reason is recorded" holds by construction. Adapters that
//! store the pair as two columns rebuild the state through
//! [`LockState::from_parts`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::owner::OwnerId;

/// Maximum title length in characters.
pub const DOCUMENT_TITLE_MAX: usize = 200;

/// Opaque document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation errors raised by document value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentValidationError {
    /// Title is blank.
    #[error("document title must not be empty")]
    EmptyTitle,
    /// Title is longer than [`DOCUMENT_TITLE_MAX`].
    #[error("document title must be at most {max} characters")]
    TitleTooLong {
        /// Allowed maximum.
        max: usize,
    },
    /// Storage key is blank.
    #[error("storage key must not be empty")]
    EmptyStorageKey,
    /// Storage key escapes its namespace.
    #[error("storage key must be a relative path without parent segments")]
    InvalidStorageKey,
    /// Lock flag and lock reason disagree.
    #[error("lock flag {is_locked} contradicts lock reason {reason}")]
    InconsistentLock {
        /// Stored flag.
        is_locked: bool,
        /// Stored reason.
        reason: LockReason,
    },
}

/// Human readable document title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentTitle(String);

impl DocumentTitle {
    /// Validate and construct a title. Surrounding whitespace is trimmed.
    ///
    /// # Examples
    /// ```
    /// use flipbook_backend::domain::DocumentTitle;
    ///
    /// let title = DocumentTitle::new("  Spring catalogue ").expect("valid title");
    /// assert_eq!(title.as_str(), "Spring catalogue");
    /// assert!(DocumentTitle::new("   ").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, DocumentValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DocumentValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > DOCUMENT_TITLE_MAX {
            return Err(DocumentValidationError::TitleTooLong {
                max: DOCUMENT_TITLE_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the title.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DocumentTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DocumentTitle> for String {
    fn from(value: DocumentTitle) -> Self {
        value.0
    }
}

impl TryFrom<String> for DocumentTitle {
    type Error = DocumentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Object-store key of a document's PDF bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorageKey(String);

impl StorageKey {
    /// Validate an existing key.
    pub fn new(raw: impl Into<String>) -> Result<Self, DocumentValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(DocumentValidationError::EmptyStorageKey);
        }
        let escapes = raw.trim() != raw
            || raw.starts_with('/')
            || raw.split('/').any(|segment| segment.is_empty() || segment == "..");
        if escapes {
            return Err(DocumentValidationError::InvalidStorageKey);
        }
        Ok(Self(raw))
    }

    /// Mint the key for a freshly uploaded document:
    /// `<owner>/<document>.pdf`.
    ///
    /// # Examples
    /// ```
    /// use flipbook_backend::domain::{DocumentId, OwnerId, StorageKey};
    ///
    /// let owner = OwnerId::random();
    /// let document = DocumentId::random();
    /// let key = StorageKey::for_upload(&owner, document);
    /// assert_eq!(key.as_str(), format!("{owner}/{document}.pdf"));
    /// ```
    pub fn for_upload(owner_id: &OwnerId, document_id: DocumentId) -> Self {
        Self(format!("{owner_id}/{document_id}.pdf"))
    }

    /// Borrow the key.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<StorageKey> for String {
    fn from(value: StorageKey) -> Self {
        value.0
    }
}

impl TryFrom<String> for StorageKey {
    type Error = DocumentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Why a document is locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockReason {
    /// Not locked.
    None,
    /// The owner locked it.
    UserLocked,
    /// The file exceeds the current tier's size ceiling.
    SizeLimit,
    /// The owner has more documents than the current tier allows.
    PlanLimit,
}

impl LockReason {
    /// Stable lowercase name used in storage and payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::UserLocked => "user_locked",
            Self::SizeLimit => "size_limit",
            Self::PlanLimit => "plan_limit",
        }
    }

    /// Parse the stored name.
    pub fn parse(raw: &str) -> Option<Self> {
        [Self::None, Self::UserLocked, Self::SizeLimit, Self::PlanLimit]
            .into_iter()
            .find(|reason| reason.as_str() == raw)
    }
}

impl fmt::Display for LockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by illegal lock transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LockTransitionError {
    /// Only user-initiated locks can be cleared by the owner.
    #[error("documents locked for {reason} can only be unlocked by a plan change")]
    IllegalUnlock {
        /// The lock cause that blocked the unlock.
        reason: LockReason,
    },
}

/// Lock status of a document.
///
/// | From | Event | To |
/// |---|---|---|
/// | `Unlocked` | manual lock | `LockedManual` |
/// | `LockedManual` | manual unlock | `Unlocked` |
/// | `Unlocked` | reconciliation, count over ceiling | `LockedPlanLimit` |
/// | `Unlocked` | reconciliation, size over ceiling | `LockedSizeLimit` |
/// | `LockedPlanLimit` / `LockedSizeLimit` | reconciliation after a plan change | `Unlocked` |
///
/// Reconciliation never touches `LockedManual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    /// Viewable and counted against the tier.
    #[default]
    Unlocked,
    /// Locked by the owner.
    LockedManual,
    /// Locked because the file outgrew the tier's size ceiling.
    LockedSizeLimit,
    /// Locked because the owner has more documents than the tier allows.
    LockedPlanLimit,
}

impl LockState {
    /// Rebuild the state from a stored flag and reason.
    ///
    /// # Examples
    /// ```
    /// use flipbook_backend::domain::{LockReason, LockState};
    ///
    /// let state = LockState::from_parts(true, LockReason::PlanLimit).expect("consistent");
    /// assert_eq!(state, LockState::LockedPlanLimit);
    /// assert!(LockState::from_parts(false, LockReason::SizeLimit).is_err());
    /// ```
    pub fn from_parts(
        is_locked: bool,
        reason: LockReason,
    ) -> Result<Self, DocumentValidationError> {
        match (is_locked, reason) {
            (false, LockReason::None) => Ok(Self::Unlocked),
            (true, LockReason::UserLocked) => Ok(Self::LockedManual),
            (true, LockReason::SizeLimit) => Ok(Self::LockedSizeLimit),
            (true, LockReason::PlanLimit) => Ok(Self::LockedPlanLimit),
            (is_locked, reason) => {
                Err(DocumentValidationError::InconsistentLock { is_locked, reason })
            }
        }
    }

    /// Return true for every locked state.
    pub const fn is_locked(self) -> bool {
        !matches!(self, Self::Unlocked)
    }

    /// Return true for locks that reconciliation manages.
    pub const fn is_policy_lock(self) -> bool {
        matches!(self, Self::LockedSizeLimit | Self::LockedPlanLimit)
    }

    /// Lock cause recorded alongside the flag.
    pub const fn reason(self) -> LockReason {
        match self {
            Self::Unlocked => LockReason::None,
            Self::LockedManual => LockReason::UserLocked,
            Self::LockedSizeLimit => LockReason::SizeLimit,
            Self::LockedPlanLimit => LockReason::PlanLimit,
        }
    }

    /// Apply an owner lock request. Already locked documents keep their
    /// current state.
    pub const fn manual_lock(self) -> Self {
        match self {
            Self::Unlocked => Self::LockedManual,
            other => other,
        }
    }

    /// Apply an owner unlock request.
    ///
    /// Size and plan locks are rejected with
    /// [`LockTransitionError::IllegalUnlock`]; unlocking an unlocked
    /// document is a no-op.
    ///
    /// # Examples
    /// ```
    /// use flipbook_backend::domain::{LockReason, LockState, LockTransitionError};
    ///
    /// assert_eq!(LockState::LockedManual.manual_unlock(), Ok(LockState::Unlocked));
    /// assert_eq!(
    ///     LockState::LockedSizeLimit.manual_unlock(),
    ///     Err(LockTransitionError::IllegalUnlock { reason: LockReason::SizeLimit }),
    /// );
    /// ```
    pub const fn manual_unlock(self) -> Result<Self, LockTransitionError> {
        match self {
            Self::Unlocked | Self::LockedManual => Ok(Self::Unlocked),
            Self::LockedSizeLimit | Self::LockedPlanLimit => {
                Err(LockTransitionError::IllegalUnlock {
                    reason: self.reason(),
                })
            }
        }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unlocked => "unlocked",
            Self::LockedManual => "locked_manual",
            Self::LockedSizeLimit => "locked_size_limit",
            Self::LockedPlanLimit => "locked_plan_limit",
        };
        f.write_str(name)
    }
}

/// Input for constructing a [`Document`].
#[derive(Debug, Clone)]
pub struct DocumentDraft {
    pub id: DocumentId,
    pub owner_id: OwnerId,
    pub title: DocumentTitle,
    pub storage_key: StorageKey,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    pub lock_state: LockState,
    pub view_count: u64,
    pub is_public: bool,
}

/// One uploaded PDF and its derived viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    id: DocumentId,
    owner_id: OwnerId,
    title: DocumentTitle,
    storage_key: StorageKey,
    size_bytes: u64,
    created_at: DateTime<Utc>,
    lock_state: LockState,
    view_count: u64,
    is_public: bool,
}

impl Document {
    /// Build a document from a draft.
    pub fn new(draft: DocumentDraft) -> Self {
        let DocumentDraft {
            id,
            owner_id,
            title,
            storage_key,
            size_bytes,
            created_at,
            lock_state,
            view_count,
            is_public,
        } = draft;
        Self {
            id,
            owner_id,
            title,
            storage_key,
            size_bytes,
            created_at,
            lock_state,
            view_count,
            is_public,
        }
    }

    /// Document identifier.
    pub const fn id(&self) -> DocumentId {
        self.id
    }

    /// Owning account.
    pub const fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    /// Display title.
    pub const fn title(&self) -> &DocumentTitle {
        &self.title
    }

    /// Object-store key of the PDF bytes.
    pub const fn storage_key(&self) -> &StorageKey {
        &self.storage_key
    }

    /// File size in bytes.
    pub const fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Upload timestamp; reconciliation orders by it.
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Current lock state.
    pub const fn lock_state(&self) -> LockState {
        self.lock_state
    }

    /// Shorthand for `lock_state().is_locked()`.
    pub const fn is_locked(&self) -> bool {
        self.lock_state.is_locked()
    }

    /// Shorthand for `lock_state().reason()`.
    pub const fn lock_reason(&self) -> LockReason {
        self.lock_state.reason()
    }

    /// Monotonic view counter.
    pub const fn view_count(&self) -> u64 {
        self.view_count
    }

    /// Whether anonymous viewers may open the flipbook.
    pub const fn is_public(&self) -> bool {
        self.is_public
    }

    /// Copy of this document with a new lock state.
    #[must_use]
    pub fn with_lock_state(mut self, lock_state: LockState) -> Self {
        self.lock_state = lock_state;
        self
    }

    /// Copy of this document with new visibility.
    #[must_use]
    pub fn with_visibility(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    /// Copy of this document with a new view counter.
    #[must_use]
    pub fn with_view_count(mut self, view_count: u64) -> Self {
        self.view_count = view_count;
        self
    }
}
