//! Lock reconciliation for an owner's documents.
//!
//! [`plan_reconciliation`] is pure: given the owner's current tier and a
//! snapshot of their documents it returns the transitions needed to satisfy
//! the tier. Services apply the transitions one write at a time, so a
//! partial failure leaves a state that the next pass repairs.

use serde::Serialize;

use super::document::{Document, DocumentId, LockState};
use super::plan::PlanTier;

/// One lock state change chosen by a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockTransition {
    /// Document to update.
    pub document_id: DocumentId,
    /// State observed in the snapshot.
    pub from: LockState,
    /// State the tier requires.
    pub to: LockState,
}

/// Transitions a reconciliation pass applied or intends to apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationOutcome {
    transitions: Vec<LockTransition>,
}

impl ReconciliationOutcome {
    /// Wrap an ordered list of transitions.
    pub fn new(transitions: Vec<LockTransition>) -> Self {
        Self { transitions }
    }

    /// Transitions in document creation order.
    pub fn transitions(&self) -> &[LockTransition] {
        &self.transitions
    }

    /// Return true when the documents already satisfy the tier.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }
}

/// Compute the lock transitions that bring `documents` in line with `tier`.
///
/// Manually locked documents are never touched. Every other document whose
/// size exceeds the tier is size-locked. The remaining documents are kept
/// unlocked oldest first, ties broken by id, up to the document ceiling; the
/// rest are plan-locked. Only documents whose state changes are returned.
///
/// # Examples
/// ```
/// use flipbook_backend::domain::{PlanTierId, plan_reconciliation, tier_for};
///
/// let outcome = plan_reconciliation(&tier_for(PlanTierId::Pro), &[]);
/// assert!(outcome.is_empty());
/// ```
pub fn plan_reconciliation(tier: &PlanTier, documents: &[Document]) -> ReconciliationOutcome {
    let mut managed: Vec<&Document> = documents
        .iter()
        .filter(|document| document.lock_state() != LockState::LockedManual)
        .collect();
    managed.sort_by_key(|document| (document.created_at(), document.id()));

    let ceiling = tier.max_documents();
    let mut retained = 0_usize;
    let transitions = managed
        .into_iter()
        .filter_map(|document| {
            let target = if !tier.accommodates_size(document.size_bytes()) {
                LockState::LockedSizeLimit
            } else if ceiling.has_room_for_another(retained) {
                retained += 1;
                LockState::Unlocked
            } else {
                LockState::LockedPlanLimit
            };
            (target != document.lock_state()).then_some(LockTransition {
                document_id: document.id(),
                from: document.lock_state(),
                to: target,
            })
        })
        .collect();

    ReconciliationOutcome::new(transitions)
}
