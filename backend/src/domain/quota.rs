//! Quota evaluation for candidate documents.
//!
//! Pure decision logic: no I/O and no errors for expected rejections. The
//! count ceiling is checked before the size ceiling so the reported reason is
//! stable when both are breached.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::plan::PlanTier;

/// Reason a candidate document was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotaRejection {
    /// The owner already has as many active documents as the tier allows.
    CountExceeded,
    /// The file is larger than the tier allows.
    SizeExceeded,
}

impl QuotaRejection {
    /// Stable lowercase name used in payloads and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CountExceeded => "count_exceeded",
            Self::SizeExceeded => "size_exceeded",
        }
    }
}

impl fmt::Display for QuotaRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a quota evaluation. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    /// The candidate fits the tier.
    Admitted,
    /// The candidate breaches the tier.
    Rejected(QuotaRejection),
}

impl QuotaDecision {
    /// Return true when the candidate was admitted.
    pub const fn is_admitted(self) -> bool {
        matches!(self, Self::Admitted)
    }

    /// Rejection reason, if any.
    pub const fn rejection(self) -> Option<QuotaRejection> {
        match self {
            Self::Admitted => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

/// Decide whether a candidate document fits `tier`.
///
/// `active_document_count` counts unlocked documents only; locked documents
/// never consume a slot.
///
/// # Examples
/// ```
/// use flipbook_backend::domain::{PlanTierId, QuotaDecision, QuotaRejection, evaluate, tier_for};
///
/// let free = tier_for(PlanTierId::Free);
/// assert_eq!(evaluate(&free, 0, 1024), QuotaDecision::Admitted);
/// assert_eq!(
///     evaluate(&free, 1, 1024),
///     QuotaDecision::Rejected(QuotaRejection::CountExceeded),
/// );
/// ```
pub fn evaluate(
    tier: &PlanTier,
    active_document_count: usize,
    candidate_size_bytes: u64,
) -> QuotaDecision {
    if !tier
        .max_documents()
        .has_room_for_another(active_document_count)
    {
        return QuotaDecision::Rejected(QuotaRejection::CountExceeded);
    }
    if !tier.accommodates_size(candidate_size_bytes) {
        return QuotaDecision::Rejected(QuotaRejection::SizeExceeded);
    }
    QuotaDecision::Admitted
}

#[cfg(test)]
mod tests {
    //! Decision table coverage for the quota evaluator.

    use rstest::rstest;

    use super::*;
    use crate::domain::plan::{PlanTierId, all_tiers, tier_for};

    const MIB: u64 = 1024 * 1024;

    #[rstest]
    #[case(PlanTierId::Free, 0, MIB, QuotaDecision::Admitted)]
    #[case(PlanTierId::Free, 0, 2 * MIB, QuotaDecision::Admitted)]
    #[case(
        PlanTierId::Free,
        0,
        2 * MIB + 1,
        QuotaDecision::Rejected(QuotaRejection::SizeExceeded)
    )]
    #[case(
        PlanTierId::Free,
        1,
        MIB,
        QuotaDecision::Rejected(QuotaRejection::CountExceeded)
    )]
    #[case(PlanTierId::Starter, 4, 10 * MIB, QuotaDecision::Admitted)]
    #[case(
        PlanTierId::Starter,
        5,
        MIB,
        QuotaDecision::Rejected(QuotaRejection::CountExceeded)
    )]
    #[case(PlanTierId::Pro, 10_000, 50 * MIB, QuotaDecision::Admitted)]
    #[case(
        PlanTierId::Pro,
        10_000,
        50 * MIB + 1,
        QuotaDecision::Rejected(QuotaRejection::SizeExceeded)
    )]
    fn decision_table(
        #[case] tier: PlanTierId,
        #[case] active: usize,
        #[case] size: u64,
        #[case] expected: QuotaDecision,
    ) {
        assert_eq!(evaluate(&tier_for(tier), active, size), expected);
    }

    #[rstest]
    fn count_rejection_takes_precedence_over_size() {
        for tier in all_tiers() {
            let Some(limit) = tier.max_documents().limit() else {
                continue;
            };
            let decision = evaluate(tier, limit, tier.max_file_size_bytes() + 1);
            assert_eq!(
                decision,
                QuotaDecision::Rejected(QuotaRejection::CountExceeded),
                "tier {}",
                tier.id()
            );
        }
    }

    #[rstest]
    fn admits_iff_both_ceilings_hold() {
        let sizes = [0, MIB, 2 * MIB, 2 * MIB + 1, 10 * MIB + 1, 50 * MIB + 1];
        for tier in all_tiers() {
            for active in 0..=110_usize {
                for size in sizes {
                    let count_ok = tier
                        .max_documents()
                        .limit()
                        .is_none_or(|limit| active < limit);
                    let size_ok = size <= tier.max_file_size_bytes();
                    assert_eq!(
                        evaluate(tier, active, size).is_admitted(),
                        count_ok && size_ok,
                        "tier {} active {active} size {size}",
                        tier.id()
                    );
                }
            }
        }
    }

    #[rstest]
    fn rejection_accessor_reports_reason() {
        let decision = QuotaDecision::Rejected(QuotaRejection::SizeExceeded);
        assert_eq!(decision.rejection(), Some(QuotaRejection::SizeExceeded));
        assert_eq!(QuotaDecision::Admitted.rejection(), None);
    }
}
