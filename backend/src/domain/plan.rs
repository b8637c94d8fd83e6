//! Subscription plan catalog.
//!
//! The catalog is a static table: tiers are immutable and looked up by
//! [`PlanTierId`]. Unknown tier identifiers fall back to the free tier so
//! callers never have to handle a missing plan.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const MIB: u64 = 1024 * 1024;

/// Identifier of a subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanTierId {
    /// Default tier for every owner without a subscription.
    #[default]
    Free,
    /// Entry paid tier.
    Starter,
    /// Mid paid tier.
    Hobby,
    /// Team paid tier.
    Business,
    /// Top tier with no document ceiling.
    Pro,
}

impl PlanTierId {
    /// Every tier in ascending order.
    pub const ALL: [Self; 5] = [
        Self::Free,
        Self::Starter,
        Self::Hobby,
        Self::Business,
        Self::Pro,
    ];

    /// Stable lowercase name used in storage and payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Starter => "starter",
            Self::Hobby => "hobby",
            Self::Business => "business",
            Self::Pro => "pro",
        }
    }

    /// Parse a raw identifier, falling back to [`PlanTierId::Free`] when the
    /// value is not recognised.
    ///
    /// # Examples
    /// ```
    /// use flipbook_backend::domain::PlanTierId;
    ///
    /// assert_eq!(PlanTierId::parse_or_default("pro"), PlanTierId::Pro);
    /// assert_eq!(PlanTierId::parse_or_default("platinum"), PlanTierId::Free);
    /// ```
    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl fmt::Display for PlanTierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a tier name is not part of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown plan tier: {0}")]
pub struct UnknownPlanTier(pub String);

impl FromStr for PlanTierId {
    type Err = UnknownPlanTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == normalised)
            .ok_or_else(|| UnknownPlanTier(s.to_owned()))
    }
}

/// Document-count ceiling of a tier.
///
/// "No ceiling" is its own variant so it can never collide with a real
/// limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum DocumentCeiling {
    /// At most this many active documents.
    Limited(NonZeroU32),
    /// Any number of active documents.
    Unbounded,
}

impl DocumentCeiling {
    /// Return true when `active_count` active documents leave room for one
    /// more.
    pub fn has_room_for_another(self, active_count: usize) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Limited(max) => active_count < max_as_usize(max),
        }
    }

    /// Number of documents that may stay active, or `None` when unbounded.
    pub fn limit(self) -> Option<usize> {
        match self {
            Self::Unbounded => None,
            Self::Limited(max) => Some(max_as_usize(max)),
        }
    }
}

fn max_as_usize(max: NonZeroU32) -> usize {
    usize::try_from(max.get()).unwrap_or(usize::MAX)
}

/// Immutable catalog entry describing one subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanTier {
    id: PlanTierId,
    max_documents: DocumentCeiling,
    max_file_size_bytes: u64,
    display_name: &'static str,
    price_cents: u32,
}

impl PlanTier {
    /// Tier identifier.
    pub const fn id(&self) -> PlanTierId {
        self.id
    }

    /// Document-count ceiling.
    pub const fn max_documents(&self) -> DocumentCeiling {
        self.max_documents
    }

    /// Largest accepted file, in bytes.
    pub const fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_bytes
    }

    /// Name shown on the pricing page.
    pub const fn display_name(&self) -> &'static str {
        self.display_name
    }

    /// Monthly price in cents.
    pub const fn price_cents(&self) -> u32 {
        self.price_cents
    }

    /// Return true when a file of `size_bytes` fits this tier.
    pub const fn accommodates_size(&self, size_bytes: u64) -> bool {
        size_bytes <= self.max_file_size_bytes
    }
}

const fn limited(max: u32) -> DocumentCeiling {
    match NonZeroU32::new(max) {
        Some(value) => DocumentCeiling::Limited(value),
        None => DocumentCeiling::Unbounded,
    }
}

const FREE: PlanTier = PlanTier {
    id: PlanTierId::Free,
    max_documents: limited(1),
    max_file_size_bytes: 2 * MIB,
    display_name: "Free",
    price_cents: 0,
};

static CATALOG: [PlanTier; 5] = [
    FREE,
    PlanTier {
        id: PlanTierId::Starter,
        max_documents: limited(5),
        max_file_size_bytes: 10 * MIB,
        display_name: "Starter",
        price_cents: 500,
    },
    PlanTier {
        id: PlanTierId::Hobby,
        max_documents: limited(15),
        max_file_size_bytes: 25 * MIB,
        display_name: "Hobby",
        price_cents: 1_200,
    },
    PlanTier {
        id: PlanTierId::Business,
        max_documents: limited(100),
        max_file_size_bytes: 50 * MIB,
        display_name: "Business",
        price_cents: 2_900,
    },
    PlanTier {
        id: PlanTierId::Pro,
        max_documents: DocumentCeiling::Unbounded,
        max_file_size_bytes: 50 * MIB,
        display_name: "Pro",
        price_cents: 4_900,
    },
];

/// Look up the catalog entry for `id`.
///
/// # Examples
/// ```
/// use flipbook_backend::domain::{PlanTierId, tier_for};
///
/// let free = tier_for(PlanTierId::Free);
/// assert_eq!(free.max_documents().limit(), Some(1));
/// ```
pub fn tier_for(id: PlanTierId) -> PlanTier {
    CATALOG
        .iter()
        .copied()
        .find(|tier| tier.id == id)
        .unwrap_or(FREE)
}

/// Look up a tier by its raw name, falling back to the free tier.
pub fn tier_for_name(raw: &str) -> PlanTier {
    tier_for(PlanTierId::parse_or_default(raw))
}

/// The default tier assigned to owners without a subscription.
pub const fn default_tier() -> PlanTier {
    FREE
}

/// All tiers in ascending order.
pub fn all_tiers() -> &'static [PlanTier] {
    &CATALOG
}

#[cfg(test)]
mod tests {
    //! Catalog lookups and ceiling arithmetic.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn every_id_has_exactly_one_entry() {
        for id in PlanTierId::ALL {
            let matches = all_tiers().iter().filter(|tier| tier.id() == id).count();
            assert_eq!(matches, 1, "tier {id} must appear once");
        }
    }

    #[rstest]
    fn free_is_the_default() {
        assert_eq!(default_tier().id(), PlanTierId::Free);
        assert_eq!(default_tier().max_file_size_bytes(), 2 * MIB);
    }

    #[rstest]
    #[case("pro", PlanTierId::Pro)]
    #[case(" Starter ", PlanTierId::Starter)]
    #[case("enterprise", PlanTierId::Free)]
    #[case("", PlanTierId::Free)]
    fn unknown_names_fall_back_to_free(#[case] raw: &str, #[case] expected: PlanTierId) {
        assert_eq!(tier_for_name(raw).id(), expected);
    }

    #[rstest]
    fn pro_has_no_document_ceiling() {
        let pro = tier_for(PlanTierId::Pro);
        assert_eq!(pro.max_documents(), DocumentCeiling::Unbounded);
        assert!(pro.max_documents().has_room_for_another(usize::MAX - 1));
        assert_eq!(pro.max_documents().limit(), None);
    }

    #[rstest]
    #[case(0, true)]
    #[case(4, true)]
    #[case(5, false)]
    #[case(6, false)]
    fn starter_ceiling_is_five(#[case] active: usize, #[case] expected: bool) {
        let starter = tier_for(PlanTierId::Starter);
        assert_eq!(starter.max_documents().has_room_for_another(active), expected);
    }

    #[rstest]
    fn catalog_prices_ascend() {
        let prices: Vec<u32> = all_tiers().iter().map(PlanTier::price_cents).collect();
        let mut sorted = prices.clone();
        sorted.sort_unstable();
        assert_eq!(prices, sorted);
    }

    #[rstest]
    fn tier_ids_serialise_as_snake_case() {
        let value = serde_json::to_value(PlanTierId::Business).expect("serialise id");
        assert_eq!(value, serde_json::json!("business"));
    }
}
