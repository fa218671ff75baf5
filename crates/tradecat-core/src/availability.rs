//! Commercial availability derived from PIM flags and commerce-platform data.
//!
//! The state is never stored. It is recomputed from the three inputs every
//! time a product is displayed, so stale flags can't outlive their sources.

use serde::{Deserialize, Serialize};

/// The single commercial state a product is in at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityState {
    Available,
    QuoteOnly,
    Unavailable,
    Discontinued,
}

impl AvailabilityState {
    pub const ALL: [AvailabilityState; 4] = [
        AvailabilityState::Available,
        AvailabilityState::QuoteOnly,
        AvailabilityState::Unavailable,
        AvailabilityState::Discontinued,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AvailabilityState::Available => "available",
            AvailabilityState::QuoteOnly => "quote_only",
            AvailabilityState::Unavailable => "unavailable",
            AvailabilityState::Discontinued => "discontinued",
        }
    }
}

impl std::fmt::Display for AvailabilityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves the availability state for one product.
///
/// Precedence, highest first:
///
/// 1. `discontinued == Some(true)` → [`AvailabilityState::Discontinued`]
/// 2. `requires_quote == Some(true)` → [`AvailabilityState::QuoteOnly`]
/// 3. a non-blank `merchandise_id` → [`AvailabilityState::Available`]
/// 4. otherwise → [`AvailabilityState::Unavailable`]
///
/// A quote-only product stays quote-only even when a merchandise ID exists.
#[must_use]
pub fn resolve_availability(
    merchandise_id: Option<&str>,
    requires_quote: Option<bool>,
    discontinued: Option<bool>,
) -> AvailabilityState {
    if discontinued == Some(true) {
        return AvailabilityState::Discontinued;
    }
    if requires_quote == Some(true) {
        return AvailabilityState::QuoteOnly;
    }
    if merchandise_id.is_some_and(|id| !id.trim().is_empty()) {
        return AvailabilityState::Available;
    }
    AvailabilityState::Unavailable
}

/// The only gate consulted before enabling a cart mutation.
#[must_use]
pub fn can_add_to_cart(state: AvailabilityState) -> bool {
    state == AvailabilityState::Available
}
