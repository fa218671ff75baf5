use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::availability::{can_add_to_cart, resolve_availability, AvailabilityState};

/// A catalog entry as published by the PIM, normalized to canonical field
/// names. Optional fields are `None` when the PIM omits them or sends blanks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PimEntry {
    /// Join key against the commerce platform. Never blank.
    pub sku: String,
    pub product_name: Option<String>,
    /// Navigation group label, used as a display-name fallback.
    pub nav_group: Option<String>,
    /// Storefront slug for the product page, independent of `sku`.
    pub handle: Option<String>,
    /// Trade price; `None` when pricing is not trade-published.
    pub price: Option<Decimal>,
    pub requires_quote: Option<bool>,
    pub discontinued: Option<bool>,
}

impl PimEntry {
    /// Display label: product name, then navigation group, then handle,
    /// then the SKU itself.
    #[must_use]
    pub fn display_name(&self) -> String {
        [&self.product_name, &self.nav_group, &self.handle]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or(self.sku.as_str())
            .to_owned()
    }
}

/// The merged PIM + commerce record served to presentation layers.
///
/// Availability is not a field. Call [`Product::availability`] when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    pub name: String,
    pub price: Option<Decimal>,
    pub handle: Option<String>,
    /// `None` until the SKU resolves against the commerce platform.
    pub merchandise_id: Option<String>,
    pub requires_quote: Option<bool>,
    pub discontinued: Option<bool>,
}

impl Product {
    /// Joins a PIM entry with its (possibly absent) merchandise ID.
    #[must_use]
    pub fn from_pim(entry: PimEntry, merchandise_id: Option<String>) -> Self {
        let name = entry.display_name();
        Self {
            sku: entry.sku,
            name,
            price: entry.price,
            handle: entry.handle,
            merchandise_id,
            requires_quote: entry.requires_quote,
            discontinued: entry.discontinued,
        }
    }

    #[must_use]
    pub fn availability(&self) -> AvailabilityState {
        resolve_availability(
            self.merchandise_id.as_deref(),
            self.requires_quote,
            self.discontinued,
        )
    }

    #[must_use]
    pub fn can_add_to_cart(&self) -> bool {
        can_add_to_cart(self.availability())
    }
}
