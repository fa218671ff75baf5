//! Raw response shapes from the PIM REST API.
//!
//! ### Field names
//! Older PIM exports use `name`, `navigation_group`, `price` and
//! `quote_required`; current ones use `product_name`, `nav_group`,
//! `trade_price` and `requires_quote`. Some rows carry both spellings, so the
//! legacy names land in their own `legacy_*` fields and
//! [`crate::normalize`] prefers the current one.
//!
//! ### `trade_price`
//! Either a decimal string (`"149.50"`), a bare JSON number (`149.5`), or
//! `null` when the price is not trade-published. Empty strings also occur
//! and mean "not published". An explicit `null` still counts as present and
//! wins over a legacy `price`, which on newer rows is the retail price.
//!
//! ### Flags
//! `requires_quote` and `discontinued` are omitted entirely for most
//! products. Absence is kept as `None` rather than defaulted to `false`.

use serde::{Deserialize, Deserializer};

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Top-level response from `GET /products`.
#[derive(Debug, Deserialize)]
pub struct PimProductsResponse {
    pub products: Vec<PimProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PimProduct {
    /// Required downstream; kept optional here so a missing SKU surfaces as
    /// a normalization error naming the entry instead of a parse failure.
    #[serde(default)]
    pub sku: Option<String>,

    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default, rename = "name")]
    pub legacy_name: Option<String>,

    #[serde(default)]
    pub nav_group: Option<String>,
    #[serde(default, rename = "navigation_group")]
    pub legacy_nav_group: Option<String>,

    #[serde(default)]
    pub handle: Option<String>,

    /// Outer `None` means the key was absent; `Some(None)` is an explicit
    /// `null`.
    #[allow(clippy::option_option)]
    #[serde(default, deserialize_with = "present")]
    pub trade_price: Option<Option<RawPrice>>,
    #[serde(default, rename = "price")]
    pub legacy_price: Option<RawPrice>,

    #[serde(default)]
    pub requires_quote: Option<bool>,
    #[serde(default, rename = "quote_required")]
    pub legacy_requires_quote: Option<bool>,

    #[serde(default)]
    pub discontinued: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Text(String),
    Number(serde_json::Number),
}

/// Top-level response from `GET /menus/{menu_key}`.
#[derive(Debug, Deserialize)]
pub struct PimMenuResponse {
    pub menu: PimMenu,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PimMenu {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<PimMenuItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PimMenuItem {
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default, rename = "resource_id")]
    pub legacy_category_id: Option<String>,
    #[serde(default)]
    pub items: Vec<PimMenuItem>,
}
