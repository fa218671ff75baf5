//! Normalization from raw PIM shapes to [`tradecat_core`] records.

use std::str::FromStr;

use rust_decimal::Decimal;
use tradecat_core::{PimEntry, Taxonomy, TaxonomyItem};

use crate::error::PimError;
use crate::types::{PimMenu, PimMenuItem, PimProduct, RawPrice};

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

fn parse_price(raw: RawPrice, entry: &str) -> Result<Option<Decimal>, PimError> {
    let text = match raw {
        RawPrice::Text(s) => s.trim().to_owned(),
        RawPrice::Number(n) => n.to_string(),
    };
    if text.is_empty() {
        return Ok(None);
    }

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map(Some)
        .map_err(|e| PimError::Normalization {
            entry: entry.to_owned(),
            reason: format!("unparseable trade_price \"{text}\": {e}"),
        })
}

/// Normalizes one raw catalog entry. `position` is the entry's zero-based
/// index in the catalog and only used to name SKU-less entries in errors.
///
/// # Errors
///
/// Returns [`PimError::Normalization`] if the SKU is missing or blank, or if
/// a published price cannot be parsed as a decimal.
pub fn normalize_entry(raw: PimProduct, position: usize) -> Result<PimEntry, PimError> {
    let Some(sku) = non_blank(raw.sku) else {
        return Err(PimError::Normalization {
            entry: format!("#{position}"),
            reason: "missing sku".into(),
        });
    };

    let raw_price = match raw.trade_price {
        Some(published) => published,
        None => raw.legacy_price,
    };
    let price = match raw_price {
        Some(p) => parse_price(p, &sku)?,
        None => None,
    };

    Ok(PimEntry {
        product_name: non_blank(raw.product_name).or_else(|| non_blank(raw.legacy_name)),
        nav_group: non_blank(raw.nav_group).or_else(|| non_blank(raw.legacy_nav_group)),
        handle: non_blank(raw.handle),
        price,
        requires_quote: raw.requires_quote.or(raw.legacy_requires_quote),
        discontinued: raw.discontinued,
        sku,
    })
}

fn normalize_menu_item(item: PimMenuItem) -> TaxonomyItem {
    TaxonomyItem {
        label: item.title.trim().to_owned(),
        path: non_blank(item.url),
        category_id: non_blank(item.category_id).or_else(|| non_blank(item.legacy_category_id)),
        children: item.items.into_iter().map(normalize_menu_item).collect(),
    }
}

#[must_use]
pub fn normalize_menu(menu: PimMenu) -> Taxonomy {
    Taxonomy {
        title: non_blank(menu.title),
        items: menu.items.into_iter().map(normalize_menu_item).collect(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
