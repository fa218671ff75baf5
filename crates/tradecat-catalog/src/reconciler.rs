//! Joins the PIM catalog with commerce merchandise IDs.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tradecat_core::Product;

use crate::error::CatalogError;
use crate::sources::{CatalogSource, MerchandiseLookup};

/// Output ordering for [`CatalogReconciler::get_products_ordered`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductOrder {
    /// The PIM's native order.
    #[default]
    Catalog,
    /// Display name, case-insensitive, SKU as tiebreaker.
    Name,
    Sku,
}

impl ProductOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Name => "name",
            Self::Sku => "sku",
        }
    }
}

impl fmt::Display for ProductOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "catalog" => Ok(Self::Catalog),
            "name" => Ok(Self::Name),
            "sku" => Ok(Self::Sku),
            other => Err(format!(
                "unknown product order '{other}' (expected catalog, name or sku)"
            )),
        }
    }
}

pub struct CatalogReconciler {
    source: Arc<dyn CatalogSource>,
    lookup: Arc<dyn MerchandiseLookup>,
}

impl CatalogReconciler {
    pub fn new(source: Arc<dyn CatalogSource>, lookup: Arc<dyn MerchandiseLookup>) -> Self {
        Self { source, lookup }
    }

    /// Fetches the catalog, resolves every distinct SKU in one batched call
    /// and yields exactly one [`Product`] per PIM entry, in PIM order.
    ///
    /// The join is left-outer: a SKU the resolver does not know still yields
    /// a product, with `merchandise_id = None`.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::SourceUnavailable`] if the PIM fetch fails.
    /// - [`CatalogError::ResolverUnavailable`] if merchandise resolution
    ///   fails. No products are returned in that case: marking everything
    ///   unavailable would misreport quote-only and discontinued items.
    pub async fn get_products(&self) -> Result<Vec<Product>, CatalogError> {
        let entries = self.source.fetch_catalog().await?;

        let skus: BTreeSet<String> = entries.iter().map(|e| e.sku.clone()).collect();
        let merchandise = if skus.is_empty() {
            Default::default()
        } else {
            self.lookup.resolve(&skus).await.map_err(|e| {
                tracing::error!(
                    sku_count = skus.len(),
                    error = %e,
                    "merchandise resolution failed"
                );
                CatalogError::from(e)
            })?
        };

        let products: Vec<Product> = entries
            .into_iter()
            .map(|entry| {
                let merchandise_id = merchandise.get(&entry.sku).cloned().flatten();
                Product::from_pim(entry, merchandise_id)
            })
            .collect();

        let resolved = products
            .iter()
            .filter(|p| p.merchandise_id.is_some())
            .count();
        tracing::info!(
            product_count = products.len(),
            sku_count = skus.len(),
            resolved,
            "catalog reconciled"
        );
        Ok(products)
    }

    /// [`Self::get_products`], then reordered as requested.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_products`].
    pub async fn get_products_ordered(
        &self,
        order: ProductOrder,
    ) -> Result<Vec<Product>, CatalogError> {
        let mut products = self.get_products().await?;
        sort_products(&mut products, order);
        Ok(products)
    }
}

fn sort_products(products: &mut [Product], order: ProductOrder) {
    match order {
        ProductOrder::Catalog => {}
        ProductOrder::Name => products.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.sku.cmp(&b.sku))
        }),
        ProductOrder::Sku => products.sort_by(|a, b| a.sku.cmp(&b.sku)),
    }
}

#[cfg(test)]
#[path = "reconciler_test.rs"]
mod tests;
