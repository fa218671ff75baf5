//! Seams between the reconciler/indexer and the upstream HTTP clients.

use std::collections::BTreeSet;

use async_trait::async_trait;
use tradecat_commerce::{CommerceClient, CommerceError, MerchandiseMap};
use tradecat_core::{PimEntry, Taxonomy};
use tradecat_pim::{PimClient, PimError};

/// Full PIM catalog listing, in the PIM's native order.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> Result<Vec<PimEntry>, PimError>;
}

/// Batched SKU → merchandise ID lookup. Every SKU in `skus` must appear in the
/// returned map; `None` marks a SKU with no commerce record.
#[async_trait]
pub trait MerchandiseLookup: Send + Sync {
    async fn resolve(&self, skus: &BTreeSet<String>) -> Result<MerchandiseMap, CommerceError>;
}

#[async_trait]
pub trait TaxonomySource: Send + Sync {
    async fn fetch_menu(&self, menu_key: &str) -> Result<Taxonomy, PimError>;
}

#[async_trait]
impl CatalogSource for PimClient {
    async fn fetch_catalog(&self) -> Result<Vec<PimEntry>, PimError> {
        PimClient::fetch_catalog(self).await
    }
}

#[async_trait]
impl TaxonomySource for PimClient {
    async fn fetch_menu(&self, menu_key: &str) -> Result<Taxonomy, PimError> {
        PimClient::fetch_menu(self, menu_key).await
    }
}

#[async_trait]
impl MerchandiseLookup for CommerceClient {
    async fn resolve(&self, skus: &BTreeSet<String>) -> Result<MerchandiseMap, CommerceError> {
        self.resolve_merchandise_ids(skus).await
    }
}
