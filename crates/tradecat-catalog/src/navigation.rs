//! Cached navigation index per menu key.

use std::sync::Arc;

use chrono::Utc;
use tradecat_core::{build_navigation_index, NavigationIndex};
use tradecat_pim::PimError;

use crate::cache::{CachePolicy, Lookup, SwrCache};
use crate::error::CatalogError;
use crate::sources::TaxonomySource;

pub struct NavigationIndexer {
    source: Arc<dyn TaxonomySource>,
    cache: Arc<SwrCache<NavigationIndex, CatalogError>>,
}

impl NavigationIndexer {
    pub fn new(source: Arc<dyn TaxonomySource>, policy: CachePolicy) -> Self {
        Self::with_cache(source, Arc::new(SwrCache::new(policy)))
    }

    /// Uses an existing cache, e.g. one shared with admin tooling.
    pub fn with_cache(
        source: Arc<dyn TaxonomySource>,
        cache: Arc<SwrCache<NavigationIndex, CatalogError>>,
    ) -> Self {
        Self { source, cache }
    }

    #[must_use]
    pub fn policy(&self) -> CachePolicy {
        self.cache.policy()
    }

    /// Returns the index for `menu_key`, rebuilding per the cache policy.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::MenuNotFound`] when the PIM has no such menu.
    /// - [`CatalogError::SourceUnavailable`] for any other fetch failure.
    /// - [`CatalogError::SlugCollision`] / [`CatalogError::EmptySlug`] when
    ///   the menu data cannot produce an unambiguous index. Nothing is cached
    ///   in either case.
    pub async fn get_navigation_index(
        &self,
        menu_key: &str,
    ) -> Result<Lookup<NavigationIndex>, CatalogError> {
        let source = Arc::clone(&self.source);
        let key = menu_key.to_owned();
        self.cache
            .get_or_build(menu_key, move || build_index(source, key))
            .await
    }

    /// Forces the next request for `menu_key` to rebuild.
    pub async fn invalidate(&self, menu_key: &str) -> bool {
        self.cache.invalidate(menu_key).await
    }
}

async fn build_index(
    source: Arc<dyn TaxonomySource>,
    menu_key: String,
) -> Result<NavigationIndex, CatalogError> {
    let taxonomy = source.fetch_menu(&menu_key).await.map_err(|e| match e {
        PimError::NotFound { .. } => CatalogError::MenuNotFound {
            menu_key: menu_key.clone(),
        },
        other => CatalogError::from(other),
    })?;

    let index = build_navigation_index(&menu_key, &taxonomy, Utc::now()).inspect_err(|e| {
        tracing::error!(menu_key = %menu_key, error = %e, "navigation index rejected");
    })?;

    tracing::info!(menu_key = %menu_key, nodes = index.len(), "navigation index built");
    Ok(index)
}
