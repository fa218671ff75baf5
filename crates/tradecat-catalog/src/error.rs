use std::sync::Arc;

use thiserror::Error;
use tradecat_commerce::CommerceError;
use tradecat_core::NavigationError;
use tradecat_pim::PimError;

/// Failures of a catalog or navigation build.
///
/// `Clone` so that one in-flight navigation build can hand the same outcome
/// to every waiter; upstream errors are shared behind `Arc`.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The PIM catalog or menu could not be fetched.
    #[error("catalog source unavailable: {0}")]
    SourceUnavailable(#[source] Arc<PimError>),

    /// Merchandise ID resolution failed for the whole SKU set.
    #[error("merchandise resolver unavailable: {0}")]
    ResolverUnavailable(#[source] Arc<CommerceError>),

    #[error("menu \"{menu_key}\" not found")]
    MenuNotFound { menu_key: String },

    #[error("navigation slug \"{slug}\" is produced by both \"{first}\" and \"{second}\"")]
    SlugCollision {
        slug: String,
        first: String,
        second: String,
    },

    #[error("navigation item \"{label}\" does not produce a usable slug")]
    EmptySlug { label: String },
}

impl CatalogError {
    /// True when the failure came from an upstream system rather than from
    /// the data itself.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable(_) | Self::ResolverUnavailable(_)
        )
    }
}

impl From<NavigationError> for CatalogError {
    fn from(err: NavigationError) -> Self {
        match err {
            NavigationError::SlugCollision {
                slug,
                first,
                second,
            } => Self::SlugCollision {
                slug,
                first,
                second,
            },
            NavigationError::EmptySlug { label } => Self::EmptySlug { label },
        }
    }
}

impl From<CommerceError> for CatalogError {
    fn from(err: CommerceError) -> Self {
        Self::ResolverUnavailable(Arc::new(err))
    }
}

/// A 404 for a menu is reported as [`CatalogError::MenuNotFound`] by the
/// navigation indexer; every other PIM failure lands here.
impl From<PimError> for CatalogError {
    fn from(err: PimError) -> Self {
        Self::SourceUnavailable(Arc::new(err))
    }
}
