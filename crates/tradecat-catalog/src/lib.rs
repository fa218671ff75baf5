//! Catalog reconciliation and navigation indexing.
//!
//! Composes the PIM and commerce clients behind small source traits so the
//! reconciler and the cached navigation indexer can be exercised with
//! in-memory fakes.

pub mod cache;
pub mod error;
pub mod navigation;
pub mod reconciler;
pub mod sources;

pub use cache::{CachePolicy, CacheStatus, Freshness, Lookup, SwrCache};
pub use error::CatalogError;
pub use navigation::NavigationIndexer;
pub use reconciler::{CatalogReconciler, ProductOrder};
pub use sources::{CatalogSource, MerchandiseLookup, TaxonomySource};
