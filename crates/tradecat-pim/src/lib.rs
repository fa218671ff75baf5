pub mod client;
pub mod error;
pub mod normalize;
pub mod pagination;
mod retry;
pub mod types;

pub use client::PimClient;
pub use error::PimError;
pub use normalize::{normalize_entry, normalize_menu};
pub use types::{PimMenu, PimMenuItem, PimMenuResponse, PimProduct, PimProductsResponse, RawPrice};
