pub mod app_config;
pub mod availability;
pub mod backoff;
pub mod config;
pub mod navigation;
pub mod products;

pub use app_config::{AppConfig, Environment};
pub use availability::{can_add_to_cart, resolve_availability, AvailabilityState};
pub use backoff::backoff_delay;
pub use config::{load_app_config, load_app_config_from_env};
pub use navigation::{
    build_navigation_index, slugify, NavNode, NavigationError, NavigationIndex, SlugMap,
    Taxonomy, TaxonomyItem,
};
pub use products::{PimEntry, Product};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
