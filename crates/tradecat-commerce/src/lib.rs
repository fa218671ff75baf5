pub mod client;
pub mod error;
mod query;
mod retry;
pub mod types;

pub use client::{CommerceClient, MerchandiseMap, DEFAULT_BATCH_SIZE, MAX_BATCH_SIZE};
pub use error::CommerceError;
