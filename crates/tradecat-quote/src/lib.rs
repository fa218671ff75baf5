pub mod client;
pub mod error;
pub mod types;

pub use client::QuoteClient;
pub use error::QuoteError;
pub use tokio_util::sync::CancellationToken;
pub use types::QuoteReceipt;
