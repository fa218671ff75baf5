use thiserror::Error;

/// Errors returned by the quote dispatch client.
///
/// None of these are retried internally: each dispatch may send an email,
/// so a retry is always the caller's decision.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Network or TLS failure from the underlying HTTP client, including
    /// timeouts where the request may or may not have been delivered.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("{message}")]
    DispatchFailed { status: Option<u16>, message: String },

    /// The caller cancelled the dispatch before it completed.
    #[error("quote dispatch cancelled")]
    Cancelled,

    /// The request was rejected locally and never sent.
    #[error("invalid quote request: {0}")]
    InvalidRequest(String),
}
