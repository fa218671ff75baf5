//! Retries for commerce lookups.
//!
//! Timeouts, connection errors, 5xx responses and throttling are retried.
//! GraphQL errors and malformed bodies are returned immediately.

use std::future::Future;

use tradecat_core::backoff_delay;

use crate::error::CommerceError;

pub(crate) fn is_retriable(err: &CommerceError) -> bool {
    match err {
        CommerceError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        CommerceError::UnexpectedStatus { status } => *status >= 500,
        CommerceError::Throttled => true,
        CommerceError::GraphQl(_)
        | CommerceError::Deserialize { .. }
        | CommerceError::InvalidShopUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on
/// transient errors, sleeping per [`backoff_delay`] between them.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, CommerceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, CommerceError>>,
{
    let mut attempt = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        attempt += 1;
        let delay = backoff_delay(backoff_base_ms, attempt);
        tracing::warn!(
            attempt,
            max_retries,
            delay_ms = delay.as_millis(),
            error = %err,
            "transient commerce error, retrying after backoff"
        );
        tokio::time::sleep(delay).await;
    }
}
