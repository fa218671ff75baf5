//! Retries for transient PIM failures.
//!
//! Rate limiting, network failures and 5xx responses are retried. Anything
//! that would fail identically on a second attempt (404, other 4xx, parse
//! and normalization errors) is returned at once.

use std::future::Future;

use tradecat_core::backoff_delay;

use crate::error::PimError;

fn is_retriable(err: &PimError) -> bool {
    match err {
        PimError::RateLimited { .. } | PimError::Http(_) => true,
        PimError::UnexpectedStatus { status, .. } => *status >= 500,
        PimError::NotFound { .. }
        | PimError::Deserialize { .. }
        | PimError::Normalization { .. }
        | PimError::PaginationLimit { .. }
        | PimError::InvalidBaseUrl { .. } => false,
    }
}

/// Runs `operation`, retrying transient errors up to `max_retries` more
/// times with the shared [`backoff_delay`] schedule.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, PimError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PimError>>,
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
            "transient PIM error, retrying after backoff"
        );
        tokio::time::sleep(delay).await;
    }
}
