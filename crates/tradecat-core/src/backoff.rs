//! Shared retry delay policy for the upstream HTTP clients.

use std::time::Duration;

/// Ceiling on a single backoff sleep, before jitter.
pub const MAX_BACKOFF_MS: u64 = 30_000;

/// Delay before retry number `retry` (1-based): `base_ms * 2^(retry-1)`,
/// capped at [`MAX_BACKOFF_MS`], then scaled by a random factor in
/// `[0.75, 1.25)` so concurrent callers do not retry in lockstep.
#[must_use]
pub fn backoff_delay(base_ms: u64, retry: u32) -> Duration {
    let exponent = retry.saturating_sub(1).min(10);
    let capped = base_ms.saturating_mul(1u64 << exponent).min(MAX_BACKOFF_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let jittered = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    Duration::from_millis(jittered)
}
