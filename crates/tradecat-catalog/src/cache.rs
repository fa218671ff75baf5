//! Keyed stale-while-revalidate cache with one in-flight build per key.
//!
//! Each entry moves through three states as it ages, see [`Freshness`]:
//!
//! - `Fresh`: served as is.
//! - `StaleServable`: served immediately while a background rebuild runs.
//! - `Expired`: the caller waits for a rebuild.
//!
//! Builds are spawned onto the runtime and shared between every caller that
//! asks for the same key while they run, so concurrent misses trigger one
//! build and a build always completes even if its callers go away.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Freshness windows for cached entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub fresh_for: Duration,
    /// Grace period after `fresh_for` during which a stale value is still served.
    pub stale_for: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self::from_secs(600, 300)
    }
}

impl CachePolicy {
    #[must_use]
    pub const fn from_secs(fresh_secs: u64, stale_secs: u64) -> Self {
        Self {
            fresh_for: Duration::from_secs(fresh_secs),
            stale_for: Duration::from_secs(stale_secs),
        }
    }

    #[must_use]
    pub fn classify(&self, age: Duration) -> Freshness {
        if age < self.fresh_for {
            Freshness::Fresh
        } else if age < self.fresh_for.saturating_add(self.stale_for) {
            Freshness::StaleServable
        } else {
            Freshness::Expired
        }
    }

    /// `Cache-Control` value that keeps shared caches on the same windows as
    /// this policy.
    #[must_use]
    pub fn cache_control(&self, client_max_age: Duration) -> String {
        format!(
            "public, max-age={}, s-maxage={}, stale-while-revalidate={}",
            client_max_age.as_secs(),
            self.fresh_for.as_secs(),
            self.stale_for.as_secs()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    StaleServable,
    Expired,
}

/// How a lookup was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Fresh cached value.
    Hit,
    /// Stale cached value; a rebuild is running in the background.
    Stale,
    /// No usable value; the caller waited for a build.
    Miss,
}

impl CacheStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Stale => "STALE",
            Self::Miss => "MISS",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Lookup<V> {
    pub value: Arc<V>,
    pub status: CacheStatus,
}

type PendingBuild<V, E> = Shared<BoxFuture<'static, Result<Arc<V>, E>>>;

struct Entry<V> {
    value: Arc<V>,
    built_at: Instant,
}

struct Slots<V, E> {
    entries: HashMap<String, Entry<V>>,
    in_flight: HashMap<String, PendingBuild<V, E>>,
}

pub struct SwrCache<V, E> {
    policy: CachePolicy,
    slots: Arc<Mutex<Slots<V, E>>>,
}

impl<V, E> SwrCache<V, E>
where
    V: Send + Sync + 'static,
    E: Clone + Display + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            slots: Arc::new(Mutex::new(Slots {
                entries: HashMap::new(),
                in_flight: HashMap::new(),
            })),
        }
    }

    #[must_use]
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Returns the value for `key`, building it with `build` when needed.
    ///
    /// `build` is only invoked when no build for `key` is already running.
    ///
    /// # Errors
    ///
    /// Returns the build's error when the caller had to wait for it. A failed
    /// background rebuild is logged and leaves the stale entry in place.
    pub async fn get_or_build<F, Fut>(&self, key: &str, build: F) -> Result<Lookup<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let mut slots = self.slots.lock().await;

        let stale = match slots.entries.get(key) {
            Some(entry) => {
                let age = entry.built_at.elapsed();
                match self.policy.classify(age) {
                    Freshness::Fresh => {
                        return Ok(Lookup {
                            value: Arc::clone(&entry.value),
                            status: CacheStatus::Hit,
                        });
                    }
                    Freshness::StaleServable => {
                        tracing::debug!(key, age_secs = age.as_secs(), "serving stale entry");
                        Some(Arc::clone(&entry.value))
                    }
                    Freshness::Expired => {
                        tracing::debug!(key, age_secs = age.as_secs(), "cached entry expired");
                        None
                    }
                }
            }
            None => None,
        };

        let pending = if let Some(pending) = slots.in_flight.get(key) {
            tracing::debug!(key, "joining in-flight build");
            pending.clone()
        } else {
            self.start_build(&mut slots, key, build())
        };
        drop(slots);

        if let Some(value) = stale {
            return Ok(Lookup {
                value,
                status: CacheStatus::Stale,
            });
        }

        let value = pending.await?;
        Ok(Lookup {
            value,
            status: CacheStatus::Miss,
        })
    }

    fn start_build<Fut>(
        &self,
        slots: &mut Slots<V, E>,
        key: &str,
        build: Fut,
    ) -> PendingBuild<V, E>
    where
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        tracing::debug!(key, "starting build");
        let shared_slots = Arc::clone(&self.slots);
        let owned_key = key.to_owned();

        let pending = async move {
            let result = build.await.map(Arc::new);

            let mut slots = shared_slots.lock().await;
            slots.in_flight.remove(&owned_key);
            match &result {
                Ok(value) => {
                    slots.entries.insert(
                        owned_key,
                        Entry {
                            value: Arc::clone(value),
                            built_at: Instant::now(),
                        },
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        key = %owned_key,
                        error = %e,
                        "cache build failed; previous entry kept"
                    );
                }
            }
            result
        }
        .boxed()
        .shared();

        slots.in_flight.insert(key.to_owned(), pending.clone());
        tokio::spawn(pending.clone());
        pending
    }

    /// Drops the cached value for `key`. A build already in flight still
    /// publishes its result.
    pub async fn invalidate(&self, key: &str) -> bool {
        self.slots.lock().await.entries.remove(key).is_some()
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
