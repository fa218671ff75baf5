//! Batched SKU → merchandise ID resolution against the commerce platform's
//! admin GraphQL API.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::time::Duration;

use futures::{stream, StreamExt, TryStreamExt};
use reqwest::{Client, StatusCode, Url};

use crate::error::CommerceError;
use crate::query::{sku_search_query, PRODUCT_VARIANTS_QUERY};
use crate::retry::retry_with_backoff;
use crate::types::{GraphQlRequest, GraphQlResponse, LookupVariables, ProductVariantsData};

/// Every requested SKU mapped to its merchandise ID, or `None` when the
/// platform has no variant for it. A `None` is a normal catalog state, not
/// an error.
pub type MerchandiseMap = HashMap<String, Option<String>>;

pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Platform ceiling on `first:` for a single connection query.
pub const MAX_BATCH_SIZE: usize = 250;

/// Result pages followed per batch before the lookup is abandoned.
const MAX_PAGES_PER_BATCH: usize = 20;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Client for the commerce platform's variant lookup.
///
/// Use [`CommerceClient::new`] and tune with [`CommerceClient::with_batching`]
/// and [`CommerceClient::with_retries`].
pub struct CommerceClient {
    client: Client,
    endpoint: Url,
    access_token: String,
    batch_size: usize,
    max_concurrent_batches: usize,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl CommerceClient {
    /// Creates a client for `{shop_url}/admin/api/{api_version}/graphql.json`.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::InvalidShopUrl`] if `shop_url` is not an
    /// absolute hierarchical URL, or [`CommerceError::Http`] if the
    /// underlying `reqwest::Client` cannot be constructed.
    pub fn new(
        shop_url: &str,
        access_token: &str,
        api_version: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, CommerceError> {
        let invalid = |reason: String| CommerceError::InvalidShopUrl {
            shop_url: shop_url.to_owned(),
            reason,
        };

        let mut endpoint =
            Url::parse(shop_url.trim_end_matches('/')).map_err(|e| invalid(e.to_string()))?;
        endpoint
            .path_segments_mut()
            .map_err(|()| invalid("URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(["admin", "api", api_version, "graphql.json"]);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            access_token: access_token.to_owned(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_concurrent_batches: 1,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Sets SKUs per request (clamped to `1..=MAX_BATCH_SIZE`) and how many
    /// batch requests may be in flight at once (at least 1).
    #[must_use]
    pub fn with_batching(mut self, batch_size: usize, max_concurrent_batches: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self.max_concurrent_batches = max_concurrent_batches.max(1);
        self
    }

    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Resolves any number of SKUs. Duplicates and blank SKUs are dropped
    /// before batching; every remaining SKU appears in the result.
    ///
    /// Batches run concurrently up to the configured limit and are merged by
    /// key, so batch completion order does not matter.
    ///
    /// # Errors
    ///
    /// Returns the first batch failure; partial results are discarded.
    pub async fn resolve_merchandise_ids<I, S>(
        &self,
        skus: I,
    ) -> Result<MerchandiseMap, CommerceError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let unique: BTreeSet<String> = skus
            .into_iter()
            .map(|s| s.as_ref().trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
        let unique: Vec<String> = unique.into_iter().collect();

        if unique.is_empty() {
            return Ok(MerchandiseMap::new());
        }

        let batch_count = unique.len().div_ceil(self.batch_size);
        tracing::debug!(
            sku_count = unique.len(),
            batch_count,
            batch_size = self.batch_size,
            "resolving merchandise ids"
        );

        let lookups: Vec<_> = unique
            .chunks(self.batch_size)
            .map(|batch| self.lookup_batch(batch))
            .collect();
        let found: Vec<HashMap<String, String>> = stream::iter(lookups)
            .buffer_unordered(self.max_concurrent_batches)
            .try_collect()
            .await?;

        let mut merged: HashMap<String, String> = HashMap::new();
        for batch in found {
            merged.extend(batch);
        }

        let resolved = unique
            .into_iter()
            .map(|sku| {
                let id = merged.remove(&sku);
                (sku, id)
            })
            .collect::<MerchandiseMap>();

        let hits = resolved.values().filter(|v| v.is_some()).count();
        tracing::info!(
            sku_count = resolved.len(),
            resolved = hits,
            "resolved merchandise ids"
        );
        Ok(resolved)
    }

    /// Looks up one batch. Only SKUs that matched a variant are returned.
    ///
    /// Follows `pageInfo.endCursor` until the platform reports no further
    /// pages, so SKUs shared by several variants cannot push a match off the
    /// first page.
    ///
    /// # Errors
    ///
    /// - [`CommerceError::Throttled`] on HTTP 429 or a `THROTTLED` GraphQL error.
    /// - [`CommerceError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`CommerceError::GraphQl`] when the response carries other GraphQL
    ///   errors, or when results are truncated (more pages but no cursor, or
    ///   more than the per-batch page limit).
    /// - [`CommerceError::Http`] on network failure.
    /// - [`CommerceError::Deserialize`] when the body is not the expected shape.
    pub async fn lookup_batch(
        &self,
        skus: &[String],
    ) -> Result<HashMap<String, String>, CommerceError> {
        let search = sku_search_query(skus);
        let requested: HashSet<&str> = skus.iter().map(String::as_str).collect();
        let mut found = HashMap::new();
        let mut cursor: Option<String> = None;

        for page in 1..=MAX_PAGES_PER_BATCH {
            let body = GraphQlRequest {
                query: PRODUCT_VARIANTS_QUERY,
                variables: LookupVariables {
                    first: MAX_BATCH_SIZE,
                    query: &search,
                    after: cursor.as_deref(),
                },
            };

            let data = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
                self.post_lookup(&body, skus.len())
            })
            .await?;

            let connection = data.product_variants;
            for node in connection.nodes {
                let Some(sku) = node.sku.as_deref().map(str::trim) else {
                    continue;
                };
                if !requested.contains(sku) {
                    continue;
                }
                if let Some(existing) = found.get(sku) {
                    tracing::warn!(
                        sku,
                        kept = %existing,
                        ignored = %node.id,
                        "multiple variants share a SKU; keeping the first"
                    );
                    continue;
                }
                found.insert(sku.to_owned(), node.id);
            }

            if !connection.page_info.has_next_page {
                return Ok(found);
            }
            let Some(next) = connection.page_info.end_cursor else {
                return Err(CommerceError::GraphQl(
                    "truncated productVariants result: hasNextPage without endCursor".into(),
                ));
            };
            tracing::debug!(page, batch_len = skus.len(), "following variant page cursor");
            cursor = Some(next);
        }

        Err(CommerceError::GraphQl(format!(
            "truncated productVariants result: more than {MAX_PAGES_PER_BATCH} pages"
        )))
    }

    async fn post_lookup(
        &self,
        body: &GraphQlRequest<'_>,
        batch_len: usize,
    ) -> Result<ProductVariantsData, CommerceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CommerceError::Throttled);
        }
        if !status.is_success() {
            return Err(CommerceError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        let envelope: GraphQlResponse<ProductVariantsData> =
            serde_json::from_str(&text).map_err(|e| CommerceError::Deserialize {
                context: format!("productVariants lookup ({batch_len} skus)"),
                source: e,
            })?;

        if envelope.errors.iter().any(|e| e.is_throttled()) {
            return Err(CommerceError::Throttled);
        }
        if !envelope.errors.is_empty() {
            let messages = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(CommerceError::GraphQl(messages));
        }

        envelope
            .data
            .ok_or_else(|| CommerceError::GraphQl("response carried no data".into()))
    }
}
