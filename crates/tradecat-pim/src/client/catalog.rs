//! Paginated catalog listing.

use tradecat_core::PimEntry;

use crate::error::PimError;
use crate::normalize::normalize_entry;
use crate::pagination::{extract_next_cursor, CURSOR_PARAM};
use crate::types::PimProductsResponse;

use super::{PimClient, MAX_PAGES};

impl PimClient {
    /// Fetches one raw catalog page. Returns the page and the cursor for the
    /// following page, if there is one.
    ///
    /// # Errors
    ///
    /// - [`PimError::RateLimited`] after retries are exhausted on HTTP 429.
    /// - [`PimError::NotFound`] on HTTP 404 (not retried).
    /// - [`PimError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`PimError::Http`] on network or TLS failure.
    /// - [`PimError::Deserialize`] if the body is not a catalog page.
    pub async fn fetch_catalog_page(
        &self,
        page_info: Option<&str>,
    ) -> Result<(PimProductsResponse, Option<String>), PimError> {
        let mut url = self.endpoint(&["products"]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &self.page_size.to_string());
            if let Some(cursor) = page_info {
                query.append_pair(CURSOR_PARAM, cursor);
            }
        }

        let context = format!("catalog page (cursor={})", page_info.unwrap_or("<first>"));
        let (page, link) = self
            .get_json::<PimProductsResponse>(&url, &context)
            .await?;
        Ok((page, extract_next_cursor(link.as_deref())))
    }

    /// Fetches and normalizes the whole catalog, preserving the PIM's order.
    ///
    /// All or nothing: any failing page or entry discards what was already
    /// collected and returns the error, so callers never see a silently
    /// truncated catalog.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_catalog_page`] and
    /// [`normalize_entry`]; returns [`PimError::PaginationLimit`] once more
    /// than [`MAX_PAGES`] pages have been requested.
    pub async fn fetch_catalog(&self) -> Result<Vec<PimEntry>, PimError> {
        let mut entries: Vec<PimEntry> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(PimError::PaginationLimit {
                    max_pages: MAX_PAGES,
                });
            }

            let (page, next) = self.fetch_catalog_page(cursor.as_deref()).await?;
            tracing::debug!(
                page = page_count,
                products = page.products.len(),
                "fetched PIM catalog page"
            );

            for raw in page.products {
                let position = entries.len();
                entries.push(normalize_entry(raw, position)?);
            }

            cursor = next;
            if cursor.is_none() {
                break;
            }
        }

        tracing::info!(
            entries = entries.len(),
            pages = page_count,
            "fetched PIM catalog"
        );
        Ok(entries)
    }
}
