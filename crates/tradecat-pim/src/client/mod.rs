//! HTTP client for the PIM REST API.

mod catalog;
mod menu;

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;

use crate::error::PimError;
use crate::retry::retry_with_backoff;

/// Pages fetched before a catalog walk is abandoned. Guards against a PIM
/// that keeps handing out cursors.
pub(super) const MAX_PAGES: usize = 200;

/// Default catalog page size when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Client for the PIM's catalog and menu endpoints.
///
/// Non-2xx responses become typed [`PimError`]s. Rate limiting, network
/// failures and 5xx responses are retried with exponential backoff up to
/// `max_retries` additional attempts per request.
pub struct PimClient {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
    page_size: u32,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PimClient {
    /// Creates a client rooted at `base_url` (e.g. `https://pim.example.com/api`).
    ///
    /// # Errors
    ///
    /// Returns [`PimError::InvalidBaseUrl`] if `base_url` does not parse or
    /// cannot carry path segments, or [`PimError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(
        base_url: &str,
        api_token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, PimError> {
        let parsed = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            PimError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            }
        })?;
        if parsed.cannot_be_a_base() {
            return Err(PimError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot carry a path".into(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: parsed,
            api_token: api_token.map(str::to_owned),
            page_size: DEFAULT_PAGE_SIZE,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Overrides the catalog page size (clamped to at least 1).
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    pub(super) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issues a GET with retries and decodes the JSON body. Returns the body
    /// together with the raw `Link` header, if any.
    pub(super) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<(T, Option<String>), PimError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let mut request = self
                .client
                .get(url.clone())
                .header(reqwest::header::ACCEPT, "application/json");
            if let Some(token) = &self.api_token {
                request = request.bearer_auth(token);
            }

            let response = request.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(PimError::RateLimited { retry_after_secs });
            }

            if status == StatusCode::NOT_FOUND {
                return Err(PimError::NotFound {
                    url: url.to_string(),
                });
            }

            if !status.is_success() {
                return Err(PimError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            let link_header = response
                .headers()
                .get(reqwest::header::LINK)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);

            let body = response.text().await?;
            let parsed = serde_json::from_str::<T>(&body).map_err(|e| PimError::Deserialize {
                context: context.to_owned(),
                source: e,
            })?;

            Ok((parsed, link_header))
        })
        .await
    }
}
