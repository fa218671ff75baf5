//! HTTP client for the quote email dispatch endpoint.
//!
//! `POST {base}/api/quotes/{quote_number}/email?email={email}`. Every call may
//! send an email, so nothing here retries.

use std::time::Duration;

use reqwest::{Client, Url};
use tokio_util::sync::CancellationToken;

use crate::error::QuoteError;
use crate::types::{ErrorBody, QuoteReceipt};

/// Message used when a failed response carries no usable `error` field.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to send quote email";

pub struct QuoteClient {
    client: Client,
    base_url: Url,
}

impl QuoteClient {
    /// Creates a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`QuoteError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`QuoteError::InvalidRequest`] if `base_url` is not
    /// a valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, QuoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|e| {
            QuoteError::InvalidRequest(format!("invalid base URL '{base_url}': {e}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(QuoteError::InvalidRequest(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }

        Ok(Self { client, base_url })
    }

    pub(crate) fn quote_url(&self, quote_number: &str, email: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "quotes", quote_number, "email"]);
        }
        url.query_pairs_mut().append_pair("email", email);
        url
    }

    /// Asks the quote service to email quote `quote_number` to `email`.
    ///
    /// When `cancel` fires before the response arrives the request is
    /// abandoned and [`QuoteError::Cancelled`] is returned. A token that is
    /// already cancelled prevents the request from being sent at all.
    ///
    /// # Errors
    ///
    /// - [`QuoteError::InvalidRequest`] for a blank quote number or an email
    ///   without `@`.
    /// - [`QuoteError::DispatchFailed`] on any non-2xx response, carrying the
    ///   body's `error` string or [`GENERIC_FAILURE_MESSAGE`].
    /// - [`QuoteError::Cancelled`] when `cancel` fires.
    /// - [`QuoteError::Http`] on network failure.
    pub async fn send_quote(
        &self,
        quote_number: &str,
        email: &str,
        cancel: Option<&CancellationToken>,
    ) -> Result<QuoteReceipt, QuoteError> {
        let quote_number = quote_number.trim();
        let email = email.trim();
        if quote_number.is_empty() {
            return Err(QuoteError::InvalidRequest("quote number is blank".into()));
        }
        if !email.contains('@') {
            return Err(QuoteError::InvalidRequest(format!(
                "'{email}' is not an email address"
            )));
        }

        let url = self.quote_url(quote_number, email);
        let dispatch = self.dispatch(url);

        match cancel {
            Some(token) if token.is_cancelled() => Err(QuoteError::Cancelled),
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => {
                    tracing::info!(quote_number, "quote dispatch cancelled by caller");
                    Err(QuoteError::Cancelled)
                }
                result = dispatch => result,
            },
            None => dispatch.await,
        }
    }

    async fn dispatch(&self, url: Url) -> Result<QuoteReceipt, QuoteError> {
        let response = self.client.post(url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.error)
                .map(|m| m.trim().to_owned())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_owned());
            tracing::warn!(status = status.as_u16(), %message, "quote dispatch failed");
            return Err(QuoteError::DispatchFailed {
                status: Some(status.as_u16()),
                message,
            });
        }

        // The receipt is informational; an unreadable body still means the
        // service accepted the request.
        let receipt = if text.trim().is_empty() {
            QuoteReceipt::default()
        } else {
            serde_json::from_str(&text).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "quote receipt body not understood");
                QuoteReceipt::default()
            })
        };
        tracing::info!(
            status = receipt.status.as_deref().unwrap_or("-"),
            provider = receipt.provider.as_deref().unwrap_or("-"),
            "quote dispatched"
        );
        Ok(receipt)
    }
}
