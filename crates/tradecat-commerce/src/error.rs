use thiserror::Error;

/// Errors returned by the commerce platform lookup client.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx HTTP status from the GraphQL endpoint.
    #[error("unexpected HTTP status {status} from commerce platform")]
    UnexpectedStatus { status: u16 },

    /// The platform asked us to slow down (HTTP 429 or a `THROTTLED` GraphQL error).
    #[error("commerce platform throttled the request")]
    Throttled,

    /// The GraphQL response carried an `errors` array.
    #[error("commerce GraphQL error: {0}")]
    GraphQl(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid commerce shop URL \"{shop_url}\": {reason}")]
    InvalidShopUrl { shop_url: String, reason: String },
}
