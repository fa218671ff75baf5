use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub pim_base_url: String,
    pub pim_api_token: Option<String>,
    pub pim_page_size: u32,
    pub commerce_shop_url: String,
    pub commerce_access_token: String,
    pub commerce_api_version: String,
    pub commerce_batch_size: usize,
    pub commerce_max_concurrent_batches: usize,
    pub quote_api_base_url: Option<String>,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub nav_fresh_secs: u64,
    pub nav_stale_secs: u64,
    pub nav_client_max_age_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("pim_base_url", &self.pim_base_url)
            .field(
                "pim_api_token",
                &self.pim_api_token.as_ref().map(|_| "[redacted]"),
            )
            .field("pim_page_size", &self.pim_page_size)
            .field("commerce_shop_url", &self.commerce_shop_url)
            .field("commerce_access_token", &"[redacted]")
            .field("commerce_api_version", &self.commerce_api_version)
            .field("commerce_batch_size", &self.commerce_batch_size)
            .field(
                "commerce_max_concurrent_batches",
                &self.commerce_max_concurrent_batches,
            )
            .field("quote_api_base_url", &self.quote_api_base_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("nav_fresh_secs", &self.nav_fresh_secs)
            .field("nav_stale_secs", &self.nav_stale_secs)
            .field("nav_client_max_age_secs", &self.nav_client_max_age_secs)
            .finish()
    }
}
