use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Upper bound shared by the PIM page size and the commerce lookup batch size.
const MAX_BATCH: u64 = 250;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bounded = |var: &str, default: &str, min: u64, max: u64| -> Result<u64, ConfigError> {
        let value = parse_u64(var, default)?;
        if (min..=max).contains(&value) {
            Ok(value)
        } else {
            Err(invalid(var, format!("must be between {min} and {max}, got {value}")))
        }
    };

    let pim_base_url = require("PIM_BASE_URL")?;
    let commerce_shop_url = require("COMMERCE_SHOP_URL")?;
    let commerce_access_token = require("COMMERCE_ACCESS_TOKEN")?;

    let env = parse_environment(&or_default("TRADECAT_ENV", "development"))?;

    let bind_addr = or_default("TRADECAT_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("TRADECAT_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("TRADECAT_LOG_LEVEL", "info");

    let pim_api_token = lookup("PIM_API_TOKEN").ok().filter(|v| !v.is_empty());
    let pim_page_size = u32::try_from(parse_bounded("TRADECAT_PIM_PAGE_SIZE", "100", 1, MAX_BATCH)?)
        .map_err(|e| invalid("TRADECAT_PIM_PAGE_SIZE", e.to_string()))?;

    let commerce_api_version = or_default("TRADECAT_COMMERCE_API_VERSION", "2024-10");
    let commerce_batch_size = usize::try_from(parse_bounded(
        "TRADECAT_COMMERCE_BATCH_SIZE",
        "50",
        1,
        MAX_BATCH,
    )?)
    .map_err(|e| invalid("TRADECAT_COMMERCE_BATCH_SIZE", e.to_string()))?;
    let commerce_max_concurrent_batches = usize::try_from(parse_bounded(
        "TRADECAT_COMMERCE_MAX_CONCURRENT_BATCHES",
        "4",
        1,
        64,
    )?)
    .map_err(|e| invalid("TRADECAT_COMMERCE_MAX_CONCURRENT_BATCHES", e.to_string()))?;

    let quote_api_base_url = lookup("QUOTE_API_BASE_URL").ok().filter(|v| !v.is_empty());

    let http_timeout_secs = parse_bounded("TRADECAT_HTTP_TIMEOUT_SECS", "30", 1, 600)?;
    let user_agent = or_default("TRADECAT_USER_AGENT", "tradecat/0.1 (catalog-sync)");
    let max_retries = u32::try_from(parse_bounded("TRADECAT_MAX_RETRIES", "3", 0, 10)?)
        .map_err(|e| invalid("TRADECAT_MAX_RETRIES", e.to_string()))?;
    let retry_backoff_base_ms = parse_u64("TRADECAT_RETRY_BACKOFF_BASE_MS", "500")?;

    let nav_fresh_secs = parse_bounded("TRADECAT_NAV_FRESH_SECS", "600", 1, u64::MAX)?;
    let nav_stale_secs = parse_u64("TRADECAT_NAV_STALE_SECS", "300")?;
    let nav_client_max_age_secs = parse_u64("TRADECAT_NAV_CLIENT_MAX_AGE_SECS", "60")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        pim_base_url,
        pim_api_token,
        pim_page_size,
        commerce_shop_url,
        commerce_access_token,
        commerce_api_version,
        commerce_batch_size,
        commerce_max_concurrent_batches,
        quote_api_base_url,
        http_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        nav_fresh_secs,
        nav_stale_secs,
        nav_client_max_age_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TRADECAT_ENV".to_string(),
            reason: format!("expected development, test, or production, got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
