//! Subcommand implementations. Results go to stdout as JSON; logs go to stderr.

use std::sync::Arc;

use anyhow::Context;
use serde_json::json;
use tradecat_catalog::{CachePolicy, CatalogReconciler, NavigationIndexer, ProductOrder};
use tradecat_commerce::CommerceClient;
use tradecat_core::AppConfig;
use tradecat_pim::PimClient;
use tradecat_quote::{CancellationToken, QuoteClient, QuoteError};

pub(crate) fn pim_client(config: &AppConfig) -> anyhow::Result<PimClient> {
    let client = PimClient::new(
        &config.pim_base_url,
        config.pim_api_token.as_deref(),
        config.http_timeout_secs,
        &config.user_agent,
        config.max_retries,
        config.retry_backoff_base_ms,
    )
    .context("failed to build PIM client")?;
    Ok(client.with_page_size(config.pim_page_size))
}

pub(crate) fn commerce_client(config: &AppConfig) -> anyhow::Result<CommerceClient> {
    let client = CommerceClient::new(
        &config.commerce_shop_url,
        &config.commerce_access_token,
        &config.commerce_api_version,
        config.http_timeout_secs,
        &config.user_agent,
    )
    .context("failed to build commerce client")?;
    Ok(client
        .with_batching(
            config.commerce_batch_size,
            config.commerce_max_concurrent_batches,
        )
        .with_retries(config.max_retries, config.retry_backoff_base_ms))
}

pub(crate) async fn run_products(config: &AppConfig, order: ProductOrder) -> anyhow::Result<()> {
    let reconciler = CatalogReconciler::new(
        Arc::new(pim_client(config)?),
        Arc::new(commerce_client(config)?),
    );
    let products = reconciler.get_products_ordered(order).await?;

    let rows: Vec<serde_json::Value> = products
        .iter()
        .map(|p| {
            json!({
                "sku": p.sku,
                "name": p.name,
                "price": p.price,
                "handle": p.handle,
                "merchandise_id": p.merchandise_id,
                "availability": p.availability(),
                "can_add_to_cart": p.can_add_to_cart(),
            })
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    tracing::info!(count = rows.len(), %order, "listed products");
    Ok(())
}

pub(crate) async fn run_nav(config: &AppConfig, menu_key: &str) -> anyhow::Result<()> {
    let indexer = NavigationIndexer::new(
        Arc::new(pim_client(config)?),
        CachePolicy::from_secs(config.nav_fresh_secs, config.nav_stale_secs),
    );
    let lookup = indexer
        .get_navigation_index(menu_key)
        .await
        .with_context(|| format!("failed to build navigation index for '{menu_key}'"))?;
    println!("{}", serde_json::to_string_pretty(lookup.value.as_ref())?);
    Ok(())
}

pub(crate) async fn run_resolve(config: &AppConfig, skus: &[String]) -> anyhow::Result<()> {
    let map = commerce_client(config)?
        .resolve_merchandise_ids(skus)
        .await
        .context("merchandise resolution failed")?;
    let ordered: std::collections::BTreeMap<_, _> = map.into_iter().collect();
    println!("{}", serde_json::to_string_pretty(&ordered)?);
    Ok(())
}

pub(crate) async fn run_quote(
    config: &AppConfig,
    quote_number: &str,
    email: &str,
) -> anyhow::Result<()> {
    let base_url = config
        .quote_api_base_url
        .as_deref()
        .context("QUOTE_API_BASE_URL must be set to send quotes")?;
    let client =
        QuoteClient::with_base_url(base_url, config.http_timeout_secs, &config.user_agent)?;

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    let outcome = client.send_quote(quote_number, email, Some(&cancel)).await;
    watcher.abort();

    match outcome {
        Ok(receipt) => {
            println!("{}", serde_json::to_string_pretty(&receipt)?);
            Ok(())
        }
        Err(QuoteError::Cancelled) => {
            eprintln!("quote dispatch cancelled; the email may or may not have been sent");
            Ok(())
        }
        Err(e) => Err(e).context(format!("failed to send quote {quote_number}")),
    }
}
