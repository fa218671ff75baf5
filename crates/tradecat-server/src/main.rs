mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use tradecat_catalog::{CachePolicy, CatalogReconciler, NavigationIndexer};
use tradecat_commerce::CommerceClient;
use tradecat_pim::PimClient;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = tradecat_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting tradecat-server");

    let pim = Arc::new(
        PimClient::new(
            &config.pim_base_url,
            config.pim_api_token.as_deref(),
            config.http_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_ms,
        )?
        .with_page_size(config.pim_page_size),
    );
    let commerce = Arc::new(
        CommerceClient::new(
            &config.commerce_shop_url,
            &config.commerce_access_token,
            &config.commerce_api_version,
            config.http_timeout_secs,
            &config.user_agent,
        )?
        .with_batching(
            config.commerce_batch_size,
            config.commerce_max_concurrent_batches,
        )
        .with_retries(config.max_retries, config.retry_backoff_base_ms),
    );

    let policy = CachePolicy::from_secs(config.nav_fresh_secs, config.nav_stale_secs);
    let state = AppState {
        reconciler: Arc::new(CatalogReconciler::new(pim.clone(), commerce)),
        navigation: Arc::new(NavigationIndexer::new(pim, policy)),
        client_max_age: Duration::from_secs(config.nav_client_max_age_secs),
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
