use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

use directory_common::flag::{FlagClient, FlagClientConfig};
use directory_common::redis::RedisStore;

use resource_finder::cache::ResultCache;
use resource_finder::catalog;
use resource_finder::config::Config;
use resource_finder::reload::ReloadService;
use resource_finder::server::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("starting resource-finder");

    // 1. Load config from environment
    let config = Config::from_env()?;
    info!(
        data_path = %config.data_path,
        bind_addr = %config.bind_addr,
        redis = config.redis_url.is_some(),
        zip_match = ?config.zip_match,
        "configuration loaded"
    );

    // 2. Connect to Redis (optional — graceful degradation if unavailable)
    let store = RedisStore::connect(config.redis_url.as_deref());
    if store.ping().await {
        info!("redis connected");
    } else {
        info!("redis unavailable, running without cache");
    }
    let cache = Arc::new(ResultCache::new(store));

    // 3. Load the catalog and sort it once
    let catalog = catalog::load(Path::new(&config.data_path), &config.level_order)?;
    info!(
        resources = catalog.len(),
        fingerprint = %catalog.fingerprint,
        "catalog loaded"
    );
    let catalog = Arc::new(RwLock::new(catalog));

    // 4. Set up the flag client if a webhook is configured
    let flag = match FlagClientConfig::from_env() {
        Some(flag_config) => {
            info!(webhook = %flag_config.webhook_url, "flag webhook configured");
            Some(Arc::new(FlagClient::new(flag_config)?))
        }
        None => {
            info!("flag webhook not configured, flagging disabled");
            None
        }
    };

    // 5. Reload service for dataset updates
    let reload = Arc::new(ReloadService::new(
        config.clone(),
        Arc::clone(&catalog),
        Arc::clone(&cache),
    ));

    // 6. Serve
    let state = AppState {
        catalog,
        cache,
        flag,
        reload,
        zip_match: config.zip_match,
    };
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app).await?;

    info!("server shut down");
    Ok(())
}
