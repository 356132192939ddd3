//! pantryd: Pantry daemon.
//!
//! Serves food data over the line protocol, backed by the on-disk cache and
//! the FoodData Central API.

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use pantry::cache::CacheStore;
use pantry::providers::FdcClient;
use pantry::server::config::{API_KEY_ENV_VAR, Config, Secrets};
use pantry::{FoodRetriever, PantryError, Server};

/// Pantry daemon, a cached food data service.
#[derive(Parser)]
#[command(name = "pantryd")]
#[command(version = pantry::PKG_VERSION)]
#[command(about = "Pantry food data daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;
    let api_key = secrets.api_key().ok_or_else(|| {
        PantryError::Configuration(format!(
            "no FoodData Central API key: set [fdc] api_key in secrets.toml or {API_KEY_ENV_VAR}"
        ))
    })?;

    let retriever = build_retriever(&config, api_key)?;
    let server = Server::bind(
        &config.server.address,
        config.server.max_connections,
        retriever,
    )
    .await?;

    info!(
        version = pantry::version_string(),
        built = pantry::BUILD_TIMESTAMP,
        addr = %server.local_addr()?,
        cache = %config.cache.root.display(),
        max_connections = config.server.max_connections,
        "pantryd starting"
    );

    server
        .serve_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(())
}

/// Build the shared [`FoodRetriever`] from configuration.
fn build_retriever(config: &Config, api_key: String) -> pantry::Result<FoodRetriever> {
    let cache = CacheStore::open(&config.cache.root)?
        .with_memory_capacity(config.cache.memory_entries);
    let provider = FdcClient::with_base_url(
        api_key,
        &config.provider.base_url,
        config.provider.timeout(),
    )?;
    Ok(FoodRetriever::new(Arc::new(cache), Arc::new(provider)))
}
