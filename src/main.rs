//! Server binary: load configuration, build the configured store, serve.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use campus::config::AppConfig;
use campus::{server, storage};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    let store = storage::build_store(&config).await?;
    server::serve(&config, store).await
}
