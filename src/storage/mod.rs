//! Storage backend implementations.
//!
//! The in-memory backend is always available and is the default. The sqlx
//! backends are selected at runtime from the configured database url and
//! gated behind cargo features.

use std::sync::Arc;

use anyhow::Result;

use crate::config::AppConfig;
use crate::core::store::CampusStore;

pub mod in_memory;
pub use in_memory::InMemoryStore;

#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

/// Build the store selected by the configuration.
///
/// No database url means the in-memory backend; otherwise the url scheme
/// picks the sqlx backend, which must have been compiled in.
pub async fn build_store(config: &AppConfig) -> Result<Arc<dyn CampusStore>> {
    match config.database_url.as_deref() {
        None => {
            tracing::info!("using in-memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        Some(url) if url.starts_with("sqlite:") => sqlite_store(url).await,
        Some(url) if url.starts_with("postgres:") || url.starts_with("postgresql:") => {
            postgres_store(url).await
        }
        Some(url) => anyhow::bail!("unsupported database url: {url}"),
    }
}

#[cfg(feature = "sqlite")]
async fn sqlite_store(url: &str) -> Result<Arc<dyn CampusStore>> {
    tracing::info!(%url, "using sqlite store");
    Ok(Arc::new(SqliteStore::connect(url).await?))
}

#[cfg(not(feature = "sqlite"))]
async fn sqlite_store(url: &str) -> Result<Arc<dyn CampusStore>> {
    anyhow::bail!("database url `{url}` requires building with the `sqlite` feature")
}

#[cfg(feature = "postgres")]
async fn postgres_store(url: &str) -> Result<Arc<dyn CampusStore>> {
    tracing::info!("using postgres store");
    Ok(Arc::new(PostgresStore::connect(url).await?))
}

#[cfg(not(feature = "postgres"))]
async fn postgres_store(url: &str) -> Result<Arc<dyn CampusStore>> {
    anyhow::bail!("database url `{url}` requires building with the `postgres` feature")
}
