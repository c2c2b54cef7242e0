//! Applies the bestiary schema migrations to the configured database.

use otherworlds_bestiary_store::MIGRATOR;
use otherworlds_bestiary_store::config::StoreConfig;
use otherworlds_bestiary_store::error::StoreError;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), StoreError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = StoreConfig::from_env()?;
    tracing::info!(
        max_connections = config.max_connections,
        "connecting to bestiary database"
    );

    let pool = config.connect().await?;
    MIGRATOR.run(&pool).await?;

    tracing::info!("bestiary migrations applied");
    Ok(())
}
