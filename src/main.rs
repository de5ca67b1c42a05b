use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use vitals::config;
use vitals::credentials::CredentialStore;
use vitals::db::Warehouse;
use vitals::strava::{ConnectionStatus, TokenLifecycle};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitals=info".into()),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "vitals.toml".to_string());
    let config = config::load_config(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path))?;

    info!(path = %config.database.path, "Opening warehouse");
    let warehouse = Arc::new(Warehouse::open(&config.database.path)?);

    let store = Arc::new(CredentialStore::new(
        Arc::clone(&warehouse),
        &config.database.encryption_key,
    )?);
    let lifecycle = TokenLifecycle::new(store, config.strava.clone());

    match lifecycle.probe().await {
        ConnectionStatus::Connected {
            athlete_id,
            username,
        } => {
            info!(
                athlete_id,
                username = username.as_deref().unwrap_or("-"),
                "Strava connected"
            );
        }
        ConnectionStatus::Disconnected { reason } => {
            info!(reason = %reason, "Strava not connected");
            println!("Connect Strava: {}", lifecycle.connect_url());
        }
    }

    Ok(())
}
