use anyhow::{Context, Result};
use serde::Deserialize;

use crate::strava::StravaSettings;

/// Complete warehouse configuration.
///
/// Loaded once at process start and passed by reference into the
/// components that need it. Nothing reads configuration ambiently.
#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub strava: StravaSettings,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub path: String,
    /// Base64-encoded 32-byte master key for token encryption at rest
    #[serde(default)]
    pub encryption_key: String,
}

fn default_db_path() -> String {
    "vitals.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            encryption_key: String::new(),
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<WarehouseConfig> {
    let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
    let config: WarehouseConfig = toml::from_str(&contents).context("Failed to parse config")?;
    Ok(config)
}
