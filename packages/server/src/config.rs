use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Address advertised in shareable links. Falls back to `host` when
    /// unset; deployments behind NAT or a reverse proxy set this to the
    /// externally reachable name.
    pub public_host: Option<String>,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Blob store root directory, created on first use.
    pub root_dir: PathBuf,
    /// Days until an uploaded file's link stops working.
    pub retention_days: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("server.cors.allow_origins", vec!["*"])?
            .set_default("server.cors.max_age", 3600)?
            .set_default("storage.root_dir", "./uploads")?
            .set_default("storage.retention_days", 7)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., DROPLINK__DATABASE__URL)
            .add_source(Environment::with_prefix("DROPLINK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
