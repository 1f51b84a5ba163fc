use std::sync::Arc;

use chrono::Duration;
use tracing::{Level, info};

use common::storage::filesystem::FilesystemBlobStore;
use server::clock::SystemClock;
use server::config::AppConfig;
use server::database;
use server::link::LinkBuilder;
use server::metadata::DbMetadataStore;
use server::registry::FileRegistry;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = AppConfig::load()?;

    let db = database::init_db(&config.database.url).await?;
    let blob_store = FilesystemBlobStore::new(config.storage.root_dir.clone()).await?;

    let registry = FileRegistry::new(
        Arc::new(DbMetadataStore::new(db)),
        Arc::new(blob_store),
        Arc::new(SystemClock),
        Duration::days(config.storage.retention_days),
    );
    let links = LinkBuilder::from_config(&config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState {
        config: Arc::new(config),
        registry: Arc::new(registry),
        links,
    };

    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running at http://{addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
