use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::Client;
use serde_json::Value;
use tempfile::TempDir;

// Leading `::` disambiguates the `common` crate from this `common` module.
use ::common::storage::filesystem::FilesystemBlobStore;
use server::clock::ManualClock;
use server::config::{AppConfig, CorsConfig, DatabaseConfig, ServerConfig, StorageConfig};
use server::link::LinkBuilder;
use server::metadata::InMemoryMetadataStore;
use server::registry::FileRegistry;
use server::state::AppState;

/// Instant all test clocks start at.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

/// A running application instance on an ephemeral port.
///
/// Uses the in-memory metadata store and a tempdir blob store, so the suite
/// needs no external services; the shared [`ManualClock`] lets tests move
/// time instead of waiting for it.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub clock: Arc<ManualClock>,
    _storage_root: TempDir,
}

pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let storage_root = tempfile::tempdir().expect("create temp storage root");
        let blob_store = FilesystemBlobStore::new(storage_root.path().join("blobs"))
            .await
            .expect("init blob store");
        let clock = Arc::new(ManualClock::new(t0()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("read local addr");

        let config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: addr.port(),
                public_host: None,
                cors: CorsConfig {
                    allow_origins: vec!["*".into()],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: "postgres://unused-in-tests".into(),
            },
            storage: StorageConfig {
                root_dir: storage_root.path().join("blobs"),
                retention_days: 7,
            },
        };

        let registry = FileRegistry::new(
            Arc::new(InMemoryMetadataStore::new()),
            Arc::new(blob_store),
            clock.clone(),
            Duration::days(config.storage.retention_days),
        );
        let links = LinkBuilder::from_config(&config.server);

        let state = AppState {
            config: Arc::new(config),
            registry: Arc::new(registry),
            links,
        };
        let app = server::build_router(state);

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve test app");
        });

        Self {
            address: format!("http://{addr}"),
            client: Client::new(),
            clock,
            _storage_root: storage_root,
        }
    }

    /// Upload `content` as the `file` multipart field.
    pub async fn upload(&self, filename: &str, content: Vec<u8>) -> ApiResponse {
        let part = reqwest::multipart::Part::bytes(content).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(format!("{}/api/v1/upload", self.address))
            .multipart(form)
            .send()
            .await
            .expect("upload request");

        Self::json_response(res).await
    }

    /// Upload with a raw multipart form, for malformed-request tests.
    pub async fn upload_form(&self, form: reqwest::multipart::Form) -> ApiResponse {
        let res = self
            .client
            .post(format!("{}/api/v1/upload", self.address))
            .multipart(form)
            .send()
            .await
            .expect("upload request");

        Self::json_response(res).await
    }

    /// Raw download response, headers and body intact.
    pub async fn download(&self, file_id: &str) -> reqwest::Response {
        self.client
            .get(format!("{}/api/v1/download/{file_id}", self.address))
            .send()
            .await
            .expect("download request")
    }

    /// Download and decode the JSON error body.
    pub async fn download_error(&self, file_id: &str) -> ApiResponse {
        let res = self.download(file_id).await;
        Self::json_response(res).await
    }

    async fn json_response(res: reqwest::Response) -> ApiResponse {
        let status = res.status().as_u16();
        let body = res.json::<Value>().await.unwrap_or(Value::Null);
        ApiResponse { status, body }
    }
}
