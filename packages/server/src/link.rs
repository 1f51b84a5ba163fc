use uuid::Uuid;

use crate::config::ServerConfig;

/// Formats record identifiers into client-dereferenceable download URLs.
///
/// Pure string formatting; the reachable address comes from configuration
/// (`server.public_host`, falling back to the bind host).
#[derive(Clone)]
pub struct LinkBuilder {
    host: String,
    port: u16,
}

impl LinkBuilder {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn from_config(server: &ServerConfig) -> Self {
        let host = server
            .public_host
            .clone()
            .unwrap_or_else(|| server.host.clone());
        Self::new(host, server.port)
    }

    /// Fully qualified shareable link for a stored file.
    pub fn download_url(&self, id: Uuid) -> String {
        format!("http://{}:{}/api/v1/download/{}", self.host, self.port, id)
    }
}
