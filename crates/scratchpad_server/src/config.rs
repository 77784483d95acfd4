//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Port the scratchpad listens on by default.
pub const DEFAULT_PORT: u16 = 5000;

/// File the document is kept in by default, relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "shared_scratchpad.txt";

/// Largest accepted save body by default (64 MiB).
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 64 * 1024 * 1024;

/// Configuration for the scratchpad server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// File holding the shared document.
    pub data_file: PathBuf,
    /// Maximum size of a save request body.
    pub max_document_bytes: usize,
    /// Whether each save is flushed to disk before replying.
    pub sync_writes: bool,
}

impl ServerConfig {
    /// Creates a configuration bound to `bind_addr` with default storage.
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            sync_writes: true,
        }
    }

    /// Sets the document file.
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }

    /// Sets the maximum save body size.
    pub fn with_max_document_bytes(mut self, max: usize) -> Self {
        self.max_document_bytes = max;
        self
    }

    /// Sets whether every save is synced to disk before replying.
    pub fn with_sync_writes(mut self, sync: bool) -> Self {
        self.sync_writes = sync;
        self
    }
}

impl Default for ServerConfig {
    /// Listens on every interface so other devices on the LAN can connect.
    fn default() -> Self {
        Self::new(SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:5000");
        assert_eq!(config.data_file, PathBuf::from("shared_scratchpad.txt"));
        assert_eq!(config.max_document_bytes, 64 * 1024 * 1024);
        assert!(config.sync_writes);
    }

    #[test]
    fn config_builder() {
        let config = ServerConfig::new("127.0.0.1:9000".parse().unwrap())
            .with_data_file("/tmp/pad.txt")
            .with_max_document_bytes(1024)
            .with_sync_writes(false);

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.data_file, PathBuf::from("/tmp/pad.txt"));
        assert_eq!(config.max_document_bytes, 1024);
        assert!(!config.sync_writes);
    }
}
