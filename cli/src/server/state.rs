use std::{net::IpAddr, path::PathBuf, sync::Arc, time::Duration};

use metaview::{LibraryError, MetadataStore};
use rocket::{Config, config::LogLevel};

use crate::server::ApiError;

/// Everything the server needs, fixed at startup and handed to every request
/// through managed state.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub directory: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub debug: bool,
    pub index_path: PathBuf,
    pub io_timeout: Duration,
}

impl ServerConfig {
    pub fn new(directory: PathBuf) -> Self {
        Self {
            directory,
            host: IpAddr::from([127, 0, 0, 1]),
            port: 5000,
            debug: false,
            index_path: PathBuf::from("index.html"),
            io_timeout: Duration::from_secs(30),
        }
    }

    pub fn rocket_config(&self) -> Config {
        let log_level = if self.debug {
            LogLevel::Debug
        } else {
            LogLevel::Normal
        };
        Config {
            address: self.host,
            port: self.port,
            log_level,
            ..Config::default()
        }
    }
}

pub struct ServerState {
    pub config: ServerConfig,
    pub store: Arc<MetadataStore>,
}

impl ServerState {
    pub fn new(
        config: ServerConfig,
        store: MetadataStore,
    ) -> Self {
        Self {
            config,
            store: Arc::new(store),
        }
    }

    /// Runs filesystem and codec work off the async workers, bounded by the
    /// configured I/O timeout.
    pub async fn run_blocking<T, F>(
        &self,
        task: F,
    ) -> Result<T, ApiError>
    where
        T: Send + 'static,
        F: FnOnce(&MetadataStore) -> Result<T, LibraryError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let handle = tokio::task::spawn_blocking(move || task(store.as_ref()));
        match tokio::time::timeout(self.config.io_timeout, handle).await {
            Err(_) => Err(ApiError::Timeout(self.config.io_timeout)),
            Ok(Err(err)) => Err(ApiError::Internal(err.to_string())),
            Ok(Ok(result)) => result.map_err(ApiError::from),
        }
    }
}
