// Application state module
// Bundles the configuration with the collaborators built from it at startup

use std::sync::Arc;

use super::types::Config;
use crate::logger::{FileRequestLogger, NoopRequestLogger, RequestLogger};
use crate::routing::RouteTable;
use crate::storage::UploadStore;

/// Application state, shared read-only by every connection
pub struct AppState {
    pub config: Config,
    pub routes: RouteTable,
    pub store: UploadStore,
    pub request_logger: Arc<dyn RequestLogger>,
}

impl AppState {
    /// Create `AppState` with an explicit request logger
    pub fn new(config: Config, request_logger: Arc<dyn RequestLogger>) -> Self {
        let store = UploadStore::new(config.storage.upload_dir.clone());
        Self {
            config,
            routes: RouteTable::standard(),
            store,
            request_logger,
        }
    }

    /// Create `AppState` with the request logger described by `config.logging`
    pub fn from_config(config: Config) -> Self {
        let request_logger: Arc<dyn RequestLogger> = if config.logging.access_log {
            Arc::new(FileRequestLogger::new(
                config.logging.access_log_file.clone(),
                config.logging.access_log_format.clone(),
            ))
        } else {
            Arc::new(NoopRequestLogger)
        };
        Self::new(config, request_logger)
    }
}
