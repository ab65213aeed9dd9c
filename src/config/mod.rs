// Configuration module entry point
// Manages application configuration and per-server runtime state

mod state;
mod types;

use std::net::SocketAddr;
use std::path::Path;

// Re-export public types
pub use state::AppState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StorageConfig};

/// Default config file, looked up without extension
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from the default `config.toml` (optional)
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// Sources, lowest priority first: built-in defaults, the config file
    /// (optional), then `SERVER__SECTION__KEY` environment variables.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("storage.upload_dir", "./uploads/")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_file", "./server.log")?
            .set_default("logging.access_log_format", "plain")?
            .set_default("performance.keep_alive", true)?
            .set_default("http.server_name", "file-exchange/0.1")?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Build a configuration rooted at `base`, used where a config file
    /// would be overkill (tests, embedding)
    pub fn with_base_dir(base: &Path) -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                workers: None,
            },
            storage: StorageConfig {
                upload_dir: base.join("uploads"),
            },
            logging: LoggingConfig {
                access_log: true,
                access_log_file: base.join("server.log"),
                access_log_format: "plain".to_string(),
                error_log_file: None,
            },
            performance: PerformanceConfig {
                keep_alive: true,
                connection_timeout: None,
                max_connections: None,
            },
            http: HttpConfig {
                server_name: "file-exchange/0.1".to_string(),
                max_upload_size: None,
            },
        }
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
