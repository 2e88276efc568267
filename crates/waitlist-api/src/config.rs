//! Configuration for the waitlist API.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use waitlist_store::{
    FileBackend, MemoryBackend, RedisBackend, RegistrationStore, StorageMode, WaitlistBackend,
};

/// Service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Name reported by the health check
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Which backend holds the waitlist
    #[serde(default)]
    pub mode: StorageMode,

    /// Path of the JSON document (local mode)
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,

    /// Redis connection URL (remote mode)
    #[serde(default = "default_storage_url")]
    pub url: String,

    /// Name of the Redis hash holding entries (remote mode)
    #[serde(default = "default_table")]
    pub table: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

// Default implementations
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
            service_name: default_service_name(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mode: StorageMode::default(),
            path: default_storage_path(),
            url: default_storage_url(),
            table: default_table(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

// Default value functions
fn default_listen_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8000
}

fn default_service_name() -> String {
    "waitlist-api".into()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("data/waitlist.json")
}

fn default_storage_url() -> String {
    "redis://127.0.0.1:6379".into()
}

fn default_table() -> String {
    "waitlist".into()
}

fn default_allowed_origins() -> String {
    [
        "http://localhost:8080",
        "http://localhost:8083",
        "http://127.0.0.1:8080",
        "http://127.0.0.1:8083",
    ]
    .join(",")
}

fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(false),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl StorageConfig {
    /// Construct the backend for the configured mode.
    pub async fn open(&self) -> Result<RegistrationStore> {
        let backend: Arc<dyn WaitlistBackend> = match self.mode {
            StorageMode::Local => {
                let backend = FileBackend::new(&self.path);
                info!(path = ?backend.path(), "Using local file storage");
                Arc::new(backend)
            }
            StorageMode::Remote => {
                let backend = RedisBackend::connect(&self.url, &self.table)
                    .await
                    .context("Failed to connect to Redis")?;
                info!(table = %backend.table(), "Using Redis storage");
                Arc::new(backend)
            }
            StorageMode::Memory => {
                info!("Using in-memory storage (data will be lost on restart)");
                Arc::new(MemoryBackend::new())
            }
        };

        Ok(RegistrationStore::new(backend, self.mode))
    }
}

impl CorsConfig {
    /// Allowed origins in configured order, blanks removed.
    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect()
    }
}
