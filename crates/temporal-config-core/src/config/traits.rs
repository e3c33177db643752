//! Configuration source trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{ClientRegistration, ConnectionOptions, RuntimeOptions, WorkerOptions};

/// Configuration document holding every registrable domain
///
/// ```yaml
/// worker:
///   task_queue: orders
/// connection:
///   address: temporal.internal:7233
/// clients:
///   - name: reports
///     namespace: analytics
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker: Option<WorkerOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<RuntimeOptions>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clients: Vec<ClientRegistration>,
}

/// Configuration source abstraction
///
/// Implementations:
/// - `MemoryConfigSource`: In-memory for testing
/// - `FileConfigSource`: YAML or JSON file (user or workspace level)
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Short name used in log messages
    fn name(&self) -> &str;

    /// Load the configuration document
    async fn load(&self) -> ConfigResult<ConfigFile>;

    /// Replace the configuration document
    async fn store(&self, config: &ConfigFile) -> ConfigResult<()>;
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration error: {0}")]
    Other(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
