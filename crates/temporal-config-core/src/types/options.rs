//! Worker, connection, runtime and client option types

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default address of a local Temporal frontend
pub const DEFAULT_ADDRESS: &str = "localhost:7233";

/// Default Temporal namespace
pub const DEFAULT_NAMESPACE: &str = "default";

/// Name used for a client registration that does not set one
pub const DEFAULT_CLIENT_NAME: &str = "default";

/// Options for the worker that polls a task queue
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkerOptions {
    /// Task queue the worker polls (required)
    pub task_queue: String,
    /// Namespace to poll in (uses the connection default if not set)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Worker identity reported to the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    /// Build id for worker versioning
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_activity_task_executions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_concurrent_workflow_task_executions: Option<u32>,
    /// Size of the sticky workflow cache
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_cached_workflows: Option<u32>,
    /// How long in-flight activities get to finish on shutdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutdown_grace_time_ms: Option<u64>,
}

impl WorkerOptions {
    /// Create worker options for a task queue
    pub fn new(task_queue: impl Into<String>) -> Self {
        Self {
            task_queue: task_queue.into(),
            ..Default::default()
        }
    }

    /// Set the namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the worker identity
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Set the build id
    pub fn with_build_id(mut self, build_id: impl Into<String>) -> Self {
        self.build_id = Some(build_id.into());
        self
    }

    /// Set both concurrency limits
    pub fn with_concurrency(mut self, activities: u32, workflows: u32) -> Self {
        self.max_concurrent_activity_task_executions = Some(activities);
        self.max_concurrent_workflow_task_executions = Some(workflows);
        self
    }

    /// Whether the options carry the fields a worker cannot start without
    pub fn is_complete(&self) -> bool {
        !self.task_queue.trim().is_empty()
    }
}

/// TLS settings for a connection
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TlsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_root_ca_cert_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_cert_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_private_key_path: Option<PathBuf>,
}

/// Options for the native connection to the Temporal frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionOptions {
    /// `host:port` of the frontend
    #[serde(default = "default_address")]
    pub address: String,
    /// TLS settings (plaintext if not set)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,
    /// Extra gRPC metadata sent with every call
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
    /// API key for Temporal Cloud
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_address() -> String {
    DEFAULT_ADDRESS.to_string()
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS)
    }
}

impl ConnectionOptions {
    /// Create connection options for an address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            tls: None,
            metadata: HashMap::new(),
            api_key: None,
        }
    }

    /// Set the TLS configuration
    pub fn with_tls(mut self, tls: TlsConfig) -> Self {
        self.tls = Some(tls);
        self
    }

    /// Add a metadata header
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// Process-wide runtime options
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RuntimeOptions {
    /// Log level for the core runtime (`TRACE`..`ERROR`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    /// Forward core logs into the host logger
    #[serde(default)]
    pub log_forwarding: bool,
    /// Prefix applied to emitted metric names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics_prefix: Option<String>,
    /// Signals that trigger graceful shutdown
    #[serde(default)]
    pub shutdown_signals: Vec<String>,
}

impl RuntimeOptions {
    /// Create empty runtime options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Set the metrics prefix
    pub fn with_metrics_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.metrics_prefix = Some(prefix.into());
        self
    }

    /// Set the shutdown signals
    pub fn with_shutdown_signals(mut self, signals: Vec<String>) -> Self {
        self.shutdown_signals = signals;
        self
    }
}

/// Options for a workflow client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientOptions {
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    /// Connection used by this client (the shared one if not set)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionOptions>,
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl ClientOptions {
    /// Create client options for a namespace
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            identity: None,
            connection: None,
        }
    }

    /// Set the client identity
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Use a dedicated connection
    pub fn with_connection(mut self, connection: ConnectionOptions) -> Self {
        self.connection = Some(connection);
        self
    }
}

/// A named client to register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRegistration {
    #[serde(default = "default_client_name")]
    pub name: String,
    #[serde(flatten)]
    pub options: ClientOptions,
}

fn default_client_name() -> String {
    DEFAULT_CLIENT_NAME.to_string()
}

impl ClientRegistration {
    /// Register `options` under `name`
    pub fn new(name: impl Into<String>, options: ClientOptions) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }
}

impl From<ClientOptions> for ClientRegistration {
    fn from(options: ClientOptions) -> Self {
        Self::new(DEFAULT_CLIENT_NAME, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_options_builder() {
        let opts = WorkerOptions::new("orders")
            .with_namespace("prod")
            .with_concurrency(10, 5);
        assert_eq!(opts.task_queue, "orders");
        assert_eq!(opts.namespace.as_deref(), Some("prod"));
        assert_eq!(opts.max_concurrent_activity_task_executions, Some(10));
        assert!(opts.is_complete());
        assert!(!WorkerOptions::new("  ").is_complete());
    }

    #[test]
    fn test_connection_defaults_from_yaml() {
        let opts: ConnectionOptions = serde_yaml::from_str("api_key: secret").unwrap();
        assert_eq!(opts.address, DEFAULT_ADDRESS);
        assert_eq!(opts.api_key.as_deref(), Some("secret"));
        assert!(opts.metadata.is_empty());
    }

    #[test]
    fn test_client_registration_defaults() {
        let reg: ClientRegistration = serde_yaml::from_str("identity: api").unwrap();
        assert_eq!(reg.name, DEFAULT_CLIENT_NAME);
        assert_eq!(reg.options.namespace, DEFAULT_NAMESPACE);
        assert_eq!(reg.options.identity.as_deref(), Some("api"));
    }

    #[test]
    fn test_worker_options_skip_empty_fields() {
        let json = serde_json::to_value(WorkerOptions::new("q")).unwrap();
        assert_eq!(json, serde_json::json!({ "task_queue": "q" }));
    }
}
