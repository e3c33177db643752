//! Temporal Config Core
//!
//! Registration of Temporal worker, connection, runtime and client
//! configuration as process-wide singletons.
//! Configuration can be supplied as immediate values, as async factories
//! with injected dependencies, or loaded from YAML/JSON files.
//!
//! ## Registering configuration
//!
//! The `composer` module turns options into registration modules and the
//! `registry` module resolves them once at startup:
//!
//! ```rust,ignore
//! use temporal_config_core::{RegistrationComposer, RegistryBuilder, WorkerOptions};
//!
//! let composer = RegistrationComposer::new();
//! let registry = RegistryBuilder::new()
//!     .register(composer.compose_immediate(WorkerOptions::new("orders"), None, None)?)
//!     .register(composer.compose_client_registration(clients))
//!     .bootstrap()
//!     .await?;
//!
//! let worker = registry.worker_options()?;
//! ```

pub mod types;
pub mod provider;
pub mod composer;
pub mod registry;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use types::{
    ConfigSlot, ProviderToken,
    WorkerOptions, ConnectionOptions, RuntimeOptions, ClientOptions, ClientRegistration, TlsConfig,
};

pub use provider::{
    RegistrationError, RegistrationResult, BoxError,
    ProviderDescriptor, ProviderSource, Dependencies,
    AsyncConfiguration, SharedConfigurationFactory,
};

pub use composer::{RegistrationComposer, RegistrationModule, ClientRegistrations, SlotLayout};

pub use registry::{Registry, RegistryBuilder, Explorer, bootstrap_global, global};

pub use config::{ConfigSource, ConfigFile, MemoryConfigSource, FileConfigSource};

pub use logging::{Logger, NoOpLogger, TracingLogger, SharedLogger};
