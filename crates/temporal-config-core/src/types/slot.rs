//! Slot and provider identity tokens

use std::fmt;

use serde::{Deserialize, Serialize};

/// A configuration domain whose resolved value is retrievable process-wide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSlot {
    /// Worker options (task queue, concurrency limits, ...)
    Worker,
    /// Connection options used to reach the Temporal frontend
    Connection,
    /// Runtime options (telemetry, shutdown behavior). Also known as the "core" config.
    Runtime,
    /// Shared client options
    Client,
}

impl ConfigSlot {
    /// All slots, in registration order
    pub const ALL: [ConfigSlot; 4] = [
        ConfigSlot::Worker,
        ConfigSlot::Connection,
        ConfigSlot::Runtime,
        ConfigSlot::Client,
    ];

    /// Stable identity used when the slot is stored in the registry
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigSlot::Worker => "TEMPORAL_WORKER_CONFIG",
            ConfigSlot::Connection => "TEMPORAL_CONNECTION_CONFIG",
            ConfigSlot::Runtime => "TEMPORAL_CORE_CONFIG",
            ConfigSlot::Client => "TEMPORAL_CLIENT_CONFIG",
        }
    }
}

impl fmt::Display for ConfigSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of anything the registry can hold
///
/// Dependency lists (`inject`) are ordered sequences of tokens. Two tokens
/// are the same registration if and only if they compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderToken {
    /// One of the four configuration domains
    Slot(ConfigSlot),
    /// A named client registration (`client:<name>`)
    Client(String),
    /// The workflow/activity explorer collaborator
    Explorer,
    /// The metadata accessor used by the explorer
    MetadataAccessor,
    /// Any host-defined provider
    Named(String),
}

impl ProviderToken {
    /// Create a host-defined token
    pub fn named(name: impl Into<String>) -> Self {
        ProviderToken::Named(name.into())
    }

    /// Create a named client token
    pub fn client(name: impl Into<String>) -> Self {
        ProviderToken::Client(name.into())
    }

    /// The slot this token refers to, if any
    pub fn slot(&self) -> Option<ConfigSlot> {
        match self {
            ProviderToken::Slot(slot) => Some(*slot),
            _ => None,
        }
    }
}

impl From<ConfigSlot> for ProviderToken {
    fn from(slot: ConfigSlot) -> Self {
        ProviderToken::Slot(slot)
    }
}

impl From<&str> for ProviderToken {
    fn from(name: &str) -> Self {
        ProviderToken::Named(name.to_string())
    }
}

impl From<String> for ProviderToken {
    fn from(name: String) -> Self {
        ProviderToken::Named(name)
    }
}

impl fmt::Display for ProviderToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderToken::Slot(slot) => write!(f, "{}", slot),
            ProviderToken::Client(name) => write!(f, "client:{}", name),
            ProviderToken::Explorer => f.write_str("TemporalExplorer"),
            ProviderToken::MetadataAccessor => f.write_str("TemporalMetadataAccessor"),
            ProviderToken::Named(name) => f.write_str(name),
        }
    }
}
