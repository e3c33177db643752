//! Core types for configuration registration
//!
//! Slot identities plus the option structs registered under them.

mod slot;
mod options;

pub use slot::{ConfigSlot, ProviderToken};
pub use options::{
    WorkerOptions, ConnectionOptions, RuntimeOptions, ClientOptions, ClientRegistration, TlsConfig,
    DEFAULT_ADDRESS, DEFAULT_NAMESPACE, DEFAULT_CLIENT_NAME,
};
