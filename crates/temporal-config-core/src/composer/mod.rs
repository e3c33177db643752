//! Registration composition
//!
//! Entry points a host calls at wiring time:
//! - `compose_immediate`: options known up front
//! - `compose_async`: options produced by factories at bootstrap
//! - `compose_client_registration`: zero or more named clients
//! - `compose_from_source`: options loaded from a config file

mod module;
mod discovery;
mod client;
#[allow(clippy::module_inception)]
mod composer;

pub use module::RegistrationModule;
pub use discovery::{core_registration, DiscoveryBinding, CORE_MODULE_NAME, DISCOVERY_MODULE_NAME};
pub use client::ClientRegistrations;
pub use composer::{RegistrationComposer, SlotLayout, ROOT_MODULE_NAME};
