//! Provider descriptors and deferred configuration
//!
//! A descriptor binds a [`ProviderToken`](crate::types::ProviderToken) to
//! either an immediate value or a factory with an ordered dependency list.

mod error;
mod descriptor;
mod async_config;

pub use error::{RegistrationError, RegistrationResult, BoxError};
pub use descriptor::{
    ProviderDescriptor, ProviderSource, Dependencies, FactoryFn, Instance, Resolved, instance,
};
pub use async_config::{AsyncConfiguration, SharedConfigurationFactory};
