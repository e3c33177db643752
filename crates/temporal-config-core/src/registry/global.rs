//! Process-wide registry

use once_cell::sync::{Lazy, OnceCell};
use tokio::sync::Mutex;

use super::builder::RegistryBuilder;
use super::container::Registry;
use crate::provider::{RegistrationError, RegistrationResult};

static GLOBAL_REGISTRY: OnceCell<Registry> = OnceCell::new();

/// Serializes concurrent `bootstrap_global` calls
static BOOTSTRAP_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// Bootstrap `builder` and install the result as the global registry
///
/// Only the first successful call installs a registry. Later calls fail
/// with [`RegistrationError::AlreadyBootstrapped`] without resolving
/// anything. A failed bootstrap leaves the global scope empty.
pub async fn bootstrap_global(builder: RegistryBuilder) -> RegistrationResult<&'static Registry> {
    let _guard = BOOTSTRAP_LOCK.lock().await;
    if GLOBAL_REGISTRY.get().is_some() {
        return Err(RegistrationError::AlreadyBootstrapped);
    }

    let registry = builder.bootstrap().await?;
    GLOBAL_REGISTRY
        .set(registry)
        .map_err(|_| RegistrationError::AlreadyBootstrapped)?;
    global()
}

/// The global registry, once bootstrapped
pub fn global() -> RegistrationResult<&'static Registry> {
    GLOBAL_REGISTRY.get().ok_or(RegistrationError::NotBootstrapped)
}
