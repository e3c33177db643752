//! The resolved registry

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::provider::{RegistrationError, RegistrationResult, Resolved};
use crate::types::{
    ClientOptions, ConfigSlot, ConnectionOptions, ProviderToken, RuntimeOptions, WorkerOptions,
};

/// Immutable map of resolved singletons
///
/// Produced by [`RegistryBuilder::bootstrap`](super::RegistryBuilder::bootstrap).
/// Every consumer of a token receives the same `Arc`.
pub struct Registry {
    modules: Vec<String>,
    tokens: Vec<ProviderToken>,
    values: HashMap<ProviderToken, Resolved>,
}

impl Registry {
    pub(crate) fn new(
        modules: Vec<String>,
        tokens: Vec<ProviderToken>,
        values: HashMap<ProviderToken, Resolved>,
    ) -> Self {
        Self {
            modules,
            tokens,
            values,
        }
    }

    /// Typed lookup
    ///
    /// `Ok(None)` means the token is registered but configured as empty.
    pub fn get<T: Any + Send + Sync>(
        &self,
        token: impl Into<ProviderToken>,
    ) -> RegistrationResult<Option<Arc<T>>> {
        let token = token.into();
        match self.values.get(&token) {
            None => Err(RegistrationError::NotRegistered(token)),
            Some(None) => Ok(None),
            Some(Some(value)) => value
                .clone()
                .downcast::<T>()
                .map(Some)
                .map_err(|_| RegistrationError::type_mismatch::<T>(token)),
        }
    }

    /// Typed lookup that treats an empty value as an error
    ///
    /// An empty slot reports `MissingRequiredConfiguration`; any other
    /// empty token reports `EmptyValue`.
    pub fn require<T: Any + Send + Sync>(
        &self,
        token: impl Into<ProviderToken>,
    ) -> RegistrationResult<Arc<T>> {
        let token = token.into();
        self.get::<T>(token.clone())?.ok_or_else(|| match token.slot() {
            Some(slot) => RegistrationError::missing_required(slot),
            None => RegistrationError::EmptyValue(token),
        })
    }

    /// Untyped value for `token`
    pub fn raw(&self, token: &ProviderToken) -> Option<&Resolved> {
        self.values.get(token)
    }

    pub fn worker_options(&self) -> RegistrationResult<Option<Arc<WorkerOptions>>> {
        self.get(ConfigSlot::Worker)
    }

    pub fn connection_options(&self) -> RegistrationResult<Option<Arc<ConnectionOptions>>> {
        self.get(ConfigSlot::Connection)
    }

    pub fn runtime_options(&self) -> RegistrationResult<Option<Arc<RuntimeOptions>>> {
        self.get(ConfigSlot::Runtime)
    }

    /// Options bound to the client slot
    pub fn client_options(&self) -> RegistrationResult<Option<Arc<ClientOptions>>> {
        self.get(ConfigSlot::Client)
    }

    /// Options of the named client registration
    pub fn client(&self, name: &str) -> RegistrationResult<Arc<ClientOptions>> {
        self.require(ProviderToken::client(name))
    }

    pub fn contains(&self, token: &ProviderToken) -> bool {
        self.values.contains_key(token)
    }

    /// Registered tokens, in registration order
    pub fn tokens(&self) -> &[ProviderToken] {
        &self.tokens
    }

    /// Names of the composed modules, each listed once
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("modules", &self.modules)
            .field("tokens", &self.tokens)
            .finish()
    }
}
