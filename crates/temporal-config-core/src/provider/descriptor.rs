//! Provider descriptors: how a token's value is obtained

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use super::error::{BoxError, RegistrationError, RegistrationResult};
use crate::types::ProviderToken;

/// A resolved singleton, shared by every consumer of the token
pub type Instance = Arc<dyn Any + Send + Sync>;

/// A resolved value; `None` means "configured as empty"
pub type Resolved = Option<Instance>;

/// Deferred factory: receives resolved dependencies in `inject` order
pub type FactoryFn =
    Arc<dyn Fn(Dependencies) -> BoxFuture<'static, Result<Resolved, BoxError>> + Send + Sync>;

/// Wrap a value as a registry instance
pub fn instance<T: Any + Send + Sync>(value: T) -> Instance {
    Arc::new(value)
}

/// Resolved dependency values handed to a factory, positionally
#[derive(Clone, Default)]
pub struct Dependencies {
    tokens: Vec<ProviderToken>,
    values: Vec<Resolved>,
}

impl Dependencies {
    pub(crate) fn new(tokens: Vec<ProviderToken>, values: Vec<Resolved>) -> Self {
        debug_assert_eq!(tokens.len(), values.len());
        Self { tokens, values }
    }

    /// Number of dependencies
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the factory has no dependencies
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw value at `index`
    pub fn raw(&self, index: usize) -> Option<&Resolved> {
        self.values.get(index)
    }

    /// Typed value at `index`; `Ok(None)` if the dependency resolved to null
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> RegistrationResult<Option<Arc<T>>> {
        let token = self
            .tokens
            .get(index)
            .cloned()
            .unwrap_or_else(|| ProviderToken::named(format!("#{}", index)));
        match self.values.get(index) {
            None => Err(RegistrationError::NotRegistered(token)),
            Some(None) => Ok(None),
            Some(Some(value)) => value
                .clone()
                .downcast::<T>()
                .map(Some)
                .map_err(|_| RegistrationError::type_mismatch::<T>(token)),
        }
    }

    /// Typed value at `index`, treating null as an error
    ///
    /// A null slot reports `MissingRequiredConfiguration`; any other null
    /// token reports `EmptyValue`.
    pub fn require<T: Any + Send + Sync>(&self, index: usize) -> RegistrationResult<Arc<T>> {
        self.get::<T>(index)?.ok_or_else(|| {
            let token = self
                .tokens
                .get(index)
                .cloned()
                .unwrap_or_else(|| ProviderToken::named(format!("#{}", index)));
            match token.slot() {
                Some(slot) => RegistrationError::missing_required(slot),
                None => RegistrationError::EmptyValue(token),
            }
        })
    }

    /// Take ownership of the raw values
    pub fn into_values(self) -> Vec<Resolved> {
        self.values
    }
}

impl fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependencies")
            .field("tokens", &self.tokens)
            .field("resolved", &self.values.iter().map(Option::is_some).collect::<Vec<_>>())
            .finish()
    }
}

/// How a descriptor produces its value
#[derive(Clone)]
pub enum ProviderSource {
    /// Supplied directly at registration time (`None` = not configured)
    Value(Resolved),
    /// Computed at bootstrap from the resolved `inject` tokens
    Factory {
        factory: FactoryFn,
        inject: Vec<ProviderToken>,
    },
}

impl fmt::Debug for ProviderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderSource::Value(value) => f
                .debug_tuple("Value")
                .field(&if value.is_some() { "<value>" } else { "null" })
                .finish(),
            ProviderSource::Factory { inject, .. } => f
                .debug_struct("Factory")
                .field("inject", inject)
                .finish_non_exhaustive(),
        }
    }
}

/// Describes how one token's value is obtained
#[derive(Clone, Debug)]
pub struct ProviderDescriptor {
    pub token: ProviderToken,
    pub source: ProviderSource,
}

impl ProviderDescriptor {
    /// Bind `token` to an immediate value
    pub fn value<T: Any + Send + Sync>(token: impl Into<ProviderToken>, value: T) -> Self {
        Self {
            token: token.into(),
            source: ProviderSource::Value(Some(instance(value))),
        }
    }

    /// Bind `token` to an optional immediate value; `None` registers null
    pub fn optional<T: Any + Send + Sync>(token: impl Into<ProviderToken>, value: Option<T>) -> Self {
        Self {
            token: token.into(),
            source: ProviderSource::Value(value.map(instance)),
        }
    }

    /// Bind `token` to null
    pub fn null(token: impl Into<ProviderToken>) -> Self {
        Self {
            token: token.into(),
            source: ProviderSource::Value(None),
        }
    }

    /// Bind `token` to a raw factory
    pub fn factory(
        token: impl Into<ProviderToken>,
        inject: Vec<ProviderToken>,
        factory: FactoryFn,
    ) -> Self {
        Self {
            token: token.into(),
            source: ProviderSource::Factory { factory, inject },
        }
    }

    /// Bind `token` to a typed async factory
    ///
    /// ```rust,ignore
    /// let settings = ProviderToken::named("settings");
    /// let worker = ProviderDescriptor::from_fn(ConfigSlot::Worker, vec![settings], |deps| async move {
    ///     let queue = deps.require::<String>(0)?;
    ///     Ok::<_, BoxError>(WorkerOptions::new(queue.as_str()))
    /// });
    /// ```
    pub fn from_fn<T, F, Fut>(token: impl Into<ProviderToken>, inject: Vec<ProviderToken>, f: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(Dependencies) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, BoxError>> + Send + 'static,
    {
        let factory: FactoryFn = Arc::new(move |deps| {
            f(deps).map(|result| result.map(|value| Some(instance(value)))).boxed()
        });
        Self::factory(token, inject, factory)
    }

    /// Tokens that must resolve before this descriptor
    pub fn dependencies(&self) -> &[ProviderToken] {
        match &self.source {
            ProviderSource::Value(_) => &[],
            ProviderSource::Factory { inject, .. } => inject,
        }
    }

    /// Whether the value is computed at bootstrap
    pub fn is_deferred(&self) -> bool {
        matches!(self.source, ProviderSource::Factory { .. })
    }
}
