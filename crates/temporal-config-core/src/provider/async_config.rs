//! Async (deferred) configuration for a single slot

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;

use super::descriptor::{instance, Dependencies, FactoryFn, ProviderDescriptor};
use super::error::{BoxError, RegistrationError, RegistrationResult};
use crate::composer::RegistrationModule;
use crate::types::ProviderToken;

/// A type that can produce shared configuration on demand
///
/// Registered through [`AsyncConfiguration::use_class`]: the registry
/// constructs the type at bootstrap and awaits `create_shared_configuration`.
#[async_trait]
pub trait SharedConfigurationFactory<T>: Send + Sync {
    async fn create_shared_configuration(&self) -> Result<T, BoxError>;
}

type Constructor<T> = Arc<dyn Fn() -> Box<dyn SharedConfigurationFactory<T>> + Send + Sync>;

/// How a deferred slot is produced
///
/// Exactly one strategy may be set. [`AsyncConfiguration::into_descriptor`]
/// rejects configurations that set more than one.
pub struct AsyncConfiguration<T> {
    use_factory: Option<FactoryFn>,
    inject: Vec<ProviderToken>,
    use_existing: Option<ProviderToken>,
    use_class: Option<Constructor<T>>,
    imports: Vec<RegistrationModule>,
}

impl<T> Default for AsyncConfiguration<T> {
    fn default() -> Self {
        Self {
            use_factory: None,
            inject: Vec::new(),
            use_existing: None,
            use_class: None,
            imports: Vec::new(),
        }
    }
}

impl<T> Clone for AsyncConfiguration<T> {
    fn clone(&self) -> Self {
        Self {
            use_factory: self.use_factory.clone(),
            inject: self.inject.clone(),
            use_existing: self.use_existing.clone(),
            use_class: self.use_class.clone(),
            imports: self.imports.clone(),
        }
    }
}

impl<T> AsyncConfiguration<T> {
    /// Names of the strategies that are set
    pub fn strategies(&self) -> Vec<&'static str> {
        let mut set = Vec::new();
        if self.use_factory.is_some() {
            set.push("use_factory");
        }
        if self.use_existing.is_some() {
            set.push("use_existing");
        }
        if self.use_class.is_some() {
            set.push("use_class");
        }
        set
    }
}

impl<T> fmt::Debug for AsyncConfiguration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncConfiguration")
            .field("strategies", &self.strategies())
            .field("inject", &self.inject)
            .field("use_existing", &self.use_existing)
            .field("imports", &self.imports.iter().map(|m| m.name.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

impl<T: Any + Send + Sync> AsyncConfiguration<T> {
    /// A configuration with no strategy; the slot resolves to null
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for `new().use_factory(f)`
    pub fn factory<F, Fut>(f: F) -> Self
    where
        F: Fn(Dependencies) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, BoxError>> + Send + 'static,
    {
        Self::new().use_factory(f)
    }

    /// Produce the value with an async factory
    pub fn use_factory<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Dependencies) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, BoxError>> + Send + 'static,
    {
        let factory: FactoryFn = Arc::new(move |deps| {
            f(deps).map(|result| result.map(|value| Some(instance(value)))).boxed()
        });
        self.use_factory = Some(factory);
        self
    }

    /// Tokens resolved and passed to the factory, in order
    ///
    /// Only valid together with `use_factory`.
    pub fn inject<I>(mut self, tokens: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ProviderToken>,
    {
        self.inject = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Reuse the value already registered under `token`
    pub fn use_existing(mut self, token: impl Into<ProviderToken>) -> Self {
        self.use_existing = Some(token.into());
        self
    }

    /// Construct `C` at bootstrap and ask it for the configuration
    pub fn use_class<C, F>(mut self, constructor: F) -> Self
    where
        C: SharedConfigurationFactory<T> + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let ctor: Constructor<T> =
            Arc::new(move || Box::new(constructor()) as Box<dyn SharedConfigurationFactory<T>>);
        self.use_class = Some(ctor);
        self
    }

    /// Modules whose providers the factory depends on
    pub fn imports(mut self, modules: impl IntoIterator<Item = RegistrationModule>) -> Self {
        self.imports.extend(modules);
        self
    }

    /// Take the imported modules
    pub(crate) fn take_imports(&mut self) -> Vec<RegistrationModule> {
        std::mem::take(&mut self.imports)
    }

    /// Turn the configuration into a descriptor bound to `token`
    ///
    /// `use_existing` and `use_class` are routed through the factory
    /// contract so the registry only ever sees values and factories.
    pub fn into_descriptor(self, token: ProviderToken) -> RegistrationResult<ProviderDescriptor> {
        let strategies = self.strategies();
        if strategies.len() > 1 {
            return Err(RegistrationError::ConflictingStrategies { token, strategies });
        }
        if self.use_factory.is_none() && !self.inject.is_empty() {
            return Err(RegistrationError::InjectWithoutFactory { token });
        }

        if let Some(factory) = self.use_factory {
            return Ok(ProviderDescriptor::factory(token, self.inject, factory));
        }

        if let Some(existing) = self.use_existing {
            let factory: FactoryFn = Arc::new(|deps: Dependencies| {
                async move { Ok::<_, BoxError>(deps.into_values().into_iter().next().flatten()) }.boxed()
            });
            return Ok(ProviderDescriptor::factory(token, vec![existing], factory));
        }

        if let Some(constructor) = self.use_class {
            let factory: FactoryFn = Arc::new(move |_deps: Dependencies| {
                let provider = constructor();
                async move {
                    let value = provider.create_shared_configuration().await?;
                    Ok::<_, BoxError>(Some(instance(value)))
                }
                .boxed()
            });
            return Ok(ProviderDescriptor::factory(token, Vec::new(), factory));
        }

        Ok(ProviderDescriptor::null(token))
    }
}
