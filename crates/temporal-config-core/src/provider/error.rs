//! Registration error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::types::{ConfigSlot, ProviderToken};

/// Error type returned by user factories
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while composing, bootstrapping or reading registrations
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// A required configuration domain was not supplied
    #[error("Required configuration for {slot} is missing")]
    MissingRequiredConfiguration { slot: ConfigSlot },

    /// An async configuration set more than one resolution strategy
    #[error("Async configuration for {token} sets more than one strategy: {}", .strategies.join(", "))]
    ConflictingStrategies {
        token: ProviderToken,
        strategies: Vec<&'static str>,
    },

    /// `inject` was set on a configuration that has no factory to receive it
    #[error("Async configuration for {token} injects dependencies but does not use a factory")]
    InjectWithoutFactory { token: ProviderToken },

    /// The entry point exists but is not supported
    #[error("Operation not implemented: {operation}")]
    Unsupported { operation: &'static str },

    /// A factory depends on a token nobody registered
    #[error("{token} depends on {dependency}, which is not registered")]
    MissingDependency {
        token: ProviderToken,
        dependency: ProviderToken,
    },

    /// The dependency graph contains a cycle
    #[error("Cyclic dependency: {}", format_cycle(.cycle))]
    CyclicDependency { cycle: Vec<ProviderToken> },

    /// A factory returned an error
    #[error("Factory for {token} failed: {source}")]
    FactoryFailed {
        token: ProviderToken,
        #[source]
        source: BoxError,
    },

    /// Lookup of a token that was never registered
    #[error("{0} is not registered")]
    NotRegistered(ProviderToken),

    /// Required lookup of a token that is registered but configured as empty
    #[error("{0} is configured as empty")]
    EmptyValue(ProviderToken),

    /// Lookup with a type that does not match the stored value
    #[error("{token} does not hold a value of type {expected}")]
    TypeMismatch {
        token: ProviderToken,
        expected: &'static str,
    },

    /// The global registry has already been bootstrapped
    #[error("Registry has already been bootstrapped")]
    AlreadyBootstrapped,

    /// The global registry has not been bootstrapped yet
    #[error("Registry has not been bootstrapped")]
    NotBootstrapped,

    /// Loading configuration failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

fn format_cycle(cycle: &[ProviderToken]) -> String {
    cycle
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl RegistrationError {
    /// Create a missing required configuration error
    pub fn missing_required(slot: ConfigSlot) -> Self {
        Self::MissingRequiredConfiguration { slot }
    }

    /// Create an unsupported operation error
    pub fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }

    /// Create a factory failure for `token`
    pub fn factory_failed(token: ProviderToken, source: impl Into<BoxError>) -> Self {
        Self::FactoryFailed {
            token,
            source: source.into(),
        }
    }

    /// Create a type mismatch error for `T`
    pub fn type_mismatch<T: ?Sized>(token: ProviderToken) -> Self {
        Self::TypeMismatch {
            token,
            expected: std::any::type_name::<T>(),
        }
    }

    /// Whether this error aborts process startup
    ///
    /// Lookup errors are recoverable by the caller; everything else
    /// means the registrations cannot be trusted.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            RegistrationError::NotRegistered(_)
                | RegistrationError::EmptyValue(_)
                | RegistrationError::TypeMismatch { .. }
        )
    }
}

pub type RegistrationResult<T> = Result<T, RegistrationError>;
