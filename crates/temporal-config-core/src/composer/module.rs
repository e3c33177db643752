//! Registration modules: named bundles of providers, imports and exports

use crate::provider::ProviderDescriptor;
use crate::types::ProviderToken;

/// A named, composable set of registrations
///
/// Imported modules are composed before the importing module's own
/// providers, in import order. A module marked [`once`](Self::once) is
/// composed at most once per registry no matter how often it is imported;
/// every other import is always composed.
#[derive(Debug, Clone)]
pub struct RegistrationModule {
    /// Module name; the identity used when deduplicating imports
    pub name: String,
    /// Whether the module's exports are visible process-wide
    pub global: bool,
    /// Compose only the first import with this name
    pub once: bool,
    pub providers: Vec<ProviderDescriptor>,
    pub imports: Vec<RegistrationModule>,
    /// Tokens re-exported to dependent modules
    pub exports: Vec<ProviderToken>,
}

impl RegistrationModule {
    /// Create an empty, non-global module
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            global: false,
            once: false,
            providers: Vec::new(),
            imports: Vec::new(),
            exports: Vec::new(),
        }
    }

    /// Mark the module as global
    pub fn global(mut self) -> Self {
        self.global = true;
        self
    }

    /// Compose this module at most once per registry
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Add a provider
    pub fn with_provider(mut self, descriptor: ProviderDescriptor) -> Self {
        self.providers.push(descriptor);
        self
    }

    /// Add several providers
    pub fn with_providers(mut self, descriptors: impl IntoIterator<Item = ProviderDescriptor>) -> Self {
        self.providers.extend(descriptors);
        self
    }

    /// Import another module
    pub fn with_import(mut self, module: RegistrationModule) -> Self {
        self.imports.push(module);
        self
    }

    /// Export a token
    pub fn with_export(mut self, token: impl Into<ProviderToken>) -> Self {
        let token = token.into();
        if !self.exports.contains(&token) {
            self.exports.push(token);
        }
        self
    }

    /// Export every token this module provides
    pub fn export_all(mut self) -> Self {
        for token in self.tokens() {
            if !self.exports.contains(&token) {
                self.exports.push(token);
            }
        }
        self
    }

    /// Distinct tokens provided by this module, in first-registration order
    pub fn tokens(&self) -> Vec<ProviderToken> {
        let mut tokens: Vec<ProviderToken> = Vec::new();
        for descriptor in &self.providers {
            if !tokens.contains(&descriptor.token) {
                tokens.push(descriptor.token.clone());
            }
        }
        tokens
    }

    /// The effective descriptor for `token` (last registration wins)
    pub fn provider(&self, token: &ProviderToken) -> Option<&ProviderDescriptor> {
        self.providers.iter().rev().find(|d| &d.token == token)
    }

    /// Names of the modules imported directly by this one
    pub fn import_names(&self) -> Vec<&str> {
        self.imports.iter().map(|m| m.name.as_str()).collect()
    }
}
