//! Turns per-domain configuration into registration modules

use crate::config::{ConfigFile, ConfigSource};
use crate::provider::{AsyncConfiguration, ProviderDescriptor, RegistrationError, RegistrationResult};
use crate::types::{
    ClientOptions, ConfigSlot, ConnectionOptions, ProviderToken, RuntimeOptions, WorkerOptions,
};

use super::client::ClientRegistrations;
use super::discovery::core_registration;
use super::module::RegistrationModule;

/// Name of the modules produced by the composer
pub const ROOT_MODULE_NAME: &str = "TemporalModule";

/// Which slot identities the immediate entry point binds
///
/// `Distinct` gives connection and runtime their own slots. `SharedCore`
/// binds both to the runtime ("core") slot, so the runtime registration
/// always overwrites the connection one and the connection slot is left
/// unregistered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlotLayout {
    #[default]
    Distinct,
    SharedCore,
}

/// Builds [`RegistrationModule`]s from host-supplied configuration
///
/// Composition is pure: nothing is resolved until the registry bootstraps.
///
/// ```rust,ignore
/// let composer = RegistrationComposer::new();
/// let module = composer.compose_immediate(WorkerOptions::new("orders"), None, None)?;
/// let registry = RegistryBuilder::new().register(module).bootstrap().await?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistrationComposer {
    layout: SlotLayout,
}

impl RegistrationComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific slot layout for the immediate entry point
    pub fn with_layout(layout: SlotLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> SlotLayout {
        self.layout
    }

    fn connection_slot(&self) -> ConfigSlot {
        match self.layout {
            SlotLayout::Distinct => ConfigSlot::Connection,
            SlotLayout::SharedCore => ConfigSlot::Runtime,
        }
    }

    fn root_module(providers: Vec<ProviderDescriptor>) -> RegistrationModule {
        RegistrationModule::new(ROOT_MODULE_NAME)
            .global()
            .with_providers(providers)
            .with_import(core_registration())
    }

    /// Register the worker, connection and runtime options as immediate values
    ///
    /// Absent optional domains are still registered, as null.
    pub fn compose_immediate(
        &self,
        worker: WorkerOptions,
        connection: Option<ConnectionOptions>,
        runtime: Option<RuntimeOptions>,
    ) -> RegistrationResult<RegistrationModule> {
        if !worker.is_complete() {
            return Err(RegistrationError::missing_required(ConfigSlot::Worker));
        }

        let providers = vec![
            ProviderDescriptor::value(ConfigSlot::Worker, worker),
            ProviderDescriptor::optional(self.connection_slot(), connection),
            ProviderDescriptor::optional(ConfigSlot::Runtime, runtime),
        ];

        Ok(Self::root_module(providers).export_all())
    }

    /// Register the four domains as deferred configurations
    ///
    /// A domain without a strategy (or not supplied at all) resolves to null.
    /// The imports of every configuration are added to the module.
    pub fn compose_async(
        &self,
        worker: AsyncConfiguration<WorkerOptions>,
        connection: Option<AsyncConfiguration<ConnectionOptions>>,
        runtime: Option<AsyncConfiguration<RuntimeOptions>>,
        client: Option<AsyncConfiguration<ClientOptions>>,
    ) -> RegistrationResult<RegistrationModule> {
        let mut imports = Vec::new();
        let providers = vec![
            Self::async_descriptor(ConfigSlot::Worker, Some(worker), &mut imports)?,
            Self::async_descriptor(ConfigSlot::Connection, connection, &mut imports)?,
            Self::async_descriptor(ConfigSlot::Runtime, runtime, &mut imports)?,
            Self::async_descriptor(ConfigSlot::Client, client, &mut imports)?,
        ];

        let mut module = Self::root_module(providers);
        module.imports.extend(imports);
        Ok(module.export_all())
    }

    fn async_descriptor<T>(
        slot: ConfigSlot,
        config: Option<AsyncConfiguration<T>>,
        imports: &mut Vec<RegistrationModule>,
    ) -> RegistrationResult<ProviderDescriptor>
    where
        T: std::any::Any + Send + Sync,
    {
        match config {
            Some(mut config) => {
                imports.extend(config.take_imports());
                config.into_descriptor(slot.into())
            }
            None => Ok(ProviderDescriptor::null(slot)),
        }
    }

    /// Register zero or more named clients
    ///
    /// Each client is bound under `client:<name>`. With no clients the
    /// module is still valid and simply provides nothing.
    pub fn compose_client_registration(
        &self,
        clients: impl Into<ClientRegistrations>,
    ) -> RegistrationModule {
        let providers = clients
            .into()
            .into_iter()
            .map(|registration| {
                ProviderDescriptor::value(ProviderToken::client(registration.name), registration.options)
            })
            .collect::<Vec<_>>();

        RegistrationModule::new(ROOT_MODULE_NAME)
            .global()
            .with_providers(providers)
            .export_all()
    }

    /// Deferred client registration is not supported
    pub fn compose_client_registration_async(
        &self,
        _clients: Vec<AsyncConfiguration<ClientOptions>>,
    ) -> RegistrationResult<RegistrationModule> {
        Err(RegistrationError::unsupported("compose_client_registration_async"))
    }

    /// Load a [`ConfigFile`] and register it as immediate values
    pub async fn compose_from_source(
        &self,
        source: &dyn ConfigSource,
    ) -> RegistrationResult<RegistrationModule> {
        let file = source.load().await?;
        self.compose_from_file(file)
    }

    /// Register an already-loaded [`ConfigFile`]
    pub fn compose_from_file(&self, file: ConfigFile) -> RegistrationResult<RegistrationModule> {
        let worker = file
            .worker
            .ok_or_else(|| RegistrationError::missing_required(ConfigSlot::Worker))?;
        let mut module = self.compose_immediate(worker, file.connection, file.runtime)?;

        if !file.clients.is_empty() {
            let clients = self.compose_client_registration(file.clients);
            module.providers.extend(clients.providers);
            module = module.export_all();
        }
        Ok(module)
    }
}
