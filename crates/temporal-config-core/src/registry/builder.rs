//! Composition and bootstrap of registration modules

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures::future::{self, BoxFuture};
use futures::FutureExt;

use super::container::Registry;
use super::explorer::Explorer;
use super::graph::resolution_layers;
use crate::composer::RegistrationModule;
use crate::logging::{LoggerExt, NoOpLogger, SharedLogger};
use crate::provider::{
    Dependencies, ProviderDescriptor, ProviderSource, RegistrationError, RegistrationResult,
    Resolved,
};
use crate::types::ProviderToken;

/// Collects modules and resolves them into a [`Registry`]
///
/// ```rust,ignore
/// let registry = RegistryBuilder::new()
///     .with_logger(Arc::new(TracingLogger::new()))
///     .register(composer.compose_immediate(worker, None, None)?)
///     .register(composer.compose_client_registration(clients))
///     .bootstrap()
///     .await?;
/// ```
pub struct RegistryBuilder {
    modules: Vec<String>,
    order: Vec<ProviderToken>,
    providers: HashMap<ProviderToken, ProviderDescriptor>,
    explorers: Vec<Arc<dyn Explorer>>,
    logger: SharedLogger,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            order: Vec::new(),
            providers: HashMap::new(),
            explorers: Vec::new(),
            logger: Arc::new(NoOpLogger::new()),
        }
    }

    /// Set the logger used during composition and bootstrap
    pub fn with_logger(mut self, logger: SharedLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Add an explorer, run once after bootstrap
    pub fn with_explorer(mut self, explorer: Arc<dyn Explorer>) -> Self {
        self.explorers.push(explorer);
        self
    }

    /// Compose a module and everything it imports
    ///
    /// Imports are composed depth-first before the module's own providers.
    /// An import marked `once` whose name was already composed is skipped,
    /// so the discovery registration is wired once. Every other import is
    /// composed in order. Providers for a token that is already registered
    /// replace the earlier registration.
    pub fn register(mut self, module: RegistrationModule) -> Self {
        self.compose(module);
        self
    }

    fn compose(&mut self, module: RegistrationModule) {
        let RegistrationModule {
            name,
            providers,
            imports,
            ..
        } = module;

        for import in imports {
            if import.once && self.modules.contains(&import.name) {
                self.logger
                    .debug_fmt(format_args!("Module {} already composed, skipping", import.name));
                continue;
            }
            self.compose(import);
        }

        if !self.modules.contains(&name) {
            self.modules.push(name.clone());
        }
        self.logger.debug_fmt(format_args!(
            "Composing module {} ({} providers)",
            name,
            providers.len()
        ));
        for descriptor in providers {
            self.insert(descriptor);
        }
    }

    fn insert(&mut self, descriptor: ProviderDescriptor) {
        let token = descriptor.token.clone();
        if self.providers.insert(token.clone(), descriptor).is_some() {
            self.logger
                .debug_fmt(format_args!("Registration for {} replaced", token));
        } else {
            self.order.push(token);
        }
    }

    /// Names of the modules composed so far
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Whether `token` has a registration
    pub fn contains(&self, token: &ProviderToken) -> bool {
        self.providers.contains_key(token)
    }

    /// Check the dependency graph without running any factory
    pub fn validate(&self) -> RegistrationResult<()> {
        self.plan().map(|_| ())
    }

    fn plan(&self) -> RegistrationResult<Vec<Vec<ProviderToken>>> {
        let layers = resolution_layers(&self.order, &self.providers).map_err(|e| {
            self.logger.error(&e.to_string());
            e
        })?;
        self.logger.debug_fmt(format_args!(
            "Validated {} providers in {} layers",
            self.order.len(),
            layers.len()
        ));
        Ok(layers)
    }

    /// Resolve every registration and run the explorers
    ///
    /// Layers resolve in order; descriptors within a layer resolve
    /// concurrently. The first failure aborts the bootstrap and no
    /// registry is produced.
    pub async fn bootstrap(self) -> RegistrationResult<Registry> {
        let layers = self.plan()?;
        self.logger.info_fmt(format_args!(
            "Bootstrapping {} providers from {} modules",
            self.order.len(),
            self.modules.len()
        ));

        let mut resolved: HashMap<ProviderToken, Resolved> = HashMap::with_capacity(self.order.len());
        for layer in layers {
            let pending = layer
                .iter()
                .map(|token| self.resolve(token, &resolved))
                .collect::<Vec<_>>();
            let values = future::try_join_all(pending).await?;
            resolved.extend(layer.into_iter().zip(values));
        }

        let registry = Registry::new(self.modules, self.order, resolved);
        for explorer in &self.explorers {
            self.logger
                .debug_fmt(format_args!("Running explorer {}", explorer.name()));
            explorer.explore(&registry).await?;
        }

        self.logger.info_fmt(format_args!(
            "Registry ready with {} providers",
            registry.len()
        ));
        Ok(registry)
    }

    fn resolve(
        &self,
        token: &ProviderToken,
        resolved: &HashMap<ProviderToken, Resolved>,
    ) -> BoxFuture<'static, RegistrationResult<Resolved>> {
        let Some(descriptor) = self.providers.get(token) else {
            return future::ready(Err(RegistrationError::NotRegistered(token.clone()))).boxed();
        };

        match &descriptor.source {
            ProviderSource::Value(value) => {
                if value.is_none() {
                    self.logger.debug_fmt(format_args!("{} configured as empty", token));
                }
                future::ready(Ok(value.clone())).boxed()
            }
            ProviderSource::Factory { factory, inject } => {
                let values = inject
                    .iter()
                    .map(|dependency| {
                        resolved.get(dependency).cloned().ok_or_else(|| {
                            RegistrationError::MissingDependency {
                                token: token.clone(),
                                dependency: dependency.clone(),
                            }
                        })
                    })
                    .collect::<RegistrationResult<Vec<_>>>();
                let values = match values {
                    Ok(values) => values,
                    Err(e) => return future::ready(Err(e)).boxed(),
                };

                let token = token.clone();
                let logger = self.logger.clone();
                factory(Dependencies::new(inject.clone(), values))
                    .map(move |result| match result {
                        Ok(value) => {
                            logger.debug_fmt(format_args!("Resolved {}", token));
                            Ok(value)
                        }
                        Err(source) => {
                            logger.error_fmt(format_args!("Factory for {} failed: {}", token, source));
                            Err(RegistrationError::factory_failed(token, source))
                        }
                    })
                    .boxed()
            }
        }
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("modules", &self.modules)
            .field("tokens", &self.order)
            .field("explorers", &self.explorers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use crate::composer::{RegistrationComposer, CORE_MODULE_NAME, DISCOVERY_MODULE_NAME, ROOT_MODULE_NAME};
    use crate::logging::Logger;
    use crate::provider::{AsyncConfiguration, BoxError};
    use crate::types::{
        ClientOptions, ClientRegistration, ConfigSlot, ConnectionOptions, RuntimeOptions, WorkerOptions,
    };

    #[derive(Default)]
    struct RecordingLogger(Mutex<Vec<String>>);

    impl Logger for RecordingLogger {
        fn debug(&self, message: &str) {
            self.0.lock().push(message.to_string());
        }
        fn info(&self, message: &str) {
            self.0.lock().push(message.to_string());
        }
        fn warn(&self, message: &str) {
            self.0.lock().push(message.to_string());
        }
        fn error(&self, message: &str) {
            self.0.lock().push(message.to_string());
        }
    }

    fn counting_factory(
        token: &str,
        inject: &[&str],
        calls: Arc<AtomicUsize>,
    ) -> ProviderDescriptor {
        ProviderDescriptor::from_fn(
            token,
            inject.iter().map(|t| ProviderToken::named(*t)).collect(),
            move |_deps| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, BoxError>(0u8) }
            },
        )
    }

    #[tokio::test]
    async fn test_immediate_worker_only() {
        let module = RegistrationComposer::new()
            .compose_immediate(WorkerOptions::new("q1"), None, None)
            .unwrap();
        let registry = RegistryBuilder::new().register(module).bootstrap().await.unwrap();

        assert_eq!(registry.worker_options().unwrap().unwrap().task_queue, "q1");
        assert!(registry.connection_options().unwrap().is_none());
        assert!(registry.runtime_options().unwrap().is_none());
        assert!(registry.contains(&ProviderToken::Explorer));
        assert!(registry.contains(&ProviderToken::MetadataAccessor));
    }

    #[tokio::test]
    async fn test_async_worker_only() {
        let module = RegistrationComposer::new()
            .compose_async(
                AsyncConfiguration::factory(|_deps| async { Ok::<_, BoxError>(WorkerOptions::new("q2")) }),
                None,
                None,
                None,
            )
            .unwrap();
        let registry = RegistryBuilder::new().register(module).bootstrap().await.unwrap();

        assert_eq!(registry.worker_options().unwrap().unwrap().task_queue, "q2");
        assert!(registry.connection_options().unwrap().is_none());
        assert!(registry.runtime_options().unwrap().is_none());
        assert!(registry.client_options().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dependencies_resolve_before_factory() {
        let events = Arc::new(Mutex::new(Vec::new()));

        let settings_events = events.clone();
        let settings = RegistrationModule::new("Settings").with_provider(ProviderDescriptor::from_fn(
            "queue",
            Vec::new(),
            move |_deps| {
                settings_events.lock().push("queue");
                async { Ok::<_, BoxError>("orders".to_string()) }
            },
        ));

        let worker_events = events.clone();
        let module = RegistrationComposer::new()
            .compose_async(
                AsyncConfiguration::factory(move |deps: Dependencies| {
                    worker_events.lock().push("worker");
                    async move {
                        let queue = deps.require::<String>(0)?;
                        Ok::<_, BoxError>(WorkerOptions::new(queue.as_str()))
                    }
                })
                .inject(["queue"])
                .imports([settings]),
                None,
                None,
                None,
            )
            .unwrap();

        let registry = RegistryBuilder::new().register(module).bootstrap().await.unwrap();
        assert_eq!(registry.worker_options().unwrap().unwrap().task_queue, "orders");
        assert_eq!(*events.lock(), vec!["queue", "worker"]);
        assert_eq!(
            registry.modules(),
            &[DISCOVERY_MODULE_NAME, CORE_MODULE_NAME, "Settings", ROOT_MODULE_NAME]
        );
    }

    #[tokio::test]
    async fn test_discovery_registered_once() {
        let composer = RegistrationComposer::new();
        let logger = Arc::new(RecordingLogger::default());
        let registry = RegistryBuilder::new()
            .with_logger(logger.clone())
            .register(composer.compose_immediate(WorkerOptions::new("a"), None, None).unwrap())
            .register(composer.compose_immediate(WorkerOptions::new("b"), None, None).unwrap())
            .register(
                composer
                    .compose_async(
                        AsyncConfiguration::factory(|_deps| async { Ok::<_, BoxError>(WorkerOptions::new("c")) }),
                        None,
                        None,
                        None,
                    )
                    .unwrap(),
            )
            .bootstrap()
            .await
            .unwrap();

        let cores = registry.modules().iter().filter(|m| *m == CORE_MODULE_NAME).count();
        assert_eq!(cores, 1);
        let skipped = logger
            .0
            .lock()
            .iter()
            .filter(|m| m.as_str() == "Module TemporalCore already composed, skipping")
            .count();
        assert_eq!(skipped, 2);
        // Last registration wins
        assert_eq!(registry.worker_options().unwrap().unwrap().task_queue, "c");
    }

    #[tokio::test]
    async fn test_factory_waits_for_every_dependency() {
        let events = Arc::new(Mutex::new(Vec::new()));

        let region_events = events.clone();
        let queue_events = events.clone();
        let settings = RegistrationModule::new("Settings")
            .with_provider(ProviderDescriptor::from_fn("region", Vec::new(), move |_deps| {
                region_events.lock().push("region");
                async { Ok::<_, BoxError>("eu".to_string()) }
            }))
            .with_provider(ProviderDescriptor::from_fn(
                "queue",
                vec![ProviderToken::named("region")],
                move |deps: Dependencies| {
                    queue_events.lock().push("queue");
                    async move {
                        let region = deps.require::<String>(0)?;
                        Ok::<_, BoxError>(format!("orders-{}", region))
                    }
                },
            ));

        let worker_events = events.clone();
        let module = RegistrationComposer::new()
            .compose_async(
                AsyncConfiguration::factory(move |deps: Dependencies| {
                    worker_events.lock().push("worker");
                    async move {
                        let queue = deps.require::<String>(0)?;
                        let region = deps.require::<String>(1)?;
                        Ok::<_, BoxError>(WorkerOptions::new(queue.as_str()).with_namespace(region.as_str()))
                    }
                })
                .inject(["queue", "region"])
                .imports([settings]),
                None,
                None,
                None,
            )
            .unwrap();

        let registry = RegistryBuilder::new().register(module).bootstrap().await.unwrap();
        let worker = registry.worker_options().unwrap().unwrap();
        assert_eq!(worker.task_queue, "orders-eu");
        assert_eq!(worker.namespace.as_deref(), Some("eu"));
        assert_eq!(*events.lock(), vec!["region", "queue", "worker"]);
    }

    #[tokio::test]
    async fn test_same_named_imports_are_all_composed() {
        let composer = RegistrationComposer::new();
        let first = composer
            .compose_async(
                AsyncConfiguration::factory(|deps: Dependencies| async move {
                    let queue = deps.require::<String>(0)?;
                    Ok::<_, BoxError>(WorkerOptions::new(queue.as_str()))
                })
                .inject(["a"])
                .imports([RegistrationModule::new("Settings")
                    .with_provider(ProviderDescriptor::value("a", "queue-a".to_string()))]),
                None,
                None,
                None,
            )
            .unwrap();
        let second = composer
            .compose_async(
                AsyncConfiguration::factory(|deps: Dependencies| async move {
                    let queue = deps.require::<String>(0)?;
                    Ok::<_, BoxError>(WorkerOptions::new(queue.as_str()))
                })
                .inject(["b"])
                .imports([RegistrationModule::new("Settings")
                    .with_provider(ProviderDescriptor::value("b", "queue-b".to_string()))]),
                None,
                None,
                None,
            )
            .unwrap();

        let registry = RegistryBuilder::new()
            .register(first)
            .register(second)
            .bootstrap()
            .await
            .unwrap();
        assert_eq!(registry.worker_options().unwrap().unwrap().task_queue, "queue-b");
        assert!(registry.contains(&ProviderToken::named("a")));
        assert_eq!(
            registry.modules().iter().filter(|m| *m == "Settings").count(),
            1
        );
    }

    #[tokio::test]
    async fn test_imported_client_registration_after_earlier_one() {
        let composer = RegistrationComposer::new();
        let billing = composer.compose_client_registration(ClientRegistration::new(
            "billing",
            ClientOptions::new("billing"),
        ));
        let module = composer
            .compose_async(
                AsyncConfiguration::factory(|deps: Dependencies| async move {
                    let client = deps.require::<ClientOptions>(0)?;
                    Ok::<_, BoxError>(WorkerOptions::new("q").with_namespace(client.namespace.as_str()))
                })
                .inject([ProviderToken::client("billing")])
                .imports([billing]),
                None,
                None,
                None,
            )
            .unwrap();

        let registry = RegistryBuilder::new()
            .register(composer.compose_client_registration(None::<ClientRegistration>))
            .register(module)
            .bootstrap()
            .await
            .unwrap();
        assert_eq!(
            registry.worker_options().unwrap().unwrap().namespace.as_deref(),
            Some("billing")
        );
        assert_eq!(registry.client("billing").unwrap().namespace, "billing");
    }

    #[tokio::test]
    async fn test_later_import_overrides_earlier_binding() {
        let staging = RegistrationModule::new("Settings")
            .with_provider(ProviderDescriptor::value("ns", ClientOptions::new("staging")));
        let production = RegistrationModule::new("Settings")
            .with_provider(ProviderDescriptor::value("ns", ClientOptions::new("production")));
        let module = RegistrationComposer::new()
            .compose_async(
                AsyncConfiguration::new(),
                None,
                None,
                Some(
                    AsyncConfiguration::new()
                        .use_existing("ns")
                        .imports([staging, production]),
                ),
            )
            .unwrap();

        let registry = RegistryBuilder::new().register(module).bootstrap().await.unwrap();
        assert_eq!(registry.client_options().unwrap().unwrap().namespace, "production");
    }

    #[tokio::test]
    async fn test_use_existing_shares_instance() {
        let shared = RegistrationModule::new("Clients")
            .with_provider(ProviderDescriptor::value("shared-client", ClientOptions::new("billing")));
        let module = RegistrationComposer::new()
            .compose_async(
                AsyncConfiguration::new(),
                None,
                None,
                Some(AsyncConfiguration::new().use_existing("shared-client").imports([shared])),
            )
            .unwrap();
        let registry = RegistryBuilder::new().register(module).bootstrap().await.unwrap();

        let client = registry.client_options().unwrap().unwrap();
        let original = registry.require::<ClientOptions>("shared-client").unwrap();
        assert!(Arc::ptr_eq(&client, &original));
        assert!(registry.worker_options().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_client_registration_module() {
        let composer = RegistrationComposer::new();
        let registry = RegistryBuilder::new()
            .register(composer.compose_immediate(WorkerOptions::new("q"), None, None).unwrap())
            .register(composer.compose_client_registration(vec![
                ClientRegistration::new("billing", ClientOptions::new("billing")),
                ClientRegistration::new("billing", ClientOptions::new("billing-v2")),
            ]))
            .register(composer.compose_client_registration(None::<ClientRegistration>))
            .bootstrap()
            .await
            .unwrap();

        assert_eq!(registry.client("billing").unwrap().namespace, "billing-v2");
        assert_eq!(
            registry.modules().iter().filter(|m| *m == ROOT_MODULE_NAME).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_missing_dependency_runs_no_factory() {
        let calls = Arc::new(AtomicUsize::new(0));
        let builder = RegistryBuilder::new().register(
            RegistrationModule::new("m")
                .with_provider(counting_factory("ready", &[], calls.clone()))
                .with_provider(counting_factory("app", &["nowhere"], calls.clone())),
        );

        assert!(builder.validate().is_err());
        match builder.bootstrap().await {
            Err(RegistrationError::MissingDependency { token, dependency }) => {
                assert_eq!(token, ProviderToken::named("app"));
                assert_eq!(dependency, ProviderToken::named("nowhere"));
            }
            other => panic!("expected missing dependency, got {:?}", other),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cycle_runs_no_factory() {
        let calls = Arc::new(AtomicUsize::new(0));
        let result = RegistryBuilder::new()
            .register(
                RegistrationModule::new("m")
                    .with_provider(counting_factory("ready", &[], calls.clone()))
                    .with_provider(counting_factory("a", &["b"], calls.clone()))
                    .with_provider(counting_factory("b", &["a"], calls.clone())),
            )
            .bootstrap()
            .await;

        assert!(matches!(result, Err(RegistrationError::CyclicDependency { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_factory_error_aborts_bootstrap() {
        let module = RegistrationComposer::new()
            .compose_async(
                AsyncConfiguration::<WorkerOptions>::factory(|_deps| async {
                    Err::<WorkerOptions, BoxError>("settings unavailable".into())
                }),
                Some(AsyncConfiguration::factory(|_deps| async {
                    Ok::<_, BoxError>(ConnectionOptions::default())
                })),
                None,
                None,
            )
            .unwrap();

        match RegistryBuilder::new().register(module).bootstrap().await {
            Err(RegistrationError::FactoryFailed { token, source }) => {
                assert_eq!(token, ProviderToken::Slot(ConfigSlot::Worker));
                assert_eq!(source.to_string(), "settings unavailable");
            }
            other => panic!("expected factory failure, got {:?}", other),
        }
    }

    struct CountingExplorer {
        runs: AtomicUsize,
        seen_worker: Mutex<Option<String>>,
    }

    #[async_trait]
    impl Explorer for CountingExplorer {
        fn name(&self) -> &str {
            "counting"
        }

        async fn explore(&self, registry: &Registry) -> RegistrationResult<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            let worker = registry.require::<WorkerOptions>(ConfigSlot::Worker)?;
            *self.seen_worker.lock() = Some(worker.task_queue.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_explorer_runs_once_after_resolution() {
        let explorer = Arc::new(CountingExplorer {
            runs: AtomicUsize::new(0),
            seen_worker: Mutex::new(None),
        });
        RegistryBuilder::new()
            .with_explorer(explorer.clone())
            .register(
                RegistrationComposer::new()
                    .compose_immediate(
                        WorkerOptions::new("scan"),
                        None,
                        Some(RuntimeOptions::new()),
                    )
                    .unwrap(),
            )
            .bootstrap()
            .await
            .unwrap();

        assert_eq!(explorer.runs.load(Ordering::SeqCst), 1);
        assert_eq!(explorer.seen_worker.lock().as_deref(), Some("scan"));
    }

    #[tokio::test]
    async fn test_explorer_error_aborts_bootstrap() {
        let explorer = Arc::new(CountingExplorer {
            runs: AtomicUsize::new(0),
            seen_worker: Mutex::new(None),
        });
        let result = RegistryBuilder::new()
            .with_explorer(explorer)
            .register(RegistrationComposer::new().compose_client_registration(None::<ClientRegistration>))
            .bootstrap()
            .await;
        assert!(matches!(result, Err(RegistrationError::NotRegistered(_))));
    }
}
