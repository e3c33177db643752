//! The always-imported discovery sub-registration

use super::module::RegistrationModule;
use crate::provider::ProviderDescriptor;
use crate::types::ProviderToken;

/// Name of the core discovery registration
pub const CORE_MODULE_NAME: &str = "TemporalCore";

/// Name of the discovery module imported by the core registration
pub const DISCOVERY_MODULE_NAME: &str = "DiscoveryModule";

/// Binding consumed by the discovery collaborators
///
/// The explorer and metadata accessor live outside this crate; the core
/// registration only reserves their tokens so they are wired exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryBinding {
    pub role: &'static str,
}

/// Build the core discovery registration
pub fn core_registration() -> RegistrationModule {
    RegistrationModule::new(CORE_MODULE_NAME)
        .global()
        .once()
        .with_import(RegistrationModule::new(DISCOVERY_MODULE_NAME).once())
        .with_provider(ProviderDescriptor::value(
            ProviderToken::Explorer,
            DiscoveryBinding { role: "explorer" },
        ))
        .with_provider(ProviderDescriptor::value(
            ProviderToken::MetadataAccessor,
            DiscoveryBinding { role: "metadata-accessor" },
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_registration_shape() {
        let core = core_registration();
        assert_eq!(core.name, CORE_MODULE_NAME);
        assert!(core.global);
        assert!(core.once);
        assert!(core.imports.iter().all(|m| m.once));
        assert_eq!(core.import_names(), vec![DISCOVERY_MODULE_NAME]);
        assert_eq!(
            core.tokens(),
            vec![ProviderToken::Explorer, ProviderToken::MetadataAccessor]
        );
    }
}
