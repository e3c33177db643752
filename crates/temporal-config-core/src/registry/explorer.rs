//! Post-bootstrap collaborators

use async_trait::async_trait;

use super::container::Registry;
use crate::provider::RegistrationResult;

/// Inspects the resolved registry once bootstrap has finished
///
/// Discovery components (workflow/activity scanners and the like) plug in
/// here. Each registered explorer runs exactly once, in registration order,
/// and an error aborts the bootstrap.
#[async_trait]
pub trait Explorer: Send + Sync {
    /// Get the explorer name
    fn name(&self) -> &str;

    async fn explore(&self, registry: &Registry) -> RegistrationResult<()>;
}
