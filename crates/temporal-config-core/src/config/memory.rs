//! In-memory configuration source

use async_trait::async_trait;
use parking_lot::RwLock;

use super::traits::{ConfigFile, ConfigResult, ConfigSource};

/// In-memory configuration source for testing
#[derive(Debug, Default)]
pub struct MemoryConfigSource {
    file: RwLock<ConfigFile>,
}

impl MemoryConfigSource {
    /// Create a source holding an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source holding `file`
    pub fn with_file(file: ConfigFile) -> Self {
        Self {
            file: RwLock::new(file),
        }
    }

    /// Replace the document directly (useful for testing)
    pub fn set_file(&self, file: ConfigFile) {
        *self.file.write() = file;
    }

    /// Reset to an empty document
    pub fn clear(&self) {
        *self.file.write() = ConfigFile::default();
    }
}

#[async_trait]
impl ConfigSource for MemoryConfigSource {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self) -> ConfigResult<ConfigFile> {
        Ok(self.file.read().clone())
    }

    async fn store(&self, config: &ConfigFile) -> ConfigResult<()> {
        self.set_file(config.clone());
        Ok(())
    }
}
