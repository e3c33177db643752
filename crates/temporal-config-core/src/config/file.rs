//! File-based configuration source (YAML or JSON)
//!
//! Supports user-level (~/.config/temporal/config.yaml) and workspace-level (.config/temporal/config.yaml) config.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::traits::{ConfigError, ConfigFile, ConfigResult, ConfigSource};

/// Config level (user or workspace)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    /// User-level config (~/.config/temporal/config.yaml)
    User,
    /// Workspace-level config (.config/temporal/config.yaml in workspace root)
    Workspace,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::User => "user",
            ConfigLevel::Workspace => "workspace",
        }
    }
}

/// On-disk encoding, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect the format of `path`
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("json") => Ok(ConfigFormat::Json),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// File-based configuration source
///
/// A missing file loads as an empty document.
///
/// # Example
///
/// ```no_run
/// use temporal_config_core::config::FileConfigSource;
///
/// // User-level config
/// let user_config = FileConfigSource::user();
///
/// // Workspace-level config
/// let workspace_config = FileConfigSource::workspace("/path/to/workspace");
/// ```
pub struct FileConfigSource {
    path: PathBuf,
    level: ConfigLevel,
    cache: RwLock<Option<ConfigFile>>,
}

impl FileConfigSource {
    /// Create a new file config source for a specific path
    pub fn new(path: impl Into<PathBuf>, level: ConfigLevel) -> Self {
        Self {
            path: path.into(),
            level,
            cache: RwLock::new(None),
        }
    }

    /// Create a user-level config source (~/.config/temporal/config.yaml)
    pub fn user() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        let path = config_dir.join("temporal").join("config.yaml");
        Self::new(path, ConfigLevel::User)
    }

    /// Create a workspace-level config source (.config/temporal/config.yaml)
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        let path = workspace_root.as_ref().join(".config").join("temporal").join("config.yaml");
        Self::new(path, ConfigLevel::Workspace)
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the config level
    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    /// Check if the config file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read(&self) -> ConfigResult<ConfigFile> {
        if !self.path.exists() {
            return Ok(ConfigFile::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let config = match ConfigFormat::from_path(&self.path)? {
            ConfigFormat::Yaml => serde_yaml::from_str(&content)?,
            ConfigFormat::Json => serde_json::from_str(&content)?,
        };
        Ok(config)
    }

    fn write(&self, config: &ConfigFile) -> ConfigResult<()> {
        let content = match ConfigFormat::from_path(&self.path)? {
            ConfigFormat::Yaml => serde_yaml::to_string(config)?,
            ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, content)?;

        *self.cache.write() = Some(config.clone());
        Ok(())
    }

    /// Get cached or read config
    fn get_config(&self) -> ConfigResult<ConfigFile> {
        if let Some(config) = self.cache.read().as_ref() {
            return Ok(config.clone());
        }

        let config = self.read()?;
        *self.cache.write() = Some(config.clone());
        Ok(config)
    }

    /// Reload config from disk (invalidate cache)
    pub fn reload(&self) -> ConfigResult<ConfigFile> {
        let config = self.read()?;
        *self.cache.write() = Some(config.clone());
        Ok(config)
    }
}

impl std::fmt::Debug for FileConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigSource")
            .field("path", &self.path)
            .field("level", &self.level)
            .field("exists", &self.exists())
            .finish()
    }
}

#[async_trait]
impl ConfigSource for FileConfigSource {
    fn name(&self) -> &str {
        self.level.as_str()
    }

    async fn load(&self) -> ConfigResult<ConfigFile> {
        self.get_config()
    }

    async fn store(&self, config: &ConfigFile) -> ConfigResult<()> {
        self.write(config)
    }
}
