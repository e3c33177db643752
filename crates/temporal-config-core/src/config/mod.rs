//! Configuration source abstractions
//!
//! Supports multiple configuration sources:
//! - `MemoryConfigSource`: In-memory for testing
//! - `FileConfigSource`: YAML/JSON file-based (user/workspace level)

mod traits;
mod memory;
mod file;

pub use traits::{ConfigSource, ConfigFile, ConfigError, ConfigResult};
pub use memory::MemoryConfigSource;
pub use file::{FileConfigSource, ConfigLevel, ConfigFormat};
