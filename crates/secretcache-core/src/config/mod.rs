//! Configuration for the resolver
//!
//! Supports multiple configuration sources:
//! - `MemoryConfigProvider`: In-memory, set by the host or tests
//! - `FileConfigProvider`: YAML file-based (user/workspace level)
//!
//! `SECRETCACHE_*` environment variables override file values.

mod traits;
mod settings;
mod memory;
mod file;

pub use traits::{ConfigProvider, ConfigError, ConfigResult};
pub use settings::{SecretsConfig, BackendConfig, CryptoSettings};
pub use memory::MemoryConfigProvider;
pub use file::{FileConfigProvider, ConfigLevel};
