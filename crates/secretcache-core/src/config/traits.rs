//! Configuration provider trait

use super::settings::SecretsConfig;

/// Source of the resolver configuration
///
/// Implementations:
/// - `MemoryConfigProvider`: In-memory, set by the host or tests
/// - `FileConfigProvider`: YAML file (user or workspace level)
pub trait ConfigProvider: Send + Sync {
    /// Load the current configuration
    fn load(&self) -> ConfigResult<SecretsConfig>;
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
