//! In-memory configuration provider

use parking_lot::RwLock;

use super::settings::SecretsConfig;
use super::traits::{ConfigProvider, ConfigResult};

/// Configuration held in memory, set by the host application or tests
#[derive(Debug, Default)]
pub struct MemoryConfigProvider {
    config: RwLock<SecretsConfig>,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SecretsConfig) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// Replace the configuration
    pub fn set_config(&self, config: SecretsConfig) {
        *self.config.write() = config;
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn load(&self) -> ConfigResult<SecretsConfig> {
        Ok(self.config.read().clone())
    }
}
