//! secretcache core
//!
//! Resolves named secrets (`vendor/subkey`) from a pluggable backend and keeps
//! resolved values in an in-process cache that only ever holds them encrypted.
//!
//! ## Resolution
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use secretcache_core::config::FileConfigProvider;
//! use secretcache_core::logging::ConsoleLogger;
//! use secretcache_core::SecretResolver;
//!
//! let provider = FileConfigProvider::workspace(".");
//! let resolver = SecretResolver::from_provider(&provider, Arc::new(ConsoleLogger::new()))?;
//!
//! // Some(value), or None when the secret cannot be found
//! let otp = resolver.get_secret_value("magento/tfa/OTP_SHARED_SECRET")?;
//!
//! // Credential references inside test data
//! let body = resolver.interpolate("user={{_CREDS.magento/username}}")?;
//! ```
//!
//! Only a broken backend configuration is an error; a missing, malformed or
//! unreachable secret is `None`.

pub mod logging;
pub mod config;
pub mod crypto;
pub mod cache;
pub mod secrets;
pub mod resolver;

// Re-export commonly used types
pub use secrets::{
    SecretBackend, SecretKey, SecretsError, SecretsResult, LookupFailure, LookupResult,
    AwsSecretsManagerBackend, FileBackend, EnvBackend, KeychainBackend, MemoryBackend, ChainBackend,
    register_backend, create_backend, list_backends,
};

pub use logging::{Logger, SharedLogger, NoOpLogger, ConsoleLogger, Diagnostics};

pub use config::{ConfigProvider, MemoryConfigProvider, FileConfigProvider, SecretsConfig, BackendConfig};

pub use crypto::{CryptoContext, CryptoError};

pub use cache::CacheStore;

pub use resolver::{SecretContext, SecretResolver};
