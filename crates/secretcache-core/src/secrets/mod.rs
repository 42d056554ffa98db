//! Secret backends
//!
//! This module provides the pluggable backend layer:
//! - `SecretKey`: `vendor/subkey` caller keys and backend identifiers
//! - `SecretBackend` trait for implementing custom backends
//! - Built-in backends: `AwsSecretsManagerBackend`, `FileBackend`, `EnvBackend`,
//!   `KeychainBackend`, `MemoryBackend`, `ChainBackend`
//! - A registry for creating backends by kind from configuration

mod traits;
mod key;
mod env_store;
mod memory_store;
mod file_store;
mod chain_store;
mod keychain_store;
mod registry;
pub mod aws;

pub use traits::{LookupFailure, LookupResult, SecretBackend, SecretsError, SecretsResult};
pub use key::{SecretKey, DEFAULT_NAMESPACE_PREFIX};
pub use env_store::EnvBackend;
pub use memory_store::MemoryBackend;
pub use file_store::{parse_credentials, FileBackend};
pub use chain_store::ChainBackend;
pub use keychain_store::KeychainBackend;
pub use aws::{AwsBackendSettings, AwsSecretsManagerBackend};
pub use registry::{
    backend_factory, create_backend, create_backends, has_backend, list_backends,
    register_backend, unregister_backend, BackendDefinition, BackendFactory, FactoryContext,
};
