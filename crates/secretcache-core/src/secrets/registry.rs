//! Backend registry for creating backends by kind from configuration

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::Deserialize;

use super::aws::{AwsBackendSettings, AwsSecretsManagerBackend};
use super::chain_store::ChainBackend;
use super::env_store::EnvBackend;
use super::file_store::FileBackend;
use super::keychain_store::KeychainBackend;
use super::memory_store::MemoryBackend;
use super::traits::{SecretBackend, SecretsError, SecretsResult};
use crate::config::BackendConfig;
use crate::logging::Diagnostics;

/// What a factory gets besides its own backend entry
#[derive(Debug, Clone)]
pub struct FactoryContext {
    pub namespace_prefix: String,
    pub diagnostics: Diagnostics,
}

impl FactoryContext {
    pub fn new(namespace_prefix: impl Into<String>, diagnostics: Diagnostics) -> Self {
        Self {
            namespace_prefix: namespace_prefix.into(),
            diagnostics,
        }
    }
}

/// Factory function type for creating backends
pub type BackendFactory =
    Box<dyn Fn(&BackendConfig, &FactoryContext) -> SecretsResult<Arc<dyn SecretBackend>> + Send + Sync>;

/// Box a closure as a [`BackendFactory`]
pub fn backend_factory<F>(f: F) -> BackendFactory
where
    F: Fn(&BackendConfig, &FactoryContext) -> SecretsResult<Arc<dyn SecretBackend>>
        + Send
        + Sync
        + 'static,
{
    Box::new(f)
}

/// Definition of a registered backend kind
pub struct BackendDefinition {
    pub kind: String,
    pub description: String,
    pub factory: BackendFactory,
}

impl std::fmt::Debug for BackendDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendDefinition")
            .field("kind", &self.kind)
            .field("description", &self.description)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileOptions {
    #[serde(default)]
    path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EnvOptions {
    #[serde(default)]
    prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct KeychainOptions {
    #[serde(default)]
    service: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MemoryOptions {
    #[serde(default)]
    secrets: HashMap<String, String>,
}

fn definition(kind: &str, description: &str, factory: BackendFactory) -> (String, BackendDefinition) {
    (
        kind.to_string(),
        BackendDefinition {
            kind: kind.to_string(),
            description: description.to_string(),
            factory,
        },
    )
}

/// Global registry of backend kinds
static REGISTRY: Lazy<RwLock<HashMap<String, BackendDefinition>>> = Lazy::new(|| {
    let builtins = vec![
        definition(
            "aws",
            "AWS Secrets Manager, one JSON secret per vendor",
            backend_factory(|config, ctx| {
                let settings: AwsBackendSettings = config.settings()?;
                let backend = AwsSecretsManagerBackend::new(
                    settings,
                    ctx.namespace_prefix.clone(),
                    ctx.diagnostics.clone(),
                )?;
                Ok(Arc::new(backend))
            }),
        ),
        definition(
            "file",
            "vendor/key=value lines from a .credentials file",
            backend_factory(|config, ctx| {
                let options: FileOptions = config.settings()?;
                let path = options.path.unwrap_or_else(|| ".credentials".to_string());
                Ok(Arc::new(FileBackend::new(path, ctx.diagnostics.clone())))
            }),
        ),
        definition(
            "env",
            "Read secrets from environment variables",
            backend_factory(|config, ctx| {
                let options: EnvOptions = config.settings()?;
                let prefix = options.prefix.unwrap_or_else(|| ctx.namespace_prefix.clone());
                Ok(Arc::new(EnvBackend::with_prefix(prefix)))
            }),
        ),
        definition(
            "keychain",
            "System keychain (macOS Keychain, Windows Credential Manager, Linux Secret Service)",
            backend_factory(|config, ctx| {
                let options: KeychainOptions = config.settings()?;
                let service = options.service.unwrap_or_else(|| ctx.namespace_prefix.clone());
                Ok(Arc::new(KeychainBackend::with_service(service, ctx.diagnostics.clone())))
            }),
        ),
        definition(
            "memory",
            "In-memory storage for testing",
            backend_factory(|config, _| {
                let options: MemoryOptions = config.settings()?;
                Ok(Arc::new(MemoryBackend::with_secrets(options.secrets)))
            }),
        ),
    ];

    RwLock::new(builtins.into_iter().collect())
});

/// Register a backend kind, replacing any existing one with the same name
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use secretcache_core::secrets::{backend_factory, register_backend, MemoryBackend};
///
/// register_backend(
///     "fixture",
///     "Fixed values for integration runs",
///     backend_factory(|_, _| Ok(Arc::new(MemoryBackend::new()))),
/// );
/// ```
pub fn register_backend(kind: &str, description: &str, factory: BackendFactory) {
    let (kind, def) = definition(kind, description, factory);
    REGISTRY.write().insert(kind, def);
}

/// Create a backend from one configuration entry
pub fn create_backend(
    config: &BackendConfig,
    ctx: &FactoryContext,
) -> SecretsResult<Arc<dyn SecretBackend>> {
    let registry = REGISTRY.read();
    let def = registry
        .get(config.kind.as_str())
        .ok_or_else(|| SecretsError::UnknownBackend(config.kind.clone()))?;
    (def.factory)(config, ctx)
}

/// Create the backend for a list of entries: one entry as-is, several as a chain
pub fn create_backends(
    configs: &[BackendConfig],
    ctx: &FactoryContext,
) -> SecretsResult<Arc<dyn SecretBackend>> {
    let mut backends = configs
        .iter()
        .map(|config| create_backend(config, ctx))
        .collect::<SecretsResult<Vec<_>>>()?;

    if backends.len() == 1 {
        if let Some(backend) = backends.pop() {
            return Ok(backend);
        }
    }
    Ok(Arc::new(ChainBackend::new(backends)?))
}

/// List registered backend kinds as (kind, description) pairs, sorted by kind
pub fn list_backends() -> Vec<(String, String)> {
    let registry = REGISTRY.read();
    let mut list: Vec<_> = registry
        .values()
        .map(|def| (def.kind.clone(), def.description.clone()))
        .collect();
    list.sort();
    list
}

/// Check if a backend kind is registered
pub fn has_backend(kind: &str) -> bool {
    REGISTRY.read().contains_key(kind)
}

/// Unregister a backend kind (mainly for testing)
pub fn unregister_backend(kind: &str) -> bool {
    REGISTRY.write().remove(kind).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::{LookupFailure, SecretKey};

    fn ctx() -> FactoryContext {
        FactoryContext::new("mftf", Diagnostics::silent())
    }

    #[test]
    fn test_builtin_backends_registered() {
        for kind in ["aws", "file", "env", "keychain", "memory"] {
            assert!(has_backend(kind), "{} should be registered", kind);
        }
        let kinds: Vec<_> = list_backends().into_iter().map(|(k, _)| k).collect();
        assert!(kinds.contains(&"aws".to_string()));
    }

    #[test]
    fn test_create_memory_backend_with_secrets() {
        let config = BackendConfig::new("memory")
            .with_option("secrets", serde_json::json!({ "vendor1/keyA": "value-a" }));
        let backend = create_backend(&config, &ctx()).unwrap();

        assert_eq!(backend.name(), "memory");
        assert_eq!(backend.resolve(&SecretKey::new("vendor1", "keyA")).unwrap(), "value-a");
    }

    #[test]
    fn test_create_env_backend_uses_namespace_prefix() {
        let backend = create_backend(&BackendConfig::new("env"), &ctx()).unwrap();
        assert_eq!(backend.name(), "env");
        assert!(matches!(
            backend.resolve(&SecretKey::new("registry_test_vendor", "unset_key")),
            Err(LookupFailure::NotFound { .. })
        ));
    }

    #[test]
    fn test_create_aws_backend_requires_region() {
        let result = create_backend(&BackendConfig::new("aws"), &ctx());
        assert!(matches!(result, Err(SecretsError::Config(_))));

        let config = BackendConfig::new("aws").with_option("region", "");
        let result = create_backend(&config, &ctx());
        assert!(matches!(result, Err(SecretsError::Configuration(_))));
    }

    #[test]
    fn test_create_unknown_backend() {
        match create_backend(&BackendConfig::new("nonexistent_xyz"), &ctx()) {
            Err(SecretsError::UnknownBackend(kind)) => assert_eq!(kind, "nonexistent_xyz"),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(backend) => panic!("unexpected backend: {}", backend.name()),
        }
    }

    #[test]
    fn test_create_backends_single_and_chain() {
        let single = create_backends(&[BackendConfig::new("memory")], &ctx()).unwrap();
        assert_eq!(single.name(), "memory");

        let chained = create_backends(
            &[BackendConfig::new("memory"), BackendConfig::new("env")],
            &ctx(),
        )
        .unwrap();
        assert_eq!(chained.name(), "chain");

        assert!(matches!(
            create_backends(&[], &ctx()),
            Err(SecretsError::Configuration(_))
        ));
    }

    #[test]
    fn test_register_custom_backend() {
        register_backend(
            "test_custom_backend",
            "A test backend",
            backend_factory(|_, _| Ok(Arc::new(MemoryBackend::new()))),
        );
        assert!(has_backend("test_custom_backend"));

        let backend = create_backend(&BackendConfig::new("test_custom_backend"), &ctx()).unwrap();
        assert_eq!(backend.name(), "memory");

        assert!(unregister_backend("test_custom_backend"));
        assert!(!has_backend("test_custom_backend"));
    }
}
