//! Resolver configuration model

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::traits::{ConfigError, ConfigResult};
use crate::crypto::CryptoContext;
use crate::secrets::DEFAULT_NAMESPACE_PREFIX;

fn default_namespace_prefix() -> String {
    DEFAULT_NAMESPACE_PREFIX.to_string()
}

/// Top-level configuration
///
/// ```yaml
/// verbose: true
/// namespace_prefix: mftf
/// crypto:
///   key: <base64, 32 bytes>
///   iv: <base64, 12 bytes>
/// backends:
///   - kind: aws
///     region: us-east-1
///     profile: default
///   - kind: file
///     path: .credentials
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecretsConfig {
    /// Forward debug diagnostics to the logger
    #[serde(default)]
    pub verbose: bool,

    /// First segment of backend secret identifiers
    #[serde(default = "default_namespace_prefix")]
    pub namespace_prefix: String,

    /// Cache key and IV; a random pair is generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypto: Option<CryptoSettings>,

    /// Backends in lookup order; more than one forms a chain
    #[serde(default)]
    pub backends: Vec<BackendConfig>,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            namespace_prefix: default_namespace_prefix(),
            crypto: None,
            backends: Vec::new(),
        }
    }
}

impl SecretsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend(mut self, backend: BackendConfig) -> Self {
        self.backends.push(backend);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_crypto(mut self, crypto: CryptoSettings) -> Self {
        self.crypto = Some(crypto);
        self
    }

    /// Apply `SECRETCACHE_*` environment overrides
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`:
    ///
    /// - `SECRETCACHE_VERBOSE` (`1`/`true`/`yes` enable, anything else disables)
    /// - `SECRETCACHE_NAMESPACE_PREFIX`
    /// - `SECRETCACHE_CRYPTO_KEY` + `SECRETCACHE_CRYPTO_IV` (both required)
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = lookup("SECRETCACHE_VERBOSE") {
            self.verbose = matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(prefix) = lookup("SECRETCACHE_NAMESPACE_PREFIX") {
            self.namespace_prefix = prefix;
        }
        if let (Some(key), Some(iv)) = (lookup("SECRETCACHE_CRYPTO_KEY"), lookup("SECRETCACHE_CRYPTO_IV")) {
            self.crypto = Some(CryptoSettings { key, iv });
        }
        self
    }

    /// Check the parts that can be checked without touching any backend
    pub fn validate(&self) -> ConfigResult<()> {
        if self.backends.is_empty() {
            return Err(ConfigError::Invalid("at least one backend must be configured".to_string()));
        }
        if let Some(b) = self.backends.iter().find(|b| b.kind.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!("backend without kind: {:?}", b.options)));
        }
        Ok(())
    }

    /// Crypto context from the configured key material, or a fresh one
    pub fn crypto_context(&self) -> ConfigResult<CryptoContext> {
        match &self.crypto {
            Some(settings) => CryptoContext::from_base64(&settings.key, &settings.iv)
                .map_err(|e| ConfigError::Invalid(e.to_string())),
            None => Ok(CryptoContext::generate()),
        }
    }
}

/// Base64-encoded cache key and IV
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoSettings {
    pub key: String,
    pub iv: String,
}

impl std::fmt::Debug for CryptoSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CryptoSettings { .. }")
    }
}

/// One backend entry: a `kind` plus kind-specific options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub kind: String,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl BackendConfig {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            options: Map::new(),
        }
    }

    /// Backend entry whose options are the serialized `settings`
    pub fn from_settings<T: Serialize>(kind: impl Into<String>, settings: &T) -> ConfigResult<Self> {
        match serde_json::to_value(settings)? {
            Value::Object(options) => Ok(Self {
                kind: kind.into(),
                options,
            }),
            other => Err(ConfigError::Invalid(format!(
                "backend settings must serialize to an object, got {}",
                other
            ))),
        }
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    /// Decode the options into a kind-specific settings type
    pub fn settings<T: DeserializeOwned>(&self) -> ConfigResult<T> {
        serde_json::from_value(Value::Object(self.options.clone())).map_err(|e| {
            ConfigError::Invalid(format!("invalid options for backend '{}': {}", self.kind, e))
        })
    }

    /// String option lookup
    pub fn option_str(&self, name: &str) -> Option<&str> {
        self.options.get(name).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::aws::AwsBackendSettings;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = SecretsConfig::default();
        assert!(!config.verbose);
        assert_eq!(config.namespace_prefix, "mftf");
        assert!(config.crypto.is_none());
        assert!(config.backends.is_empty());
    }

    #[test]
    fn test_yaml_round_trip_fields() {
        let yaml = r#"
verbose: true
crypto:
  key: QUFBQUFBQUFBQUFBQUFBQUFBQUFBQUFBQUFBQUFBQUE=
  iv: QkJCQkJCQkJCQkJC
backends:
  - kind: aws
    region: us-east-1
    profile: ci
  - kind: file
    path: .credentials
"#;
        let config: SecretsConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.verbose);
        assert_eq!(config.namespace_prefix, "mftf");
        assert_eq!(config.backends.len(), 2);
        assert_eq!(config.backends[1].option_str("path"), Some(".credentials"));

        let aws: AwsBackendSettings = config.backends[0].settings().unwrap();
        assert_eq!(aws, AwsBackendSettings::new("us-east-1").with_profile("ci"));

        assert!(config.crypto_context().is_ok());
    }

    #[test]
    fn test_from_settings() {
        let backend = BackendConfig::from_settings("aws", &AwsBackendSettings::new("eu-west-1")).unwrap();
        assert_eq!(backend.kind, "aws");
        assert_eq!(backend.option_str("region"), Some("eu-west-1"));
    }

    #[test]
    fn test_invalid_settings() {
        let backend = BackendConfig::new("aws").with_option("profile", "ci");
        let result: ConfigResult<AwsBackendSettings> = backend.settings();
        assert!(matches!(result, Err(ConfigError::Invalid(msg)) if msg.contains("aws")));
    }

    #[test]
    fn test_validate() {
        assert!(SecretsConfig::new().validate().is_err());
        assert!(SecretsConfig::new().with_backend(BackendConfig::new("")).validate().is_err());
        assert!(SecretsConfig::new().with_backend(BackendConfig::new("env")).validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SECRETCACHE_VERBOSE", "TRUE"),
            ("SECRETCACHE_NAMESPACE_PREFIX", "team"),
            ("SECRETCACHE_CRYPTO_KEY", "k"),
            ("SECRETCACHE_CRYPTO_IV", "i"),
        ]
        .into_iter()
        .collect();

        let config = SecretsConfig::new().apply_overrides(|name| vars.get(name).map(|v| v.to_string()));
        assert!(config.verbose);
        assert_eq!(config.namespace_prefix, "team");
        assert_eq!(
            config.crypto,
            Some(CryptoSettings {
                key: "k".to_string(),
                iv: "i".to_string()
            })
        );
    }

    #[test]
    fn test_partial_crypto_override_ignored() {
        let config = SecretsConfig::new()
            .apply_overrides(|name| (name == "SECRETCACHE_CRYPTO_KEY").then(|| "k".to_string()));
        assert!(config.crypto.is_none());
    }

    #[test]
    fn test_bad_crypto_material() {
        let config = SecretsConfig::new().with_crypto(CryptoSettings {
            key: "c2hvcnQ=".to_string(),
            iv: "c2hvcnQ=".to_string(),
        });
        assert!(matches!(config.crypto_context(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_crypto_settings_debug_redacted() {
        let settings = CryptoSettings {
            key: "secret-key".to_string(),
            iv: "secret-iv".to_string(),
        };
        assert!(!format!("{:?}", settings).contains("secret"));
    }
}
