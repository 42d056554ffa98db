//! Environment variable secret backend

use std::env;

use super::key::{SecretKey, DEFAULT_NAMESPACE_PREFIX};
use super::traits::{LookupFailure, LookupResult, SecretBackend};

/// Backend that reads secrets from environment variables
///
/// `vendor/subkey` maps to `{PREFIX}_{VENDOR}_{SUBKEY}`, uppercased, with
/// every character that is not ASCII alphanumeric replaced by `_`:
///
/// - `magento/tfa/OTP_SHARED_SECRET` → `MFTF_MAGENTO_TFA_OTP_SHARED_SECRET`
/// - `vendor1/api-key` → `MFTF_VENDOR1_API_KEY`
///
/// Empty variables count as absent.
#[derive(Debug, Clone)]
pub struct EnvBackend {
    prefix: String,
}

impl Default for EnvBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvBackend {
    /// Create a backend using the default `MFTF` prefix
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_NAMESPACE_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Environment variable consulted for `key`
    pub fn var_name(&self, key: &SecretKey) -> String {
        let raw = if self.prefix.is_empty() {
            format!("{}_{}", key.vendor(), key.subkey())
        } else {
            format!("{}_{}_{}", self.prefix, key.vendor(), key.subkey())
        };
        raw.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect()
    }
}

impl SecretBackend for EnvBackend {
    fn name(&self) -> &str {
        "env"
    }

    fn resolve(&self, key: &SecretKey) -> LookupResult {
        let var = self.var_name(key);
        match env::var(&var) {
            Ok(value) if !value.is_empty() => Ok(value),
            Ok(_) => Err(LookupFailure::not_found(var)),
            Err(env::VarError::NotPresent) => Err(LookupFailure::not_found(var)),
            Err(env::VarError::NotUnicode(_)) => {
                Err(LookupFailure::parse(var, "value is not valid unicode"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_var_name() {
        let backend = EnvBackend::new();
        assert_eq!(
            backend.var_name(&SecretKey::new("magento", "tfa/OTP_SHARED_SECRET")),
            "MFTF_MAGENTO_TFA_OTP_SHARED_SECRET"
        );
        assert_eq!(
            backend.var_name(&SecretKey::new("vendor1", "api-key")),
            "MFTF_VENDOR1_API_KEY"
        );

        let bare = EnvBackend::with_prefix("");
        assert_eq!(bare.var_name(&SecretKey::new("v", "k.x")), "V_K_X");
    }

    #[test]
    fn test_resolve_from_env() {
        let backend = EnvBackend::with_prefix("SECRETCACHE_ENVTEST");
        env::set_var("SECRETCACHE_ENVTEST_VENDOR1_KEYA", "from-env");
        env::set_var("SECRETCACHE_ENVTEST_VENDOR1_EMPTY", "");

        assert_eq!(backend.resolve(&SecretKey::new("vendor1", "keyA")), Ok("from-env".to_string()));
        assert!(matches!(
            backend.resolve(&SecretKey::new("vendor1", "empty")),
            Err(LookupFailure::NotFound { .. })
        ));
        assert!(matches!(
            backend.resolve(&SecretKey::new("vendor1", "unset")),
            Err(LookupFailure::NotFound { identifier, .. }) if identifier == "SECRETCACHE_ENVTEST_VENDOR1_UNSET"
        ));

        env::remove_var("SECRETCACHE_ENVTEST_VENDOR1_KEYA");
        env::remove_var("SECRETCACHE_ENVTEST_VENDOR1_EMPTY");
    }
}
