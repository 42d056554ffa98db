//! Cache-first secret resolution
//!
//! Lookup flow for one raw key:
//! 1. Parse `vendor/subkey` (malformed keys resolve to `None`)
//! 2. Serve from the encrypted cache when the subkey is present
//! 3. Otherwise ask the backend, cache a successful value, return it

use std::sync::Arc;

use super::context::SecretContext;
use crate::config::{ConfigProvider, SecretsConfig};
use crate::crypto::{decrypt, encrypt};
use crate::log_debug;
use crate::logging::{Diagnostics, SharedLogger};
use crate::secrets::{create_backends, FactoryContext, SecretBackend, SecretKey, SecretsResult};

const COMPONENT: &str = "SecretResolver";

const CREDS_OPEN: &str = "{{_CREDS.";
const CREDS_CLOSE: &str = "}}";

/// Resolver facade over one backend and a shared [`SecretContext`]
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use secretcache_core::crypto::CryptoContext;
/// use secretcache_core::logging::Diagnostics;
/// use secretcache_core::resolver::{SecretContext, SecretResolver};
/// use secretcache_core::secrets::MemoryBackend;
///
/// let backend = Arc::new(MemoryBackend::new());
/// backend.insert("vendor1/keyA", "s3cret");
///
/// let context = Arc::new(SecretContext::new(CryptoContext::generate(), Diagnostics::silent()));
/// let resolver = SecretResolver::new(context, backend.clone()).unwrap();
///
/// assert_eq!(resolver.get_secret_value("vendor1/keyA").unwrap().as_deref(), Some("s3cret"));
/// assert_eq!(resolver.get_secret_value("vendor1/keyA").unwrap().as_deref(), Some("s3cret"));
/// assert_eq!(backend.lookups(), 1);
/// ```
pub struct SecretResolver {
    context: Arc<SecretContext>,
    backend: Arc<dyn SecretBackend>,
}

impl SecretResolver {
    /// Create a resolver; fails if the backend cannot be initialized
    pub fn new(context: Arc<SecretContext>, backend: Arc<dyn SecretBackend>) -> SecretsResult<Self> {
        backend.initialize()?;
        log_debug!(
            context.diagnostics(),
            COMPONENT,
            "using backend '{}'",
            backend.name()
        );
        Ok(Self { context, backend })
    }

    /// Build context and backend from configuration
    pub fn from_config(config: &SecretsConfig, logger: SharedLogger) -> SecretsResult<Self> {
        config.validate()?;
        let diagnostics = Diagnostics::new(logger, config.verbose);
        let crypto = config.crypto_context()?;
        let factory_ctx = FactoryContext::new(config.namespace_prefix.clone(), diagnostics.clone());
        let backend = create_backends(&config.backends, &factory_ctx)?;
        let context = Arc::new(SecretContext::new(crypto, diagnostics));
        Self::new(context, backend)
    }

    /// Load configuration from `provider`, apply environment overrides, then build
    pub fn from_provider(provider: &dyn ConfigProvider, logger: SharedLogger) -> SecretsResult<Self> {
        let config = provider.load()?.apply_env();
        Self::from_config(&config, logger)
    }

    pub fn context(&self) -> &Arc<SecretContext> {
        &self.context
    }

    pub fn backend(&self) -> &Arc<dyn SecretBackend> {
        &self.backend
    }

    /// Resolve `raw_key` (`vendor/subkey`) to its plaintext value
    ///
    /// Returns `Ok(None)` for malformed keys and for every lookup failure;
    /// failures are not cached. `Err` means the cache itself is unusable.
    pub fn get_secret_value(&self, raw_key: &str) -> SecretsResult<Option<String>> {
        let diagnostics = self.context.diagnostics();

        let key = match SecretKey::parse(raw_key) {
            Ok(key) => key,
            Err(failure) => {
                log_debug!(diagnostics, COMPONENT, "{}", failure);
                return Ok(None);
            }
        };

        if let Some(value) = self.cached(&key)? {
            return Ok(Some(value));
        }

        self.context
            .cache()
            .with_key_lock(key.subkey(), || self.resolve_uncached(&key))
    }

    fn resolve_uncached(&self, key: &SecretKey) -> SecretsResult<Option<String>> {
        let diagnostics = self.context.diagnostics();

        // Another caller may have filled the entry while we waited
        if let Some(value) = self.cached(key)? {
            return Ok(Some(value));
        }

        match self.backend.resolve(key) {
            Ok(value) => {
                let ciphertext = encrypt(&value, self.context.crypto())?;
                self.context.cache().put(key.subkey(), ciphertext);
                log_debug!(
                    diagnostics,
                    COMPONENT,
                    "resolved {} via '{}'",
                    key,
                    self.backend.name()
                );
                Ok(Some(value))
            }
            Err(failure) => {
                log_debug!(diagnostics, COMPONENT, "{}", failure);
                Ok(None)
            }
        }
    }

    /// Replace every `{{_CREDS.vendor/key}}` reference in `text`
    ///
    /// References that do not resolve are left as written.
    pub fn interpolate(&self, text: &str) -> SecretsResult<String> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(CREDS_OPEN) {
            let body_start = start + CREDS_OPEN.len();
            let Some(len) = rest[body_start..].find(CREDS_CLOSE) else {
                break;
            };
            let body = &rest[body_start..body_start + len];

            // An opener without its own closer is literal text
            if let Some(inner) = body.find(CREDS_OPEN) {
                out.push_str(&rest[..body_start + inner]);
                rest = &rest[body_start + inner..];
                continue;
            }

            let end = body_start + len + CREDS_CLOSE.len();
            out.push_str(&rest[..start]);
            match self.get_secret_value(body)? {
                Some(value) => out.push_str(&value),
                None => out.push_str(&rest[start..end]),
            }
            rest = &rest[end..];
        }

        out.push_str(rest);
        Ok(out)
    }

    fn cached(&self, key: &SecretKey) -> SecretsResult<Option<String>> {
        match self.context.cache().get(key.subkey()) {
            Some(ciphertext) => {
                let value = decrypt(&ciphertext, self.context.crypto())?;
                log_debug!(self.context.diagnostics(), COMPONENT, "cache hit for {}", key);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

impl std::fmt::Debug for SecretResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretResolver")
            .field("context", &self.context)
            .field("backend", &self.backend.name())
            .finish()
    }
}
