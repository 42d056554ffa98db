//! Core traits and types for secret backends

use thiserror::Error;

use super::key::SecretKey;
use crate::config::ConfigError;
use crate::crypto::CryptoError;

/// Fatal errors: the backend (or the cache context) is unusable as a whole
#[derive(Error, Debug)]
pub enum SecretsError {
    /// The backend client cannot be constructed
    #[error("Backend configuration error: {0}")]
    Configuration(String),

    #[error("Unknown backend kind: {0}")]
    UnknownBackend(String),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl SecretsError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

pub type SecretsResult<T> = Result<T, SecretsError>;

/// Non-fatal lookup failures
///
/// None of these are cached and all of them surface to callers as a missing
/// value, so a later call re-attempts the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    /// Key has no `vendor/` namespace
    #[error("Malformed secret key '{0}': expected 'vendor/key'")]
    MalformedKey(String),

    /// Backend confirmed the secret is absent or access was denied
    #[error("Secret not found: {identifier} ({})", .code.as_deref().unwrap_or("no error code"))]
    NotFound {
        identifier: String,
        code: Option<String>,
    },

    /// Backend answered but the payload is not shaped as expected
    #[error("Unexpected secret payload for {identifier}: {reason}")]
    Parse { identifier: String, reason: String },

    /// Anything else that went wrong during the remote call
    #[error("Secret lookup for {identifier} failed: {reason}")]
    Transient { identifier: String, reason: String },
}

impl LookupFailure {
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
            code: None,
        }
    }

    pub fn parse(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    pub fn transient(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transient {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }
}

pub type LookupResult = Result<String, LookupFailure>;

/// Contract every secret backend satisfies
///
/// Implementations:
/// - `AwsSecretsManagerBackend`: cloud secret manager (reference backend)
/// - `FileBackend`: `.credentials` file
/// - `EnvBackend`: environment variables
/// - `KeychainBackend`: system keychain
/// - `MemoryBackend`: in-memory, for tests and embedding
/// - `ChainBackend`: ordered fallback over other backends
///
/// # Example
///
/// ```
/// use secretcache_core::secrets::{MemoryBackend, SecretBackend, SecretKey};
///
/// let backend = MemoryBackend::new();
/// backend.insert("vendor1/keyA", "s3cret");
///
/// let key = SecretKey::parse("vendor1/keyA").unwrap();
/// assert_eq!(backend.resolve(&key).unwrap(), "s3cret");
/// ```
pub trait SecretBackend: Send + Sync {
    /// Human-readable name of this backend
    fn name(&self) -> &str;

    /// Construct any client handle the backend needs
    ///
    /// Idempotent: once a handle exists further calls are no-ops. An error
    /// here means the backend as a whole is unusable.
    fn initialize(&self) -> SecretsResult<()> {
        Ok(())
    }

    /// Look up the plaintext value for an already-namespaced key
    ///
    /// Every per-key failure is reported as a `LookupFailure`; nothing here
    /// may panic or abort the caller.
    fn resolve(&self, key: &SecretKey) -> LookupResult;
}
