//! System keychain secret backend
//!
//! Uses the OS keychain:
//! - macOS: Keychain
//! - Windows: Credential Manager
//! - Linux: Secret Service (GNOME Keyring, KWallet)

use keyring::Entry;

use super::key::{SecretKey, DEFAULT_NAMESPACE_PREFIX};
use super::traits::{LookupFailure, LookupResult, SecretBackend, SecretsError, SecretsResult};
use crate::log_debug;
use crate::logging::Diagnostics;

const COMPONENT: &str = "KeychainBackend";

/// Secret backend reading from the system keychain
///
/// Entries are addressed by service name (default `mftf`) and account
/// `vendor/subkey`; the stored password is the plaintext secret.
///
/// # Example
///
/// ```no_run
/// use secretcache_core::logging::Diagnostics;
/// use secretcache_core::secrets::{KeychainBackend, SecretBackend, SecretKey};
///
/// let backend = KeychainBackend::new(Diagnostics::silent());
/// let value = backend.resolve(&SecretKey::new("vendor1", "keyA"));
/// ```
pub struct KeychainBackend {
    service_name: String,
    diagnostics: Diagnostics,
}

impl KeychainBackend {
    /// Create a keychain backend with the default service name
    pub fn new(diagnostics: Diagnostics) -> Self {
        Self::with_service(DEFAULT_NAMESPACE_PREFIX, diagnostics)
    }

    pub fn with_service(service: impl Into<String>, diagnostics: Diagnostics) -> Self {
        Self {
            service_name: service.into(),
            diagnostics,
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    fn entry(&self, account: &str) -> Result<Entry, keyring::Error> {
        Entry::new(&self.service_name, account)
    }
}

impl std::fmt::Debug for KeychainBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeychainBackend")
            .field("service_name", &self.service_name)
            .finish()
    }
}

impl SecretBackend for KeychainBackend {
    fn name(&self) -> &str {
        "keychain"
    }

    fn initialize(&self) -> SecretsResult<()> {
        // Fails on headless hosts without a keychain daemon
        self.entry("__secretcache_availability_check__")
            .map(|_| ())
            .map_err(|e| SecretsError::configuration(format!("keychain unavailable: {}", e)))
    }

    fn resolve(&self, key: &SecretKey) -> LookupResult {
        let account = key.to_string();
        let identifier = format!("{}:{}", self.service_name, account);

        let entry = self.entry(&account).map_err(|e| {
            log_debug!(self.diagnostics, COMPONENT, "entry {} unavailable: {}", identifier, e);
            LookupFailure::transient(identifier.clone(), e.to_string())
        })?;

        match entry.get_password() {
            Ok(value) => Ok(value),
            Err(keyring::Error::NoEntry) => {
                log_debug!(self.diagnostics, COMPONENT, "no keychain entry for {}", identifier);
                Err(LookupFailure::not_found(identifier))
            }
            Err(keyring::Error::BadEncoding(_)) => {
                Err(LookupFailure::parse(identifier, "stored value is not valid UTF-8"))
            }
            Err(e) => {
                log_debug!(self.diagnostics, COMPONENT, "keychain lookup for {} failed: {}", identifier, e);
                Err(LookupFailure::transient(identifier, e.to_string()))
            }
        }
    }
}
