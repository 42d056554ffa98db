//! In-memory secret backend

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;

use super::key::SecretKey;
use super::traits::{LookupFailure, LookupResult, SecretBackend};

/// In-memory backend for tests and embedding hosts
///
/// Secrets are keyed by `vendor/subkey`. Every `resolve` call is counted,
/// which lets tests assert how often the resolver reached the backend.
///
/// # Thread Safety
///
/// The backend uses `RwLock` internally and is safe to use from multiple threads.
///
/// # Example
///
/// ```
/// use secretcache_core::secrets::{MemoryBackend, SecretBackend, SecretKey};
///
/// let backend = MemoryBackend::new();
/// backend.insert("vendor1/keyA", "s3cret");
/// assert_eq!(backend.resolve(&SecretKey::new("vendor1", "keyA")), Ok("s3cret".to_string()));
/// assert_eq!(backend.lookups(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    secrets: RwLock<HashMap<String, String>>,
    lookups: AtomicUsize,
}

impl MemoryBackend {
    /// Create a new empty memory backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory backend with initial values keyed by `vendor/subkey`
    pub fn with_secrets(initial: HashMap<String, String>) -> Self {
        Self {
            secrets: RwLock::new(initial),
            lookups: AtomicUsize::new(0),
        }
    }

    /// Add or replace a secret; `key` is normalized like a caller key
    pub fn insert(&self, key: &str, value: &str) {
        let normalized = SecretKey::parse(key)
            .map(|k| k.to_string())
            .unwrap_or_else(|_| key.to_string());
        self.secrets.write().insert(normalized, value.to_string());
    }

    /// Remove a secret
    pub fn remove(&self, key: &str) -> Option<String> {
        self.secrets.write().remove(key)
    }

    /// Clear all secrets from the backend
    pub fn clear(&self) {
        self.secrets.write().clear();
    }

    /// Get the number of secrets in the backend
    pub fn len(&self) -> usize {
        self.secrets.read().len()
    }

    /// Check if the backend is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `resolve` calls made so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl SecretBackend for MemoryBackend {
    fn name(&self) -> &str {
        "memory"
    }

    fn resolve(&self, key: &SecretKey) -> LookupResult {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let id = key.to_string();
        self.secrets
            .read()
            .get(&id)
            .cloned()
            .ok_or_else(|| LookupFailure::not_found(id))
    }
}
