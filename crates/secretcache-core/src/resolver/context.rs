//! Shared resolution state

use crate::cache::CacheStore;
use crate::crypto::CryptoContext;
use crate::logging::Diagnostics;

/// Everything a resolver shares across lookups: the encrypted cache, the key
/// material protecting it, and diagnostics
///
/// One context lives for the whole process (or test). It is passed in
/// explicitly; there is no global instance.
pub struct SecretContext {
    cache: CacheStore,
    crypto: CryptoContext,
    diagnostics: Diagnostics,
}

impl SecretContext {
    pub fn new(crypto: CryptoContext, diagnostics: Diagnostics) -> Self {
        Self {
            cache: CacheStore::new(),
            crypto,
            diagnostics,
        }
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn crypto(&self) -> &CryptoContext {
        &self.crypto
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

impl std::fmt::Debug for SecretContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretContext")
            .field("cached", &self.cache.len())
            .field("diagnostics", &self.diagnostics)
            .finish_non_exhaustive()
    }
}
