//! Chained secret backend with fallback behavior

use std::sync::Arc;

use super::key::SecretKey;
use super::traits::{LookupFailure, LookupResult, SecretBackend, SecretsError, SecretsResult};

/// A backend that tries several backends in order
///
/// The first backend that yields a value wins. If every backend fails, the
/// failure from the last backend is returned.
///
/// # Example
///
/// ```
/// use secretcache_core::secrets::{ChainBackend, MemoryBackend, SecretBackend, SecretKey};
/// use std::sync::Arc;
///
/// let primary = Arc::new(MemoryBackend::new());
/// let fallback = Arc::new(MemoryBackend::new());
/// fallback.insert("vendor1/keyA", "from-fallback");
///
/// let chain = ChainBackend::new(vec![primary, fallback]).unwrap();
/// assert_eq!(chain.resolve(&SecretKey::new("vendor1", "keyA")).unwrap(), "from-fallback");
/// ```
pub struct ChainBackend {
    backends: Vec<Arc<dyn SecretBackend>>,
}

impl ChainBackend {
    /// Create a chain; at least one backend is required
    pub fn new(backends: Vec<Arc<dyn SecretBackend>>) -> SecretsResult<Self> {
        if backends.is_empty() {
            return Err(SecretsError::configuration("chain requires at least one backend"));
        }
        Ok(Self { backends })
    }

    /// Get the backends in this chain
    pub fn backends(&self) -> &[Arc<dyn SecretBackend>] {
        &self.backends
    }
}

impl SecretBackend for ChainBackend {
    fn name(&self) -> &str {
        "chain"
    }

    fn initialize(&self) -> SecretsResult<()> {
        for backend in &self.backends {
            backend.initialize()?;
        }
        Ok(())
    }

    fn resolve(&self, key: &SecretKey) -> LookupResult {
        let mut last_failure = LookupFailure::not_found(key.to_string());
        for backend in &self.backends {
            match backend.resolve(key) {
                Ok(value) => return Ok(value),
                Err(failure) => last_failure = failure,
            }
        }
        Err(last_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::MemoryBackend;

    struct BrokenBackend;

    impl SecretBackend for BrokenBackend {
        fn name(&self) -> &str {
            "broken"
        }

        fn initialize(&self) -> SecretsResult<()> {
            Err(SecretsError::configuration("no client"))
        }

        fn resolve(&self, key: &SecretKey) -> LookupResult {
            Err(LookupFailure::transient(key.to_string(), "unreachable"))
        }
    }

    #[test]
    fn test_empty_chain_rejected() {
        assert!(matches!(ChainBackend::new(vec![]), Err(SecretsError::Configuration(_))));
    }

    #[test]
    fn test_chain_order() {
        let first = Arc::new(MemoryBackend::new());
        let second = Arc::new(MemoryBackend::new());
        first.insert("v/k", "first");
        second.insert("v/k", "second");

        let chain = ChainBackend::new(vec![first.clone(), second.clone()]).unwrap();
        assert_eq!(chain.name(), "chain");
        assert_eq!(chain.backends().len(), 2);
        assert_eq!(chain.resolve(&SecretKey::new("v", "k")), Ok("first".to_string()));
        assert_eq!(second.lookups(), 0);
    }

    #[test]
    fn test_chain_reports_last_failure() {
        let memory = Arc::new(MemoryBackend::new());
        let chain = ChainBackend::new(vec![memory, Arc::new(BrokenBackend)]).unwrap();

        assert!(matches!(
            chain.resolve(&SecretKey::new("v", "k")),
            Err(LookupFailure::Transient { .. })
        ));
    }

    #[test]
    fn test_chain_initialize_propagates() {
        let chain = ChainBackend::new(vec![
            Arc::new(MemoryBackend::new()) as Arc<dyn SecretBackend>,
            Arc::new(BrokenBackend),
        ])
        .unwrap();
        assert!(matches!(chain.initialize(), Err(SecretsError::Configuration(_))));
    }
}
