//! Write-once cache store

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// Mapping from subkey to encrypted value
///
/// Entries are never evicted or overwritten: the first `put` for a subkey
/// wins. The store is unbounded and lives as long as its owning context.
///
/// `with_key_lock` runs a read-check-then-write sequence for one key as a
/// critical section without blocking lookups of other keys. Per-key mutexes
/// only exist while someone is inside or waiting on that section.
///
/// # Example
///
/// ```
/// use secretcache_core::cache::CacheStore;
///
/// let cache = CacheStore::new();
/// cache.put("keyA", "ciphertext-1");
/// cache.put("keyA", "ciphertext-2");
/// assert_eq!(cache.get("keyA"), Some("ciphertext-1".to_string()));
/// ```
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: Mutex<HashMap<String, String>>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encrypted value for `subkey`, if cached
    pub fn get(&self, subkey: &str) -> Option<String> {
        self.entries.lock().get(subkey).cloned()
    }

    /// Store `encrypted` under `subkey` unless an entry already exists
    ///
    /// Returns `true` if this call populated the entry.
    pub fn put(&self, subkey: &str, encrypted: impl Into<String>) -> bool {
        let mut entries = self.entries.lock();
        if entries.contains_key(subkey) {
            return false;
        }
        entries.insert(subkey.to_string(), encrypted.into());
        true
    }

    pub fn contains(&self, subkey: &str) -> bool {
        self.entries.lock().contains_key(subkey)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` while holding the mutex for `subkey`
    ///
    /// Concurrent callers for the same subkey run one after another, so a
    /// check-backend-write sequence inside `f` makes a single backend call.
    /// The mutex is dropped from the lock map once the last holder leaves.
    pub fn with_key_lock<R>(&self, subkey: &str, f: impl FnOnce() -> R) -> R {
        let lock = self
            .locks
            .lock()
            .entry(subkey.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = {
            let _guard = lock.lock();
            f()
        };

        let mut locks = self.locks.lock();
        drop(lock);
        if locks.get(subkey).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(subkey);
        }
        result
    }

    /// Number of subkeys with a critical section in progress
    pub fn active_locks(&self) -> usize {
        self.locks.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_get_put() {
        let cache = CacheStore::new();
        assert!(cache.is_empty());
        assert_eq!(cache.get("keyA"), None);

        assert!(cache.put("keyA", "enc-a"));
        assert_eq!(cache.get("keyA"), Some("enc-a".to_string()));
        assert!(cache.contains("keyA"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_first_write_wins() {
        let cache = CacheStore::new();
        assert!(cache.put("keyA", "first"));
        assert!(!cache.put("keyA", "second"));
        assert_eq!(cache.get("keyA"), Some("first".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_key_lock_released_after_section() {
        let cache = CacheStore::new();
        let inside = cache.with_key_lock("keyA", || cache.active_locks());
        assert_eq!(inside, 1);
        assert_eq!(cache.active_locks(), 0);

        let nested = cache.with_key_lock("keyA", || cache.with_key_lock("keyB", || cache.active_locks()));
        assert_eq!(nested, 2);
        assert_eq!(cache.active_locks(), 0);
    }

    #[test]
    fn test_key_lock_serializes_populate() {
        let cache = Arc::new(CacheStore::new());
        let populated = Arc::new(AtomicUsize::new(0));
        let mut handles = vec![];

        for i in 0..8 {
            let cache = Arc::clone(&cache);
            let populated = Arc::clone(&populated);
            handles.push(thread::spawn(move || {
                cache.with_key_lock("shared", || {
                    if cache.get("shared").is_none() {
                        populated.fetch_add(1, Ordering::SeqCst);
                        cache.put("shared", format!("value-{}", i));
                    }
                });
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(populated.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.active_locks(), 0);
    }
}
