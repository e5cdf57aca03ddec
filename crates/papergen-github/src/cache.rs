//! In-memory TTL cache for repository snapshots

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

/// Default time-to-live for cached entries
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Cache entry with metadata
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    /// Measured on the monotonic clock
    fn is_valid(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < self.ttl
    }
}

/// Thread-safe key/value cache with per-entry expiry
///
/// Expired entries are dropped lazily on `get` or in bulk by `cleanup`.
/// There is no capacity bound.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    /// Create a cache with the given default TTL
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Default TTL applied by `set`
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Get a live value, removing it if it has expired
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(key) {
                Some(entry) if entry.is_valid(now) => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        tracing::debug!(key, "Cache entry expired");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        None
    }

    /// Store a value with the default TTL
    pub fn set(&self, key: impl Into<String>, value: V) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    /// Store a value with a custom TTL
    pub fn set_with_ttl(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let entry = CacheEntry {
            value,
            created_at: Instant::now(),
            ttl,
        };
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), entry);
    }

    /// Remove a single entry; returns whether it was present
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Drop all expired entries and return how many were removed
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| entry.is_valid(now));
        let removed = before - entries.len();
        if removed > 0 {
            tracing::debug!(removed, "Removed expired cache entries");
        }
        removed
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let cache = TtlCache::default();
        cache.set("github_repo:a", 42u32);
        assert_eq!(cache.get("github_repo:a"), Some(42));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_expired_entry_removed_on_read() {
        let cache = TtlCache::default();
        cache.set_with_ttl("k", "v".to_string(), Duration::ZERO);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("a", 1);
        cache.set("b", 2);
        assert!(cache.invalidate("a"));
        assert!(!cache.invalidate("a"));
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_cleanup_counts_expired() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.set("live", 1);
        cache.set_with_ttl("dead1", 2, Duration::ZERO);
        cache.set_with_ttl("dead2", 3, Duration::ZERO);
        assert_eq!(cache.cleanup(), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("live"), Some(1));
    }

    #[test]
    fn test_entry_validity_uses_elapsed_time() {
        let created_at = Instant::now();
        let entry = CacheEntry {
            value: 1,
            created_at,
            ttl: Duration::from_secs(10),
        };
        assert!(entry.is_valid(created_at));
        assert!(entry.is_valid(created_at + Duration::from_secs(9)));
        assert!(!entry.is_valid(created_at + Duration::from_secs(10)));
        assert!(!entry.is_valid(created_at + Duration::from_secs(3600)));
    }

    #[test]
    fn test_overwrite_resets_entry() {
        let cache = TtlCache::default();
        cache.set_with_ttl("k", 1, Duration::ZERO);
        cache.set("k", 2);
        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = std::sync::Arc::new(TtlCache::default());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || cache.set(format!("k{i}"), i))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 4);
    }
}
