//! Ephemeral resolution cache
//!
//! Process-local mapping from request path to resolved destination URL, used
//! to short-circuit repeated resolution. Bounded LRU: long-running processes
//! must not grow memory proportional to distinct request paths. The cache is
//! constructed once at startup and shared by handle; it is never populated by
//! a failed resolution.

use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};

use lru::LruCache;

/// Bounded in-memory mapping `request path -> destination URL`
///
/// Entries have no TTL; lifetime is bounded by process lifetime and by LRU
/// eviction at capacity. The mapping is write-idempotent (re-resolving a path
/// always produces the same URL), so a multi-instance deployment with
/// per-instance caches stays coherent in effect: the durable store is the
/// source of truth.
pub struct ResolutionCache {
    entries: Mutex<LruCache<String, String>>,
}

impl ResolutionCache {
    /// Create a cache holding at most `capacity` entries
    ///
    /// A capacity of zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up the destination URL for `path`, marking the entry recently used
    pub fn get(&self, path: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .cloned()
    }

    /// Record the resolved destination URL for `path`
    ///
    /// Last writer wins; concurrent writers racing on the same path store the
    /// same value.
    pub fn put(&self, path: &str, destination_url: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(path.to_string(), destination_url.to_string());
    }

    /// Number of entries currently cached
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_then_hit() {
        let cache = ResolutionCache::new(16);

        assert_eq!(cache.get("/img/photo.jpg"), None);

        cache.put("/img/photo.jpg", "https://cdn/img/photo.webp");
        assert_eq!(
            cache.get("/img/photo.jpg"),
            Some("https://cdn/img/photo.webp".to_string())
        );
    }

    #[test]
    fn test_put_is_idempotent() {
        let cache = ResolutionCache::new(16);

        cache.put("/a.jpg", "https://cdn/a.webp");
        cache.put("/a.jpg", "https://cdn/a.webp");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("/a.jpg"), Some("https://cdn/a.webp".to_string()));
    }

    #[test]
    fn test_least_recently_used_entry_is_evicted() {
        let cache = ResolutionCache::new(2);

        cache.put("/a.jpg", "https://cdn/a.webp");
        cache.put("/b.jpg", "https://cdn/b.webp");

        // Touch /a.jpg so /b.jpg becomes the eviction candidate
        assert!(cache.get("/a.jpg").is_some());

        cache.put("/c.jpg", "https://cdn/c.webp");

        assert_eq!(cache.len(), 2);
        assert!(cache.get("/a.jpg").is_some());
        assert!(cache.get("/b.jpg").is_none());
        assert!(cache.get("/c.jpg").is_some());
    }

    #[test]
    fn test_zero_capacity_clamped_to_one() {
        let cache = ResolutionCache::new(0);

        cache.put("/a.jpg", "https://cdn/a.webp");
        assert_eq!(cache.len(), 1);
    }
}
