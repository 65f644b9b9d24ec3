//! In-memory share cache.
//!
//! Maps share keys to generated image references so a shared link resolves
//! without a fresh generation. Bounded; the oldest key is evicted first.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use emojiart_core::GeneratedImage;

/// Default number of cached share keys.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<String, GeneratedImage>,
    order: VecDeque<String>,
}

/// Thread-safe share cache.
///
/// Cloning is cheap; clones share the same entries.
#[derive(Debug, Clone)]
pub struct ShareCache {
    inner: Arc<RwLock<CacheInner>>,
    capacity: usize,
}

impl Default for ShareCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl ShareCache {
    /// Create a cache holding at most `capacity` keys (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CacheInner::default())),
            capacity: capacity.max(1),
        }
    }

    /// Maximum number of keys.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store `image` under `key`, replacing any previous image.
    ///
    /// Returns `true` if the key was new.
    pub fn insert(&self, key: impl Into<String>, image: GeneratedImage) -> bool {
        let key = key.into();
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if let Some(existing) = inner.entries.get_mut(&key) {
            *existing = image;
            return false;
        }

        while inner.order.len() >= self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
            tracing::debug!("Evicted share key from cache");
        }
        inner.order.push_back(key.clone());
        inner.entries.insert(key, image);
        true
    }

    /// Look up the image for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<GeneratedImage> {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .entries
            .get(key)
            .cloned()
    }

    /// Number of cached keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .entries
            .len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(s: &str) -> GeneratedImage {
        GeneratedImage::new(s)
    }

    #[test]
    fn test_insert_and_get() {
        let cache = ShareCache::new(4);
        assert!(cache.insert("k1", image("a.png")));
        assert_eq!(cache.get("k1"), Some(image("a.png")));
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let cache = ShareCache::new(4);
        cache.insert("k1", image("a.png"));
        assert!(!cache.insert("k1", image("b.png")));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k1"), Some(image("b.png")));
    }

    #[test]
    fn test_evicts_oldest_first() {
        let cache = ShareCache::new(2);
        cache.insert("k1", image("1"));
        cache.insert("k2", image("2"));
        cache.insert("k3", image("3"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("k1").is_none());
        assert!(cache.get("k2").is_some());
        assert!(cache.get("k3").is_some());
    }

    #[test]
    fn test_zero_capacity_still_holds_one() {
        let cache = ShareCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.insert("k1", image("1"));
        cache.insert("k2", image("2"));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("k2").is_some());
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = ShareCache::default();
        let clone = cache.clone();
        clone.insert("k", image("x"));
        assert_eq!(cache.get("k"), Some(image("x")));
        assert!(!cache.is_empty());
    }
}
