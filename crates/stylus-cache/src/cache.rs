//! Moka-backed analysis cache with hit/miss accounting

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use moka::sync::Cache;
use xxhash_rust::xxh3::xxh3_64;

use crate::CacheConfig;

/// Stable 64-bit hash of a text, used as the content part of cache keys
pub fn content_hash(text: &str) -> u64 {
    xxh3_64(text.as_bytes())
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that had to be computed
    pub misses: u64,
    /// Entries currently held
    pub entries: u64,
}

impl CacheStats {
    /// Fraction of lookups served from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// One-line report
    pub fn summary(&self) -> String {
        format!(
            "{} entries, {} hits, {} misses ({:.1}% hit rate)",
            self.entries,
            self.hits,
            self.misses,
            self.hit_rate() * 100.0
        )
    }
}

/// Bounded memoization cache owned by a single analyzer instance
pub struct AnalysisCache<K, V> {
    inner: Cache<K, V>,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K, V> AnalysisCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache from configuration
    pub fn new(config: &CacheConfig) -> Self {
        let mut builder = Cache::builder().max_capacity(config.max_capacity);
        if let Some(ttl) = config.time_to_live() {
            builder = builder.time_to_live(ttl);
        }
        Self {
            inner: builder.build(),
            enabled: config.enabled,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a value, counting the hit or miss
    pub fn get(&self, key: &K) -> Option<V> {
        if !self.enabled {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }
        match self.inner.get(key) {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a value
    pub fn insert(&self, key: K, value: V) {
        if self.enabled {
            self.inner.insert(key, value);
        }
    }

    /// Return the cached value, or compute and store it
    ///
    /// The boolean is `true` when the value came from the cache.
    pub fn get_or_insert_with(&self, key: K, compute: impl FnOnce() -> V) -> (V, bool) {
        if let Some(value) = self.get(&key) {
            return (value, true);
        }
        let value = compute();
        self.insert(key, value.clone());
        (value, false)
    }

    /// Drop every entry (counters are kept)
    pub fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks();
    }

    /// Reset hit/miss counters
    pub fn reset_stats(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Current counters
    pub fn stats(&self) -> CacheStats {
        self.inner.run_pending_tasks();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.inner.entry_count(),
        }
    }
}

impl<K, V> Default for AnalysisCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(&CacheConfig::default())
    }
}

impl<K, V> std::fmt::Debug for AnalysisCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisCache")
            .field("enabled", &self.enabled)
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_and_miss_counting() {
        let cache: AnalysisCache<u64, String> = AnalysisCache::default();
        assert_eq!(cache.get(&1), None);
        cache.insert(1, "one".to_string());
        assert_eq!(cache.get(&1), Some("one".to_string()));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_rate() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_get_or_insert_with_computes_once() {
        let cache: AnalysisCache<u64, u32> = AnalysisCache::default();
        let mut calls = 0;
        let (first, hit1) = cache.get_or_insert_with(9, || {
            calls += 1;
            42
        });
        let (second, hit2) = cache.get_or_insert_with(9, || {
            calls += 1;
            0
        });
        assert_eq!((first, hit1), (42, false));
        assert_eq!((second, hit2), (42, true));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_clear() {
        let cache: AnalysisCache<u64, u32> = AnalysisCache::default();
        cache.insert(1, 1);
        cache.insert(2, 2);
        cache.clear();
        assert_eq!(cache.stats().entries, 0);
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn test_disabled_cache_never_hits() {
        let cache: AnalysisCache<u64, u32> = AnalysisCache::new(&CacheConfig::disabled());
        cache.insert(1, 1);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.stats().hits, 0);
    }

    #[test]
    fn test_content_hash_stable() {
        assert_eq!(content_hash("same text"), content_hash("same text"));
        assert_ne!(content_hash("same text"), content_hash("other text"));
    }

    #[test]
    fn test_summary() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            entries: 2,
        };
        assert_eq!(stats.summary(), "2 entries, 3 hits, 1 misses (75.0% hit rate)");
    }
}
