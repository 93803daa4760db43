//! Stylus Cache
//!
//! Bounded memoization for the evidence layers.
//!
//! Every analyzer owns one [`AnalysisCache`]; nothing is process-global.
//! Entries are evicted by size (TinyLFU admission, LRU eviction) and
//! optionally by age, and `clear()` drops everything explicitly.
//!
//! # Examples
//!
//! ```
//! use stylus_cache::{AnalysisCache, CacheConfig};
//!
//! let cache: AnalysisCache<u64, f64> = AnalysisCache::new(&CacheConfig::default());
//! let (value, hit) = cache.get_or_insert_with(7, || 0.25);
//! assert_eq!((value, hit), (0.25, false));
//! let (_, hit) = cache.get_or_insert_with(7, || unreachable!());
//! assert!(hit);
//! assert_eq!(cache.stats().hits, 1);
//! ```

#![warn(missing_docs)]

mod cache;
mod config;

pub use cache::{content_hash, AnalysisCache, CacheStats};
pub use config::CacheConfig;
