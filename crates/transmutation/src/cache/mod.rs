//! Content-addressed conversion cache.
//!
//! Results are keyed by `"{format}:{sha256(content)}"`, so identical bytes
//! converted as the same format always share an entry regardless of the file
//! name they came from.
//!
//! Eviction is LRU over reads: [`ConversionCache::get`] promotes an entry and
//! inserting a new key at capacity drops the entry that has gone longest
//! without a read. Entries older than the configured max age are treated as
//! absent and are removed lazily on access or by
//! [`ConversionCache::clear_expired`].
//!
//! The cache itself is not synchronized. The [`Converter`](crate::Converter)
//! keeps it behind a mutex and never holds the lock across an `.await`.

use crate::core::config::ConverterConfig;
use crate::types::{ConversionResult, FormatTag};
use crate::{Result, TransmutationError};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// Snapshot of cache occupancy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub size: usize,
    pub max_size: usize,
    /// Sum of all entries' hit counters divided by `size` (0 when empty).
    ///
    /// This is hits per resident entry, not hits per lookup; use
    /// [`MetricsSummary::cache_hit_rate`](crate::metrics::MetricsSummary) for
    /// the lookup ratio.
    pub hit_rate: f64,
    pub total_hits: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    result: ConversionResult,
    created: Instant,
    hits: u64,
}

/// Build the cache key for `content` converted as `format`.
pub fn cache_key(content: &[u8], format: FormatTag) -> String {
    let digest = Sha256::digest(content);
    format!("{}:{}", format.as_str(), hex::encode(digest))
}

/// LRU + TTL store of conversion results.
pub struct ConversionCache {
    entries: LruCache<String, CacheEntry>,
    max_age: Duration,
}

impl ConversionCache {
    /// Create a cache holding at most `capacity` results for at most `max_age`.
    ///
    /// # Errors
    ///
    /// Returns `TransmutationError::Config` when `capacity` is zero.
    pub fn new(capacity: usize, max_age: Duration) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| TransmutationError::config("cache_size must be at least 1"))?;

        Ok(Self {
            entries: LruCache::new(capacity),
            max_age,
        })
    }

    /// Create a cache sized by `config`, validating its cache settings.
    pub fn from_config(config: &ConverterConfig) -> Result<Self> {
        crate::validation::validate_cache_config(config)?;
        Self::new(config.cache_size, config.cache_max_age())
    }

    /// Look up a previous result.
    ///
    /// Expired entries are removed and reported as absent without touching
    /// their hit counter. Live entries are promoted to most-recently-used.
    pub fn get(&mut self, content: &[u8], format: FormatTag) -> Option<ConversionResult> {
        self.get_at(&cache_key(content, format), Instant::now())
    }

    /// Same as [`Self::get`]; counts as an access.
    pub fn has(&mut self, content: &[u8], format: FormatTag) -> bool {
        self.get(content, format).is_some()
    }

    /// Store a result.
    ///
    /// A new key at capacity evicts exactly the least-recently-used entry.
    /// An existing key is replaced, becomes most-recently-used, and its hit
    /// counter restarts at zero.
    pub fn set(&mut self, content: &[u8], format: FormatTag, result: ConversionResult) {
        self.set_at(cache_key(content, format), result, Instant::now());
    }

    /// Look up by precomputed key.
    pub(crate) fn get_by_key(&mut self, key: &str) -> Option<ConversionResult> {
        self.get_at(key, Instant::now())
    }

    /// Store by precomputed key.
    pub(crate) fn set_by_key(&mut self, key: String, result: ConversionResult) {
        self.set_at(key, result, Instant::now());
    }

    fn get_at(&mut self, key: &str, now: Instant) -> Option<ConversionResult> {
        let expired = self.entries.peek(key).map(|entry| self.is_expired(entry, now))?;

        if expired {
            self.entries.pop(key);
            tracing::debug!(key, "Cache entry expired");
            return None;
        }

        let entry = self.entries.get_mut(key)?;
        entry.hits += 1;
        Some(entry.result.clone())
    }

    fn set_at(&mut self, key: String, result: ConversionResult, now: Instant) {
        let entry = CacheEntry {
            result,
            created: now,
            hits: 0,
        };

        let replacing = self.entries.contains(&key);
        if let Some((evicted, _)) = self.entries.push(key, entry)
            && !replacing
        {
            tracing::debug!(key = %evicted, "Evicted least recently used cache entry");
        }
    }

    fn is_expired(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.created) > self.max_age
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Remove every expired entry and return how many were removed.
    pub fn clear_expired(&mut self) -> usize {
        self.clear_expired_at(Instant::now())
    }

    fn clear_expired_at(&mut self, now: Instant) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| self.is_expired(entry, now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.pop(key);
        }

        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn stats(&self) -> CacheStats {
        let total_hits: u64 = self.entries.iter().map(|(_, entry)| entry.hits).sum();
        let size = self.entries.len();
        let hit_rate = if size > 0 { total_hits as f64 / size as f64 } else { 0.0 };

        CacheStats {
            size,
            max_size: self.capacity(),
            hit_rate,
            total_hits,
        }
    }

    /// Approximate resident size in bytes: Markdown as UTF-16 plus the
    /// metadata's JSON length. Not used for eviction.
    pub fn memory_usage(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, entry)| {
                let text = entry.result.markdown.encode_utf16().count() * 2;
                let metadata = serde_json::to_string(&entry.result.metadata)
                    .map(|json| json.len())
                    .unwrap_or(0);
                text + metadata
            })
            .sum()
    }
}

impl std::fmt::Debug for ConversionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionCache")
            .field("size", &self.entries.len())
            .field("capacity", &self.capacity())
            .field("max_age", &self.max_age)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentMetadata;

    fn result(markdown: &str) -> ConversionResult {
        ConversionResult {
            markdown: markdown.to_string(),
            metadata: DocumentMetadata::new(FormatTag::Txt, markdown.len()),
            conversion_time: Duration::from_millis(1),
            warnings: Vec::new(),
        }
    }

    fn cache(capacity: usize) -> ConversionCache {
        ConversionCache::new(capacity, Duration::from_secs(60)).unwrap()
    }

    #[test]
    fn test_cache_key_format() {
        let key = cache_key(b"hello", FormatTag::Txt);
        assert_eq!(
            key,
            "txt:2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_ne!(key, cache_key(b"hello", FormatTag::Html));
        assert_eq!(key, cache_key(b"hello", FormatTag::Txt));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = ConversionCache::new(0, Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, TransmutationError::Config { .. }));
    }

    #[test]
    fn test_get_miss_then_hit() {
        let mut cache = cache(4);
        assert!(cache.get(b"a", FormatTag::Txt).is_none());

        cache.set(b"a", FormatTag::Txt, result("A"));
        assert_eq!(cache.get(b"a", FormatTag::Txt).unwrap().markdown, "A");
        assert!(cache.get(b"a", FormatTag::Pdf).is_none());

        let stats = cache.stats();
        assert_eq!(stats.size, 1);
        assert_eq!(stats.total_hits, 1);
    }

    #[test]
    fn test_lru_eviction_order() {
        let mut cache = cache(2);
        cache.set(b"A", FormatTag::Txt, result("A"));
        cache.set(b"B", FormatTag::Txt, result("B"));
        cache.set(b"C", FormatTag::Txt, result("C"));

        assert_eq!(cache.len(), 2);
        assert!(cache.entries.peek(&cache_key(b"A", FormatTag::Txt)).is_none());
        assert!(cache.entries.peek(&cache_key(b"B", FormatTag::Txt)).is_some());
        assert!(cache.entries.peek(&cache_key(b"C", FormatTag::Txt)).is_some());

        cache.set(b"A", FormatTag::Txt, result("A"));
        assert_eq!(cache.len(), 2);
        assert!(cache.entries.peek(&cache_key(b"B", FormatTag::Txt)).is_none());
        assert!(cache.entries.peek(&cache_key(b"C", FormatTag::Txt)).is_some());
        assert!(cache.entries.peek(&cache_key(b"A", FormatTag::Txt)).is_some());
    }

    #[test]
    fn test_get_promotes_entry() {
        let mut cache = cache(2);
        cache.set(b"A", FormatTag::Txt, result("A"));
        cache.set(b"B", FormatTag::Txt, result("B"));

        assert!(cache.get(b"A", FormatTag::Txt).is_some());
        cache.set(b"C", FormatTag::Txt, result("C"));

        assert!(cache.has(b"A", FormatTag::Txt));
        assert!(!cache.has(b"B", FormatTag::Txt));
        assert!(cache.has(b"C", FormatTag::Txt));
    }

    #[test]
    fn test_replace_existing_key_does_not_evict() {
        let mut cache = cache(2);
        cache.set(b"A", FormatTag::Txt, result("A1"));
        cache.set(b"B", FormatTag::Txt, result("B"));
        cache.get(b"A", FormatTag::Txt);

        cache.set(b"A", FormatTag::Txt, result("A2"));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.stats().total_hits, 0);
        assert_eq!(cache.get(b"A", FormatTag::Txt).unwrap().markdown, "A2");
        assert!(cache.has(b"B", FormatTag::Txt));
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut cache = cache(3);
        for i in 0..20u8 {
            cache.set(&[i], FormatTag::Txt, result("x"));
            assert!(cache.len() <= 3);
        }
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_expired_entry_is_absent_and_removed() {
        let mut cache = ConversionCache::new(4, Duration::from_millis(100)).unwrap();
        let key = cache_key(b"A", FormatTag::Txt);
        let start = Instant::now();
        cache.set_at(key.clone(), result("A"), start);

        assert!(cache.get_at(&key, start + Duration::from_millis(100)).is_some());
        assert_eq!(cache.stats().total_hits, 1);

        assert!(cache.get_at(&key, start + Duration::from_millis(101)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_expired_access_does_not_count_hit() {
        let mut cache = ConversionCache::new(4, Duration::from_millis(10)).unwrap();
        let key = cache_key(b"A", FormatTag::Txt);
        let start = Instant::now();
        cache.set_at(key.clone(), result("A"), start);

        assert!(cache.get_at(&key, start + Duration::from_secs(1)).is_none());
        assert_eq!(cache.stats().total_hits, 0);
    }

    #[test]
    fn test_clear_expired_sweeps() {
        let mut cache = ConversionCache::new(4, Duration::from_millis(50)).unwrap();
        let start = Instant::now();
        cache.set_at(cache_key(b"old", FormatTag::Txt), result("old"), start);
        cache.set_at(
            cache_key(b"new", FormatTag::Txt),
            result("new"),
            start + Duration::from_millis(40),
        );

        let removed = cache.clear_expired_at(start + Duration::from_millis(60));
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.entries.peek(&cache_key(b"new", FormatTag::Txt)).is_some());
    }

    #[test]
    fn test_clear() {
        let mut cache = cache(4);
        cache.set(b"A", FormatTag::Txt, result("A"));
        cache.set(b"B", FormatTag::Txt, result("B"));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.capacity(), 4);
    }

    #[test]
    fn test_stats_hit_rate_is_hits_per_entry() {
        let mut cache = cache(4);
        assert_eq!(cache.stats().hit_rate, 0.0);

        cache.set(b"A", FormatTag::Txt, result("A"));
        cache.set(b"B", FormatTag::Txt, result("B"));
        for _ in 0..3 {
            cache.get(b"A", FormatTag::Txt);
        }

        let stats = cache.stats();
        assert_eq!(stats.max_size, 4);
        assert_eq!(stats.total_hits, 3);
        assert!((stats.hit_rate - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_memory_usage_counts_utf16_and_metadata() {
        let mut cache = cache(4);
        assert_eq!(cache.memory_usage(), 0);

        let entry = result("héllo");
        let metadata_len = serde_json::to_string(&entry.metadata).unwrap().len();
        cache.set(b"A", FormatTag::Txt, entry);

        assert_eq!(cache.memory_usage(), 5 * 2 + metadata_len);
    }
}
