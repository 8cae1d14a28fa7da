pub mod key;

pub use key::RouteKey;

use crate::constants::{CLEANUP_CHUNK_SIZE, PROMOTED_MAX_AGE_MULTIPLIER};
use crate::models::{RouteResult, RouteSource};
use dashmap::DashMap;
use serde::Serialize;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;

/// One cached route resolution.
///
/// Entries are replaced wholesale on refetch, never mutated in place, except
/// for the hit bookkeeping which uses atomic fields so a `record_hit` can
/// never race a concurrent `put` into a torn state.
#[derive(Debug)]
pub struct CacheEntry {
    pub key: RouteKey,
    pub route: RouteResult,
    pub cached_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
    pub source: RouteSource,
    hit_count: AtomicU64,
    last_accessed_unix: AtomicI64,
}

impl CacheEntry {
    pub fn new(key: RouteKey, route: RouteResult, cached_at: OffsetDateTime, ttl: Duration) -> Self {
        let source = route.source;
        CacheEntry {
            key,
            route,
            cached_at,
            expires_at: cached_at + ttl,
            source,
            hit_count: AtomicU64::new(0),
            last_accessed_unix: AtomicI64::new(cached_at.unix_timestamp()),
        }
    }

    pub fn is_valid(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at
    }

    /// Defensive consistency check. A violating entry is treated as
    /// corruption: discarded and recomputed rather than served.
    pub fn is_consistent(&self) -> bool {
        self.expires_at >= self.cached_at
    }

    pub fn hit_count(&self) -> u64 {
        self.hit_count.load(Ordering::Relaxed)
    }

    pub fn last_accessed_unix(&self) -> i64 {
        self.last_accessed_unix.load(Ordering::Relaxed)
    }

    fn record_hit(&self, now: OffsetDateTime) {
        self.hit_count.fetch_add(1, Ordering::Relaxed);
        self.last_accessed_unix
            .store(now.unix_timestamp(), Ordering::Relaxed);
    }
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entries: usize,
}

/// Shared route cache keyed by request fingerprint.
///
/// Backed by a sharded concurrent map so unrelated lookups never serialize
/// on one global lock. Constructed once and handed to the resolver by
/// reference; there is no process-wide singleton.
pub struct RouteCache {
    entries: DashMap<RouteKey, Arc<CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
    hit_promotion_threshold: u64,
}

impl RouteCache {
    pub fn new(hit_promotion_threshold: u64) -> Self {
        RouteCache {
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            hit_promotion_threshold,
        }
    }

    /// Look up an entry, valid or expired. Corrupt entries are dropped and
    /// reported as a miss. Expiry is the caller's call via
    /// [`CacheEntry::is_valid`]; stat counters treat expired as a miss.
    pub fn get(&self, key: &RouteKey, now: OffsetDateTime) -> Option<Arc<CacheEntry>> {
        let entry = match self.entries.get(key) {
            Some(entry) => Arc::clone(entry.value()),
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(key = %key, "Cache miss");
                return None;
            }
        };

        if !entry.is_consistent() {
            tracing::warn!(key = %key, "Discarding corrupt cache entry");
            self.entries
                .remove_if(key, |_, e| !e.is_consistent());
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        if entry.is_valid(now) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = %key, hits = entry.hit_count(), "Cache hit");
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = %key, "Cache entry expired");
        }
        Some(entry)
    }

    /// Upsert: overwrites any prior entry for the same key. Concurrent puts
    /// of the same key are last-write-wins.
    pub fn put(&self, entry: CacheEntry) {
        tracing::debug!(
            key = %entry.key,
            source = ?entry.source,
            expires_at = %entry.expires_at,
            "Caching route"
        );
        self.entries.insert(entry.key, Arc::new(entry));
    }

    /// Atomic hit bookkeeping on the live entry. No read-modify-write of the
    /// map itself, so this cannot corrupt a concurrently replaced entry.
    pub fn record_hit(&self, key: &RouteKey, now: OffsetDateTime) {
        if let Some(entry) = self.entries.get(key) {
            entry.record_hit(now);
        }
    }

    /// Age-based retention sweep, independent of per-entry expiry.
    ///
    /// Removes entries older than `max_age` regardless of `expires_at`, as a
    /// safety net against unbounded growth. Frequently requested entries
    /// (hit count at or above the promotion threshold) get a grace multiplier
    /// before eviction. Keys are processed in bounded chunks so the sweep
    /// never pins a map shard for its full duration.
    pub fn cleanup(&self, max_age: Duration, now: OffsetDateTime) -> usize {
        let keys: Vec<RouteKey> = self.entries.iter().map(|e| *e.key()).collect();
        let mut removed = 0;

        for chunk in keys.chunks(CLEANUP_CHUNK_SIZE) {
            for key in chunk {
                let evicted = self.entries.remove_if(key, |_, entry| {
                    let age = now - entry.cached_at;
                    let limit = if entry.hit_count() >= self.hit_promotion_threshold {
                        max_age * PROMOTED_MAX_AGE_MULTIPLIER
                    } else {
                        max_age
                    };
                    age > limit
                });
                if evicted.is_some() {
                    removed += 1;
                }
            }
        }

        if removed > 0 {
            tracing::info!(
                removed,
                remaining = self.entries.len(),
                "Cache cleanup sweep finished"
            );
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let hit_rate = if hits + misses > 0 {
            (hits as f64 / (hits + misses) as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            hits,
            misses,
            hit_rate,
            entries: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CongestionLevel, Coordinates, TransportProfile};
    use time::macros::datetime;

    fn test_key() -> RouteKey {
        RouteKey::new(
            &Coordinates::new(21.2181, 81.3248).unwrap(),
            &Coordinates::new(21.2156, 81.3201).unwrap(),
            TransportProfile::Walking,
            false,
        )
    }

    fn test_route(source: RouteSource) -> RouteResult {
        RouteResult {
            distance_meters: 550.0,
            nominal_duration_seconds: Some(396.0),
            traffic_duration_seconds: None,
            congestion: CongestionLevel::Unknown,
            source,
            steps: vec![],
        }
    }

    #[test]
    fn ttl_boundaries() {
        let t = datetime!(2026-03-01 12:00 UTC);
        let entry = CacheEntry::new(
            test_key(),
            test_route(RouteSource::Provider),
            t,
            Duration::from_secs(1800),
        );

        assert!(entry.is_valid(t + Duration::from_secs(29 * 60)));
        assert!(!entry.is_valid(t + Duration::from_secs(31 * 60)));
    }

    #[test]
    fn get_miss_then_hit() {
        let cache = RouteCache::new(5);
        let now = datetime!(2026-03-01 12:00 UTC);
        assert!(cache.get(&test_key(), now).is_none());

        cache.put(CacheEntry::new(
            test_key(),
            test_route(RouteSource::Provider),
            now,
            Duration::from_secs(1800),
        ));

        let entry = cache.get(&test_key(), now).unwrap();
        assert!(entry.is_valid(now));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn record_hit_increments() {
        let cache = RouteCache::new(5);
        let now = datetime!(2026-03-01 12:00 UTC);
        cache.put(CacheEntry::new(
            test_key(),
            test_route(RouteSource::Provider),
            now,
            Duration::from_secs(1800),
        ));

        let later = now + Duration::from_secs(60);
        cache.record_hit(&test_key(), later);
        cache.record_hit(&test_key(), later);

        let entry = cache.get(&test_key(), now).unwrap();
        assert_eq!(entry.hit_count(), 2);
        assert_eq!(entry.last_accessed_unix(), later.unix_timestamp());
    }

    #[test]
    fn put_replaces_entry() {
        let cache = RouteCache::new(5);
        let now = datetime!(2026-03-01 12:00 UTC);
        cache.put(CacheEntry::new(
            test_key(),
            test_route(RouteSource::Fallback),
            now,
            Duration::from_secs(600),
        ));
        cache.record_hit(&test_key(), now);

        // Refetch replaces the entry; hit bookkeeping starts fresh
        cache.put(CacheEntry::new(
            test_key(),
            test_route(RouteSource::Provider),
            now + Duration::from_secs(700),
            Duration::from_secs(1800),
        ));

        let entry = cache.get(&test_key(), now + Duration::from_secs(700)).unwrap();
        assert_eq!(entry.source, RouteSource::Provider);
        assert_eq!(entry.hit_count(), 0);
    }

    #[test]
    fn corrupt_entry_treated_as_miss() {
        let cache = RouteCache::new(5);
        let now = datetime!(2026-03-01 12:00 UTC);
        let mut entry = CacheEntry::new(
            test_key(),
            test_route(RouteSource::Provider),
            now,
            Duration::from_secs(1800),
        );
        entry.expires_at = entry.cached_at - Duration::from_secs(1);
        cache.put(entry);

        assert!(cache.get(&test_key(), now).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn cleanup_removes_aged_entries() {
        let cache = RouteCache::new(5);
        let t0 = datetime!(2026-03-01 12:00 UTC);
        cache.put(CacheEntry::new(
            test_key(),
            test_route(RouteSource::Provider),
            t0,
            Duration::from_secs(86_400),
        ));

        // Young enough: kept even though 2 days past expiry matters not here
        let removed = cache.cleanup(Duration::from_secs(7 * 86_400), t0 + Duration::from_secs(86_400));
        assert_eq!(removed, 0);
        assert_eq!(cache.len(), 1);

        // Older than max age: removed regardless of expires_at
        let removed = cache.cleanup(
            Duration::from_secs(7 * 86_400),
            t0 + Duration::from_secs(8 * 86_400),
        );
        assert_eq!(removed, 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn cleanup_spares_hot_entries() {
        let cache = RouteCache::new(5);
        let t0 = datetime!(2026-03-01 12:00 UTC);

        let hot_key = test_key();
        let cold_key = RouteKey::new(
            &Coordinates::new(21.2181, 81.3248).unwrap(),
            &Coordinates::new(21.2500, 81.3600).unwrap(),
            TransportProfile::Walking,
            false,
        );

        cache.put(CacheEntry::new(
            hot_key,
            test_route(RouteSource::Provider),
            t0,
            Duration::from_secs(86_400),
        ));
        cache.put(CacheEntry::new(
            cold_key,
            test_route(RouteSource::Provider),
            t0,
            Duration::from_secs(86_400),
        ));
        for _ in 0..6 {
            cache.record_hit(&hot_key, t0);
        }

        // 8 days old with 7-day max age: cold evicted, hot within its
        // doubled grace window survives
        let removed = cache.cleanup(
            Duration::from_secs(7 * 86_400),
            t0 + Duration::from_secs(8 * 86_400),
        );
        assert_eq!(removed, 1);
        assert!(cache.get(&hot_key, t0 + Duration::from_secs(8 * 86_400)).is_some());

        // Past even the grace window the hot entry goes too
        let removed = cache.cleanup(
            Duration::from_secs(7 * 86_400),
            t0 + Duration::from_secs(15 * 86_400),
        );
        assert_eq!(removed, 1);
        assert!(cache.is_empty());
    }
}
