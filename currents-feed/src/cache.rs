//! Per-key TTL cache of composed feeds.
//!
//! Entries are immutable snapshots: a cache hit returns the stored feed
//! unchanged, so repeated reads within the TTL window are bit-identical. A
//! new compose fully replaces the entry for its key. The store is safe
//! under concurrent compose calls for different keys.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::compose::ComposedFeed;

/// Default snapshot lifetime: five minutes.
pub(crate) const DEFAULT_TTL_SECONDS: i64 = 5 * 60;

/// Concurrency-safe, single-entry-per-key feed store with passive TTL
/// expiry.
///
/// # Examples
/// ```
/// use chrono::Duration;
/// use currents_feed::FeedCache;
///
/// let cache = FeedCache::new(Duration::seconds(60));
/// let now = "2024-02-15T12:00:00Z".parse().expect("timestamp");
/// assert!(cache.get("user-1", now).is_none());
/// ```
#[derive(Debug)]
pub struct FeedCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl Default for FeedCache {
    fn default() -> Self {
        Self::with_default_ttl()
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    composed: ComposedFeed,
    created_at: DateTime<Utc>,
}

impl FeedCache {
    /// Create a cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Create a cache with the production five-minute TTL.
    #[must_use]
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::seconds(DEFAULT_TTL_SECONDS))
    }

    /// Return the stored snapshot for `key` when it is still fresh at
    /// `now`.
    ///
    /// Stale entries are evicted on read.
    #[must_use]
    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<ComposedFeed> {
        let fresh = {
            let entry = self.entries.get(key)?;
            if now - entry.created_at < self.ttl {
                Some(entry.composed.clone())
            } else {
                None
            }
        };
        if fresh.is_none() {
            self.entries.remove(key);
        }
        fresh
    }

    /// Store a snapshot for `key`, replacing any previous entry.
    pub fn insert(&self, key: impl Into<String>, composed: ComposedFeed, now: DateTime<Utc>) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                composed,
                created_at: now,
            },
        );
    }

    /// Drop the entry for one key, forcing the next compose to rebuild.
    pub fn clear(&self, key: &str) {
        self.entries.remove(key);
    }

    /// Drop every entry.
    pub fn clear_all(&self) {
        self.entries.clear();
    }

    /// Number of stored snapshots, fresh or stale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
