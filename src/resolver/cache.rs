//! In-memory response cache.
//!
//! Time-bounded key-value store for search results, trending lists and
//! resolved streams, keyed by request fingerprint. Expiry is checked
//! lazily at read time; size is bounded by oldest-inserted-first
//! eviction so unbounded distinct queries cannot grow the map without
//! limit.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::resolver::clock::Clock;
use crate::resolver::domain::{ResolvedStream, TrackList};
use crate::resolver::fingerprint::Fingerprint;

/// What a cache entry holds.
#[derive(Debug, Clone)]
pub enum CachedPayload {
    Tracks(TrackList),
    Stream(ResolvedStream),
}

struct CacheEntry {
    payload: CachedPayload,
    created: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.created) > self.ttl
    }
}

struct CacheInner {
    entries: HashMap<String, CacheEntry>,
    /// Insertion order, oldest first. Keys are re-pushed on overwrite.
    order: VecDeque<String>,
}

/// Concurrent TTL cache for resolver responses.
pub struct ResponseCache {
    inner: Mutex<CacheInner>,
    clock: Arc<dyn Clock>,
    max_entries: usize,
}

impl ResponseCache {
    pub fn new(max_entries: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            clock,
            max_entries: max_entries.max(1),
        }
    }

    /// Look up a fingerprint. An entry past its TTL is treated as absent
    /// and purged on the spot.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<CachedPayload> {
        let now = self.clock.now();
        let mut inner = self.inner.lock();

        let expired = match inner.entries.get(fingerprint.as_str()) {
            Some(entry) => entry.is_expired(now),
            None => return None,
        };

        if expired {
            remove_key(&mut inner, fingerprint.as_str());
            return None;
        }

        inner
            .entries
            .get(fingerprint.as_str())
            .map(|e| e.payload.clone())
    }

    /// Store a payload under a fingerprint with the given TTL.
    pub fn insert(&self, fingerprint: &Fingerprint, payload: CachedPayload, ttl: Duration) {
        let now = self.clock.now();
        let key = fingerprint.as_str().to_string();
        let mut inner = self.inner.lock();

        // Overwrite counts as a fresh insertion for eviction ordering
        if inner.entries.contains_key(&key) {
            inner.order.retain(|k| k != &key);
        }

        inner.entries.insert(
            key.clone(),
            CacheEntry {
                payload,
                created: now,
                ttl,
            },
        );
        inner.order.push_back(key);

        while inner.entries.len() > self.max_entries {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
        }
    }

    /// Drop one entry, if present.
    pub fn invalidate(&self, fingerprint: &Fingerprint) {
        let mut inner = self.inner.lock();
        remove_key(&mut inner, fingerprint.as_str());
    }

    /// Number of entries currently held, including not-yet-purged expired ones.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn remove_key(inner: &mut CacheInner, key: &str) {
    inner.entries.remove(key);
    inner.order.retain(|k| k != key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::clock::ManualClock;
    use crate::resolver::domain::{ProviderTag, Track};

    fn track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Track {id}"),
            artist: None,
            thumbnail: None,
            duration_secs: None,
            source: ProviderTag::Piped,
        }
    }

    fn tracks_payload(ids: &[&str]) -> CachedPayload {
        CachedPayload::Tracks(TrackList {
            tracks: ids.iter().map(|id| track(id)).collect(),
            source: ProviderTag::Piped,
        })
    }

    fn cache_with_clock(max: usize) -> (ResponseCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        (ResponseCache::new(max, clock.clone()), clock)
    }

    #[test]
    fn test_insert_then_get() {
        let (cache, _clock) = cache_with_clock(16);
        let fp = Fingerprint::search("lofi beats", 5);

        cache.insert(&fp, tracks_payload(&["a", "b"]), Duration::from_secs(60));

        match cache.get(&fp) {
            Some(CachedPayload::Tracks(list)) => assert_eq!(list.tracks.len(), 2),
            other => panic!("expected tracks payload, got {other:?}"),
        }
    }

    #[test]
    fn test_miss_on_unknown_fingerprint() {
        let (cache, _clock) = cache_with_clock(16);
        assert!(cache.get(&Fingerprint::trending(10)).is_none());
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let (cache, clock) = cache_with_clock(16);
        let fp = Fingerprint::search("lofi beats", 5);
        cache.insert(&fp, tracks_payload(&["a"]), Duration::from_secs(300));

        clock.advance(Duration::from_secs(299));
        assert!(cache.get(&fp).is_some());

        clock.advance(Duration::from_secs(2));
        assert!(cache.get(&fp).is_none());
        // Lazy purge removed the entry entirely
        assert!(cache.is_empty());
    }

    #[test]
    fn test_oldest_entry_evicted_at_capacity() {
        let (cache, _clock) = cache_with_clock(2);
        let first = Fingerprint::search("first", 5);
        let second = Fingerprint::search("second", 5);
        let third = Fingerprint::search("third", 5);

        cache.insert(&first, tracks_payload(&["1"]), Duration::from_secs(60));
        cache.insert(&second, tracks_payload(&["2"]), Duration::from_secs(60));
        cache.insert(&third, tracks_payload(&["3"]), Duration::from_secs(60));

        assert!(cache.get(&first).is_none());
        assert!(cache.get(&second).is_some());
        assert!(cache.get(&third).is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_overwrite_refreshes_eviction_order() {
        let (cache, _clock) = cache_with_clock(2);
        let first = Fingerprint::search("first", 5);
        let second = Fingerprint::search("second", 5);
        let third = Fingerprint::search("third", 5);

        cache.insert(&first, tracks_payload(&["1"]), Duration::from_secs(60));
        cache.insert(&second, tracks_payload(&["2"]), Duration::from_secs(60));
        // Re-insert first: it is now the newest, so second gets evicted next
        cache.insert(&first, tracks_payload(&["1b"]), Duration::from_secs(60));
        cache.insert(&third, tracks_payload(&["3"]), Duration::from_secs(60));

        assert!(cache.get(&first).is_some());
        assert!(cache.get(&second).is_none());
        assert!(cache.get(&third).is_some());
    }

    #[test]
    fn test_invalidate_removes_entry() {
        let (cache, _clock) = cache_with_clock(16);
        let fp = Fingerprint::stream("abc", crate::resolver::domain::QualityTier::Auto);
        cache.insert(
            &fp,
            CachedPayload::Stream(ResolvedStream {
                url: "https://cdn/x".to_string(),
                mime_type: "audio/mp4".to_string(),
                bitrate_kbps: Some(128),
                codec: None,
                title: None,
                duration_secs: None,
                source: ProviderTag::Piped,
            }),
            Duration::from_secs(60),
        );

        assert!(cache.get(&fp).is_some());
        cache.invalidate(&fp);
        assert!(cache.get(&fp).is_none());
    }
}
