use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use signal_normalizer::{RawHeadline, RawOptionContract, RawQuote};

/// Per-source time-to-live, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheTtls {
    pub positioning_secs: i64,
    pub prices_secs: i64,
    pub options_secs: i64,
    pub calendar_secs: i64,
    pub news_secs: i64,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            positioning_secs: 1800, // weekly report, 30 min
            prices_secs: 240,
            options_secs: 240,
            calendar_secs: 600,
            news_secs: 600,
        }
    }
}

/// Internal cache entry with timestamp
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

/// One source's payloads keyed by request parameters
pub struct TtlMap<T> {
    entries: DashMap<String, CacheEntry<T>>,
    ttl_secs: i64,
}

impl<T: Clone> TtlMap<T> {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            entries: DashMap::new(),
            ttl_secs,
        }
    }

    /// Fresh payload for `key`, if one was stored less than `ttl_secs` ago
    pub fn get(&self, key: &str) -> Option<T> {
        let entry = self.entries.get(key)?;
        let age = (Utc::now() - entry.cached_at).num_seconds();
        if age < self.ttl_secs {
            Some(entry.data.clone())
        } else {
            None
        }
    }

    /// Store `data` under `key`, evicting entries that have already expired
    pub fn insert(&self, key: impl Into<String>, data: T) {
        let now = Utc::now();
        self.entries
            .retain(|_, entry| (now - entry.cached_at).num_seconds() < self.ttl_secs);
        self.entries.insert(key.into(), CacheEntry { data, cached_at: now });
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Raw feed payloads shared across evaluation cycles.
///
/// Only successful fetches are stored, so a failed source is retried on the
/// next cycle instead of serving its failure for a full TTL.
pub struct FeedCache {
    pub positioning: TtlMap<String>,
    pub quotes: TtlMap<RawQuote>,
    pub options: TtlMap<Vec<RawOptionContract>>,
    pub calendar: TtlMap<Value>,
    pub news: TtlMap<Vec<RawHeadline>>,
}

impl FeedCache {
    pub fn new(ttls: CacheTtls) -> Self {
        Self {
            positioning: TtlMap::new(ttls.positioning_secs),
            quotes: TtlMap::new(ttls.prices_secs),
            options: TtlMap::new(ttls.options_secs),
            calendar: TtlMap::new(ttls.calendar_secs),
            news: TtlMap::new(ttls.news_secs),
        }
    }

    /// Manual refresh: drop every cached payload
    pub fn invalidate_all(&self) {
        self.positioning.clear();
        self.quotes.clear();
        self.options.clear();
        self.calendar.clear();
        self.news.clear();
        tracing::info!("Feed cache invalidated");
    }

    pub fn total_entries(&self) -> usize {
        self.positioning.len() + self.quotes.len() + self.options.len() + self.calendar.len() + self.news.len()
    }
}

impl Default for FeedCache {
    fn default() -> Self {
        Self::new(CacheTtls::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_entry_is_served() {
        let map: TtlMap<String> = TtlMap::new(60);
        map.insert("cot", "csv".to_string());
        assert_eq!(map.get("cot").as_deref(), Some("csv"));
        assert!(map.get("other").is_none());
    }

    #[test]
    fn test_insert_evicts_expired_entries() {
        let map: TtlMap<String> = TtlMap::new(0);
        for hour in 0..48 {
            map.insert(format!("news:2024-05-08T{hour:02}"), "headlines".to_string());
        }
        assert_eq!(map.len(), 1);

        let map: TtlMap<String> = TtlMap::new(60);
        map.insert("a", "1".to_string());
        map.insert("b", "2".to_string());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_expired_entry_is_ignored() {
        let map: TtlMap<u32> = TtlMap::new(0);
        map.insert("k", 7);
        assert!(map.get("k").is_none());
    }

    #[test]
    fn test_invalidate_all() {
        let cache = FeedCache::default();
        cache.positioning.insert("cot", "csv".to_string());
        cache.calendar.insert("2024-05-05:2024-05-11", Value::Array(vec![]));
        assert_eq!(cache.total_entries(), 2);
        cache.invalidate_all();
        assert_eq!(cache.total_entries(), 0);
    }
}
