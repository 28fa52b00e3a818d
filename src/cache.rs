//! Response cache keyed by normalized query
//!
//! Entries expire after a time-to-live. When the cache grows past its
//! capacity only the newest entries are kept.

use std::time::{Duration, Instant};

use ahash::AHashMap;
use parking_lot::Mutex;

use crate::text::normalize;

struct CacheEntry {
    reply: String,
    inserted_at: Instant,
    seq: u64,
}

#[derive(Default)]
struct CacheState {
    entries: AHashMap<String, CacheEntry>,
    next_seq: u64,
}

pub struct ResponseCache {
    ttl: Duration,
    capacity: usize,
    state: Mutex<CacheState>,
}

impl ResponseCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn key_for(query: &str) -> String {
        normalize(query)
    }

    /// Cached reply for `query`, dropping it if it has expired
    pub fn get(&self, query: &str) -> Option<String> {
        let key = Self::key_for(query);
        let mut state = self.state.lock();
        let expired = match state.entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                return Some(entry.reply.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            state.entries.remove(&key);
        }
        None
    }

    pub fn insert(&self, query: &str, reply: String) {
        let key = Self::key_for(query);
        let mut state = self.state.lock();
        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.insert(
            key,
            CacheEntry {
                reply,
                inserted_at: Instant::now(),
                seq,
            },
        );

        if state.entries.len() > self.capacity {
            let mut by_age: Vec<(u64, String)> = state
                .entries
                .iter()
                .map(|(k, entry)| (entry.seq, k.clone()))
                .collect();
            by_age.sort_by(|a, b| b.0.cmp(&a.0));
            for (_, stale) in by_age.into_iter().skip(self.capacity) {
                state.entries.remove(&stale);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_by_normalized_key() {
        let cache = ResponseCache::new(Duration::from_secs(60), 10);
        cache.insert("What is your STACK?", "React".to_string());
        assert_eq!(cache.get("  hi, what is your stack?"), Some("React".to_string()));
        assert_eq!(cache.get("what is your name"), None);
    }

    #[test]
    fn test_expired_entries_are_dropped() {
        let cache = ResponseCache::new(Duration::ZERO, 10);
        cache.insert("skills", "Rust".to_string());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("skills"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_keeps_newest_entries() {
        let cache = ResponseCache::new(Duration::from_secs(60), 2);
        cache.insert("one", "1".to_string());
        cache.insert("two", "2".to_string());
        cache.insert("three", "3".to_string());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("one"), None);
        assert_eq!(cache.get("two"), Some("2".to_string()));
        assert_eq!(cache.get("three"), Some("3".to_string()));
    }

    #[test]
    fn test_reinsert_refreshes_age() {
        let cache = ResponseCache::new(Duration::from_secs(60), 2);
        cache.insert("one", "1".to_string());
        cache.insert("two", "2".to_string());
        cache.insert("one", "1b".to_string());
        cache.insert("three", "3".to_string());
        assert_eq!(cache.get("one"), Some("1b".to_string()));
        assert_eq!(cache.get("two"), None);
    }

    #[test]
    fn test_clear() {
        let cache = ResponseCache::new(Duration::from_secs(60), 2);
        cache.insert("one", "1".to_string());
        cache.clear();
        assert!(cache.is_empty());
    }
}
