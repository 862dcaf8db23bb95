use std::time::{Duration, Instant};

use dashmap::DashMap;
use ring::digest::{digest, SHA256};
use tracing::debug;

use crate::answer::Answer;

/// Normalization applied to a query before matching or key derivation:
/// trim surrounding whitespace, then case-fold.
pub(crate) fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

struct CacheEntry {
    answer: Answer,
    inserted_at: Instant,
}

/// In-memory answer cache keyed by the SHA-256 digest of the normalized
/// query. Entries past the freshness window answer as absent but stay in
/// the map until the next store overwrites them; nothing is evicted.
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    freshness: Duration,
}

impl ResponseCache {
    pub fn new(freshness: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            freshness,
        }
    }

    fn key(query: &str) -> String {
        let hash = digest(&SHA256, normalize(query).as_bytes());
        hash.as_ref().iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Returns the cached answer for `query` if one exists and is still
    /// inside the freshness window.
    pub fn lookup(&self, query: &str) -> Option<Answer> {
        self.lookup_at(query, Instant::now())
    }

    fn lookup_at(&self, query: &str, now: Instant) -> Option<Answer> {
        let key = Self::key(query);
        let entry = self.entries.get(&key)?;
        if now.duration_since(entry.inserted_at) < self.freshness {
            debug!(%key, "cache hit");
            Some(entry.answer.clone())
        } else {
            debug!(%key, "cache entry stale");
            None
        }
    }

    pub fn store(&self, query: &str, answer: &Answer) {
        self.entries.insert(
            Self::key(query),
            CacheEntry {
                answer: answer.clone(),
                inserted_at: Instant::now(),
            },
        );
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cache() -> ResponseCache {
        ResponseCache::new(Duration::from_secs(600))
    }

    #[test]
    fn test_lookup_fresh_entry() {
        let cache = cache();
        let answer = Answer::high("Rust is a language.", vec![]);
        cache.store("What is Rust?", &answer);
        assert_eq!(cache.lookup("What is Rust?"), Some(answer));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let cache = cache();
        let answer = Answer::high("Rust is a language.", vec![]);
        cache.store("What is Rust?", &answer);
        assert_eq!(cache.lookup("  WHAT IS RUST?  "), Some(answer));
    }

    #[test]
    fn test_stale_entry_answers_as_absent_but_remains() {
        let cache = ResponseCache::new(Duration::from_secs(600));
        cache.store("query", &Answer::low("old"));
        let later = Instant::now() + Duration::from_secs(601);
        assert_eq!(cache.lookup_at("query", later), None);
        // not deleted: the entry is still there and gets overwritten
        assert_eq!(cache.len(), 1);
        cache.store("query", &Answer::low("new"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.lookup("query").unwrap().text, "new");
    }

    #[test]
    fn test_distinct_queries_do_not_collide() {
        let cache = cache();
        cache.store("alpha", &Answer::low("a"));
        cache.store("beta", &Answer::low("b"));
        assert_eq!(cache.lookup("alpha").unwrap().text, "a");
        assert_eq!(cache.lookup("beta").unwrap().text, "b");
    }

    #[test]
    fn test_miss_on_unknown_query() {
        assert_eq!(cache().lookup("never stored"), None);
    }
}
