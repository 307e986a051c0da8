use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::summarize::request::SummaryMode;

/// How long a stored summary stays valid.
pub const SUMMARY_TTL: Duration = Duration::from_secs(120);

/// Composite cache key: same page, same mode, same underlying content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub url: String,
    pub title: String,
    pub mode: SummaryMode,
    /// Derived from the field-label set for fillables requests; empty for
    /// overview requests.
    pub signature: String,
}

struct CacheEntry {
    summary: String,
    stored_at: Instant,
}

/// In-memory summary cache with a fixed time-to-live. Expired entries are
/// treated as absent and evicted lazily when looked up.
pub struct SummaryCache {
    ttl: Duration,
    entries: HashMap<CacheKey, CacheEntry>,
}

impl Default for SummaryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::with_ttl(SUMMARY_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<String> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&mut self, key: &CacheKey, now: Instant) -> Option<String> {
        let fresh = match self.entries.get(key) {
            Some(entry) => now.duration_since(entry.stored_at) < self.ttl,
            None => return None,
        };
        if !fresh {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|e| e.summary.clone())
    }

    pub fn insert(&mut self, key: CacheKey, summary: String) {
        self.insert_at(key, summary, Instant::now());
    }

    pub fn insert_at(&mut self, key: CacheKey, summary: String, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                summary,
                stored_at: now,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Content signature over the discovered field labels, distinguishing cache
/// entries for the same URL/title/mode when the form itself changed.
pub fn content_signature(labels: &[String]) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(labels.join("|").as_bytes());
    format!("{:x}", hasher.finalize())
}
