//! In-process cache of parsed records.
//!
//! Each entry remembers the file modification time observed when it was
//! cached. An entry is served only while the live mtime still matches and
//! the entry is younger than the configured expiry; either check failing
//! is a miss. The cache is owned by its store instance — there is no
//! process-global state — and never outlives the process.

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use tracing::debug;

use shelf_types::Record;

use crate::config::MIN_CACHE_EXPIRY_SECS;

/// One cached record plus its validity metadata.
#[derive(Clone, Debug)]
struct CacheEntry {
    data: Record,
    /// Wall-clock time the entry was cached. Wall clock rather than a
    /// monotonic instant: if the clock jumps backwards the entry reads as
    /// fresh and ages out normally from there.
    cached_at: SystemTime,
    mtime: SystemTime,
}

impl CacheEntry {
    fn age(&self) -> Duration {
        self.cached_at.elapsed().unwrap_or_default()
    }
}

/// Cache of parsed records keyed by sanitized object name.
#[derive(Debug)]
pub struct RecordCache {
    entries: HashMap<String, CacheEntry>,
    expiry: Duration,
}

impl RecordCache {
    /// Create a cache with the given expiry, clamped to the 60 s floor.
    pub fn new(expiry: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            expiry: expiry.max(Duration::from_secs(MIN_CACHE_EXPIRY_SECS)),
        }
    }

    /// The effective expiry.
    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Look up a record, applying both validity checks: the stored mtime
    /// must equal `live_mtime` and the entry must be younger than the
    /// expiry. An invalid entry is a miss (it is left for `sweep`).
    pub fn get(&self, name: &str, live_mtime: SystemTime) -> Option<&Record> {
        let entry = self.entries.get(name)?;
        if entry.mtime != live_mtime {
            return None;
        }
        if entry.age() >= self.expiry {
            return None;
        }
        Some(&entry.data)
    }

    /// Insert or refresh an entry.
    pub fn put(&mut self, name: String, data: Record, mtime: SystemTime) {
        self.entries.insert(
            name,
            CacheEntry {
                data,
                cached_at: SystemTime::now(),
                mtime,
            },
        );
    }

    /// Remove an entry if present.
    pub fn invalidate(&mut self, name: &str) {
        self.entries.remove(name);
    }

    /// Remove every entry older than the expiry (age only, mtime is not
    /// consulted) and report how many were removed.
    pub fn sweep(&mut self) -> usize {
        let before = self.entries.len();
        let expiry = self.expiry;
        self.entries.retain(|_, entry| entry.age() < expiry);
        let removed = before - self.entries.len();
        if removed > 0 {
            debug!(removed, "swept expired cache entries");
        }
        removed
    }

    /// Number of entries, valid or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count entries by age alone: `(expired, valid)`.
    pub fn age_counts(&self) -> (usize, usize) {
        let expired = self
            .entries
            .values()
            .filter(|e| e.age() >= self.expiry)
            .count();
        (expired, self.entries.len() - expired)
    }

    /// Age an entry backwards in time. The 60 s expiry floor makes
    /// sleep-based expiry tests unreasonable; tests move `cached_at`
    /// instead of the clock.
    #[cfg(test)]
    pub fn backdate(&mut self, name: &str, age: Duration) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.cached_at = SystemTime::now() - age;
        }
    }
}
