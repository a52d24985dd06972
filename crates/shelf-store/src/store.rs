//! The store: record-level operations over one file per record.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::debug;

use shelf_codec::{parse, serialize_record};
use shelf_types::{classify, Record, StructureKind, Value};

use crate::cache::RecordCache;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::lock::LockedFile;
use crate::paths::{record_path, sanitize, validate};

/// Which side of an entry a search term is matched against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchScope {
    /// Match the entry key only.
    Key,
    /// Match scalars inside the entry value, descending into containers.
    Value,
    /// Match either side.
    Both,
}

impl SearchScope {
    fn includes_key(self) -> bool {
        matches!(self, Self::Key | Self::Both)
    }

    fn includes_value(self) -> bool {
        matches!(self, Self::Value | Self::Both)
    }
}

/// A snapshot of cache occupancy and validity.
///
/// `expired` and `valid` split entries by age alone; mtime drift is not
/// consulted here (it is checked on every read instead).
#[derive(Clone, Debug)]
pub struct CacheStats {
    /// Entries in the content cache, valid or not.
    pub entries: usize,
    /// Entries in the advisory structural-type cache.
    pub type_entries: usize,
    /// The effective expiry.
    pub expiry: std::time::Duration,
    /// Content-cache entries older than the expiry.
    pub expired: usize,
    /// Content-cache entries younger than the expiry.
    pub valid: usize,
}

/// Shared mutable cache state, serialized behind one mutex.
struct CacheState {
    records: RecordCache,
    /// Last-saved structural kind per record. Advisory: written on every
    /// save, read only by [`Store::cache_stats`].
    kinds: HashMap<String, StructureKind>,
}

/// An embedded record store rooted at one directory.
///
/// Every operation is synchronous and runs to completion. One instance is
/// safe to share across threads: each public operation holds the state
/// mutex for its full duration, so reads, merges, and cache refreshes
/// never interleave. Record files are written under an exclusive advisory
/// lock and read under a shared one, so lock-honoring processes never
/// observe a partially written file either.
pub struct Store {
    config: StoreConfig,
    state: Mutex<CacheState>,
}

impl Store {
    /// Open a store, creating the root directory if needed.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        fs::create_dir_all(&config.root)?;
        let records = RecordCache::new(config.cache_expiry());
        Ok(Self {
            config,
            state: Mutex::new(CacheState {
                records,
                kinds: HashMap::new(),
            }),
        })
    }

    /// The configuration this store was opened with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Read a record.
    ///
    /// A name that resolves outside the root or to a missing file reads as
    /// an empty record; only an existing-but-unreadable file is an error.
    /// Served from cache while the file's mtime is unchanged and the entry
    /// is younger than the expiry.
    pub fn get(&self, name: &str) -> StoreResult<Record> {
        let Some((key, path)) = self.resolve(name) else {
            return Ok(Record::new());
        };
        let mut state = self.state.lock().expect("cache mutex poisoned");
        self.get_locked(&mut state, &key, &path)
    }

    /// Write a record.
    ///
    /// With `overwrite` false an existing record is first parsed and `data`
    /// is merged on top of it, shallowly: later map wins per key, nested
    /// values are not merged. Intermediate directories are created as
    /// needed. The final record is classified fresh, serialized, and
    /// written under an exclusive file lock; both caches are refreshed on
    /// success.
    pub fn save(&self, name: &str, data: Record, overwrite: bool) -> StoreResult<()> {
        if name.trim().is_empty() {
            return Err(StoreError::Validation(
                "object name must not be empty".into(),
            ));
        }
        let Some((key, path)) = self.resolve(name) else {
            return Err(StoreError::Validation(format!(
                "invalid object name: {name:?}"
            )));
        };
        let mut state = self.state.lock().expect("cache mutex poisoned");
        self.save_locked(&mut state, &key, &path, data, overwrite)
    }

    /// Read a record, apply `transform`, and save the result in place of
    /// the old content. The whole read-modify-write runs under the state
    /// mutex, so concurrent updates to one record never lose increments.
    pub fn update<F>(&self, name: &str, transform: F) -> StoreResult<()>
    where
        F: FnOnce(Record) -> Record,
    {
        if name.trim().is_empty() {
            return Err(StoreError::Validation(
                "object name must not be empty".into(),
            ));
        }
        let Some((key, path)) = self.resolve(name) else {
            return Err(StoreError::Validation(format!(
                "invalid object name: {name:?}"
            )));
        };
        let mut state = self.state.lock().expect("cache mutex poisoned");
        let current = self.get_locked(&mut state, &key, &path)?;
        let next = transform(current);
        self.save_locked(&mut state, &key, &path, next, true)
    }

    /// Delete a record.
    ///
    /// Both cache entries are cleared unconditionally. Answers `Ok(true)`
    /// on success, including when the file never existed; a name that
    /// resolves outside the root answers `Ok(false)`.
    pub fn delete(&self, name: &str) -> StoreResult<bool> {
        let Some((key, path)) = self.resolve(name) else {
            return Ok(false);
        };

        let mut state = self.state.lock().expect("cache mutex poisoned");
        state.records.invalidate(&key);
        state.kinds.remove(&key);

        match fs::remove_file(&path) {
            Ok(()) => {
                if self.config.debug {
                    debug!(name = %key, "deleted record");
                }
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether the record file exists. Never fails.
    pub fn exists(&self, name: &str) -> bool {
        let Some((_, path)) = self.resolve(name) else {
            return false;
        };
        let _state = self.state.lock().expect("cache mutex poisoned");
        path.is_file()
    }

    /// Search a record's entries for `term`.
    ///
    /// Key matching compares the entry key; value matching descends into
    /// nested containers and compares each scalar's string form. Matching
    /// is a case-insensitive substring test, or literal equality when
    /// `exact` is set. The result keeps matching entries in their original
    /// order, with original keys and values.
    pub fn search(
        &self,
        name: &str,
        term: &str,
        exact: bool,
        scope: SearchScope,
    ) -> StoreResult<Record> {
        if term.is_empty() {
            return Err(StoreError::Validation(
                "search term must not be empty".into(),
            ));
        }

        let record = self.get(name)?;
        let mut result = Record::new();
        for (key, value) in &record {
            let key_hit = scope.includes_key() && matches_text(key, term, exact);
            let value_hit =
                !key_hit && scope.includes_value() && value_matches(value, term, exact);
            if key_hit || value_hit {
                result.insert(key.clone(), value.clone());
            }
        }
        Ok(result)
    }

    /// Occupancy and age-validity counters for both caches.
    pub fn cache_stats(&self) -> CacheStats {
        let state = self.state.lock().expect("cache mutex poisoned");
        let (expired, valid) = state.records.age_counts();
        CacheStats {
            entries: state.records.len(),
            type_entries: state.kinds.len(),
            expiry: state.records.expiry(),
            expired,
            valid,
        }
    }

    /// Drop every content-cache entry older than the expiry and report the
    /// count removed.
    pub fn clean_expired_cache(&self) -> usize {
        let mut state = self.state.lock().expect("cache mutex poisoned");
        state.records.sweep()
    }

    /// `get` body, with the state mutex already held.
    fn get_locked(
        &self,
        state: &mut CacheState,
        key: &str,
        path: &std::path::Path,
    ) -> StoreResult<Record> {
        let mut file = match LockedFile::acquire_shared(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Record::new());
            }
            Err(e) => return Err(e.into()),
        };
        let mtime = file.metadata()?.modified()?;

        if let Some(data) = state.records.get(key, mtime) {
            if self.config.debug {
                debug!(name = %key, "cache hit");
            }
            return Ok(data.clone());
        }

        let text = file.read_contents()?;
        drop(file);

        let data = parse(&text);
        if self.config.debug {
            debug!(name = %key, entries = data.len(), "read record from disk");
        }
        state.records.put(key.to_string(), data.clone(), mtime);
        Ok(data)
    }

    /// `save` body, with the state mutex already held.
    ///
    /// The merge source is read through the exclusive lock itself, and the
    /// cached mtime comes from the still-locked handle, so no other writer
    /// can slip between the read, the write, and the mtime observation.
    fn save_locked(
        &self,
        state: &mut CacheState,
        key: &str,
        path: &std::path::Path,
        data: Record,
        overwrite: bool,
    ) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut lock = LockedFile::acquire(path)?;
        let mut merged = if overwrite {
            Record::new()
        } else {
            // A freshly created file reads as empty text, which parses to
            // an empty record.
            parse(&lock.read_contents()?)
        };
        for (k, v) in data {
            merged.insert(k, v);
        }

        let kind = classify(&merged);
        let text = serialize_record(&merged, kind);
        lock.replace_contents(text.as_bytes())?;
        let mtime = lock.metadata()?.modified()?;
        drop(lock);

        if self.config.debug {
            debug!(name = %key, kind = %kind, bytes = text.len(), "saved record");
        }
        state.kinds.insert(key.to_string(), kind);
        state.records.put(key.to_string(), merged, mtime);
        Ok(())
    }

    /// Resolve a logical name to its cache key and confined on-disk path.
    ///
    /// `None` when the name sanitizes to nothing or the path falls outside
    /// the root.
    fn resolve(&self, name: &str) -> Option<(String, PathBuf)> {
        let key = sanitize(name);
        if key.is_empty() {
            return None;
        }
        let path = record_path(&self.config.root, &key);
        if !validate(&self.config.root, &path) {
            return None;
        }
        Some((key, path))
    }

    /// Back-date a cached record for expiry tests.
    #[cfg(test)]
    fn backdate_cache(&self, name: &str, age: std::time::Duration) {
        let mut state = self.state.lock().expect("cache mutex poisoned");
        state.records.backdate(&sanitize(name), age);
    }
}

fn matches_text(candidate: &str, term: &str, exact: bool) -> bool {
    if exact {
        candidate == term
    } else {
        candidate.to_lowercase().contains(&term.to_lowercase())
    }
}

/// Recursively match scalars inside a value against the term.
fn value_matches(value: &Value, term: &str, exact: bool) -> bool {
    match value {
        Value::Array(items) => items.iter().any(|v| value_matches(v, term, exact)),
        Value::Object(map) => map.values().any(|v| value_matches(v, term, exact)),
        Value::String(s) => matches_text(s, term, exact),
        scalar => matches_text(&scalar.to_string(), term, exact),
    }
}
