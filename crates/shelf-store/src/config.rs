use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Floor for the cache expiry. Shorter expiries would make the cache
/// thrash, so anything lower is clamped up to this.
pub const MIN_CACHE_EXPIRY_SECS: u64 = 60;

/// Construction-time configuration for a [`Store`](crate::Store).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root directory all record files live under.
    pub root: PathBuf,
    /// Cache entry lifetime in seconds (floor 60).
    pub cache_expiry_secs: u64,
    /// Emit per-operation debug events to the log sink. No behavioral
    /// effect on any operation.
    pub debug: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./Data"),
            cache_expiry_secs: 300,
            debug: false,
        }
    }
}

impl StoreConfig {
    /// The effective cache expiry, with the 60-second floor applied.
    pub fn cache_expiry(&self) -> Duration {
        Duration::from_secs(self.cache_expiry_secs.max(MIN_CACHE_EXPIRY_SECS))
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> StoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = StoreConfig::default();
        assert_eq!(c.root, PathBuf::from("./Data"));
        assert_eq!(c.cache_expiry_secs, 300);
        assert!(!c.debug);
    }

    #[test]
    fn expiry_floor_is_clamped() {
        let c = StoreConfig {
            cache_expiry_secs: 5,
            ..Default::default()
        };
        assert_eq!(c.cache_expiry(), Duration::from_secs(60));
    }

    #[test]
    fn expiry_above_floor_is_kept() {
        let c = StoreConfig::default();
        assert_eq!(c.cache_expiry(), Duration::from_secs(300));
    }

    #[test]
    fn load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelf.toml");
        std::fs::write(&path, "root = \"/tmp/records\"\ncache_expiry_secs = 120\n").unwrap();

        let c = StoreConfig::load(&path).unwrap();
        assert_eq!(c.root, PathBuf::from("/tmp/records"));
        assert_eq!(c.cache_expiry_secs, 120);
        assert!(!c.debug);
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "root = [broken").unwrap();

        assert!(matches!(
            StoreConfig::load(&path),
            Err(StoreError::Serialization(_))
        ));
    }
}
