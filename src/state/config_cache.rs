//! Persistent cache for static escrow parameters.
//!
//! Survives restarts under a versioned namespace; a version bump throws the
//! old entries away. Consumers check here first and only go to the chain on a
//! miss or an explicit forced refresh.

use alloy::primitives::Address;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use crate::state::static_config::StaticEscrowConfig;

#[derive(Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    entries: HashMap<Address, StaticEscrowConfig>,
}

/// Thread-safe, persistently-backed config cache keyed by escrow address.
#[derive(Clone)]
pub struct ConfigCache {
    inner: Arc<DashMap<Address, StaticEscrowConfig>>,
    persistence_path: Option<String>,
    version: u32,
}

impl ConfigCache {
    /// Create an empty cache. `persistence_path = None` keeps it in memory only.
    pub fn new(persistence_path: Option<String>, version: u32) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            persistence_path,
            version,
        }
    }

    /// Load from file if it exists and its version matches; otherwise start empty.
    pub fn load_from_file(path: &str, version: u32) -> std::io::Result<Self> {
        let cache = Self::new(Some(path.to_string()), version);
        if Path::new(path).exists() {
            let file = File::open(path)?;
            let reader = BufReader::new(file);
            match serde_json::from_reader::<_, CacheFile>(reader) {
                Ok(parsed) if parsed.version == version => {
                    for (k, v) in parsed.entries {
                        cache.inner.insert(k, v);
                    }
                    tracing::info!(
                        entries = cache.inner.len(),
                        "Loaded static config cache"
                    );
                }
                Ok(parsed) => {
                    tracing::info!(
                        found = parsed.version,
                        expected = version,
                        "Discarding static config cache from older version"
                    );
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Static config cache unreadable, starting empty");
                }
            }
        }
        Ok(cache)
    }

    /// Save to file. No-op for in-memory caches.
    pub fn save_to_file(&self) -> std::io::Result<()> {
        if let Some(path) = &self.persistence_path {
            let file = File::create(path)?;
            let writer = BufWriter::new(file);

            let entries: HashMap<_, _> = self
                .inner
                .iter()
                .map(|r| (*r.key(), r.value().clone()))
                .collect();

            serde_json::to_writer(
                writer,
                &CacheFile {
                    version: self.version,
                    entries,
                },
            )?;
            tracing::debug!("Saved static config cache");
        }
        Ok(())
    }

    /// Cached config for an escrow, if present.
    pub fn get(&self, escrow: &Address) -> Option<StaticEscrowConfig> {
        self.inner.get(escrow).map(|r| r.value().clone())
    }

    /// Insert or replace the config for an escrow and persist.
    pub fn set(&self, escrow: Address, config: StaticEscrowConfig) {
        self.inner.insert(escrow, config);
        if let Err(e) = self.save_to_file() {
            tracing::warn!(error = %e, "Failed to persist static config cache");
        }
    }

    /// Drop everything, including the persisted file's contents.
    pub fn clear(&self) {
        self.inner.clear();
        if let Err(e) = self.save_to_file() {
            tracing::warn!(error = %e, "Failed to persist static config cache");
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::static_config::sample_config;

    #[test]
    fn test_cache_operations() {
        let cache = ConfigCache::new(None, 1);
        let escrow = Address::ZERO;

        assert!(cache.get(&escrow).is_none());

        cache.set(escrow, sample_config());
        let cached = cache.get(&escrow).unwrap();
        assert_eq!(cached.migration_start_time, 1_700_000_000);

        cache.clear();
        assert!(cache.get(&escrow).is_none());
    }

    #[test]
    fn test_persistence() {
        let path = "test_config_cache_persistence.json";

        let cache = ConfigCache::new(Some(path.to_string()), 1);
        cache.set(Address::ZERO, sample_config());

        let loaded = ConfigCache::load_from_file(path, 1).unwrap();
        assert_eq!(loaded.get(&Address::ZERO).unwrap(), sample_config());

        std::fs::remove_file(path).unwrap_or_default();
    }

    #[test]
    fn test_version_bump_invalidates() {
        let path = "test_config_cache_version.json";

        let cache = ConfigCache::new(Some(path.to_string()), 1);
        cache.set(Address::ZERO, sample_config());

        let loaded = ConfigCache::load_from_file(path, 2).unwrap();
        assert!(loaded.is_empty());

        std::fs::remove_file(path).unwrap_or_default();
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let path = "test_config_cache_corrupt.json";
        std::fs::write(path, "{ not json").unwrap();

        let loaded = ConfigCache::load_from_file(path, 1).unwrap();
        assert!(loaded.is_empty());

        std::fs::remove_file(path).unwrap_or_default();
    }
}
