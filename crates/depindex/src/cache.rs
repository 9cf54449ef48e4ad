//! The bounded in-process `name → latest version` mapping of
//! `spec.md` §4.6, kept coherent with the store's `latest-version` keys
//! on every write and never populated from a query-time read.

use crate::config::IndexConfig;
use dashmap::DashMap;
use std::time::Instant;

struct Entry {
    version: String,
    inserted_at: Instant,
}

/// A bounded cache of each package's latest known version.
///
/// Mirrors the eviction strategy of the HTTP response cache this
/// workspace already ships elsewhere: when the cache is full, the
/// oldest ~10% of entries (by insertion time) are evicted to make
/// room, rather than tracking per-entry access recency.
pub struct LatestVersionCache {
    entries: DashMap<String, Entry>,
    capacity: usize,
    eviction_fraction: f64,
}

impl LatestVersionCache {
    pub fn new(config: &IndexConfig) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: config.latest_cache_capacity,
            eviction_fraction: config.latest_cache_eviction_fraction,
        }
    }

    /// Returns the cached latest version of `name`, if present.
    pub fn get(&self, name: &str) -> Option<String> {
        self.entries.get(name).map(|e| e.version.clone())
    }

    /// Records `name`'s latest version as `version`, evicting old
    /// entries first if the cache is already at capacity.
    pub fn insert(&self, name: &str, version: &str) {
        if self.entries.len() >= self.capacity {
            self.evict();
        }
        self.entries.insert(
            name.to_string(),
            Entry {
                version: version.to_string(),
                inserted_at: Instant::now(),
            },
        );
    }

    fn evict(&self) {
        let target_removals = ((self.capacity as f64) * self.eviction_fraction).ceil() as usize;
        let mut by_age: Vec<(String, Instant)> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().inserted_at))
            .collect();
        by_age.sort_by_key(|(_, t)| *t);

        let removed = by_age.len().min(target_removals);
        for (name, _) in by_age.into_iter().take(target_removals) {
            self.entries.remove(&name);
        }
        tracing::debug!("evicted {} latest-version cache entries", removed);
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
