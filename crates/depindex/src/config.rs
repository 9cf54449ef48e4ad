//! Runtime configuration for the Latest-Version Cache.
//!
//! `spec.md` §4.6 fixes the cache's shape (bounded, evict-by-recency)
//! but leaves its capacity and eviction fraction implementation-defined;
//! this is where those two free parameters live.

use serde::Deserialize;

fn default_capacity() -> usize {
    1000
}

fn default_eviction_fraction() -> f64 {
    0.1
}

/// Configuration for [`crate::DepIndex`].
///
/// # Examples
///
/// ```
/// use depindex::IndexConfig;
///
/// let config: IndexConfig = serde_json::from_str("{}").unwrap();
/// assert_eq!(config.latest_cache_capacity, 1000);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    #[serde(default = "default_capacity")]
    pub latest_cache_capacity: usize,
    #[serde(default = "default_eviction_fraction")]
    pub latest_cache_eviction_fraction: f64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            latest_cache_capacity: default_capacity(),
            latest_cache_eviction_fraction: default_eviction_fraction(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let config = IndexConfig::default();
        assert_eq!(config.latest_cache_capacity, 1000);
        assert!((config.latest_cache_eviction_fraction - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn deserializes_partial_overrides() {
        let config: IndexConfig = serde_json::from_str(r#"{"latest_cache_capacity": 50}"#).unwrap();
        assert_eq!(config.latest_cache_capacity, 50);
        assert!((config.latest_cache_eviction_fraction - 0.1).abs() < f64::EPSILON);
    }
}
