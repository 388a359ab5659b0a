//! SIEVE Cache Metrics
//!
//! Metrics specific to the SIEVE eviction algorithm.

use super::{CacheMetrics, CoreCacheMetrics};
use std::collections::BTreeMap;

/// SIEVE-specific metrics (extends [`CoreCacheMetrics`]).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SieveCacheMetrics {
    /// Core metrics common to all cache algorithms.
    pub core: CoreCacheMetrics,

    /// Entries removed by a lookup after their TTL elapsed.
    pub expirations: u64,

    /// Visited bits cleared by the hand while searching for a victim.
    pub second_chances: u64,
}

impl SieveCacheMetrics {
    /// Creates a zeroed set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry dropped by lazy expiration.
    #[inline]
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    /// Records `n` entries spared by the hand during one eviction scan.
    #[inline]
    pub fn record_second_chances(&mut self, n: u64) {
        self.second_chances += n;
    }

    /// Converts the counters to a map with deterministic key order.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();
        metrics.insert("expirations".to_string(), self.expirations as f64);
        metrics.insert("second_chances".to_string(), self.second_chances as f64);
        metrics
    }
}

impl CacheMetrics for SieveCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "SIEVE"
    }
}
