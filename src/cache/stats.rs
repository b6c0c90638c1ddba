//! Cache Statistics Module
//!
//! Tracks per-tier hits, misses, expirations, evictions and degraded writes.

use serde::Serialize;

// == Cache Stats ==
/// Tracks tiered cache behaviour.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Reads answered by the memory tier
    pub memory_hits: u64,
    /// Reads answered by the durable tier and promoted into memory
    pub durable_hits: u64,
    /// Reads that found nothing live in either tier
    pub misses: u64,
    /// Entries purged because their TTL had elapsed
    pub expirations: u64,
    /// Memory-tier entries evicted to respect capacity
    pub evictions: u64,
    /// Writes whose durable half failed
    pub degraded_writes: u64,
    /// Removals or clears the durable medium rejected
    pub failed_invalidations: u64,
    /// Current number of entries in the memory tier
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Fraction of reads answered by either tier, or 0.0 with no reads.
    pub fn hit_rate(&self) -> f64 {
        let hits = self.memory_hits + self.durable_hits;
        let total = hits + self.misses;
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    pub fn record_memory_hit(&mut self) {
        self.memory_hits += 1;
    }

    pub fn record_durable_hit(&mut self) {
        self.durable_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_degraded_write(&mut self) {
        self.degraded_writes += 1;
    }

    pub fn record_failed_invalidation(&mut self) {
        self.failed_invalidations += 1;
    }

    // == Update Entry Count ==
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats, CacheStats::default());
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_counts_both_tiers() {
        let mut stats = CacheStats::new();
        stats.record_memory_hit();
        stats.record_durable_hit();
        stats.record_miss();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_record_counters() {
        let mut stats = CacheStats::new();
        stats.record_eviction();
        stats.record_eviction();
        stats.record_expiration();
        stats.record_degraded_write();
        stats.record_failed_invalidation();
        assert_eq!(stats.evictions, 2);
        assert_eq!(stats.failed_invalidations, 1);
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.degraded_writes, 1);
    }
}
