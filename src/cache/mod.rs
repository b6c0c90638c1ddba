//! Cache Module
//!
//! Provides a two-tier cache (memory + durable medium) with TTL expiration
//! and insertion-order eviction.

mod clock;
mod entry;
mod order;
mod stats;
mod tiered;


use serde::{Deserialize, Serialize};

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use order::InsertionOrder;
pub use stats::CacheStats;
pub use tiered::{TieredCache, WriteOutcome};

// == Public Constants ==
/// TTL applied when a cache is used without being configured
pub const DEFAULT_TTL_MILLIS: u64 = 5 * 60 * 1000;

/// Memory-tier capacity applied when a cache is used without being configured
pub const DEFAULT_MAX_ENTRIES: usize = 100;

// == Cache Policy ==
/// Expiry and capacity rules of one cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePolicy {
    /// Maximum entry age in milliseconds
    pub ttl_millis: u64,
    /// Maximum number of memory-tier entries
    pub max_entries: usize,
}

impl CachePolicy {
    pub fn new(ttl_millis: u64, max_entries: usize) -> Self {
        Self {
            ttl_millis,
            max_entries,
        }
    }

    /// Replaces zero fields with the defaults.
    pub fn normalized(self) -> Self {
        Self {
            ttl_millis: if self.ttl_millis == 0 {
                DEFAULT_TTL_MILLIS
            } else {
                self.ttl_millis
            },
            max_entries: if self.max_entries == 0 {
                DEFAULT_MAX_ENTRIES
            } else {
                self.max_entries
            },
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl_millis: DEFAULT_TTL_MILLIS,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// A cache whose memory tier can be swept of expired entries.
///
/// Lets the cleanup task hold caches of different value types.
pub trait ExpirySweep {
    fn namespace(&self) -> &str;
    fn cleanup_expired(&self) -> usize;
}

impl<V> ExpirySweep for TieredCache<V>
where
    V: Clone + Serialize + serde::de::DeserializeOwned,
{
    fn namespace(&self) -> &str {
        TieredCache::namespace(self)
    }

    fn cleanup_expired(&self) -> usize {
        TieredCache::cleanup_expired(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_default() {
        let policy = CachePolicy::default();
        assert_eq!(policy.ttl_millis, 300_000);
        assert_eq!(policy.max_entries, 100);
    }

    #[test]
    fn test_zero_fields_fall_back_to_defaults() {
        assert_eq!(CachePolicy::new(0, 0).normalized(), CachePolicy::default());
        assert_eq!(
            CachePolicy::new(10, 0).normalized(),
            CachePolicy::new(10, DEFAULT_MAX_ENTRIES)
        );
    }
}
