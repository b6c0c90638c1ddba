//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use serde::{Deserialize, Serialize};

// == Cache Entry ==
/// A cached value together with the moment it was written.
///
/// This is also the durable document format: serialized as
/// `{"value": ..., "writtenAtMillis": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Write timestamp (Unix milliseconds)
    pub written_at_millis: i64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with `now`.
    pub fn new(value: V, now: i64) -> Self {
        Self {
            value,
            written_at_millis: now,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl_millis` at time `now`.
    ///
    /// Boundary condition: an entry whose age equals the TTL exactly is still
    /// visible; it expires once the age is strictly greater.
    pub fn is_expired(&self, now: i64, ttl_millis: u64) -> bool {
        let ttl = i64::try_from(ttl_millis).unwrap_or(i64::MAX);
        now.saturating_sub(self.written_at_millis) > ttl
    }
}
