//! Tiered Cache Module
//!
//! Main cache engine: an insertion-ordered memory tier in front of a durable
//! medium, both governed by one TTL and one capacity.

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CachePolicy, CacheStats, Clock, InsertionOrder, SystemClock};
use crate::storage::DurableMedium;

// == Write Outcome ==
/// Result of a write that always lands in memory but may miss the durable tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Both tiers hold the write
    Ok,
    /// Memory holds the write; the durable medium rejected it
    Degraded { reason: String },
}

impl WriteOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, WriteOutcome::Degraded { .. })
    }
}

// == Memory Tier ==
#[derive(Debug)]
struct MemoryTier<V> {
    entries: HashMap<String, CacheEntry<V>>,
    order: InsertionOrder,
}

impl<V> MemoryTier<V> {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
        }
    }

    fn remove(&mut self, key: &str) -> bool {
        self.order.remove(key);
        self.entries.remove(key).is_some()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

// == Tiered Cache ==
/// Two-tier key/value cache with TTL expiry and FIFO eviction.
///
/// Reads check memory, then the durable medium, promoting durable hits into
/// memory. Writes go to both tiers; a durable failure degrades the write but
/// never fails it.
///
/// The cache is single-threaded: state lives in `RefCell`s and no borrow is
/// held once a method returns.
pub struct TieredCache<V> {
    /// Name used in logs
    namespace: String,
    /// Fixed on first `configure` or first use, whichever comes first
    policy: OnceCell<CachePolicy>,
    memory: RefCell<MemoryTier<V>>,
    durable: Rc<dyn DurableMedium>,
    clock: Rc<dyn Clock>,
    stats: RefCell<CacheStats>,
}

impl<V> TieredCache<V>
where
    V: Clone + Serialize + DeserializeOwned,
{
    // == Constructor ==
    /// Creates an unconfigured cache over `durable` using wall-clock time.
    pub fn new(namespace: impl Into<String>, durable: Rc<dyn DurableMedium>) -> Self {
        Self::with_clock(namespace, durable, Rc::new(SystemClock))
    }

    /// Creates an unconfigured cache reading time from `clock`.
    pub fn with_clock(
        namespace: impl Into<String>,
        durable: Rc<dyn DurableMedium>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            policy: OnceCell::new(),
            memory: RefCell::new(MemoryTier::new()),
            durable,
            clock,
            stats: RefCell::new(CacheStats::new()),
        }
    }

    // == Configure ==
    /// Fixes the TTL and capacity for the lifetime of this cache.
    ///
    /// Only the first call takes effect; a cache used before being configured
    /// is locked to [`CachePolicy::default`]. Returns whether this call set
    /// the policy.
    pub fn configure(&self, policy: CachePolicy) -> bool {
        let policy = policy.normalized();
        match self.policy.set(policy) {
            Ok(()) => {
                debug!(
                    "Cache '{}' configured: ttl={}ms, max_entries={}",
                    self.namespace, policy.ttl_millis, policy.max_entries
                );
                true
            }
            Err(_) => {
                let current = self.policy();
                if current != policy {
                    warn!(
                        "Cache '{}' already configured (ttl={}ms, max_entries={}); ignoring ttl={}ms, max_entries={}",
                        self.namespace,
                        current.ttl_millis,
                        current.max_entries,
                        policy.ttl_millis,
                        policy.max_entries
                    );
                }
                false
            }
        }
    }

    /// The policy in force.
    pub fn policy(&self) -> CachePolicy {
        *self.policy.get_or_init(CachePolicy::default)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    // == Set ==
    /// Stores `value` under `key` in both tiers.
    ///
    /// If the key is new and the memory tier is full, the earliest inserted
    /// key is evicted first. The memory write always stands.
    pub fn set(&self, key: &str, value: V) -> WriteOutcome {
        let entry = CacheEntry::new(value, self.clock.now_millis());
        let outcome = self.write_durable(key, &entry);
        self.insert_memory(key, entry);
        outcome
    }

    // == Get ==
    /// Returns the live value under `key`, or `None`.
    ///
    /// Expired entries are purged from whichever tier held them. A durable
    /// hit is promoted into memory with its original write time.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now_millis();
        let ttl = self.policy().ttl_millis;

        {
            let mut memory = self.memory.borrow_mut();
            let expired = match memory.entries.get(key) {
                Some(entry) if !entry.is_expired(now, ttl) => {
                    self.stats.borrow_mut().record_memory_hit();
                    return Some(entry.value.clone());
                }
                Some(_) => true,
                None => false,
            };
            if expired {
                memory.remove(key);
                self.stats.borrow_mut().record_expiration();
                debug!("Cache '{}': memory entry '{}' expired", self.namespace, key);
            }
        }

        match self.read_durable(key, now, ttl) {
            Some(entry) => {
                let value = entry.value.clone();
                self.insert_memory(key, entry);
                self.stats.borrow_mut().record_durable_hit();
                debug!("Cache '{}': promoted '{}' from durable tier", self.namespace, key);
                Some(value)
            }
            None => {
                self.stats.borrow_mut().record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Removes `key` from both tiers.
    pub fn remove(&self, key: &str) -> WriteOutcome {
        self.memory.borrow_mut().remove(key);
        self.sync_entry_count();
        match self.durable.remove_item(key) {
            Ok(()) => WriteOutcome::Ok,
            Err(e) => self.degraded("remove", key, e.to_string()),
        }
    }

    // == Clear ==
    /// Empties the memory tier and the entire durable medium.
    ///
    /// The durable medium may be shared with other caches; their persisted
    /// entries go too.
    pub fn clear(&self) -> WriteOutcome {
        self.memory.borrow_mut().clear();
        self.sync_entry_count();
        match self.durable.clear() {
            Ok(()) => {
                debug!("Cache '{}' cleared", self.namespace);
                WriteOutcome::Ok
            }
            Err(e) => self.degraded("clear", "*", e.to_string()),
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the memory tier.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = self.clock.now_millis();
        let ttl = self.policy().ttl_millis;
        let mut memory = self.memory.borrow_mut();

        let expired_keys: Vec<String> = memory
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now, ttl))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            memory.remove(key);
        }
        let remaining = memory.entries.len();
        drop(memory);

        let mut stats = self.stats.borrow_mut();
        stats.expirations += expired_keys.len() as u64;
        stats.set_total_entries(remaining);
        expired_keys.len()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.borrow().clone();
        stats.set_total_entries(self.len());
        stats
    }

    /// Number of entries resident in the memory tier.
    pub fn len(&self) -> usize {
        self.memory.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the memory tier holds `key`, live or not.
    pub fn in_memory(&self, key: &str) -> bool {
        self.memory.borrow().entries.contains_key(key)
    }

    fn insert_memory(&self, key: &str, entry: CacheEntry<V>) {
        let max_entries = self.policy().max_entries;
        let mut memory = self.memory.borrow_mut();

        if !memory.entries.contains_key(key) && memory.entries.len() >= max_entries {
            if let Some(evicted) = memory.order.evict_oldest() {
                memory.entries.remove(&evicted);
                self.stats.borrow_mut().record_eviction();
                debug!("Cache '{}': evicted '{}'", self.namespace, evicted);
            }
        }

        memory.entries.insert(key.to_string(), entry);
        memory.order.insert(key);
        let count = memory.entries.len();
        drop(memory);
        self.stats.borrow_mut().set_total_entries(count);
    }

    fn write_durable(&self, key: &str, entry: &CacheEntry<V>) -> WriteOutcome {
        let document = match serde_json::to_string(entry) {
            Ok(document) => document,
            Err(e) => return self.degraded("serialize", key, e.to_string()),
        };
        match self.durable.set_item(key, &document) {
            Ok(()) => WriteOutcome::Ok,
            Err(e) => self.degraded("write", key, e.to_string()),
        }
    }

    fn read_durable(&self, key: &str, now: i64, ttl: u64) -> Option<CacheEntry<V>> {
        let document = match self.durable.get_item(key) {
            Ok(Some(document)) => document,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache '{}': durable read of '{}' failed: {}", self.namespace, key, e);
                return None;
            }
        };

        let entry: CacheEntry<V> = match serde_json::from_str(&document) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(
                    "Cache '{}': unreadable durable entry '{}': {}",
                    self.namespace, key, e
                );
                return None;
            }
        };

        if entry.is_expired(now, ttl) {
            self.stats.borrow_mut().record_expiration();
            debug!("Cache '{}': durable entry '{}' expired", self.namespace, key);
            if let Err(e) = self.durable.remove_item(key) {
                warn!(
                    "Cache '{}': failed to purge expired '{}': {}",
                    self.namespace, key, e
                );
            }
            return None;
        }

        Some(entry)
    }

    fn degraded(&self, op: &str, key: &str, reason: String) -> WriteOutcome {
        warn!(
            "Cache '{}': durable {} of '{}' failed, memory tier only: {}",
            self.namespace, op, key, reason
        );
        let mut stats = self.stats.borrow_mut();
        match op {
            "remove" | "clear" => stats.record_failed_invalidation(),
            _ => stats.record_degraded_write(),
        }
        WriteOutcome::Degraded { reason }
    }

    fn sync_entry_count(&self) {
        let count = self.len();
        self.stats.borrow_mut().set_total_entries(count);
    }
}
