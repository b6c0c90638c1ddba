//! In-process durable medium.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::error::{Result, StorageError};
use crate::storage::DurableMedium;

/// A durable medium held in process memory.
///
/// Outlives any cache built on it, which makes it the stand-in for device
/// storage in tests. It can be given a byte quota and switched offline to
/// exercise the failure paths.
#[derive(Debug, Default)]
pub struct MemoryMedium {
    items: RefCell<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
    available: Cell<bool>,
}

impl MemoryMedium {
    pub fn new() -> Self {
        Self {
            items: RefCell::new(BTreeMap::new()),
            quota_bytes: None,
            available: Cell::new(true),
        }
    }

    /// Creates a medium that rejects writes pushing total key+value bytes
    /// past `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::new()
        }
    }

    /// Simulates the medium going away (or coming back).
    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }

    /// Bytes in use, counting keys and values.
    pub fn used_bytes(&self) -> usize {
        self.items
            .borrow()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available.get() {
            Ok(())
        } else {
            Err(StorageError::Unavailable("memory medium offline".to_string()))
        }
    }
}

impl DurableMedium for MemoryMedium {
    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_available()?;

        if let Some(limit) = self.quota_bytes {
            let replaced = self
                .items
                .borrow()
                .get(key)
                .map(|old| key.len() + old.len())
                .unwrap_or(0);
            let needed = self.used_bytes() - replaced + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }

        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.ensure_available()?;
        Ok(self.items.borrow().get(key).cloned())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.ensure_available()?;
        self.items.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.ensure_available()?;
        self.items.borrow_mut().clear();
        Ok(())
    }
}
