//! Durable Storage Module
//!
//! The slow, persistent tier beneath the in-memory cache. Any key/value
//! medium that stores strings can serve as the durable tier.

mod file;
mod memory;

pub use file::FileMedium;
pub use memory::MemoryMedium;

use crate::error::Result;

/// A string key/value medium that survives the process.
///
/// Methods take `&self`; implementations use interior mutability so one
/// medium can be shared by several caches.
pub trait DurableMedium {
    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Returns the value under `key`, or `None` if there is none.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Removes every key.
    fn clear(&self) -> Result<()>;
}
