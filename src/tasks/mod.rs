//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the storefront is up.
//!
//! # Tasks
//! - TTL Cleanup: Sweeps expired entries out of the cache memory tiers

mod cleanup;

pub use cleanup::spawn_cleanup_task;
