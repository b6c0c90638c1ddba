//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired entries out of the
//! memory tiers.

use std::rc::Rc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ExpirySweep;

/// Spawns a local task that periodically sweeps expired memory-tier entries.
///
/// Expired entries are already invisible to readers; the sweep only returns
/// their memory early. The caches are `!Send`, so the task is spawned with
/// [`tokio::task::spawn_local`] and must run inside a
/// [`tokio::task::LocalSet`].
///
/// # Arguments
/// * `caches` - Caches to sweep on every tick
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle that can be aborted on shutdown.
pub fn spawn_cleanup_task(
    caches: Vec<Rc<dyn ExpirySweep>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::task::spawn_local(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            for cache in &caches {
                let removed = cache.cleanup_expired();
                if removed > 0 {
                    info!(
                        "TTL cleanup: removed {} expired entries from '{}'",
                        removed,
                        cache.namespace()
                    );
                } else {
                    debug!("TTL cleanup: nothing expired in '{}'", cache.namespace());
                }
            }
        }
    })
}
