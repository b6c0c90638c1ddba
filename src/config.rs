//! Configuration Module
//!
//! Handles loading storefront configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::CachePolicy;

/// Default product catalog endpoint.
pub const DEFAULT_PRODUCTS_URL: &str = "https://fakestoreapi.com/products";

/// Storefront configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL and capacity of the cart cache
    pub cart_cache: CachePolicy,
    /// TTL and capacity of the product cache
    pub product_cache: CachePolicy,
    /// Endpoint returning the product catalog as a JSON array
    pub products_url: String,
    /// Directory holding the durable cache tier
    pub storage_dir: PathBuf,
    /// Byte quota of the durable cache tier
    pub storage_quota_bytes: usize,
    /// Memory-tier sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CART_TTL_MS` - Cart entry TTL in milliseconds (default: 24 hours)
    /// - `CART_MAX_ENTRIES` - Cart cache capacity (default: 1000)
    /// - `PRODUCTS_TTL_MS` - Product entry TTL in milliseconds (default: 30 minutes)
    /// - `PRODUCTS_MAX_ENTRIES` - Product cache capacity (default: 100)
    /// - `PRODUCTS_URL` - Catalog endpoint (default: fakestoreapi.com)
    /// - `STORAGE_DIR` - Durable tier directory (default: `.storefront`)
    /// - `STORAGE_QUOTA_BYTES` - Durable tier quota (default: 5 MiB)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cart_cache: CachePolicy {
                ttl_millis: parse_env("CART_TTL_MS").unwrap_or(defaults.cart_cache.ttl_millis),
                max_entries: parse_env("CART_MAX_ENTRIES")
                    .unwrap_or(defaults.cart_cache.max_entries),
            },
            product_cache: CachePolicy {
                ttl_millis: parse_env("PRODUCTS_TTL_MS")
                    .unwrap_or(defaults.product_cache.ttl_millis),
                max_entries: parse_env("PRODUCTS_MAX_ENTRIES")
                    .unwrap_or(defaults.product_cache.max_entries),
            },
            products_url: env::var("PRODUCTS_URL").unwrap_or(defaults.products_url),
            storage_dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            storage_quota_bytes: parse_env("STORAGE_QUOTA_BYTES")
                .unwrap_or(defaults.storage_quota_bytes),
            cleanup_interval: parse_env("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cart_cache: CachePolicy {
                ttl_millis: 24 * 60 * 60 * 1000,
                max_entries: 1000,
            },
            product_cache: CachePolicy {
                ttl_millis: 30 * 60 * 1000,
                max_entries: 100,
            },
            products_url: DEFAULT_PRODUCTS_URL.to_string(),
            storage_dir: PathBuf::from(".storefront"),
            storage_quota_bytes: 5 * 1024 * 1024,
            cleanup_interval: 60,
        }
    }
}
