//! Error types for the storefront
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Storage Error Enum ==
/// Failure of the durable medium backing the second cache tier.
///
/// These never reach callers of the cache or the stores; the tiered cache
/// logs them and reports a degraded write instead.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Writing would exceed the medium's byte quota
    #[error("Quota exceeded writing '{key}': {needed} bytes needed, {limit} byte limit")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    /// The medium cannot be reached at all
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Filesystem failure in a file-backed medium
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// == Fetch Error Enum ==
/// Failure to obtain the product catalog from its remote source.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, DNS or timeout failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The source answered with a non-2xx status
    #[error("Failed to fetch products: HTTP {0}")]
    Status(u16),

    /// The response body was not a product list
    #[error("Invalid product payload: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for durable storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
