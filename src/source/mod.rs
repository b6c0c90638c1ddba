//! Product Source Module
//!
//! Where the catalog comes from when the cache cannot answer.

mod http;

pub use http::HttpProductSource;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::Product;

/// A read-only remote catalog.
///
/// The stores are single-threaded, so implementations need not be `Send`.
#[async_trait(?Send)]
pub trait ProductSource {
    /// Fetches the full product list.
    async fn fetch_products(&self) -> Result<Vec<Product>, FetchError>;
}
