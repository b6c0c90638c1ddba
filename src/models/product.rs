//! Catalog product types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::NewCartItem;

/// Customer rating summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u64,
}

/// A catalog product as served by the remote source.
///
/// Fields the storefront does not use (e.g. `category`) are ignored on
/// deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: Decimal,
    pub description: String,
    /// Image URL
    pub image: String,
    pub rating: Rating,
}

impl Product {
    /// The add-to-cart payload for this product.
    pub fn to_cart_item(&self) -> NewCartItem {
        NewCartItem::new(
            self.id.to_string(),
            self.title.clone(),
            self.price,
            self.image.clone(),
        )
    }
}
