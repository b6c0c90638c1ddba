//! Stores Module
//!
//! Stateful, observable stores persisted through the tiered cache.
//!
//! # Stores
//! - Cart: shopping cart lines, mutated by dispatched actions
//! - Products: catalog, loaded from cache or the remote source

mod cart;
mod products;

pub use cart::{CartStore, CART_CACHE_KEY};
pub use products::{ProductStore, PRODUCTS_CACHE_KEY};
