//! Domain models shared by the stores
//!
//! Cart lines, catalog products and the action messages that drive the cart.

pub mod action;
pub mod cart;
pub mod product;

// Re-export commonly used types
pub use action::Action;
pub use cart::{CartItem, NewCartItem};
pub use product::{Product, Rating};
