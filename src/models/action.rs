//! Action messages carried by the dispatcher.

use crate::models::NewCartItem;

/// An intended change to the cart.
///
/// Each variant carries its own payload; subscribers match on the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddItem(NewCartItem),
    RemoveItem { id: String },
    UpdateQuantity { id: String, quantity: i64 },
    ClearCart,
}

impl Action {
    /// Upper-case name of the action kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::AddItem(_) => "ADD_ITEM",
            Action::RemoveItem { .. } => "REMOVE_ITEM",
            Action::UpdateQuantity { .. } => "UPDATE_QUANTITY",
            Action::ClearCart => "CLEAR_CART",
        }
    }
}
