//! Cart action intents.

use std::rc::Rc;

use tracing::debug;

use crate::dispatcher::Dispatcher;
use crate::models::{Action, NewCartItem};

/// Packages cart intents as actions and submits them to the dispatcher.
#[derive(Clone)]
pub struct CartActions {
    dispatcher: Rc<Dispatcher>,
}

impl CartActions {
    pub fn new(dispatcher: Rc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn add_item(&self, item: NewCartItem) {
        debug!("CartActions: dispatching ADD_ITEM for '{}'", item.id);
        self.dispatcher.dispatch(Action::AddItem(item));
    }

    pub fn remove_item(&self, id: impl Into<String>) {
        self.dispatcher.dispatch(Action::RemoveItem { id: id.into() });
    }

    pub fn update_quantity(&self, id: impl Into<String>, quantity: i64) {
        self.dispatcher.dispatch(Action::UpdateQuantity {
            id: id.into(),
            quantity,
        });
    }

    pub fn clear_cart(&self) {
        self.dispatcher.dispatch(Action::ClearCart);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::cell::RefCell;

    #[test]
    fn test_intents_produce_typed_actions() {
        let dispatcher = Rc::new(Dispatcher::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        dispatcher.subscribe(move |action| s.borrow_mut().push(action.clone()));

        let actions = CartActions::new(dispatcher);
        let item = NewCartItem::new("7", "Ring", Decimal::from(5), "ring.png");
        actions.add_item(item.clone());
        actions.remove_item("7");
        actions.update_quantity("7", 4);
        actions.clear_cart();

        assert_eq!(
            *seen.borrow(),
            vec![
                Action::AddItem(item),
                Action::RemoveItem { id: "7".to_string() },
                Action::UpdateQuantity {
                    id: "7".to_string(),
                    quantity: 4
                },
                Action::ClearCart,
            ]
        );
    }
}
