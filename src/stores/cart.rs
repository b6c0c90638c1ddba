//! Cart Store
//!
//! Authoritative cart state with write-through persistence.

use std::cell::RefCell;
use std::rc::Rc;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::cache::TieredCache;
use crate::events::{EventEmitter, StoreEvent, SubscriptionId};
use crate::models::{Action, CartItem, NewCartItem};

/// Key the cart is persisted under.
pub const CART_CACHE_KEY: &str = "shopping_cart";

/// The shopping cart.
///
/// Every mutation updates the in-memory lines, writes the whole cart through
/// the cache, then emits [`StoreEvent::Change`].
pub struct CartStore {
    items: RefCell<Vec<CartItem>>,
    cache: Rc<TieredCache<Vec<CartItem>>>,
    events: EventEmitter,
}

impl CartStore {
    // == Constructor ==
    /// Creates the store, adopting a persisted cart if the cache has one.
    pub fn new(cache: Rc<TieredCache<Vec<CartItem>>>) -> Self {
        let store = Self {
            items: RefCell::new(Vec::new()),
            cache,
            events: EventEmitter::new(),
        };
        store.load_from_cache();
        store
    }

    fn load_from_cache(&self) {
        if let Some(items) = self.cache.get(CART_CACHE_KEY) {
            info!("CartStore: restored {} items from cache", items.len());
            *self.items.borrow_mut() = items;
            self.events.emit(StoreEvent::Change);
        }
    }

    fn commit(&self) {
        let snapshot = self.items.borrow().clone();
        let count = snapshot.len();
        self.cache.set(CART_CACHE_KEY, snapshot);
        debug!("CartStore: {} items committed", count);
        self.events.emit(StoreEvent::Change);
    }

    // == Reads ==
    /// A copy of the current lines.
    pub fn get_items(&self) -> Vec<CartItem> {
        self.items.borrow().clone()
    }

    /// Sum of price × quantity over all lines, saturating at `Decimal::MAX`.
    pub fn get_total(&self) -> Decimal {
        self.items
            .borrow()
            .iter()
            .map(CartItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.borrow().len()
    }

    // == Mutations ==
    /// Adds one unit of `item`, appending a new line on first add.
    pub fn add_item(&self, item: NewCartItem) {
        debug!("CartStore: adding '{}'", item.id);
        {
            let mut items = self.items.borrow_mut();
            match items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(1);
                    debug!(
                        "CartStore: '{}' quantity now {}",
                        existing.id, existing.quantity
                    );
                }
                None => items.push(CartItem::from(item)),
            }
        }
        self.commit();
    }

    /// Removes the line for `id`. Persists and notifies even if absent.
    pub fn remove_item(&self, id: &str) {
        self.items.borrow_mut().retain(|item| item.id != id);
        self.commit();
    }

    /// Sets the quantity of an existing line.
    ///
    /// Negative quantities clamp to zero and zero removes the line. Ids not
    /// in the cart are ignored without a notification.
    pub fn update_quantity(&self, id: &str, quantity: i64) {
        let clamped = quantity.max(0);
        {
            let mut items = self.items.borrow_mut();
            let Some(item) = items.iter_mut().find(|item| item.id == id) else {
                debug!("CartStore: ignoring quantity update for unknown '{}'", id);
                return;
            };
            if clamped > 0 {
                item.quantity = u32::try_from(clamped).unwrap_or(u32::MAX);
            }
        }

        if clamped == 0 {
            self.remove_item(id);
        } else {
            self.commit();
        }
    }

    /// Removes every line.
    pub fn clear_cart(&self) {
        self.items.borrow_mut().clear();
        self.commit();
    }

    // == Dispatcher Hook ==
    /// Applies a dispatched action to the cart.
    pub fn handle(&self, action: &Action) {
        match action {
            Action::AddItem(item) => self.add_item(item.clone()),
            Action::RemoveItem { id } => self.remove_item(id),
            Action::UpdateQuantity { id, quantity } => self.update_quantity(id, *quantity),
            Action::ClearCart => self.clear_cart(),
        }
    }

    // == Change Notifications ==
    pub fn on(&self, event: StoreEvent, callback: impl Fn() + 'static) -> SubscriptionId {
        self.events.on(event, callback)
    }

    pub fn off(&self, event: StoreEvent, id: SubscriptionId) -> bool {
        self.events.off(event, id)
    }

    pub fn remove_all_listeners(&self, event: StoreEvent) {
        self.events.remove_all_listeners(event);
    }
}
