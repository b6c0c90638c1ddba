//! Change Notification Module
//!
//! Observer lists for store change notifications and dispatcher
//! subscriptions.
//!
//! Callbacks are invoked from a snapshot of the list taken at emit time, and
//! no internal borrow is held while they run, so a callback may subscribe,
//! unsubscribe, emit again or call back into the store that notified it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

/// Kinds of notification a store emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreEvent {
    /// State changed; re-read it.
    Change,
}

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// == Subscribers ==
/// Ordered list of callbacks of type `F`.
pub struct Subscribers<F: ?Sized> {
    entries: RefCell<Vec<(SubscriptionId, Rc<F>)>>,
    next_id: Cell<u64>,
}

impl<F: ?Sized> Default for Subscribers<F> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }
}

impl<F: ?Sized> Subscribers<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `callback`; it runs after every earlier subscriber.
    pub fn add(&self, callback: Rc<F>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, callback));
        id
    }

    /// Returns whether `id` was subscribed.
    pub fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        entries.len() != before
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Current callbacks in subscription order.
    pub fn snapshot(&self) -> Vec<Rc<F>> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

// == Event Emitter ==
/// Payload-free change notifications, one listener list per event kind.
#[derive(Default)]
pub struct EventEmitter {
    change: Subscribers<dyn Fn()>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    fn listeners(&self, event: StoreEvent) -> &Subscribers<dyn Fn()> {
        match event {
            StoreEvent::Change => &self.change,
        }
    }

    /// Registers `callback` for `event`.
    pub fn on(&self, event: StoreEvent, callback: impl Fn() + 'static) -> SubscriptionId {
        self.listeners(event).add(Rc::new(callback))
    }

    /// Unregisters one listener.
    pub fn off(&self, event: StoreEvent, id: SubscriptionId) -> bool {
        self.listeners(event).remove(id)
    }

    pub fn remove_all_listeners(&self, event: StoreEvent) {
        self.listeners(event).clear();
    }

    /// Synchronously calls every listener of `event` in registration order.
    ///
    /// Returns the number of listeners notified.
    pub fn emit(&self, event: StoreEvent) -> usize {
        let callbacks = self.listeners(event).snapshot();
        trace!("Emitting {:?} to {} listeners", event, callbacks.len());
        for callback in &callbacks {
            callback();
        }
        callbacks.len()
    }

    pub fn listener_count(&self, event: StoreEvent) -> usize {
        self.listeners(event).len()
    }
}
