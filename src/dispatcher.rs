//! Dispatcher Module
//!
//! The single publish point for action messages.

use std::rc::Rc;

use tracing::debug;

use crate::events::{SubscriptionId, Subscribers};
use crate::models::Action;

/// Fans each dispatched action out to every subscriber.
///
/// Dispatch is synchronous: all subscribers registered when `dispatch` is
/// called have run, in subscription order, by the time it returns. A
/// subscriber may dispatch again from inside its callback.
#[derive(Default)]
pub struct Dispatcher {
    subscribers: Subscribers<dyn Fn(&Action)>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` for every future action.
    pub fn subscribe(&self, callback: impl Fn(&Action) + 'static) -> SubscriptionId {
        self.subscribers.add(Rc::new(callback))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // == Dispatch ==
    /// Delivers `action` to all current subscribers.
    pub fn dispatch(&self, action: Action) {
        let subscribers = self.subscribers.snapshot();
        debug!(
            "Dispatching {} to {} subscribers",
            action.kind(),
            subscribers.len()
        );
        for subscriber in &subscribers {
            subscriber(&action);
        }
    }
}
