//! Storefront Context
//!
//! Builds every long-lived component once and hands out references to them.

use std::rc::Rc;

use tracing::info;

use crate::actions::CartActions;
use crate::cache::{Clock, ExpirySweep, SystemClock, TieredCache};
use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::events::SubscriptionId;
use crate::models::{CartItem, Product};
use crate::source::ProductSource;
use crate::storage::DurableMedium;
use crate::stores::{CartStore, ProductStore};

/// The storefront's singletons, constructed together and shared by reference.
///
/// The cart and the catalog each get their own cache so their TTL and
/// capacity stay independent; both caches share one durable medium.
pub struct Storefront {
    dispatcher: Rc<Dispatcher>,
    cart_cache: Rc<TieredCache<Vec<CartItem>>>,
    product_cache: Rc<TieredCache<Vec<Product>>>,
    cart: Rc<CartStore>,
    products: Rc<ProductStore>,
    cart_subscription: SubscriptionId,
}

impl Storefront {
    /// Creates the storefront using wall-clock time.
    pub fn new(
        config: &Config,
        medium: Rc<dyn DurableMedium>,
        source: Rc<dyn ProductSource>,
    ) -> Self {
        Self::with_clock(config, medium, source, Rc::new(SystemClock))
    }

    /// Creates the storefront reading time from `clock`.
    ///
    /// The cart store is subscribed to the dispatcher before this returns.
    pub fn with_clock(
        config: &Config,
        medium: Rc<dyn DurableMedium>,
        source: Rc<dyn ProductSource>,
        clock: Rc<dyn Clock>,
    ) -> Self {
        let cart_cache: Rc<TieredCache<Vec<CartItem>>> = Rc::new(TieredCache::with_clock(
            "cart",
            medium.clone(),
            clock.clone(),
        ));
        cart_cache.configure(config.cart_cache);

        let product_cache: Rc<TieredCache<Vec<Product>>> =
            Rc::new(TieredCache::with_clock("products", medium, clock));
        product_cache.configure(config.product_cache);

        let dispatcher = Rc::new(Dispatcher::new());
        let cart = Rc::new(CartStore::new(cart_cache.clone()));
        let products = Rc::new(ProductStore::new(product_cache.clone(), source));

        let subscriber = cart.clone();
        let cart_subscription = dispatcher.subscribe(move |action| subscriber.handle(action));

        info!(
            "Storefront ready: {} cart items restored",
            cart.item_count()
        );

        Self {
            dispatcher,
            cart_cache,
            product_cache,
            cart,
            products,
            cart_subscription,
        }
    }

    pub fn dispatcher(&self) -> &Rc<Dispatcher> {
        &self.dispatcher
    }

    pub fn cart(&self) -> &Rc<CartStore> {
        &self.cart
    }

    pub fn products(&self) -> &Rc<ProductStore> {
        &self.products
    }

    pub fn cart_cache(&self) -> &Rc<TieredCache<Vec<CartItem>>> {
        &self.cart_cache
    }

    pub fn product_cache(&self) -> &Rc<TieredCache<Vec<Product>>> {
        &self.product_cache
    }

    /// Intent constructors bound to this storefront's dispatcher.
    pub fn cart_actions(&self) -> CartActions {
        CartActions::new(self.dispatcher.clone())
    }

    /// Both caches, for the background sweep.
    pub fn caches(&self) -> Vec<Rc<dyn ExpirySweep>> {
        vec![
            self.cart_cache.clone() as Rc<dyn ExpirySweep>,
            self.product_cache.clone() as Rc<dyn ExpirySweep>,
        ]
    }
}

impl Drop for Storefront {
    fn drop(&mut self) {
        self.dispatcher.unsubscribe(self.cart_subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CachePolicy, ManualClock};
    use crate::error::FetchError;
    use crate::events::StoreEvent;
    use crate::models::NewCartItem;
    use crate::storage::MemoryMedium;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::cell::Cell;

    struct NoProducts;

    #[async_trait(?Send)]
    impl ProductSource for NoProducts {
        async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
            Ok(Vec::new())
        }
    }

    fn storefront(medium: Rc<MemoryMedium>) -> Storefront {
        Storefront::with_clock(
            &Config::default(),
            medium,
            Rc::new(NoProducts),
            Rc::new(ManualClock::new(0)),
        )
    }

    #[test]
    fn test_actions_reach_cart() {
        let app = storefront(Rc::new(MemoryMedium::new()));
        let changes = Rc::new(Cell::new(0));
        let c = changes.clone();
        app.cart().on(StoreEvent::Change, move || c.set(c.get() + 1));

        let actions = app.cart_actions();
        actions.add_item(NewCartItem::new("a", "Mug", Decimal::from(10), "mug.png"));
        actions.add_item(NewCartItem::new("a", "Mug", Decimal::from(10), "mug.png"));

        assert_eq!(app.cart().get_total(), Decimal::from(20));
        assert_eq!(changes.get(), 2);
    }

    #[test]
    fn test_caches_keep_their_own_policies() {
        let app = storefront(Rc::new(MemoryMedium::new()));

        assert_eq!(app.cart_cache().policy(), CachePolicy::new(86_400_000, 1000));
        assert_eq!(app.product_cache().policy(), CachePolicy::new(1_800_000, 100));

        // A late reconfiguration attempt does not override either
        assert!(!app.cart_cache().configure(CachePolicy::new(1, 1)));
        assert_eq!(app.cart_cache().policy().max_entries, 1000);
        assert_eq!(app.caches().len(), 2);
    }

    #[test]
    fn test_drop_unsubscribes_cart() {
        let app = storefront(Rc::new(MemoryMedium::new()));
        let dispatcher = app.dispatcher().clone();
        assert_eq!(dispatcher.subscriber_count(), 1);

        drop(app);
        assert_eq!(dispatcher.subscriber_count(), 0);
    }

    #[test]
    fn test_load_products_with_empty_catalog() {
        let app = storefront(Rc::new(MemoryMedium::new()));
        tokio_test::block_on(app.products().load_products()).unwrap();
        assert!(app.products().get_products().is_empty());
    }
}
