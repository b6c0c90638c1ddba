//! Product Store
//!
//! Authoritative product catalog, cached and fetched on demand.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{error, info};

use crate::cache::TieredCache;
use crate::error::FetchError;
use crate::events::{EventEmitter, StoreEvent, SubscriptionId};
use crate::models::Product;
use crate::source::ProductSource;

/// Key the catalog is persisted under.
pub const PRODUCTS_CACHE_KEY: &str = "products";

/// The product catalog.
///
/// The catalog is replaced as a whole after a successful fetch and never
/// partially updated. Reads during an in-flight fetch see the previous
/// catalog.
pub struct ProductStore {
    products: RefCell<Vec<Product>>,
    cache: Rc<TieredCache<Vec<Product>>>,
    source: Rc<dyn ProductSource>,
    events: EventEmitter,
}

impl ProductStore {
    pub fn new(cache: Rc<TieredCache<Vec<Product>>>, source: Rc<dyn ProductSource>) -> Self {
        Self {
            products: RefCell::new(Vec::new()),
            cache,
            source,
            events: EventEmitter::new(),
        }
    }

    // == Reads ==
    pub fn get_products(&self) -> Vec<Product> {
        self.products.borrow().clone()
    }

    pub fn get_product_by_id(&self, id: u64) -> Option<Product> {
        self.products
            .borrow()
            .iter()
            .find(|product| product.id == id)
            .cloned()
    }

    // == Refresh ==
    /// Invalidates the whole cache, then fetches a fresh catalog.
    ///
    /// On failure the error is returned, the catalog keeps its last value and
    /// no change is emitted. Concurrent refreshes are independent; whichever
    /// finishes last wins.
    pub async fn refresh_products(&self) -> Result<(), FetchError> {
        self.cache.clear();
        self.fetch_products().await
    }

    // == Load ==
    /// Adopts the cached catalog if there is one, otherwise fetches.
    pub async fn load_products(&self) -> Result<(), FetchError> {
        if let Some(products) = self.cache.get(PRODUCTS_CACHE_KEY) {
            info!("ProductStore: {} products loaded from cache", products.len());
            *self.products.borrow_mut() = products;
            self.events.emit(StoreEvent::Change);
            return Ok(());
        }
        self.fetch_products().await
    }

    async fn fetch_products(&self) -> Result<(), FetchError> {
        let products = match self.source.fetch_products().await {
            Ok(products) => products,
            Err(e) => {
                error!("Error fetching products: {}", e);
                return Err(e);
            }
        };

        info!("ProductStore: fetched {} products", products.len());
        *self.products.borrow_mut() = products.clone();
        self.cache.set(PRODUCTS_CACHE_KEY, products);
        self.events.emit(StoreEvent::Change);
        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CachePolicy, ManualClock};
    use crate::models::Rating;
    use crate::storage::{DurableMedium, MemoryMedium};
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use std::cell::Cell;
    use std::collections::VecDeque;
    use tokio::sync::oneshot;

    fn product(id: u64, title: &str) -> Product {
        Product {
            id,
            title: title.to_string(),
            price: Decimal::new(1999, 2),
            description: format!("{} description", title),
            image: format!("https://img.example/{}.png", id),
            rating: Rating {
                rate: 4.5,
                count: 10,
            },
        }
    }

    /// Answers each fetch with the next scripted result.
    #[derive(Default)]
    struct ScriptedSource {
        responses: RefCell<VecDeque<Result<Vec<Product>, FetchError>>>,
        calls: Cell<usize>,
    }

    impl ScriptedSource {
        fn push(&self, response: Result<Vec<Product>, FetchError>) {
            self.responses.borrow_mut().push_back(response);
        }
    }

    #[async_trait(?Send)]
    impl ProductSource for ScriptedSource {
        async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
            self.calls.set(self.calls.get() + 1);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or(Err(FetchError::Transport("script exhausted".to_string())))
        }
    }

    /// Each fetch waits until the test releases it.
    #[derive(Default)]
    struct GatedSource {
        gates: RefCell<VecDeque<oneshot::Receiver<Vec<Product>>>>,
    }

    #[async_trait(?Send)]
    impl ProductSource for GatedSource {
        async fn fetch_products(&self) -> Result<Vec<Product>, FetchError> {
            let gate = self
                .gates
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| FetchError::Transport("no gate".to_string()))?;
            gate.await
                .map_err(|_| FetchError::Transport("gate dropped".to_string()))
        }
    }

    struct Fixture {
        store: ProductStore,
        source: Rc<ScriptedSource>,
        medium: Rc<MemoryMedium>,
        changes: Rc<Cell<usize>>,
    }

    fn product_cache(medium: Rc<MemoryMedium>) -> Rc<TieredCache<Vec<Product>>> {
        let cache = TieredCache::with_clock("products", medium, Rc::new(ManualClock::new(0)));
        cache.configure(CachePolicy::new(1_800_000, 100));
        Rc::new(cache)
    }

    fn fixture() -> Fixture {
        let medium = Rc::new(MemoryMedium::new());
        let source = Rc::new(ScriptedSource::default());
        let store = ProductStore::new(product_cache(medium.clone()), source.clone());
        let changes = Rc::new(Cell::new(0));
        let c = changes.clone();
        store.on(StoreEvent::Change, move || c.set(c.get() + 1));
        Fixture {
            store,
            source,
            medium,
            changes,
        }
    }

    #[tokio::test]
    async fn test_refresh_replaces_catalog() {
        let f = fixture();
        f.source.push(Ok(vec![product(1, "Backpack"), product(2, "Shirt")]));

        f.store.refresh_products().await.unwrap();

        assert_eq!(f.store.get_products().len(), 2);
        assert_eq!(f.store.get_product_by_id(2).unwrap().title, "Shirt");
        assert_eq!(f.store.get_product_by_id(3), None);
        assert_eq!(f.changes.get(), 1);
        assert!(f.medium.contains_key(PRODUCTS_CACHE_KEY));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_catalog_and_is_silent() {
        let f = fixture();
        f.source.push(Ok(vec![product(1, "Backpack")]));
        f.store.refresh_products().await.unwrap();
        let before = f.store.get_products();
        f.changes.set(0);

        f.source.push(Err(FetchError::Status(500)));
        let result = f.store.refresh_products().await;

        assert!(matches!(result, Err(FetchError::Status(500))));
        assert_eq!(f.store.get_products(), before);
        assert_eq!(f.changes.get(), 0);
    }

    #[tokio::test]
    async fn test_refresh_clears_whole_cache() {
        let f = fixture();
        f.medium.set_item("shopping_cart", "{}").unwrap();
        f.source.push(Ok(vec![product(1, "Backpack")]));

        f.store.refresh_products().await.unwrap();

        assert!(!f.medium.contains_key("shopping_cart"));
        assert!(f.medium.contains_key(PRODUCTS_CACHE_KEY));
    }

    #[tokio::test]
    async fn test_load_prefers_cache() {
        let f = fixture();
        f.source.push(Ok(vec![product(1, "Backpack")]));
        f.store.load_products().await.unwrap();
        assert_eq!(f.source.calls.get(), 1);

        // Second store over the same medium: cache hit, no fetch
        let source = Rc::new(ScriptedSource::default());
        let second = ProductStore::new(product_cache(f.medium.clone()), source.clone());
        let changes = Rc::new(Cell::new(0));
        let c = changes.clone();
        second.on(StoreEvent::Change, move || c.set(c.get() + 1));

        second.load_products().await.unwrap();

        assert_eq!(source.calls.get(), 0);
        assert_eq!(second.get_products(), f.store.get_products());
        assert_eq!(changes.get(), 1);
    }

    #[tokio::test]
    async fn test_load_miss_fetches_without_clearing() {
        let f = fixture();
        f.medium.set_item("unrelated", "x").unwrap();
        f.source.push(Ok(vec![product(4, "Ring")]));

        f.store.load_products().await.unwrap();

        assert_eq!(f.source.calls.get(), 1);
        assert!(f.medium.contains_key("unrelated"));
        assert_eq!(f.changes.get(), 1);
    }

    #[tokio::test]
    async fn test_load_miss_failure_propagates() {
        let f = fixture();
        f.source.push(Err(FetchError::Transport("offline".to_string())));

        assert!(f.store.load_products().await.is_err());
        assert!(f.store.get_products().is_empty());
        assert_eq!(f.changes.get(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_last_completion_wins() {
        let medium = Rc::new(MemoryMedium::new());
        let source = Rc::new(GatedSource::default());
        let (first_tx, first_rx) = oneshot::channel();
        let (second_tx, second_rx) = oneshot::channel();
        source.gates.borrow_mut().push_back(first_rx);
        source.gates.borrow_mut().push_back(second_rx);

        let cache = product_cache(medium);
        let store = ProductStore::new(cache.clone(), source);
        let first = vec![product(1, "First")];
        let second = vec![product(2, "Second")];

        let release = async {
            // Catalog stays readable while both fetches are in flight
            tokio::task::yield_now().await;
            assert!(store.get_products().is_empty());

            second_tx.send(second.clone()).unwrap();
            while store.get_products() != second {
                tokio::task::yield_now().await;
            }
            first_tx.send(first.clone()).unwrap();
        };

        let (a, b, ()) = tokio::join!(store.refresh_products(), store.refresh_products(), release);
        a.unwrap();
        b.unwrap();

        assert_eq!(store.get_products(), first);
        assert_eq!(cache.get(PRODUCTS_CACHE_KEY), Some(first));
    }
}
