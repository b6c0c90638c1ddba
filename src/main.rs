//! Storefront - terminal front end
//!
//! Loads the catalog, restores the cart and turns typed commands into cart
//! actions, re-rendering whenever a store reports a change.

use std::rc::Rc;

use anyhow::Context;
use rust_decimal::Decimal;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::task::LocalSet;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront::events::StoreEvent;
use storefront::source::HttpProductSource;
use storefront::storage::FileMedium;
use storefront::{spawn_cleanup_task, Config, Storefront};

const HELP: &str = "commands: list | cart | add <product-id> | remove <id> | qty <id> <n> | clear | refresh | stats | help | quit";

/// Main entry point for the storefront.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the durable medium and the product source
/// 4. Build the storefront (caches, dispatcher, stores)
/// 5. Start background TTL cleanup task
/// 6. Load products (cache first) and run the command loop
/// 7. Stop on `quit`, end of input or Ctrl+C
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting storefront");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cart_ttl={}ms, product_ttl={}ms, storage_dir={}, products_url={}",
        config.cart_cache.ttl_millis,
        config.product_cache.ttl_millis,
        config.storage_dir.display(),
        config.products_url
    );

    LocalSet::new().run_until(run(config)).await
}

async fn run(config: Config) -> anyhow::Result<()> {
    let medium = FileMedium::open(&config.storage_dir, config.storage_quota_bytes)
        .with_context(|| format!("opening storage at {}", config.storage_dir.display()))?;
    let source = HttpProductSource::new(config.products_url.clone())
        .context("building HTTP client")?;

    let app = Storefront::new(&config, Rc::new(medium), Rc::new(source));
    wire_renderers(&app);

    let cleanup_handle = spawn_cleanup_task(app.caches(), config.cleanup_interval);
    info!("Background cleanup task started");

    if let Err(e) = app.products().load_products().await {
        warn!("Catalog unavailable, try `refresh`: {}", e);
    }
    render_cart(&app);
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("reading stdin")?,
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        };
        let Some(line) = line else { break };
        if !execute(&app, line.trim()).await {
            break;
        }
    }

    cleanup_handle.abort();
    info!("Storefront shutdown complete");
    Ok(())
}

/// Re-renders on every store change, like a UI component would.
fn wire_renderers(app: &Storefront) {
    let products = Rc::downgrade(app.products());
    app.products().on(StoreEvent::Change, move || {
        if let Some(products) = products.upgrade() {
            println!("catalog updated: {} products", products.get_products().len());
        }
    });

    let cart = Rc::downgrade(app.cart());
    app.cart().on(StoreEvent::Change, move || {
        if let Some(cart) = cart.upgrade() {
            println!("cart: {} lines, total {}", cart.item_count(), cart.get_total());
        }
    });
}

/// Runs one command. Returns false when the user asked to quit.
async fn execute(app: &Storefront, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    let actions = app.cart_actions();

    match (parts.next(), parts.next(), parts.next()) {
        (None, _, _) => {}
        (Some("quit") | Some("exit"), _, _) => return false,
        (Some("help"), _, _) => println!("{}", HELP),
        (Some("list"), _, _) => render_catalog(app),
        (Some("cart"), _, _) => render_cart(app),
        (Some("add"), Some(id), _) => match id.parse().ok().and_then(|id| app.products().get_product_by_id(id)) {
            Some(product) => actions.add_item(product.to_cart_item()),
            None => println!("no product with id {}", id),
        },
        (Some("remove"), Some(id), _) => actions.remove_item(id),
        (Some("qty"), Some(id), Some(quantity)) => match quantity.parse::<i64>() {
            Ok(quantity) => actions.update_quantity(id, quantity),
            Err(_) => println!("quantity must be a whole number"),
        },
        (Some("clear"), _, _) => actions.clear_cart(),
        (Some("refresh"), _, _) => {
            if let Err(e) = app.products().refresh_products().await {
                println!("refresh failed: {}", e);
            }
        }
        (Some("stats"), _, _) => {
            for (name, stats) in [
                ("cart", app.cart_cache().stats()),
                ("products", app.product_cache().stats()),
            ] {
                println!(
                    "{}: {} entries, hit rate {:.2}, {} evictions, {} degraded writes, {} failed invalidations",
                    name,
                    stats.total_entries,
                    stats.hit_rate(),
                    stats.evictions,
                    stats.degraded_writes,
                    stats.failed_invalidations
                );
            }
        }
        _ => println!("{}", HELP),
    }
    true
}

fn render_catalog(app: &Storefront) {
    for product in app.products().get_products() {
        println!(
            "{:>4}  {:<50.50}  {:>8}  ({:.1}★, {})",
            product.id, product.title, product.price, product.rating.rate, product.rating.count
        );
    }
}

fn render_cart(app: &Storefront) {
    let items = app.cart().get_items();
    if items.is_empty() {
        println!("cart is empty");
        return;
    }
    for item in &items {
        println!(
            "{:>6} x{:<3} {:<40.40} {:>8}",
            item.id,
            item.quantity,
            item.name,
            item.line_total()
        );
    }
    let total: Decimal = app.cart().get_total();
    println!("total {}", total);
}
