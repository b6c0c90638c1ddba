//! Storefront - cart and catalog stores over a tiered cache
//!
//! Provides a two-tier TTL cache, an action dispatcher and the observable
//! cart and product stores built on them.

pub mod actions;
pub mod app;
pub mod cache;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod events;
pub mod models;
pub mod source;
pub mod storage;
pub mod stores;
pub mod tasks;

pub use app::Storefront;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
