//! Local persistence for catalog collections.
//!
//! This module provides the `KeyValueStore` abstraction over a persistent
//! text store, two implementations of it (`MemoryStore`, `FileStore`), and
//! the helpers that mirror whole collections into it as JSON:
//!
//! - `load_collection` / `save_collection`: best-effort read and write,
//!   never surfacing storage errors to the caller
//! - `save_collection_stamped` / `last_saved`: the same, with a save time
//! - `Debouncer`: coalesces bursts of writes into one

pub mod bridge;
pub mod debounce;
pub mod kv;

pub use bridge::{age_display, last_saved, load_collection, save_collection, save_collection_stamped};
pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use kv::{FileStore, KeyValueStore, MemoryStore};

/// Storage key of the backend-synced product collection.
pub const BACKEND_PRODUCTS_KEY: &str = "catalog_backend_products";

/// Storage keys of the local catalog collections.
pub const PRODUCTS_KEY: &str = "catalog_products";
pub const CATEGORIES_KEY: &str = "catalog_categories";
pub const SHOWCASE_KEY: &str = "catalog_showcase_products";
