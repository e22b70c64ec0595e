//! Backend-synced entity stores.
//!
//! A `RemoteStore` owns one collection of a `RemoteEntity` kind together
//! with its loading flag and last error. It fetches and mutates through an
//! `EntityApi` client, decodes every record with the normalizer, and (for
//! products) mirrors the collection into a `KeyValueStore` after each change.

pub mod entity;
pub mod error;
pub mod remote;

pub use entity::RemoteEntity;
pub use error::StoreError;
pub use remote::{CategoryStore, Loaded, Outcome, ProductStore, RemoteStore};
