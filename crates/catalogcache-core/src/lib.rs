//! Client-side state for a product catalog.
//!
//! - `normalize`: turns loosely-typed backend JSON into fixed record shapes
//! - `store`: backend-synced collections with loading and error state
//! - `catalog`: the local-only catalog with debounced persistence
//! - `storage`: key-value persistence of whole collections
//! - `api`: the request-client seam and its HTTP implementation

pub mod api;
pub mod catalog;
pub mod config;
pub mod models;
pub mod normalize;
pub mod storage;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
