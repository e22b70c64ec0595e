//! Request client module for the catalog backend.
//!
//! The entity stores never talk HTTP themselves: they consume the
//! `EntityApi` trait, one implementation per entity kind. This module
//! defines that trait, the `ApiResponse` envelope it returns, and the
//! `HttpCatalogClient` that implements it for products and categories.

pub mod client;
pub mod error;
pub mod response;

use anyhow::Result;
use async_trait::async_trait;

use crate::store::RemoteEntity;

pub use client::HttpCatalogClient;
pub use error::ApiError;
pub use response::ApiResponse;

/// Backend operations for one entity kind.
///
/// `Ok` carries the backend's verdict (which may be `success: false`);
/// `Err` means the call itself failed.
#[async_trait]
pub trait EntityApi<E: RemoteEntity>: Send + Sync {
    async fn list(&self, filters: Option<&E::Filters>) -> Result<ApiResponse>;
    async fn create(&self, draft: &E::Draft) -> Result<ApiResponse>;
    async fn update(&self, id: &str, patch: &E::Patch) -> Result<ApiResponse>;
    async fn delete(&self, id: &str) -> Result<ApiResponse>;
}
