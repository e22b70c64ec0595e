//! HTTP request client for the catalog backend.
//!
//! This module provides the `HttpCatalogClient` struct, a thin `reqwest`
//! adapter that speaks the backend's REST endpoints and reports every call
//! as an `ApiResponse` envelope.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::{ApiError, ApiResponse, EntityApi};
use crate::models::{
    Category, CategoryDraft, CategoryPatch, Product, ProductDraft, ProductFilters, ProductPatch,
};

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Catalog backend client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<ApiResponse> {
        debug!(request = what, "Sending catalog request");
        let response = request
            .send()
            .await
            .map_err(ApiError::from)
            .with_context(|| format!("Failed to send {} request", what))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read {} response body", what))?;

        Ok(Self::interpret(status, &body))
    }

    /// Turn an HTTP status and body into an envelope.
    ///
    /// Envelope bodies pass through; other successful bodies become the
    /// envelope's data. Failed statuses carry the body's `message` when it
    /// has one, otherwise a description of the status.
    pub(crate) fn interpret(status: StatusCode, body: &str) -> ApiResponse {
        let trimmed = body.trim();
        let parsed: Option<Value> = if trimmed.is_empty() {
            None
        } else {
            serde_json::from_str(trimmed).ok()
        };

        if !status.is_success() {
            let message = parsed
                .as_ref()
                .and_then(|v| v.get("message"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| ApiError::from_status(status, body).to_string());
            return ApiResponse::failure(message);
        }

        match parsed {
            Some(value) if ApiResponse::is_envelope(&value) => serde_json::from_value(value)
                .unwrap_or_else(|e| {
                    ApiResponse::failure(ApiError::InvalidResponse(e.to_string()).to_string())
                }),
            Some(value) => ApiResponse::ok(value),
            None if trimmed.is_empty() => ApiResponse {
                success: true,
                data: None,
                message: None,
            },
            None => ApiResponse::failure(
                ApiError::InvalidResponse("response body is not JSON".to_string()).to_string(),
            ),
        }
    }

    // ===== Products =====

    pub async fn get_products(&self, filters: Option<&ProductFilters>) -> Result<ApiResponse> {
        let mut request = self.client.get(self.url("products"));
        if let Some(filters) = filters {
            request = request.query(&filters.query_pairs());
        }
        self.send(request, "get products").await
    }

    pub async fn create_product(&self, data: &ProductDraft) -> Result<ApiResponse> {
        let request = self.client.post(self.url("products")).json(data);
        self.send(request, "create product").await
    }

    pub async fn update_product(&self, id: &str, data: &ProductPatch) -> Result<ApiResponse> {
        let request = self
            .client
            .put(self.url(&format!("products/{}", id)))
            .json(data);
        self.send(request, "update product").await
    }

    pub async fn delete_product(&self, id: &str) -> Result<ApiResponse> {
        let request = self.client.delete(self.url(&format!("products/{}", id)));
        self.send(request, "delete product").await
    }

    // ===== Categories =====

    pub async fn get_categories(&self) -> Result<ApiResponse> {
        let request = self.client.get(self.url("categories"));
        self.send(request, "get categories").await
    }

    pub async fn create_category(&self, data: &CategoryDraft) -> Result<ApiResponse> {
        let request = self.client.post(self.url("categories")).json(data);
        self.send(request, "create category").await
    }

    pub async fn update_category(&self, id: &str, data: &CategoryPatch) -> Result<ApiResponse> {
        let request = self
            .client
            .put(self.url(&format!("categories/{}", id)))
            .json(data);
        self.send(request, "update category").await
    }

    pub async fn delete_category(&self, id: &str) -> Result<ApiResponse> {
        let request = self.client.delete(self.url(&format!("categories/{}", id)));
        self.send(request, "delete category").await
    }
}

#[async_trait]
impl EntityApi<Product> for HttpCatalogClient {
    async fn list(&self, filters: Option<&ProductFilters>) -> Result<ApiResponse> {
        self.get_products(filters).await
    }

    async fn create(&self, draft: &ProductDraft) -> Result<ApiResponse> {
        self.create_product(draft).await
    }

    async fn update(&self, id: &str, patch: &ProductPatch) -> Result<ApiResponse> {
        self.update_product(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<ApiResponse> {
        self.delete_product(id).await
    }
}

#[async_trait]
impl EntityApi<Category> for HttpCatalogClient {
    async fn list(&self, _filters: Option<&()>) -> Result<ApiResponse> {
        self.get_categories().await
    }

    async fn create(&self, draft: &CategoryDraft) -> Result<ApiResponse> {
        self.create_category(draft).await
    }

    async fn update(&self, id: &str, patch: &CategoryPatch) -> Result<ApiResponse> {
        self.update_category(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<ApiResponse> {
        self.delete_category(id).await
    }
}
