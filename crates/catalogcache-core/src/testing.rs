//! Scripted request client for store tests.

use std::collections::VecDeque;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::api::{ApiResponse, EntityApi};
use crate::models::{
    Category, CategoryDraft, CategoryPatch, Product, ProductDraft, ProductFilters, ProductPatch,
};

/// Replays queued outcomes in order and records every call.
///
/// Calls are recorded as `"list"`, `"create"`, `"update:<id>"` and
/// `"delete:<id>"`. A call with nothing queued fails.
#[derive(Default)]
pub struct ScriptedApi {
    outcomes: Mutex<VecDeque<Result<ApiResponse, String>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: ApiResponse) {
        self.outcomes.lock().push_back(Ok(response));
    }

    pub fn push_ok(&self, data: Value) {
        self.push_response(ApiResponse::ok(data));
    }

    /// Queue a client-side failure.
    pub fn push_error(&self, message: &str) {
        self.outcomes.lock().push_back(Err(message.to_string()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn next(&self, call: String) -> Result<ApiResponse> {
        self.calls.lock().push(call.clone());
        match self.outcomes.lock().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no scripted response for {}", call)),
        }
    }
}

#[async_trait]
impl EntityApi<Product> for ScriptedApi {
    async fn list(&self, _filters: Option<&ProductFilters>) -> Result<ApiResponse> {
        self.next("list".to_string())
    }

    async fn create(&self, _draft: &ProductDraft) -> Result<ApiResponse> {
        self.next("create".to_string())
    }

    async fn update(&self, id: &str, _patch: &ProductPatch) -> Result<ApiResponse> {
        self.next(format!("update:{}", id))
    }

    async fn delete(&self, id: &str) -> Result<ApiResponse> {
        self.next(format!("delete:{}", id))
    }
}

#[async_trait]
impl EntityApi<Category> for ScriptedApi {
    async fn list(&self, _filters: Option<&()>) -> Result<ApiResponse> {
        self.next("list".to_string())
    }

    async fn create(&self, _draft: &CategoryDraft) -> Result<ApiResponse> {
        self.next("create".to_string())
    }

    async fn update(&self, id: &str, _patch: &CategoryPatch) -> Result<ApiResponse> {
        self.next(format!("update:{}", id))
    }

    async fn delete(&self, id: &str) -> Result<ApiResponse> {
        self.next(format!("delete:{}", id))
    }
}
