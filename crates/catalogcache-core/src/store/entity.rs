use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::models::{
    Category, CategoryDraft, CategoryPatch, Product, ProductDraft, ProductFilters, ProductPatch,
};
use crate::normalize::{normalize_category, normalize_product};

/// An entity kind that lives on the backend and is mirrored by a `RemoteStore`.
pub trait RemoteEntity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Listing filters, passed through to the backend untouched.
    type Filters: Send + Sync;
    type Draft: Send + Sync;
    type Patch: Send + Sync;

    /// Plural noun used in logs and default error messages.
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Decode a backend record. Never fails.
    fn normalize(input: &Value) -> Self;

    /// The records inside a listing response. Only a bare list is understood
    /// by default; anything else is an empty listing.
    fn list_items(data: Option<&Value>) -> &[Value] {
        match data {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        }
    }
}

impl RemoteEntity for Product {
    type Filters = ProductFilters;
    type Draft = ProductDraft;
    type Patch = ProductPatch;

    const KIND: &'static str = "products";

    fn id(&self) -> &str {
        &self.id
    }

    fn normalize(input: &Value) -> Self {
        normalize_product(input)
    }

    /// Listings arrive either as a bare list or as `{ "products": [...], "count": N }`.
    fn list_items(data: Option<&Value>) -> &[Value] {
        match data {
            Some(Value::Array(items)) => items.as_slice(),
            Some(Value::Object(fields)) => match fields.get("products") {
                Some(Value::Array(items)) => items.as_slice(),
                _ => &[],
            },
            _ => &[],
        }
    }
}

impl RemoteEntity for Category {
    type Filters = ();
    type Draft = CategoryDraft;
    type Patch = CategoryPatch;

    const KIND: &'static str = "categories";

    fn id(&self) -> &str {
        &self.id
    }

    fn normalize(input: &Value) -> Self {
        normalize_category(input)
    }
}
