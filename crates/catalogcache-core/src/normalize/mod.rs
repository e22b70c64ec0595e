//! Normalization of backend payloads into canonical records.
//!
//! Every function here accepts an arbitrary decoded value and returns a
//! usable record. Missing or malformed fields are replaced with defaults
//! instead of failing, and input that is not an object at all yields a
//! minimal default-filled record.

pub mod coerce;

use chrono::Utc;
use serde_json::Value;

use crate::models::{Category, Product, ProductStatus, ShowcaseProduct};

use coerce::{
    identifier, is_truthy, number_or_zero, optional_number, optional_text, string_list,
    text_or_empty, timestamp,
};

/// Normalize a backend product. The backend's `categoryId` becomes `category`.
pub fn normalize_product(input: &Value) -> Product {
    let Some(fields) = input.as_object() else {
        return Product {
            id: coerce::fresh_id(),
            name: String::new(),
            description: String::new(),
            price: 0.0,
            original_price: None,
            images: Vec::new(),
            category: String::new(),
            status: ProductStatus::default(),
            colors: None,
            is_showcase: false,
            showcase_image: None,
            created_at: Utc::now(),
            updated_at: None,
        };
    };

    let status = fields
        .get("status")
        .and_then(Value::as_str)
        .and_then(ProductStatus::from_literal)
        .unwrap_or_default();

    let colors = fields
        .get("colors")
        .filter(|v| is_truthy(v))
        .and_then(string_list);

    Product {
        id: identifier(fields.get("id")),
        name: text_or_empty(fields.get("name")),
        description: text_or_empty(fields.get("description")),
        price: number_or_zero(fields.get("price")),
        original_price: optional_number(fields.get("originalPrice")),
        images: fields.get("images").and_then(string_list).unwrap_or_default(),
        category: text_or_empty(fields.get("categoryId")),
        status,
        colors,
        is_showcase: fields.get("isShowcase").map(is_truthy).unwrap_or(false),
        showcase_image: optional_text(fields.get("showcaseImage")),
        created_at: timestamp(fields.get("createdAt")).unwrap_or_else(Utc::now),
        updated_at: timestamp(fields.get("updatedAt")),
    }
}

/// Normalize a backend category. Numeric ids and textual dates are accepted.
pub fn normalize_category(input: &Value) -> Category {
    let Some(fields) = input.as_object() else {
        return Category {
            id: coerce::fresh_id(),
            name: String::new(),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: None,
        };
    };

    Category {
        id: identifier(fields.get("id")),
        name: text_or_empty(fields.get("name")),
        description: text_or_empty(fields.get("description")),
        created_at: timestamp(fields.get("createdAt")).unwrap_or_else(Utc::now),
        updated_at: timestamp(fields.get("updatedAt")),
    }
}

/// Normalize a showcase item. Accepts either `categoryId` or `category`.
pub fn normalize_showcase_product(input: &Value) -> ShowcaseProduct {
    let Some(fields) = input.as_object() else {
        return ShowcaseProduct {
            id: coerce::fresh_id(),
            name: String::new(),
            description: String::new(),
            image: String::new(),
            category: String::new(),
            created_at: Utc::now(),
        };
    };

    let category = fields
        .get("categoryId")
        .filter(|v| is_truthy(v))
        .or_else(|| fields.get("category"));

    // Product-shaped payloads carry an image list; the first entry is the showcase image
    let image = match fields.get("image") {
        Some(v) => text_or_empty(Some(v)),
        None => fields
            .get("images")
            .and_then(string_list)
            .and_then(|images| images.into_iter().next())
            .unwrap_or_default(),
    };

    ShowcaseProduct {
        id: identifier(fields.get("id")),
        name: text_or_empty(fields.get("name")),
        description: text_or_empty(fields.get("description")),
        image,
        category: text_or_empty(category),
        created_at: timestamp(fields.get("createdAt")).unwrap_or_else(Utc::now),
    }
}
