use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Availability of a product in the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "kebab-case")]
pub enum ProductStatus {
    #[default]
    Available,
    OutOfStock,
    ComingSoon,
}

impl ProductStatus {
    /// Parse one of the wire literals. Anything else is rejected.
    pub fn from_literal(s: &str) -> Option<Self> {
        match s {
            "available" => Some(ProductStatus::Available),
            "out-of-stock" => Some(ProductStatus::OutOfStock),
            "coming-soon" => Some(ProductStatus::ComingSoon),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Available => "available",
            ProductStatus::OutOfStock => "out-of-stock",
            ProductStatus::ComingSoon => "coming-soon",
        }
    }

    /// Whether the product is shown in the public listing.
    pub fn is_listed(&self) -> bool {
        matches!(self, ProductStatus::Available | ProductStatus::ComingSoon)
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProductStatus::Available => write!(f, "Available"),
            ProductStatus::OutOfStock => write!(f, "Out of stock"),
            ProductStatus::ComingSoon => write!(f, "Coming soon"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Category identifier
    pub category: String,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub is_showcase: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showcase_image: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Build a product from a draft with a caller-assigned identifier.
    pub fn from_draft(id: String, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            price: finite_or_zero(draft.price),
            original_price: draft.original_price.filter(|n| n.is_finite()),
            images: draft.images,
            category: draft.category,
            status: draft.status,
            colors: draft.colors,
            is_showcase: draft.is_showcase,
            showcase_image: draft.showcase_image,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Discount against the original price, if there is one.
    pub fn discount(&self) -> Option<f64> {
        match self.original_price {
            Some(original) if original > self.price => Some(original - self.price),
            _ => None,
        }
    }
}

/// Prices are stored as JSON numbers, which have no NaN or infinity.
fn finite_or_zero(n: f64) -> f64 {
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Payload for creating a product. The category travels as `categoryId`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(rename = "categoryId")]
    pub category: String,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default)]
    pub is_showcase: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showcase_image: Option<String>,
}

/// Partial update for a product. Only the fields that are set are sent or merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(rename = "categoryId", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_showcase: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showcase_image: Option<String>,
}

impl ProductPatch {
    /// Shallow merge into an existing product. The identifier and creation time never change.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(ref name) = self.name {
            product.name = name.clone();
        }
        if let Some(ref description) = self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = finite_or_zero(price);
        }
        if let Some(original_price) = self.original_price {
            product.original_price = Some(original_price).filter(|n| n.is_finite());
        }
        if let Some(ref images) = self.images {
            product.images = images.clone();
        }
        if let Some(ref category) = self.category {
            product.category = category.clone();
        }
        if let Some(status) = self.status {
            product.status = status;
        }
        if let Some(ref colors) = self.colors {
            product.colors = Some(colors.clone());
        }
        if let Some(is_showcase) = self.is_showcase {
            product.is_showcase = is_showcase;
        }
        if let Some(ref showcase_image) = self.showcase_image {
            product.showcase_image = Some(showcase_image.clone());
        }
    }
}

/// Query filters for the product listing, passed through to the backend as-is.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showcase: Option<bool>,
}

impl ProductFilters {
    /// Query string pairs for the listing endpoint.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(ref name) = self.name {
            pairs.push(("name", name.clone()));
        }
        if let Some(ref category_id) = self.category_id {
            pairs.push(("categoryId", category_id.clone()));
        }
        if let Some(showcase) = self.showcase {
            pairs.push(("showcase", showcase.to_string()));
        }
        pairs
    }
}
