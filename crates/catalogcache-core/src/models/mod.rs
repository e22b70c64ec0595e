//! Data models for catalog entities.
//!
//! This module contains the canonical records the rest of the crate works
//! with, plus the request payloads sent to the backend:
//!
//! - `Product`, `ProductStatus`: storefront products and their availability
//! - `Category`: product groupings
//! - `ShowcaseProduct`: highlighted items on the storefront
//! - Drafts and patches for creating and partially updating each kind

pub mod category;
pub mod product;
pub mod showcase;

pub use category::{Category, CategoryDraft, CategoryPatch};
pub use product::{Product, ProductDraft, ProductFilters, ProductPatch, ProductStatus};
pub use showcase::{ShowcaseDraft, ShowcasePatch, ShowcaseProduct};
