//! Local-only catalog.
//!
//! `LocalCatalog` keeps products, categories and showcase items entirely on
//! the client. Collections are seeded from storage (or the built-in dataset
//! in `seed`) and every mutation schedules a debounced write of the
//! affected collection. Mutations are synchronous and never touch a backend.

pub mod seed;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;
use tracing::debug;

use crate::models::{
    Category, CategoryDraft, CategoryPatch, Product, ProductDraft, ProductPatch, ShowcaseDraft,
    ShowcasePatch, ShowcaseProduct,
};
use crate::storage::{
    load_collection, Debouncer, KeyValueStore, CATEGORIES_KEY, DEFAULT_DEBOUNCE, PRODUCTS_KEY,
    SHOWCASE_KEY,
};

pub struct LocalCatalog {
    products: Vec<Product>,
    categories: Vec<Category>,
    showcase: Vec<ShowcaseProduct>,
    /// Category id -> name, cleared whenever the category list changes.
    category_names: Mutex<HashMap<String, String>>,
    product_writer: Debouncer<Product>,
    category_writer: Debouncer<Category>,
    showcase_writer: Debouncer<ShowcaseProduct>,
}

impl LocalCatalog {
    /// Open the catalog with the default write delay.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn open(storage: Arc<dyn KeyValueStore>) -> Self {
        Self::with_debounce(storage, DEFAULT_DEBOUNCE)
    }

    /// Open the catalog with a custom write delay.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn with_debounce(storage: Arc<dyn KeyValueStore>, delay: Duration) -> Self {
        let products = load_collection(storage.as_ref(), PRODUCTS_KEY, seed::default_products());
        let categories =
            load_collection(storage.as_ref(), CATEGORIES_KEY, seed::default_categories());
        let showcase = load_collection(storage.as_ref(), SHOWCASE_KEY, seed::default_showcase());
        debug!(
            products = products.len(),
            categories = categories.len(),
            showcase = showcase.len(),
            "Opened local catalog"
        );

        Self {
            products,
            categories,
            showcase,
            category_names: Mutex::new(HashMap::new()),
            product_writer: Debouncer::spawn(storage.clone(), PRODUCTS_KEY, delay),
            category_writer: Debouncer::spawn(storage.clone(), CATEGORIES_KEY, delay),
            showcase_writer: Debouncer::spawn(storage, SHOWCASE_KEY, delay),
        }
    }

    /// Write every pending change now and wait for the writes to finish.
    pub async fn close(self) {
        tokio::join!(
            self.product_writer.close(),
            self.category_writer.close(),
            self.showcase_writer.close(),
        );
    }

    // ===== Products =====

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products shown in the storefront: available or coming soon.
    pub fn available_products(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.status.is_listed()).collect()
    }

    pub fn products_by_category(&self, category_id: &str) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| p.category == category_id)
            .collect()
    }

    pub fn get_product_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn add_product(&mut self, draft: ProductDraft) -> Product {
        let id = next_id(self.products.iter().map(|p| p.id.as_str()));
        let product = Product::from_draft(id, draft);
        self.products.push(product.clone());
        self.product_writer.schedule(self.products.clone());
        product
    }

    /// Merge `patch` into the product. `None` when no product has this id.
    pub fn update_product(&mut self, id: &str, patch: &ProductPatch) -> Option<Product> {
        let product = self.products.iter_mut().find(|p| p.id == id)?;
        patch.apply_to(product);
        let updated = product.clone();
        self.product_writer.schedule(self.products.clone());
        Some(updated)
    }

    pub fn delete_product(&mut self, id: &str) -> bool {
        let Some(index) = self.products.iter().position(|p| p.id == id) else {
            return false;
        };
        self.products.remove(index);
        self.product_writer.schedule(self.products.clone());
        true
    }

    // ===== Categories =====

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get_category_by_id(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Name of the category with this id, memoized until the category list changes.
    pub fn category_name(&self, id: &str) -> Option<String> {
        let mut names = self.category_names.lock();
        if let Some(name) = names.get(id) {
            return Some(name.clone());
        }
        let name = self.get_category_by_id(id)?.name.clone();
        names.insert(id.to_string(), name.clone());
        Some(name)
    }

    pub fn add_category(&mut self, draft: CategoryDraft) -> Category {
        let id = next_id(self.categories.iter().map(|c| c.id.as_str()));
        let category = Category::from_draft(id, draft);
        self.categories.push(category.clone());
        self.categories_changed();
        category
    }

    pub fn update_category(&mut self, id: &str, patch: &CategoryPatch) -> Option<Category> {
        let category = self.categories.iter_mut().find(|c| c.id == id)?;
        patch.apply_to(category);
        let updated = category.clone();
        self.categories_changed();
        Some(updated)
    }

    pub fn delete_category(&mut self, id: &str) -> bool {
        let Some(index) = self.categories.iter().position(|c| c.id == id) else {
            return false;
        };
        self.categories.remove(index);
        self.categories_changed();
        true
    }

    fn categories_changed(&mut self) {
        self.category_names.get_mut().clear();
        self.category_writer.schedule(self.categories.clone());
    }

    // ===== Showcase =====

    pub fn showcase_products(&self) -> &[ShowcaseProduct] {
        &self.showcase
    }

    pub fn get_showcase_product_by_id(&self, id: &str) -> Option<&ShowcaseProduct> {
        self.showcase.iter().find(|s| s.id == id)
    }

    pub fn add_showcase_product(&mut self, draft: ShowcaseDraft) -> ShowcaseProduct {
        let id = next_id(self.showcase.iter().map(|s| s.id.as_str()));
        let item = ShowcaseProduct::from_draft(id, draft);
        self.showcase.push(item.clone());
        self.showcase_writer.schedule(self.showcase.clone());
        item
    }

    pub fn update_showcase_product(
        &mut self,
        id: &str,
        patch: &ShowcasePatch,
    ) -> Option<ShowcaseProduct> {
        let item = self.showcase.iter_mut().find(|s| s.id == id)?;
        patch.apply_to(item);
        let updated = item.clone();
        self.showcase_writer.schedule(self.showcase.clone());
        Some(updated)
    }

    pub fn delete_showcase_product(&mut self, id: &str) -> bool {
        let Some(index) = self.showcase.iter().position(|s| s.id == id) else {
            return false;
        };
        self.showcase.remove(index);
        self.showcase_writer.schedule(self.showcase.clone());
        true
    }
}

/// Current time in milliseconds, bumped past any identifier already taken.
fn next_id<'a>(taken: impl Iterator<Item = &'a str>) -> String {
    let taken: Vec<&str> = taken.collect();
    let mut candidate = Utc::now().timestamp_millis();
    while taken.contains(&candidate.to_string().as_str()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductStatus;
    use crate::storage::{save_collection, MemoryStore};

    const DELAY: Duration = Duration::from_millis(400);

    fn open() -> (LocalCatalog, Arc<MemoryStore>) {
        let storage = Arc::new(MemoryStore::new());
        let catalog = LocalCatalog::with_debounce(storage.clone(), DELAY);
        (catalog, storage)
    }

    async fn settle() {
        tokio::time::sleep(DELAY + Duration::from_millis(50)).await;
    }

    fn draft(name: &str, category: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price: 1_000.0,
            category: category.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_opens_with_default_dataset() {
        let (catalog, storage) = open();

        assert_eq!(catalog.products().len(), 10);
        assert_eq!(catalog.categories().len(), 4);
        assert_eq!(catalog.showcase_products().len(), 6);

        // Seeding alone writes nothing
        settle().await;
        assert_eq!(storage.write_count(PRODUCTS_KEY), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_opens_from_storage() {
        let storage = Arc::new(MemoryStore::new());
        let stored = vec![Product::from_draft("42".to_string(), draft("Vision Pro", "5"))];
        save_collection(storage.as_ref(), PRODUCTS_KEY, &stored);

        let catalog = LocalCatalog::with_debounce(storage.clone(), DELAY);

        assert_eq!(catalog.products(), stored.as_slice());
        assert_eq!(catalog.categories().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_mutations_writes_once() {
        let (mut catalog, storage) = open();

        let added = catalog.add_product(draft("HomePod mini", "3"));
        catalog.update_product(
            &added.id,
            &ProductPatch {
                price: Some(599_000.0),
                ..Default::default()
            },
        );
        catalog.delete_product("1");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(storage.write_count(PRODUCTS_KEY), 0);

        settle().await;
        assert_eq!(storage.write_count(PRODUCTS_KEY), 1);
        assert_eq!(storage.write_count(CATEGORIES_KEY), 0);

        let saved: Vec<Product> = load_collection(storage.as_ref(), PRODUCTS_KEY, Vec::new());
        assert_eq!(saved, catalog.products());
        assert_eq!(saved.last().map(|p| p.price), Some(599_000.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_ids_are_no_ops() {
        let (mut catalog, storage) = open();

        assert!(catalog.update_product("nope", &ProductPatch::default()).is_none());
        assert!(!catalog.delete_product("nope"));
        assert!(catalog.update_category("nope", &CategoryPatch::default()).is_none());
        assert!(!catalog.delete_showcase_product("nope"));

        settle().await;
        assert_eq!(storage.write_count(PRODUCTS_KEY), 0);
        assert_eq!(storage.write_count(CATEGORIES_KEY), 0);
        assert_eq!(storage.write_count(SHOWCASE_KEY), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_ids_never_collide() {
        let (mut catalog, _) = open();

        let first = catalog.add_product(draft("One", "1"));
        let second = catalog.add_product(draft("Two", "1"));
        let third = catalog.add_product(draft("Three", "1"));

        assert_ne!(first.id, second.id);
        assert_ne!(second.id, third.id);
        assert_ne!(first.id, third.id);
        assert!(first.id.parse::<i64>().is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_product_queries() {
        let (mut catalog, _) = open();

        assert_eq!(catalog.products_by_category("4").len(), 3);
        assert_eq!(catalog.available_products().len(), 10);

        catalog.update_product(
            "2",
            &ProductPatch {
                status: Some(ProductStatus::OutOfStock),
                ..Default::default()
            },
        );
        assert_eq!(catalog.available_products().len(), 9);
        assert_eq!(catalog.get_product_by_id("2").unwrap().status, ProductStatus::OutOfStock);
    }

    #[tokio::test(start_paused = true)]
    async fn test_category_name_cache_follows_changes() {
        let (mut catalog, storage) = open();

        assert_eq!(catalog.category_name("3").as_deref(), Some("Accessories"));

        catalog.update_category(
            "3",
            &CategoryPatch {
                name: Some("Audio & Wearables".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(catalog.category_name("3").as_deref(), Some("Audio & Wearables"));

        catalog.delete_category("3");
        assert_eq!(catalog.category_name("3"), None);

        let added = catalog.add_category(CategoryDraft {
            name: "Vision".to_string(),
            description: "Spatial computing".to_string(),
        });
        assert_eq!(catalog.category_name(&added.id).as_deref(), Some("Vision"));

        settle().await;
        assert_eq!(storage.write_count(CATEGORIES_KEY), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_showcase_crud() {
        let (mut catalog, storage) = open();

        let added = catalog.add_showcase_product(ShowcaseDraft {
            name: "Vision Pro".to_string(),
            description: "Spatial computer".to_string(),
            image: "https://example.com/vision.jpg".to_string(),
            category: "5".to_string(),
        });
        let updated = catalog
            .update_showcase_product(
                &added.id,
                &ShowcasePatch {
                    description: Some("Welcome to spatial computing".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.created_at, added.created_at);
        assert_eq!(
            catalog.get_showcase_product_by_id(&added.id).unwrap().description,
            "Welcome to spatial computing"
        );

        assert!(catalog.delete_showcase_product("1"));
        assert_eq!(catalog.showcase_products().len(), 6);

        settle().await;
        assert_eq!(storage.write_count(SHOWCASE_KEY), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_writes_pending_changes() {
        let (mut catalog, storage) = open();
        catalog.add_category(CategoryDraft {
            name: "Vision".to_string(),
            description: String::new(),
        });
        catalog.close().await;

        assert_eq!(storage.write_count(CATEGORIES_KEY), 1);
        assert_eq!(storage.write_count(PRODUCTS_KEY), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nan_price_survives_reopen() {
        let (mut catalog, storage) = open();
        let custom = catalog.add_product(draft("Custom", "1"));
        catalog.update_product(
            "1",
            &ProductPatch {
                price: Some(f64::NAN),
                ..Default::default()
            },
        );
        catalog.delete_product("2");
        catalog.close().await;

        let reopened = LocalCatalog::with_debounce(storage.clone(), DELAY);
        assert_eq!(reopened.products().len(), 10);
        assert!(reopened.get_product_by_id(&custom.id).is_some());
        assert!(reopened.get_product_by_id("2").is_none());
        assert_eq!(reopened.get_product_by_id("1").unwrap().price, 0.0);
    }

    #[test]
    #[should_panic]
    fn test_open_outside_runtime_panics() {
        LocalCatalog::open(Arc::new(MemoryStore::new()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_catalog_flushes_pending_writes() {
        let (mut catalog, storage) = open();
        catalog.delete_product("10");
        drop(catalog);

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(storage.write_count(PRODUCTS_KEY), 1);

        let reopened = LocalCatalog::with_debounce(storage.clone(), DELAY);
        assert_eq!(reopened.products().len(), 9);
        assert!(reopened.get_product_by_id("10").is_none());
    }
}
