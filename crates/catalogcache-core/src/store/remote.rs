use std::fmt::Display;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{RemoteEntity, StoreError};
use crate::api::{ApiResponse, EntityApi};
use crate::models::{Category, Product};
use crate::storage::{load_collection, save_collection_stamped, KeyValueStore, BACKEND_PRODUCTS_KEY};

/// Backend-synced product collection.
pub type ProductStore<C> = RemoteStore<Product, C>;

/// Backend-synced category collection.
pub type CategoryStore<C> = RemoteStore<Category, C>;

/// Result of a successful `load`.
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<E> {
    pub items: Vec<E>,
    /// True when the in-memory collection was returned without a backend call.
    pub from_cache: bool,
}

/// Result of a successful mutation, with the backend's message if it sent one.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub data: T,
    pub message: Option<String>,
}

#[derive(Debug)]
struct StoreState<E> {
    items: Vec<E>,
    loading: bool,
    error: Option<String>,
}

struct Persistence {
    storage: Arc<dyn KeyValueStore>,
    key: String,
}

/// Clears the loading flag when an operation ends, however it ends.
struct LoadingGuard<'a, E> {
    state: &'a RwLock<StoreState<E>>,
}

impl<E> Drop for LoadingGuard<'_, E> {
    fn drop(&mut self) {
        self.state.write().loading = false;
    }
}

/// In-memory collection of one entity kind, kept in step with the backend.
///
/// The store owns its collection plus a loading flag and the last error
/// message. Operations take `&self` and may interleave; the state lock is
/// never held across a backend call, so the last write wins.
pub struct RemoteStore<E, C> {
    api: C,
    persistence: Option<Persistence>,
    cache_short_circuit: bool,
    state: RwLock<StoreState<E>>,
}

impl<C: EntityApi<Product>> RemoteStore<Product, C> {
    /// Product store seeded from `storage`, persisting every change back to it.
    pub fn products(api: C, storage: Arc<dyn KeyValueStore>) -> Self {
        Self::new(api).with_storage(storage, BACKEND_PRODUCTS_KEY)
    }
}

impl<C: EntityApi<Category>> RemoteStore<Category, C> {
    /// Category store. Always fetches on `load` and keeps nothing on disk.
    pub fn categories(api: C) -> Self {
        Self::new(api).with_cache_short_circuit(false)
    }
}

impl<E, C> RemoteStore<E, C>
where
    E: RemoteEntity,
    C: EntityApi<E>,
{
    pub fn new(api: C) -> Self {
        Self {
            api,
            persistence: None,
            cache_short_circuit: true,
            state: RwLock::new(StoreState {
                items: Vec::new(),
                loading: false,
                error: None,
            }),
        }
    }

    /// Seed the collection from `storage` and persist it there after every change.
    pub fn with_storage(mut self, storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let items = load_collection(storage.as_ref(), &key, Vec::new());
        debug!(kind = E::KIND, count = items.len(), "Seeded store from storage");
        self.state.get_mut().items = items;
        self.persistence = Some(Persistence { storage, key });
        self
    }

    /// Whether `load` may answer from a non-empty in-memory collection.
    pub fn with_cache_short_circuit(mut self, enabled: bool) -> Self {
        self.cache_short_circuit = enabled;
        self
    }

    pub fn api(&self) -> &C {
        &self.api
    }

    // ===== State =====

    /// Snapshot of the collection.
    pub fn items(&self) -> Vec<E> {
        self.state.read().items.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    pub fn clear_error(&self) {
        self.state.write().error = None;
    }

    /// Look up an entity by identifier, compared as text.
    pub fn get_by_id(&self, id: impl Display) -> Option<E> {
        let id = id.to_string();
        self.state.read().items.iter().find(|item| item.id() == id).cloned()
    }

    // ===== Operations =====

    /// Load the collection from the backend, replacing it wholesale on success.
    ///
    /// With the cache short-circuit enabled, a non-empty collection is
    /// returned as-is unless `force_refresh` is set. On failure the current
    /// collection is kept.
    pub async fn load(
        &self,
        filters: Option<&E::Filters>,
        force_refresh: bool,
    ) -> Result<Loaded<E>, StoreError> {
        if self.cache_short_circuit && !force_refresh {
            let state = self.state.read();
            if !state.items.is_empty() {
                debug!(kind = E::KIND, count = state.items.len(), "Using cached collection");
                return Ok(Loaded {
                    items: state.items.clone(),
                    from_cache: true,
                });
            }
        }

        let _loading = self.begin();
        debug!(kind = E::KIND, "Loading from backend");

        match self.api.list(filters).await {
            Ok(response) if response.success => {
                let items: Vec<E> = E::list_items(response.data.as_ref())
                    .iter()
                    .map(E::normalize)
                    .collect();
                info!(kind = E::KIND, count = items.len(), "Loaded from backend");
                self.state.write().items = items.clone();
                self.persist();
                Ok(Loaded {
                    items,
                    from_cache: false,
                })
            }
            Ok(response) => Err(self.rejected(response, "load")),
            Err(e) => Err(self.failed(e, "load")),
        }
    }

    /// Same as `load(None, false)`: only reaches the backend when the cache is empty.
    pub async fn refresh(&self) -> Result<Loaded<E>, StoreError> {
        self.load(None, false).await
    }

    /// Create an entity on the backend and append the returned record.
    pub async fn create(&self, draft: &E::Draft) -> Result<Outcome<E>, StoreError> {
        let _loading = self.begin();

        match self.api.create(draft).await {
            Ok(response) if response.success => {
                let record = Self::normalize_data(response.data.as_ref());
                debug!(kind = E::KIND, id = record.id(), "Created");
                self.state.write().items.push(record.clone());
                self.persist();
                Ok(Outcome {
                    data: record,
                    message: response.message,
                })
            }
            Ok(response) => Err(self.rejected(response, "create")),
            Err(e) => Err(self.failed(e, "create")),
        }
    }

    /// Send a partial update and replace the matching entry with the returned record.
    ///
    /// When no entry has this identifier the record is returned but not added.
    pub async fn update(&self, id: impl Display, patch: &E::Patch) -> Result<Outcome<E>, StoreError> {
        let id = id.to_string();
        let _loading = self.begin();

        match self.api.update(&id, patch).await {
            Ok(response) if response.success => {
                let record = Self::normalize_data(response.data.as_ref());
                let replaced = {
                    let mut state = self.state.write();
                    match state.items.iter().position(|item| item.id() == id) {
                        Some(index) => {
                            state.items[index] = record.clone();
                            true
                        }
                        None => false,
                    }
                };
                if replaced {
                    debug!(kind = E::KIND, id = %id, "Updated");
                    self.persist();
                } else {
                    debug!(kind = E::KIND, id = %id, "Updated entity is not in the collection");
                }
                Ok(Outcome {
                    data: record,
                    message: response.message,
                })
            }
            Ok(response) => Err(self.rejected(response, "update")),
            Err(e) => Err(self.failed(e, "update")),
        }
    }

    /// Delete on the backend and drop every entry with this identifier.
    /// Returns how many entries were removed locally.
    pub async fn delete(&self, id: impl Display) -> Result<Outcome<usize>, StoreError> {
        let id = id.to_string();
        let _loading = self.begin();

        match self.api.delete(&id).await {
            Ok(response) if response.success => {
                let removed = {
                    let mut state = self.state.write();
                    let before = state.items.len();
                    state.items.retain(|item| item.id() != id);
                    before - state.items.len()
                };
                debug!(kind = E::KIND, id = %id, removed, "Deleted");
                if removed > 0 {
                    self.persist();
                }
                Ok(Outcome {
                    data: removed,
                    message: response.message,
                })
            }
            Ok(response) => Err(self.rejected(response, "delete")),
            Err(e) => Err(self.failed(e, "delete")),
        }
    }

    // ===== Helpers =====

    fn begin(&self) -> LoadingGuard<'_, E> {
        {
            let mut state = self.state.write();
            state.loading = true;
            state.error = None;
        }
        LoadingGuard { state: &self.state }
    }

    fn normalize_data(data: Option<&Value>) -> E {
        match data {
            Some(value) => E::normalize(value),
            None => E::normalize(&Value::Null),
        }
    }

    fn persist(&self) {
        if let Some(ref persistence) = self.persistence {
            let state = self.state.read();
            save_collection_stamped(persistence.storage.as_ref(), &persistence.key, &state.items);
        }
    }

    fn rejected(&self, response: ApiResponse, action: &str) -> StoreError {
        let message = response
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Failed to {} {}", action, E::KIND));
        warn!(kind = E::KIND, action, message = %message, "Backend rejected request");
        self.state.write().error = Some(message.clone());
        StoreError::Rejected(message)
    }

    fn failed(&self, error: anyhow::Error, action: &str) -> StoreError {
        let mut message = format!("{:#}", error);
        if message.is_empty() {
            message = format!("Failed to {} {}", action, E::KIND);
        }
        warn!(kind = E::KIND, action, error = %message, "Request failed");
        self.state.write().error = Some(message.clone());
        StoreError::Failed(message)
    }
}
