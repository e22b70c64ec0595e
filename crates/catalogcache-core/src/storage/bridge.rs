use chrono::{DateTime, TimeZone, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::KeyValueStore;

/// Suffix of the companion key holding the last save time in epoch milliseconds.
const TIMESTAMP_SUFFIX: &str = "_timestamp";

fn timestamp_key(key: &str) -> String {
    format!("{}{}", key, TIMESTAMP_SUFFIX)
}

/// Load a persisted collection, falling back to `default` when the item is
/// missing, unreadable or not a JSON list. Records are decoded one by one
/// (timestamps rebuilt from their RFC 3339 text); a record that does not
/// decode is skipped and the rest are kept.
pub fn load_collection<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    default: Vec<T>,
) -> Vec<T> {
    let contents = match store.get_item(key) {
        Ok(Some(contents)) => contents,
        Ok(None) => return default,
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored collection");
            return default;
        }
    };

    let records = match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            warn!(key, "Stored collection is not a list");
            return default;
        }
        Err(e) => {
            warn!(key, error = %e, "Failed to parse stored collection");
            return default;
        }
    };

    let total = records.len();
    let items: Vec<T> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(key, index, error = %e, "Skipping stored record that does not decode");
                None
            }
        })
        .collect();
    debug!(key, count = items.len(), skipped = total - items.len(), "Loaded stored collection");
    items
}

/// Persist a full collection. Failures are logged, never returned.
pub fn save_collection<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) {
    let contents = match serde_json::to_string(items) {
        Ok(contents) => contents,
        Err(e) => {
            warn!(key, error = %e, "Failed to serialize collection");
            return;
        }
    };

    match store.set_item(key, &contents) {
        Ok(()) => debug!(key, count = items.len(), "Saved collection"),
        Err(e) => warn!(key, error = %e, "Failed to save collection"),
    }
}

/// Persist a collection together with the time it was saved.
pub fn save_collection_stamped<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) {
    save_collection(store, key, items);
    let now = Utc::now().timestamp_millis().to_string();
    if let Err(e) = store.set_item(&timestamp_key(key), &now) {
        warn!(key, error = %e, "Failed to save collection timestamp");
    }
}

/// When the collection under `key` was last saved with [`save_collection_stamped`].
pub fn last_saved(store: &dyn KeyValueStore, key: &str) -> Option<DateTime<Utc>> {
    let raw = match store.get_item(&timestamp_key(key)) {
        Ok(raw) => raw?,
        Err(e) => {
            debug!(key, error = %e, "Failed to read collection timestamp");
            return None;
        }
    };
    let millis = raw.trim().parse::<i64>().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

/// Human-readable age of a save time, e.g. "5m ago" or "2d ago".
pub fn age_display(saved_at: DateTime<Utc>) -> String {
    let minutes = (Utc::now() - saved_at).num_minutes();
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Product, ProductStatus};
    use crate::storage::MemoryStore;
    use chrono::Duration;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: "MacBook Pro".to_string(),
            description: "M3 Pro laptop".to_string(),
            price: 8_499_000.0,
            original_price: Some(8_999_000.0),
            images: vec!["front.png".to_string()],
            category: "4".to_string(),
            status: ProductStatus::OutOfStock,
            colors: Some(vec!["Silver".to_string()]),
            is_showcase: true,
            showcase_image: Some("hero.png".to_string()),
            created_at: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
            updated_at: Some(Utc.timestamp_millis_opt(1_700_000_500_000).unwrap()),
        }
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let store = MemoryStore::new();
        let items = vec![product("1"), product("2")];

        save_collection(&store, "products", &items);
        let loaded: Vec<Product> = load_collection(&store, "products", Vec::new());

        assert_eq!(loaded, items);
        assert_eq!(loaded[0].created_at.timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn test_load_missing_returns_default() {
        let store = MemoryStore::new();
        let default = vec![Category {
            id: "1".to_string(),
            name: "iPhone".to_string(),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: None,
        }];
        let loaded = load_collection(&store, "categories", default.clone());
        assert_eq!(loaded, default);
    }

    #[test]
    fn test_load_unparsable_returns_default() {
        let store = MemoryStore::new();
        let default = vec![product("seed")];

        store.set_item("products", "{not json").unwrap();
        let loaded = load_collection(&store, "products", default.clone());
        assert_eq!(loaded, default);

        store.set_item("products", r#"{"products":[]}"#).unwrap();
        let loaded = load_collection(&store, "products", default.clone());
        assert_eq!(loaded, default);
    }

    #[test]
    fn test_load_skips_only_bad_records() {
        let store = MemoryStore::new();
        let good = product("1");
        let mut records = vec![serde_json::to_value(&good).unwrap()];
        records.push(serde_json::json!({
            "id": "2", "name": "x", "description": "", "price": 1,
            "category": "1", "createdAt": "later"
        }));
        records.push(serde_json::json!({ "id": "3", "price": null }));
        store
            .set_item("products", &serde_json::to_string(&records).unwrap())
            .unwrap();

        let loaded = load_collection(&store, "products", vec![product("seed")]);

        assert_eq!(loaded, vec![good]);
    }

    #[test]
    fn test_empty_list_is_kept() {
        let store = MemoryStore::new();
        store.set_item("products", "[]").unwrap();
        let loaded = load_collection(&store, "products", vec![product("seed")]);
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_stamped_save_records_time() {
        let store = MemoryStore::new();
        assert!(last_saved(&store, "products").is_none());

        save_collection_stamped(&store, "products", &[product("1")]);

        let saved = last_saved(&store, "products").unwrap();
        assert!(Utc::now() - saved < Duration::minutes(1));
        assert_eq!(store.write_count("products"), 1);
        assert_eq!(store.write_count("products_timestamp"), 1);
    }

    #[test]
    fn test_age_display() {
        assert_eq!(age_display(Utc::now()), "just now");
        assert_eq!(age_display(Utc::now() + Duration::minutes(5)), "just now");
        assert_eq!(age_display(Utc::now() - Duration::minutes(5)), "5m ago");
        assert_eq!(age_display(Utc::now() - Duration::minutes(90)), "2h ago");
        assert_eq!(age_display(Utc::now() - Duration::hours(30)), "1d ago");
    }
}
