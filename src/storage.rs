//! Pluggable persistence: a synchronous string key-value store.
//!
//! Every service reads through [`Storage`] on each call and writes back the
//! whole value, matching the single-tab synchronous execution model. The
//! reference backend is [`MemoryStorage`]; a browser host wraps local
//! storage, a desktop host wraps whatever it likes.

use std::fmt;

use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{error, warn};

/// Persisted storage keys. These are the system's only wire format: each key
/// is independently readable and writable by the host.
pub mod keys {
    pub const CATALOG_OVERRIDES: &str = "catalog_overrides";
    pub const INVENTORY: &str = "inventory";
    pub const INVENTORY_THRESHOLDS: &str = "inventory_thresholds";
    pub const INVENTORY_HISTORY: &str = "inventory_history";
    pub const CART: &str = "cart";
    pub const ORDERS: &str = "orders";
    pub const LAST_ORDER: &str = "lastOrder";
    pub const CUSTOMERS: &str = "customers";
    pub const CMS_POSTS: &str = "cms_posts";
    pub const CMS_CONTENT: &str = "cms_content";
    pub const ROLE: &str = "role";
    pub const USER: &str = "user";
}

/// Synchronous key-value store. Infallible by contract: backends that can
/// fail (disk, quota) are expected to degrade to no-ops and log, the same
/// way the stores degrade on corrupt values.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

impl fmt::Debug for dyn Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Storage")
    }
}

/// In-memory backend used by tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

/// Loads and decodes a JSON value, falling back to the default on a missing
/// key or corrupt payload. Corruption is logged, never propagated.
pub(crate) fn load_json<T>(storage: &dyn Storage, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match storage.get(key) {
        None => T::default(),
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, %err, "unreadable value in storage, using default");
                T::default()
            }
        },
    }
}

pub(crate) fn save_json<T: Serialize>(storage: &dyn Storage, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => storage.set(key, &raw),
        Err(err) => error!(key, %err, "failed to encode value for storage"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn load_json_defaults_on_missing_and_corrupt() {
        let storage = MemoryStorage::new();
        let empty: Vec<String> = load_json(&storage, "nope");
        assert!(empty.is_empty());

        storage.set("bad", "{not json");
        let map: BTreeMap<String, u32> = load_json(&storage, "bad");
        assert!(map.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let storage = MemoryStorage::new();
        let mut map = BTreeMap::new();
        map.insert("a".to_string(), 1u32);
        save_json(&storage, "k", &map);
        let back: BTreeMap<String, u32> = load_json(&storage, "k");
        assert_eq!(back, map);
    }
}
