//! In-memory loader adapters for the `loadable` resource lifecycle
//!
//! This crate provides `Loader` implementations backed by constants and
//! an in-memory keyed store, useful for testing and development
//! scenarios where no real backend is available:
//!
//! - [`ConstLoader`]: always resolves with a configured constant.
//! - [`MemoryStorageLoader`]: reads a JSON value under a key from a
//!   shared [`MemoryStorage`] map, initializing from a default when the
//!   key is missing and failing the resource on malformed contents.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use loadable::{FailureReason, LoadError, LoadResult, Loadable, Loader};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Trivial loader: always resolves with the configured constant.
#[derive(Debug, Clone)]
pub struct ConstLoader<T> {
    value: T,
}

impl<T> ConstLoader<T> {
    /// Creates a loader that resolves every load with `value`.
    pub const fn new(value: T) -> Self {
        Self { value }
    }
}

#[async_trait]
impl<T> Loader<T> for ConstLoader<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn load(&self, current: Loadable<T>) -> LoadResult<T> {
        let fallback = current.clone();
        current.as_ready(Some(self.value.clone())).map_err(|error| {
            let reason = FailureReason::from_display(&error);
            LoadError::new(reason.clone(), fallback.as_failed(reason))
        })
    }
}

/// Thread-safe in-memory keyed store of JSON-encoded values.
///
/// Cloning is cheap; every clone shares the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes `value` as JSON and stores it under `key`.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error when `value` cannot be
    /// serialized.
    pub fn insert<T: Serialize>(&self, key: &str, value: &T) -> Result<(), serde_json::Error> {
        let encoded = serde_json::to_string(value)?;
        self.entries
            .write()
            .expect("storage lock poisoned")
            .insert(key.to_owned(), encoded);
        Ok(())
    }

    /// Stores a raw string under `key` without validating it as JSON.
    /// Useful for seeding malformed contents in tests.
    pub fn insert_raw(&self, key: &str, contents: impl Into<String>) {
        self.entries
            .write()
            .expect("storage lock poisoned")
            .insert(key.to_owned(), contents.into());
    }

    /// Whether the store holds an entry for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .read()
            .expect("storage lock poisoned")
            .contains_key(key)
    }

    /// Removes the entry under `key`, if any.
    pub fn remove(&self, key: &str) {
        self.entries
            .write()
            .expect("storage lock poisoned")
            .remove(key);
    }

    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .expect("storage lock poisoned")
            .get(key)
            .cloned()
    }
}

/// Loads a value stored under a key in a [`MemoryStorage`].
///
/// Store lookups are synchronous, so a load settles immediately as
/// either ready or failed, never remaining in a loading state. A
/// missing key resolves with the configured initial value; malformed
/// stored contents fail the resource.
#[derive(Debug, Clone)]
pub struct MemoryStorageLoader<T> {
    storage: MemoryStorage,
    key: String,
    initial: T,
}

impl<T> MemoryStorageLoader<T> {
    /// Creates a loader reading `key` from `storage`, resolving with
    /// `initial` when the key has never been written.
    pub fn new(storage: MemoryStorage, key: impl Into<String>, initial: T) -> Self {
        Self {
            storage,
            key: key.into(),
            initial,
        }
    }
}

#[async_trait]
impl<T> Loader<T> for MemoryStorageLoader<T>
where
    T: Clone + DeserializeOwned + Send + Sync + 'static,
{
    async fn load(&self, current: Loadable<T>) -> LoadResult<T> {
        let Some(contents) = self.storage.get(&self.key) else {
            debug!(key = %self.key, "key missing, resolving with the initial value");
            let fallback = current.clone();
            return current
                .as_ready(Some(self.initial.clone()))
                .map_err(|error| {
                    let reason = FailureReason::from_display(&error);
                    LoadError::new(reason.clone(), fallback.as_failed(reason))
                });
        };

        match serde_json::from_str::<T>(&contents) {
            Ok(value) => {
                debug!(key = %self.key, "loaded stored value");
                let fallback = current.clone();
                current.as_ready(Some(value)).map_err(|error| {
                    let reason = FailureReason::from_display(&error);
                    LoadError::new(reason.clone(), fallback.as_failed(reason))
                })
            }
            Err(error) => {
                debug!(key = %self.key, %error, "stored contents are not valid JSON");
                let reason = FailureReason::from_display(&error);
                let failed = current.as_failed(reason.clone());
                Err(LoadError::new(reason, failed))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadable::{LoadablePromise, StatusPatch};

    #[tokio::test]
    async fn const_loader_resolves_with_the_constant() {
        let loader = ConstLoader::new(String::from("fixed"));
        let loaded = loader.load(Loadable::pending().as_loading()).await.unwrap();
        assert!(loaded.is_ready());
        assert_eq!(loaded.item(), Some(&String::from("fixed")));
    }

    #[tokio::test]
    async fn const_loader_drives_a_promise_to_ready() {
        let loader = Arc::new(ConstLoader::new(5_u32));
        let promise = LoadablePromise::spawn(loader, Loadable::pending());
        let resource = promise.wait().await.unwrap();
        assert_eq!(resource.item(), Some(&5));
    }

    #[tokio::test]
    async fn missing_key_resolves_with_the_initial_value() {
        let storage = MemoryStorage::new();
        let loader = MemoryStorageLoader::new(storage, "greeting", String::from("hello"));
        let loaded = loader.load(Loadable::pending().as_loading()).await.unwrap();
        assert_eq!(loaded.item(), Some(&String::from("hello")));
        assert!(loaded.is_ready());
    }

    #[tokio::test]
    async fn stored_value_wins_over_the_initial_value() {
        let storage = MemoryStorage::new();
        storage.insert("greeting", &String::from("stored")).unwrap();
        let loader = MemoryStorageLoader::new(storage, "greeting", String::from("hello"));
        let loaded = loader.load(Loadable::pending().as_loading()).await.unwrap();
        assert_eq!(loaded.item(), Some(&String::from("stored")));
    }

    #[tokio::test]
    async fn malformed_contents_fail_the_resource_and_keep_stale_data() {
        let storage = MemoryStorage::new();
        storage.insert_raw("count", "not json {");
        let loader = MemoryStorageLoader::new(storage, "count", 0_u32);

        let current = Loadable::record(Some(7_u32), StatusPatch::new().ready(true))
            .unwrap()
            .as_loading();
        let error = loader.load(current).await.unwrap_err();

        let failed = error.resource();
        assert!(failed.error().is_some());
        assert_eq!(failed.item(), Some(&7));
        assert!(failed.is_ready());
        assert!(!failed.is_loading());
    }

    #[tokio::test]
    async fn removing_a_key_restores_the_initial_value() {
        let storage = MemoryStorage::new();
        storage.insert("n", &3_u32).unwrap();
        assert!(storage.contains("n"));
        storage.remove("n");
        assert!(!storage.contains("n"));

        let loader = MemoryStorageLoader::new(storage, "n", 1_u32);
        let loaded = loader.load(Loadable::pending().as_loading()).await.unwrap();
        assert_eq!(loaded.item(), Some(&1));
    }
}
