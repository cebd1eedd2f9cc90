//! Key-value persistence interface the engines and hosts read and write through.

use alloc::string::{String, ToString};
use hashbrown::HashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::StoreError;

/// String key-value store, the only way the core touches persistent state.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Values stored whole under a fixed key.
pub trait StorageKey {
    const KEY: &'static str;
}

pub fn load_value<T, S>(store: &S) -> Option<T>
where
    T: StorageKey + DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    load_json(store, T::KEY)
}

pub fn save_value<T, S>(store: &mut S, value: &T) -> Result<(), StoreError>
where
    T: StorageKey + Serialize,
    S: KeyValueStore + ?Sized,
{
    save_json(store, T::KEY, value)
}

/// Reads and decodes `key`, a missing key or undecodable value reads as `None`.
pub(crate) fn load_json<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Discarding undecodable value at {}: {}", key, err);
            None
        }
    }
}

pub(crate) fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|err| StoreError::Encode {
        key: key.to_string(),
        reason: err.to_string(),
    })?;
    store.set(key, raw)
}

/// In-process store, for tests and hosts without durable storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
