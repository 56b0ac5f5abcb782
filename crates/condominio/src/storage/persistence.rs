//! JSON persistence service over a key-value backend.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use super::{KeyValueStore, MemoryStore};

/// Typed JSON access to a [`KeyValueStore`] that never fails.
///
/// Any backend or (de)serialization failure is logged and reported as
/// "no value" by [`get`](Self::get), or ignored by [`set`](Self::set) and
/// [`remove`](Self::remove). Callers therefore skip error handling; a lost
/// write is only visible in the logs.
#[derive(Debug)]
pub struct Persistence {
    store: Box<dyn KeyValueStore>,
}

impl Persistence {
    /// Wrap a backend.
    #[must_use]
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// A service over a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    /// Read and decode the value under `key`.
    ///
    /// Returns `None` when the key is absent, the backend fails, or the
    /// stored JSON does not decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!("failed to read {key} from storage: {e}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                error!("failed to decode {key} from storage: {e}");
                None
            }
        }
    }

    /// Read the value under `key` as untyped JSON.
    pub fn get_raw(&self, key: &str) -> Option<serde_json::Value> {
        self.get(key)
    }

    /// Read the stored text under `key` without decoding it.
    ///
    /// `Some` means the key is present, whatever it holds.
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.store.get(key).unwrap_or_else(|e| {
            error!("failed to read {key} from storage: {e}");
            None
        })
    }

    /// Encode `value` and store it under `key`.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                error!("failed to encode {key} for storage: {e}");
                return;
            }
        };

        if let Err(e) = self.store.set(key, &raw) {
            error!("failed to save {key} to storage: {e}");
        } else {
            debug!("saved {key}");
        }
    }

    /// Remove the value under `key`.
    pub fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            error!("failed to remove {key} from storage: {e}");
        }
    }

    /// List stored keys, or nothing if the backend fails.
    pub fn keys(&self) -> Vec<String> {
        self.store.keys().unwrap_or_else(|e| {
            error!("failed to list storage keys: {e}");
            Vec::new()
        })
    }
}
