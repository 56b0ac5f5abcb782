//! Typed access to one entity collection.

use std::marker::PhantomData;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::model::Entity;
use crate::storage::Persistence;

/// A collection as read from storage.
///
/// Records that do not decode as `E` are kept in `unreadable` untouched, so
/// writing the collection back never drops them.
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<E> {
    /// Records that decoded, in display order once loaded.
    pub records: Vec<E>,
    /// Stored values that could not be decoded.
    pub unreadable: Vec<Value>,
}

impl<E> Default for Stored<E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            unreadable: Vec::new(),
        }
    }
}

impl<E: Entity> Stored<E> {
    /// Decode stored text one record at a time.
    ///
    /// Text that is not a JSON array is kept whole as a single unreadable
    /// value.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let values = match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(values)) => values,
            Ok(other) => {
                error!("{} collection is not an array, keeping it aside", E::NAME);
                return Self {
                    records: Vec::new(),
                    unreadable: vec![other],
                };
            }
            Err(e) => {
                error!("{} collection is not valid JSON, keeping it aside: {e}", E::NAME);
                return Self {
                    records: Vec::new(),
                    unreadable: vec![Value::String(text.to_string())],
                };
            }
        };

        let mut stored = Self::default();
        for value in values {
            match E::deserialize(&value) {
                Ok(record) => stored.records.push(record),
                Err(e) => {
                    warn!("skipping unreadable {} record: {e}", E::NAME);
                    stored.unreadable.push(value);
                }
            }
        }
        stored
    }
}

/// Reads and writes the whole collection of `E` under `E::STORAGE_KEY`.
#[derive(Debug)]
pub struct Repository<'a, E> {
    persistence: &'a Persistence,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Repository<'_, E> {}

impl<'a, E: Entity> Repository<'a, E> {
    /// Bind a repository to a persistence service.
    #[must_use]
    pub fn new(persistence: &'a Persistence) -> Self {
        Self {
            persistence,
            _entity: PhantomData,
        }
    }

    /// The stored collection as-is, or `None` if the key is absent.
    #[must_use]
    pub fn stored(&self) -> Option<Stored<E>> {
        self.persistence
            .get_text(E::STORAGE_KEY)
            .map(|text| Stored::parse(&text))
    }

    /// Load the collection, records in display order.
    ///
    /// Example records are written only when the key is absent and `seed`
    /// is set. A present collection is never replaced, even if none of its
    /// records decode.
    #[must_use]
    pub fn load_stored(&self, seed: bool) -> Stored<E> {
        let mut stored = match self.stored() {
            Some(stored) => stored,
            None if seed => {
                let examples = E::seed();
                if !examples.is_empty() {
                    info!("Seeding {} example {} records", examples.len(), E::NAME);
                    self.persistence.set(E::STORAGE_KEY, &examples);
                }
                Stored {
                    records: examples,
                    unreadable: Vec::new(),
                }
            }
            None => Stored::default(),
        };
        sort(&mut stored.records);
        debug!(
            "Loaded {} {} records ({} unreadable)",
            stored.records.len(),
            E::NAME,
            stored.unreadable.len()
        );
        stored
    }

    /// The decodable records in display order. See [`load_stored`](Self::load_stored).
    #[must_use]
    pub fn load(&self, seed: bool) -> Vec<E> {
        self.load_stored(seed).records
    }

    /// Replace the stored collection with `items`.
    pub fn save(&self, items: &[E]) {
        self.save_with(items, &[]);
    }

    /// Replace the stored collection with `items` followed by `unreadable`.
    pub fn save_with(&self, items: &[E], unreadable: &[Value]) {
        if unreadable.is_empty() {
            self.persistence.set(E::STORAGE_KEY, items);
            return;
        }

        let mut values = Vec::with_capacity(items.len() + unreadable.len());
        for item in items {
            match serde_json::to_value(item) {
                Ok(value) => values.push(value),
                Err(e) => {
                    error!("failed to encode {} {}: {e}", E::NAME, item.id());
                    return;
                }
            }
        }
        values.extend_from_slice(unreadable);
        self.persistence.set(E::STORAGE_KEY, &values);
    }
}

/// Put `items` in the collection's display order.
///
/// The sort is stable: records with equal keys keep their relative order.
pub fn sort<E: Entity>(items: &mut [E]) {
    items.sort_by(E::compare);
}
