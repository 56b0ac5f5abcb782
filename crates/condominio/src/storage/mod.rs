//! Storage layer for condominio.
//!
//! Collections are JSON blobs kept under fixed string keys in a key-value
//! store. [`KeyValueStore`] is the backend seam; [`Persistence`] sits on top
//! and is the only component that swallows storage errors.

mod memory;
pub mod migrations;
mod persistence;
pub mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use persistence::Persistence;
pub use sqlite::{SqliteStore, StoreStats};

use crate::config::{BackendKind, Config};
use crate::error::Result;

/// Storage keys used by the entity pages.
pub mod keys {
    /// Announcements collection.
    pub const ANNOUNCEMENTS: &str = "condo_announcements";
    /// Documents collection.
    pub const DOCUMENTS: &str = "condo_documents";
    /// Issue reports collection.
    pub const ISSUES: &str = "condo_issues";
    /// Amenity reservations collection.
    pub const RESERVATIONS: &str = "condo_reservations";
    /// The current user's profile (a single object, not an array).
    pub const USER_PROFILE: &str = "condo_user_profile";

    /// Every key the application writes.
    pub const ALL: &[&str] = &[ANNOUNCEMENTS, DOCUMENTS, ISSUES, RESERVATIONS, USER_PROFILE];
}

/// A string-keyed store of string values.
///
/// Implementations report failures; callers that want the
/// "never fails" contract go through [`Persistence`].
pub trait KeyValueStore: std::fmt::Debug + Send {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<()>;

    /// List stored keys in lexical order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Open the backend selected by the configuration.
///
/// # Errors
///
/// Returns an error if the `SQLite` database cannot be opened.
pub fn open_backend(config: &Config) -> Result<Box<dyn KeyValueStore>> {
    match config.storage.backend {
        BackendKind::Sqlite => Ok(Box::new(SqliteStore::open(config.database_path())?)),
        BackendKind::Memory => Ok(Box::new(MemoryStore::new())),
    }
}
