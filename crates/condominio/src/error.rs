//! Error types for condominio.
//!
//! Every fallible operation in the crate returns [`Result`]. The persistence
//! service is the one place where storage errors are swallowed; everything
//! else propagates them to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for condominio operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// A key-value backend refused an operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Domain Errors ===
    /// A required field was missing or a value was rejected.
    ///
    /// The message is the text shown to the user in the alert.
    #[error("{0}")]
    Validation(String),

    /// No record with the given id exists in the collection.
    #[error("{entity} with id '{id}' not found")]
    NotFound {
        /// Entity name, e.g. "announcement".
        entity: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// The change requires an administrator profile.
    #[error("only an administrator can change {field}")]
    AdminOnly {
        /// The field that was touched.
        field: &'static str,
    },

    // === HTTP Errors ===
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    HttpStatus {
        /// The status code returned by the server.
        status: u16,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for condominio operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new validation error carrying the user-facing message.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new backend error.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    /// Create a not-found error for the given entity and id.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Check if this error is a required-field or value rejection.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from talking to the announcements backend.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http(_) | Self::HttpStatus { .. })
    }
}
