//! `condominio` - Condominium management: announcements, documents, issue
//! reports and amenity reservations.
//!
//! Collections are persisted as JSON arrays in a key-value store (an embedded
//! `SQLite` database by default). Each page of the application is a
//! [`pages::Page`] over one [`model::Entity`] type. The [`api`] module holds
//! the small HTTP backend for the shared announcement feed and its client.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod pages;
pub mod repository;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use pages::Page;
pub use repository::Repository;
pub use storage::Persistence;
