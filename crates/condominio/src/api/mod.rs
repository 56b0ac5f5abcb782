//! The announcements backend and its client.
//!
//! The backend keeps announcements in memory and serves them as a JSON
//! array; the client fetches and posts them, and [`Feed`] turns the
//! results into something to show.

mod client;
mod feed;
mod server;

use serde::{Deserialize, Serialize};

pub use client::{AnnouncementApi, FeedClient};
pub use feed::{escape_html, Feed, FeedState, POSTED, POST_FAILED};
pub use server::{build_router, serve, AppState};

/// Path of the announcements collection on the backend.
pub const ANNOUNCEMENTS_PATH: &str = "/api/announcements";

/// An announcement as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteAnnouncement {
    /// Server-assigned UUID.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
}

/// Body of `POST /api/announcements`.
///
/// Both fields are optional here so that a missing one reaches the handler
/// as `None`; a non-string value fails to decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAnnouncement {
    /// Headline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl NewAnnouncement {
    /// A complete request body.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
        }
    }
}
