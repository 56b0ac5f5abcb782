//! HTTP client for the announcements backend.

use async_trait::async_trait;
use tracing::debug;

use super::{NewAnnouncement, RemoteAnnouncement, ANNOUNCEMENTS_PATH};
use crate::error::{Error, Result};

/// Operations the feed needs from a backend.
#[async_trait]
pub trait AnnouncementApi: Send + Sync {
    /// Fetch every announcement.
    async fn list(&self) -> Result<Vec<RemoteAnnouncement>>;

    /// Publish a new announcement.
    async fn create(&self, title: &str, content: &str) -> Result<()>;
}

/// [`AnnouncementApi`] over HTTP. No retries, no timeout.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
}

impl FeedClient {
    /// Client for the backend at `base_url`, e.g. `http://localhost:5001`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Full URL of the announcements collection.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            ANNOUNCEMENTS_PATH
        )
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::HttpStatus {
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl AnnouncementApi for FeedClient {
    async fn list(&self) -> Result<Vec<RemoteAnnouncement>> {
        let url = self.endpoint();
        debug!("GET {url}");
        let response = check_status(self.http.get(&url).send().await?)?;
        Ok(response.json().await?)
    }

    async fn create(&self, title: &str, content: &str) -> Result<()> {
        let url = self.endpoint();
        debug!("POST {url}");
        let body = NewAnnouncement::new(title, content);
        check_status(self.http.post(&url).json(&body).send().await?)?;
        Ok(())
    }
}
