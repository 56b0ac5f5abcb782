//! Announcement feed: what the client shows while loading, after a
//! successful fetch, and after a failure.

use std::fmt::Write as _;

use tracing::{error, info};

use super::{AnnouncementApi, RemoteAnnouncement};
use crate::error::{Error, Result};

const LOADING: &str = "Loading announcements...";
const EMPTY: &str = "No announcements yet.";
const FAILED: &str = "Error loading announcements. Please try again later.";
const MISSING_FIELDS: &str = "Please fill in both title and content.";

/// Message shown after a successful post.
pub const POSTED: &str = "Announcement added successfully!";
/// Message shown after a failed post.
pub const POST_FAILED: &str = "Failed to add announcement. Please try again.";

/// Display state of the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FeedState {
    /// A fetch is in flight.
    #[default]
    Loading,
    /// The backend returned an empty list.
    Empty,
    /// The backend returned at least one announcement.
    Loaded(Vec<RemoteAnnouncement>),
    /// The last fetch failed. No list is shown.
    Failed,
}

impl FeedState {
    /// Status line for states that show no list.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Self::Loading => Some(LOADING),
            Self::Empty => Some(EMPTY),
            Self::Failed => Some(FAILED),
            Self::Loaded(_) => None,
        }
    }

    /// Announcements on display, empty unless loaded.
    #[must_use]
    pub fn announcements(&self) -> &[RemoteAnnouncement] {
        match self {
            Self::Loaded(items) => items,
            _ => &[],
        }
    }

    /// HTML fragment for the feed container. Titles and contents are escaped.
    #[must_use]
    pub fn render_html(&self) -> String {
        if let Some(message) = self.message() {
            return format!("<p>{message}</p>");
        }
        let mut html = String::from("<ul>");
        for item in self.announcements() {
            let _ = write!(
                html,
                "<li><strong>{}</strong>: {}</li>",
                escape_html(&item.title),
                escape_html(&item.content)
            );
        }
        html.push_str("</ul>");
        html
    }

    /// Plain text rendering, one announcement per line.
    #[must_use]
    pub fn render_text(&self) -> String {
        if let Some(message) = self.message() {
            return message.to_string();
        }
        self.announcements()
            .iter()
            .map(|a| format!("{}: {}", a.title, a.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Escape the five HTML-significant characters.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Feed controller over any [`AnnouncementApi`].
#[derive(Debug)]
pub struct Feed<A> {
    api: A,
    state: FeedState,
}

impl<A: AnnouncementApi> Feed<A> {
    /// A feed that has not fetched yet.
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: FeedState::Loading,
        }
    }

    /// Current display state.
    pub fn state(&self) -> &FeedState {
        &self.state
    }

    /// Fetch the list and replace the state.
    ///
    /// Any failure, including a non-2xx status or an undecodable body,
    /// yields [`FeedState::Failed`].
    pub async fn refresh(&mut self) -> &FeedState {
        self.state = FeedState::Loading;
        self.state = match self.api.list().await {
            Ok(items) if items.is_empty() => FeedState::Empty,
            Ok(items) => FeedState::Loaded(items),
            Err(e) => {
                error!("Error fetching announcements: {e}");
                FeedState::Failed
            }
        };
        &self.state
    }

    /// Post a new announcement and refresh on success.
    ///
    /// Both fields are trimmed and must be non-empty; nothing is sent
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank fields, or the transport error
    /// from the post. The state is left unchanged on error.
    pub async fn submit(&mut self, title: &str, content: &str) -> Result<()> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(Error::validation(MISSING_FIELDS));
        }

        if let Err(e) = self.api.create(title, content).await {
            error!("Error adding announcement: {e}");
            return Err(e);
        }
        info!("Posted announcement '{title}'");
        self.refresh().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    /// In-process API. Clones share the list and the failure switch, so a
    /// test keeps a handle after moving one into the feed.
    #[derive(Debug, Default, Clone)]
    struct FakeApi {
        items: Arc<Mutex<Vec<RemoteAnnouncement>>>,
        fail_list: Arc<AtomicBool>,
        fail_create: bool,
    }

    #[async_trait]
    impl AnnouncementApi for FakeApi {
        async fn list(&self) -> Result<Vec<RemoteAnnouncement>> {
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(Error::HttpStatus { status: 500 });
            }
            Ok(self.items.lock().unwrap().clone())
        }

        async fn create(&self, title: &str, content: &str) -> Result<()> {
            if self.fail_create {
                return Err(Error::HttpStatus { status: 400 });
            }
            let mut items = self.items.lock().unwrap();
            let id = items.len().to_string();
            items.push(RemoteAnnouncement {
                id,
                title: title.to_string(),
                content: content.to_string(),
            });
            Ok(())
        }
    }

    fn item(title: &str, content: &str) -> RemoteAnnouncement {
        RemoteAnnouncement {
            id: "x".to_string(),
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_messages() {
        assert_eq!(FeedState::Loading.message(), Some(LOADING));
        assert_eq!(FeedState::Empty.message(), Some(EMPTY));
        assert_eq!(FeedState::Failed.message(), Some(FAILED));
        assert_eq!(FeedState::Loaded(vec![item("a", "b")]).message(), None);
    }

    #[test]
    fn test_render_html_escapes() {
        let state = FeedState::Loaded(vec![item("<b>Ciao</b>", "a & b")]);
        assert_eq!(
            state.render_html(),
            "<ul><li><strong>&lt;b&gt;Ciao&lt;/b&gt;</strong>: a &amp; b</li></ul>"
        );
        assert_eq!(FeedState::Failed.render_html(), format!("<p>{FAILED}</p>"));
    }

    #[test]
    fn test_render_text() {
        let state = FeedState::Loaded(vec![item("A", "1"), item("B", "2")]);
        assert_eq!(state.render_text(), "A: 1\nB: 2");
        assert_eq!(FeedState::Empty.render_text(), EMPTY);
    }

    #[tokio::test]
    async fn test_refresh_empty_then_loaded() {
        let mut feed = Feed::new(FakeApi::default());
        assert_eq!(feed.state(), &FeedState::Loading);
        assert_eq!(feed.refresh().await, &FeedState::Empty);

        feed.submit("  Riunione ", " Lunedì ").await.unwrap();
        let items = feed.state().announcements();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Riunione");
        assert_eq!(items[0].content, "Lunedì");
    }

    #[tokio::test]
    async fn test_refresh_failure_shows_no_list() {
        let api = FakeApi {
            fail_list: Arc::new(AtomicBool::new(true)),
            ..FakeApi::default()
        };
        api.items.lock().unwrap().push(item("stale", "x"));
        let mut feed = Feed::new(api);
        assert_eq!(feed.refresh().await, &FeedState::Failed);
        assert!(feed.state().announcements().is_empty());
    }

    #[tokio::test]
    async fn test_failed_refresh_drops_loaded_list() {
        let api = FakeApi::default();
        api.items.lock().unwrap().push(item("Assemblea", "Lunedì"));
        let mut feed = Feed::new(api.clone());

        let loaded = feed.refresh().await;
        assert!(matches!(loaded, FeedState::Loaded(items) if items.len() == 1));

        api.fail_list.store(true, Ordering::SeqCst);
        assert_eq!(feed.refresh().await, &FeedState::Failed);
        assert!(feed.state().announcements().is_empty());
        assert_eq!(feed.state().message(), Some(FAILED));

        // Recovers on the next successful fetch
        api.fail_list.store(false, Ordering::SeqCst);
        assert_eq!(feed.refresh().await.announcements().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_requires_both_fields() {
        let api = FakeApi::default();
        let mut feed = Feed::new(api.clone());
        let err = feed.submit("   ", "content").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), MISSING_FIELDS);
        assert!(feed.submit("title", "").await.is_err());
        assert!(api.items.lock().unwrap().is_empty());
        assert_eq!(feed.state(), &FeedState::Loading);
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_state() {
        let api = FakeApi {
            fail_create: true,
            ..FakeApi::default()
        };
        let mut feed = Feed::new(api);
        feed.refresh().await;
        let err = feed.submit("a", "b").await.unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 400 }));
        assert_eq!(feed.state(), &FeedState::Empty);
    }
}
