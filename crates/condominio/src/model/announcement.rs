use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{non_blank, require, Draft, Entity, Patch};
use crate::error::{Error, Result};
use crate::storage::keys;

const REQUIRED: &str = "Titolo e contenuto sono obbligatori.";

/// A notice published to residents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// Time-derived id.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Publication time, refreshed on every edit.
    pub date: DateTime<Utc>,
}

impl Entity for Announcement {
    const STORAGE_KEY: &'static str = keys::ANNOUNCEMENTS;
    const NAME: &'static str = "announcement";
    const DELETE_PROMPT: &'static str = "Sei sicuro di voler eliminare questo avviso?";

    type Draft = AnnouncementDraft;
    type Patch = AnnouncementPatch;

    fn id(&self) -> &str {
        &self.id
    }

    // Newest first
    fn compare(a: &Self, b: &Self) -> Ordering {
        b.date.cmp(&a.date)
    }

    fn validate(&self) -> Result<()> {
        require(&[&self.title, &self.content], REQUIRED)
    }
}

/// Builder for a new [`Announcement`].
#[derive(Debug, Clone, Default)]
pub struct AnnouncementDraft {
    title: Option<String>,
    content: Option<String>,
}

impl AnnouncementDraft {
    /// An empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the body text.
    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

impl Draft for AnnouncementDraft {
    type Output = Announcement;

    fn build(self, id: String, now: DateTime<Utc>) -> Result<Announcement> {
        let (Some(title), Some(content)) = (non_blank(self.title), non_blank(self.content)) else {
            return Err(Error::validation(REQUIRED));
        };
        Ok(Announcement {
            id,
            title,
            content,
            date: now,
        })
    }
}

/// Edit of an existing [`Announcement`].
#[derive(Debug, Clone, Default)]
pub struct AnnouncementPatch {
    /// New title.
    pub title: Option<String>,
    /// New body text.
    pub content: Option<String>,
}

impl Patch<Announcement> for AnnouncementPatch {
    fn apply(self, target: &mut Announcement, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            target.title = title.trim().to_string();
        }
        if let Some(content) = self.content {
            target.content = content.trim().to_string();
        }
        target.date = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_build_requires_title_and_content() {
        let now = Utc::now();
        let err = AnnouncementDraft::new()
            .title("Assemblea")
            .build("1".into(), now)
            .unwrap_err();
        assert_eq!(err.to_string(), REQUIRED);

        let err = AnnouncementDraft::new()
            .title("  ")
            .content("testo")
            .build("1".into(), now)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_build_sets_date() {
        let now = Utc::now();
        let ann = AnnouncementDraft::new()
            .title(" Assemblea ")
            .content("Giovedì ore 21")
            .build("7".into(), now)
            .unwrap();
        assert_eq!(ann.title, "Assemblea");
        assert_eq!(ann.date, now);
        assert_eq!(ann.id(), "7");
    }

    #[test]
    fn test_patch_refreshes_date() {
        let then = Utc::now() - Duration::days(3);
        let mut ann = AnnouncementDraft::new()
            .title("A")
            .content("B")
            .build("1".into(), then)
            .unwrap();

        let now = Utc::now();
        AnnouncementPatch {
            content: Some("C".into()),
            ..Default::default()
        }
        .apply(&mut ann, now);

        assert_eq!(ann.title, "A");
        assert_eq!(ann.content, "C");
        assert_eq!(ann.date, now);
    }

    #[test]
    fn test_reads_front_end_json() {
        let json = r#"{"id":"1717000000000","title":"A","content":"B","date":"2024-06-01T10:00:00.000Z"}"#;
        let ann: Announcement = serde_json::from_str(json).unwrap();
        assert_eq!(ann.id, "1717000000000");
        assert_eq!(ann.date.to_rfc3339(), "2024-06-01T10:00:00+00:00");
    }

    #[test]
    fn test_compare_newest_first() {
        let now = Utc::now();
        let old = AnnouncementDraft::new()
            .title("old")
            .content("x")
            .build("1".into(), now - Duration::hours(1))
            .unwrap();
        let new = AnnouncementDraft::new()
            .title("new")
            .content("x")
            .build("2".into(), now)
            .unwrap();
        assert_eq!(Announcement::compare(&new, &old), Ordering::Less);
    }
}
