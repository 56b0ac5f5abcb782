use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{non_blank, require, seed_date, Draft, Entity, Patch};
use crate::error::{Error, Result};
use crate::storage::keys;

const REQUIRED: &str = "Nome del documento e tipo sono obbligatori.";

/// Link target used until real file storage exists.
pub const PLACEHOLDER_URL: &str = "#";

/// A document listed in the building archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Time-derived id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Free-form kind, e.g. "PDF" or "Regolamento".
    #[serde(rename = "type")]
    pub kind: String,
    /// When the document was added.
    pub upload_date: DateTime<Utc>,
    /// Where to fetch it; `#` when there is no file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Search tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Document {
    /// Whether the document points at an actual file.
    #[must_use]
    pub fn has_file(&self) -> bool {
        self.url
            .as_deref()
            .is_some_and(|u| !u.is_empty() && u != PLACEHOLDER_URL)
    }
}

impl Entity for Document {
    const STORAGE_KEY: &'static str = keys::DOCUMENTS;
    const NAME: &'static str = "document";
    const DELETE_PROMPT: &'static str = "Sei sicuro di voler eliminare questo documento?";

    type Draft = DocumentDraft;
    type Patch = DocumentPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn compare(a: &Self, b: &Self) -> Ordering {
        b.upload_date.cmp(&a.upload_date)
    }

    fn validate(&self) -> Result<()> {
        require(&[&self.name, &self.kind], REQUIRED)
    }

    fn seed() -> Vec<Self> {
        let doc = |id: &str, name: &str, kind: &str, date, tags: &[&str]| Document {
            id: id.to_string(),
            name: name.to_string(),
            kind: kind.to_string(),
            upload_date: date,
            url: Some(PLACEHOLDER_URL.to_string()),
            tags: tags.iter().map(ToString::to_string).collect(),
        };
        vec![
            doc(
                "1",
                "Regolamento Condominiale 2024",
                "PDF",
                seed_date(2024, 1, 15),
                &["regolamento", "ufficiale"],
            ),
            doc(
                "2",
                "Verbale Assemblea Gennaio 2024",
                "PDF",
                seed_date(2024, 1, 30),
                &["verbale", "assemblea"],
            ),
            doc(
                "3",
                "Bilancio Consuntivo 2023",
                "XLSX",
                seed_date(2024, 3, 10),
                &["bilancio", "finanze"],
            ),
        ]
    }
}

/// Split a comma-separated tag list, trimming and dropping empties.
#[must_use]
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Builder for a new [`Document`].
#[derive(Debug, Clone, Default)]
pub struct DocumentDraft {
    name: Option<String>,
    kind: Option<String>,
    url: Option<String>,
    tags: Vec<String>,
}

impl DocumentDraft {
    /// An empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the document kind.
    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the link; defaults to the placeholder.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set tags from a comma-separated list.
    #[must_use]
    pub fn tags(mut self, input: &str) -> Self {
        self.tags = parse_tags(input);
        self
    }
}

impl Draft for DocumentDraft {
    type Output = Document;

    fn build(self, id: String, now: DateTime<Utc>) -> Result<Document> {
        let (Some(name), Some(kind)) = (non_blank(self.name), non_blank(self.kind)) else {
            return Err(Error::validation(REQUIRED));
        };
        Ok(Document {
            id,
            name,
            kind,
            upload_date: now,
            url: Some(non_blank(self.url).unwrap_or_else(|| PLACEHOLDER_URL.to_string())),
            tags: self.tags,
        })
    }
}

/// Edit of an existing [`Document`].
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    /// New display name.
    pub name: Option<String>,
    /// New kind.
    pub kind: Option<String>,
    /// New link.
    pub url: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
}

impl Patch<Document> for DocumentPatch {
    fn apply(self, target: &mut Document, _now: DateTime<Utc>) {
        if let Some(name) = self.name {
            target.name = name.trim().to_string();
        }
        if let Some(kind) = self.kind {
            target.kind = kind.trim().to_string();
        }
        if let Some(url) = self.url {
            target.url = Some(url.trim().to_string());
        }
        if let Some(tags) = self.tags {
            target.tags = tags;
        }
    }
}
