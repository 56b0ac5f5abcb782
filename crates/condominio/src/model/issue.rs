use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{non_blank, require, seed_date, Draft, Entity, Patch};
use crate::error::{Error, Result};
use crate::storage::keys;

const REQUIRED: &str = "Descrizione, luogo e urgenza segnalata sono obbligatori.";

/// Where an issue stands. Any status may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueStatus {
    /// Reported, not yet handled.
    #[default]
    Aperto,
    /// Someone is working on it.
    #[serde(rename = "In Elaborazione")]
    InElaborazione,
    /// Fixed.
    Risolto,
    /// Closed without further action.
    Chiuso,
}

impl IssueStatus {
    /// Whether the issue still needs attention.
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, Self::Aperto | Self::InElaborazione)
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aperto => write!(f, "Aperto"),
            Self::InElaborazione => write!(f, "In Elaborazione"),
            Self::Risolto => write!(f, "Risolto"),
            Self::Chiuso => write!(f, "Chiuso"),
        }
    }
}

/// Severity scale shared by resident urgency and admin priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Urgency {
    /// Low.
    Bassa,
    /// Medium.
    #[default]
    Media,
    /// High.
    Alta,
    /// Critical.
    Critica,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bassa => write!(f, "Bassa"),
            Self::Media => write!(f, "Media"),
            Self::Alta => write!(f, "Alta"),
            Self::Critica => write!(f, "Critica"),
        }
    }
}

/// A problem reported in the building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Time-derived id.
    pub id: String,
    /// What is wrong.
    pub description: String,
    /// Where, e.g. "Blocco A, Scale".
    pub location: String,
    /// When it was reported.
    pub reported_date: DateTime<Utc>,
    /// Handling status.
    pub status: IssueStatus,
    /// Urgency as reported by the resident.
    pub urgency: Urgency,
    /// Priority as set by the administrator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Urgency>,
    /// Finer position hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_details: Option<String>,
    /// Photo link or description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url_placeholder: Option<String>,
    /// Contractor handling the issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_vendor: Option<String>,
    /// How it was fixed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_notes: Option<String>,
}

impl Entity for Issue {
    const STORAGE_KEY: &'static str = keys::ISSUES;
    const NAME: &'static str = "issue";
    const DELETE_PROMPT: &'static str = "Sei sicuro di voler eliminare questa segnalazione?";

    type Draft = IssueDraft;
    type Patch = IssuePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn compare(a: &Self, b: &Self) -> Ordering {
        b.reported_date.cmp(&a.reported_date)
    }

    fn validate(&self) -> Result<()> {
        require(&[&self.description, &self.location], REQUIRED)
    }

    fn seed() -> Vec<Self> {
        let base = |id: &str, description: &str, location: &str, date, status, level| Issue {
            id: id.to_string(),
            description: description.to_string(),
            location: location.to_string(),
            reported_date: date,
            status,
            urgency: level,
            priority: Some(level),
            location_details: None,
            photo_url_placeholder: None,
            assigned_vendor: None,
            resolution_notes: None,
        };
        vec![
            Issue {
                location_details: Some("Vicino appartamento 3B".to_string()),
                ..base(
                    "1",
                    "Luce scale terzo piano non funzionante",
                    "Blocco A, Scale",
                    seed_date(2024, 6, 1),
                    IssueStatus::Aperto,
                    Urgency::Media,
                )
            },
            Issue {
                assigned_vendor: Some("Idraulico Rossi".to_string()),
                photo_url_placeholder: Some("Foto della perdita disponibile".to_string()),
                ..base(
                    "2",
                    "Perdita acqua dal soffitto garage",
                    "Garage, posto auto 12",
                    seed_date(2024, 6, 3),
                    IssueStatus::InElaborazione,
                    Urgency::Alta,
                )
            },
            Issue {
                resolution_notes: Some("Riparato da tecnico ascensori il 21/04.".to_string()),
                assigned_vendor: Some("TecnoLift Spa".to_string()),
                ..base(
                    "3",
                    "Ascensore bloccato al piano terra",
                    "Blocco B, Ascensore",
                    seed_date(2024, 5, 20),
                    IssueStatus::Risolto,
                    Urgency::Critica,
                )
            },
        ]
    }
}

/// Builder for a new [`Issue`] as submitted by a resident.
#[derive(Debug, Clone, Default)]
pub struct IssueDraft {
    description: Option<String>,
    location: Option<String>,
    urgency: Urgency,
    location_details: Option<String>,
    photo: Option<String>,
}

impl IssueDraft {
    /// An empty draft with medium urgency.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the location.
    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the reported urgency.
    #[must_use]
    pub fn urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = urgency;
        self
    }

    /// Set the position hint.
    #[must_use]
    pub fn location_details(mut self, details: impl Into<String>) -> Self {
        self.location_details = Some(details.into());
        self
    }

    /// Set the photo link or description.
    #[must_use]
    pub fn photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }
}

impl Draft for IssueDraft {
    type Output = Issue;

    fn build(self, id: String, now: DateTime<Utc>) -> Result<Issue> {
        let (Some(description), Some(location)) =
            (non_blank(self.description), non_blank(self.location))
        else {
            return Err(Error::validation(REQUIRED));
        };
        Ok(Issue {
            id,
            description,
            location,
            reported_date: now,
            status: IssueStatus::Aperto,
            urgency: self.urgency,
            priority: Some(Urgency::Media),
            location_details: non_blank(self.location_details),
            photo_url_placeholder: non_blank(self.photo),
            assigned_vendor: None,
            resolution_notes: None,
        })
    }
}

/// Edit of an existing [`Issue`].
///
/// The last four fields are administrator-only.
#[derive(Debug, Clone, Default)]
pub struct IssuePatch {
    /// New description.
    pub description: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New position hint; blank clears it.
    pub location_details: Option<String>,
    /// New photo reference; blank clears it.
    pub photo: Option<String>,
    /// New reported urgency.
    pub urgency: Option<Urgency>,
    /// New status (admin).
    pub status: Option<IssueStatus>,
    /// New priority (admin).
    pub priority: Option<Urgency>,
    /// New contractor; blank clears it (admin).
    pub assigned_vendor: Option<String>,
    /// New resolution notes; blank clears them (admin).
    pub resolution_notes: Option<String>,
}

impl IssuePatch {
    /// The first administrator-only field this patch touches, if any.
    #[must_use]
    pub fn admin_field(&self) -> Option<&'static str> {
        if self.status.is_some() {
            Some("status")
        } else if self.priority.is_some() {
            Some("priority")
        } else if self.assigned_vendor.is_some() {
            Some("assignedVendor")
        } else if self.resolution_notes.is_some() {
            Some("resolutionNotes")
        } else {
            None
        }
    }
}

impl Patch<Issue> for IssuePatch {
    fn apply(self, target: &mut Issue, _now: DateTime<Utc>) {
        if let Some(description) = self.description {
            target.description = description.trim().to_string();
        }
        if let Some(location) = self.location {
            target.location = location.trim().to_string();
        }
        if self.location_details.is_some() {
            target.location_details = non_blank(self.location_details);
        }
        if self.photo.is_some() {
            target.photo_url_placeholder = non_blank(self.photo);
        }
        if let Some(urgency) = self.urgency {
            target.urgency = urgency;
        }
        if let Some(status) = self.status {
            target.status = status;
        }
        if let Some(priority) = self.priority {
            target.priority = Some(priority);
        }
        if self.assigned_vendor.is_some() {
            target.assigned_vendor = non_blank(self.assigned_vendor);
        }
        if self.resolution_notes.is_some() {
            target.resolution_notes = non_blank(self.resolution_notes);
        }
    }
}
