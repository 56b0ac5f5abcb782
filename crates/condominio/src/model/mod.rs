//! Domain records for the condominium pages.
//!
//! Each persisted record type implements [`Entity`], which ties it to its
//! storage key, its sort order and the builder/patch types used to create
//! and edit it.

mod announcement;
mod contact;
mod document;
mod issue;
mod profile;
mod reservation;

use std::cmp::Ordering;
use std::fmt::Debug;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

pub use announcement::{Announcement, AnnouncementDraft, AnnouncementPatch};
pub use contact::{directory, Contact};
pub use document::{parse_tags, Document, DocumentDraft, DocumentPatch};
pub use issue::{Issue, IssueDraft, IssuePatch, IssueStatus, Urgency};
pub use profile::{
    parse_unit, parse_units, UserProfile, UserProfileDraft, UserProfilePatch, UserUnit,
};
pub use reservation::{parse_time, Reservation, ReservationDraft, ReservationPatch};

/// A record kept in a persisted collection.
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned {
    /// Storage key of the collection.
    const STORAGE_KEY: &'static str;
    /// Lowercase singular name, used in messages.
    const NAME: &'static str;
    /// Question asked before deleting a record.
    const DELETE_PROMPT: &'static str;

    /// Builder that validates and constructs a new record.
    type Draft: Draft<Output = Self>;
    /// Partial edit merged into an existing record.
    type Patch: Patch<Self>;

    /// The record's id.
    fn id(&self) -> &str;

    /// Collection order: `Less` sorts first.
    fn compare(a: &Self, b: &Self) -> Ordering;

    /// Check the record's required fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] with the user-facing message.
    fn validate(&self) -> Result<()>;

    /// Example records written when the collection is first loaded.
    #[must_use]
    fn seed() -> Vec<Self> {
        Vec::new()
    }
}

/// Builder for a new record.
pub trait Draft {
    /// The record type produced.
    type Output;

    /// Validate the collected fields and construct the record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when a required field is missing.
    fn build(self, id: String, now: DateTime<Utc>) -> Result<Self::Output>;
}

/// A partial edit of a record.
pub trait Patch<E> {
    /// Merge the set fields into `target`.
    fn apply(self, target: &mut E, now: DateTime<Utc>);
}

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Produce a record id from the current time in milliseconds.
///
/// Ids handed out by one process are strictly increasing, so two records
/// created within the same millisecond still get distinct ids.
#[must_use]
pub fn next_id(now: DateTime<Utc>) -> String {
    let millis = now.timestamp_millis();
    let previous = LAST_ID
        .fetch_update(AtomicOrdering::SeqCst, AtomicOrdering::SeqCst, |last| {
            Some(millis.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    millis.max(previous + 1).to_string()
}

/// The calendar day `now` falls on, in UTC.
///
/// Booking checks and the dashboard's "upcoming" count both use this day.
#[must_use]
pub fn today(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

/// Trim `value` and treat blank input as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Fail with `message` unless every field has content.
pub(crate) fn require(fields: &[&str], message: &str) -> Result<()> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(Error::validation(message));
    }
    Ok(())
}

/// Midnight UTC on the given day, for seed records.
pub(crate) fn seed_date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_next_id_is_time_derived() {
        let now = Utc::now() + Duration::days(365);
        let id: i64 = next_id(now).parse().unwrap();
        assert!(id >= now.timestamp_millis());
    }

    #[test]
    fn test_next_id_unique_within_same_millisecond() {
        let now = Utc::now();
        let a = next_id(now);
        let b = next_id(now);
        assert_ne!(a, b);
        assert!(b.parse::<i64>().unwrap() > a.parse::<i64>().unwrap());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  x ".into())), Some("x".to_string()));
        assert_eq!(non_blank(Some("   ".into())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_require() {
        assert!(require(&["a", "b"], "msg").is_ok());
        let err = require(&["a", " "], "msg").unwrap_err();
        assert_eq!(err.to_string(), "msg");
    }

    #[test]
    fn test_seed_date() {
        assert_eq!(
            seed_date(2024, 6, 1).to_rfc3339(),
            "2024-06-01T00:00:00+00:00"
        );
    }
}
