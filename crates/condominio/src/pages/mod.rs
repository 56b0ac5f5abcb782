//! Per-page state for the entity pages.
//!
//! A [`Page`] owns the in-memory copy of one collection. Every transition
//! mutates that copy, re-sorts it and writes the whole collection back
//! through its [`Repository`]. Nothing is shared between pages except the
//! persistence service they borrow.

pub mod dashboard;

use std::io::{BufRead, Write};

use chrono::Utc;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{next_id, Draft, Entity, Issue, IssuePatch, Patch, UserProfile};
use crate::repository::{self, Repository};
use crate::storage::Persistence;

pub use dashboard::{DashboardCard, Summary, CARDS};

/// Blocking yes/no question asked before destructive actions.
pub trait Confirm {
    /// Ask `message`; `true` means go ahead.
    fn confirm(&self, message: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

/// Answers yes without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Asks on the terminal; anything but `y`/`yes`/`s`/`si` is a no.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, message: &str) -> bool {
        let mut stderr = std::io::stderr();
        let _ = write!(stderr, "{message} [s/N] ");
        let _ = stderr.flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(
            answer.trim().to_lowercase().as_str(),
            "y" | "yes" | "s" | "si" | "sì"
        )
    }
}

/// Outcome of [`Page::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deletion {
    /// The user declined; nothing changed.
    Cancelled,
    /// The record was removed and the collection rewritten.
    Removed,
    /// No record had that id; nothing changed.
    Missing,
}

/// State of one entity page.
#[derive(Debug)]
pub struct Page<'a, E: Entity> {
    repo: Repository<'a, E>,
    items: Vec<E>,
    unreadable: Vec<serde_json::Value>,
}

impl<'a, E: Entity> Page<'a, E> {
    /// Load the page's collection, seeding it on first use if `seed` is set.
    #[must_use]
    pub fn load(persistence: &'a Persistence, seed: bool) -> Self {
        let repo = Repository::new(persistence);
        let stored = repo.load_stored(seed);
        Self {
            repo,
            items: stored.records,
            unreadable: stored.unreadable,
        }
    }

    /// Records in display order.
    #[must_use]
    pub fn items(&self) -> &[E] {
        &self.items
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&E> {
        self.items.iter().find(|e| e.id() == id)
    }

    /// Validate `draft`, add the new record and persist the collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a required field is missing; the
    /// collection is left untouched.
    pub fn create(&mut self, draft: E::Draft) -> Result<&E> {
        let now = Utc::now();
        let record = draft.build(next_id(now), now)?;
        record.validate()?;

        let id = record.id().to_string();
        self.items.insert(0, record);
        self.commit();
        info!("Created {} {}", E::NAME, id);
        self.find(&id)
    }

    /// Merge `patch` into the record with `id` and persist the collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id and
    /// [`Error::Validation`] if the merged record lacks a required field.
    /// Nothing is written in either case.
    pub fn update(&mut self, id: &str, patch: E::Patch) -> Result<&E> {
        let index = self
            .items
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| Error::not_found(E::NAME, id))?;

        let mut updated = self.items[index].clone();
        patch.apply(&mut updated, Utc::now());
        updated.validate()?;

        self.items[index] = updated;
        self.commit();
        info!("Updated {} {}", E::NAME, id);
        self.find(id)
    }

    /// Ask for confirmation, then remove the record with `id`.
    pub fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> Deletion {
        if !confirm.confirm(E::DELETE_PROMPT) {
            debug!("Deletion of {} {} cancelled", E::NAME, id);
            return Deletion::Cancelled;
        }

        let before = self.items.len();
        self.items.retain(|e| e.id() != id);
        if self.items.len() == before {
            return Deletion::Missing;
        }

        self.repo.save_with(&self.items, &self.unreadable);
        info!("Deleted {} {}", E::NAME, id);
        Deletion::Removed
    }

    /// Re-read the collection from storage, without seeding.
    pub fn reload(&mut self) {
        let stored = self.repo.load_stored(false);
        self.items = stored.records;
        self.unreadable = stored.unreadable;
    }

    /// Number of stored records that could not be read.
    ///
    /// They are never shown, and every write keeps them.
    #[must_use]
    pub fn unreadable(&self) -> usize {
        self.unreadable.len()
    }

    fn commit(&mut self) {
        repository::sort(&mut self.items);
        self.repo.save_with(&self.items, &self.unreadable);
    }

    fn find(&self, id: &str) -> Result<&E> {
        self.get(id).ok_or_else(|| Error::not_found(E::NAME, id))
    }
}

impl Page<'_, Issue> {
    /// Edit an issue on behalf of `profile`.
    ///
    /// Status, priority, vendor and resolution notes are reserved to
    /// administrator profiles.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AdminOnly`] when a non-administrator touches an
    /// administrator field, otherwise as [`Page::update`].
    pub fn update_as(
        &mut self,
        profile: Option<&UserProfile>,
        id: &str,
        patch: IssuePatch,
    ) -> Result<&Issue> {
        if let Some(field) = patch.admin_field() {
            if !UserProfile::is_admin_profile(profile) {
                return Err(Error::AdminOnly { field });
            }
        }
        self.update(id, patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Announcement, AnnouncementDraft, AnnouncementPatch, Document, DocumentDraft, IssueDraft,
        IssueStatus, Reservation, ReservationDraft, Urgency,
    };
    use crate::storage::keys;
    use chrono::{Duration, NaiveTime};

    fn is_sorted<E: Entity>(items: &[E]) -> bool {
        items
            .windows(2)
            .all(|w| E::compare(&w[0], &w[1]) != std::cmp::Ordering::Greater)
    }

    fn refuse(_: &str) -> bool {
        false
    }

    #[test]
    fn test_add_announcement_to_empty_collection() {
        let persistence = Persistence::in_memory();
        persistence.set(keys::ANNOUNCEMENTS, &Vec::<Announcement>::new());
        let stored: Option<Vec<Announcement>> = persistence.get(keys::ANNOUNCEMENTS);
        assert_eq!(stored, Some(Vec::new()));

        let mut page = Page::<Announcement>::load(&persistence, true);
        let before = Utc::now();
        let created = page
            .create(AnnouncementDraft::new().title("A").content("B"))
            .unwrap()
            .clone();
        let after = Utc::now();

        assert_eq!(page.len(), 1);
        assert!(!created.id.is_empty());
        assert!(created.date >= before && created.date <= after);

        let stored: Vec<Announcement> = persistence.get(keys::ANNOUNCEMENTS).unwrap();
        assert_eq!(stored, vec![created]);
    }

    #[test]
    fn test_create_validation_blocks_save() {
        let persistence = Persistence::in_memory();
        let mut page = Page::<Announcement>::load(&persistence, true);

        let err = page
            .create(AnnouncementDraft::new().title("solo titolo"))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(page.is_empty());
        assert!(persistence.get_raw(keys::ANNOUNCEMENTS).is_none());
    }

    #[test]
    fn test_create_keeps_newest_first() {
        let persistence = Persistence::in_memory();
        let mut page = Page::<Document>::load(&persistence, true);

        page.create(DocumentDraft::new().name("Verbale Aprile").kind("PDF"))
            .unwrap();

        assert_eq!(page.len(), 4);
        assert_eq!(page.items()[0].name, "Verbale Aprile");
        assert!(is_sorted(page.items()));
    }

    #[test]
    fn test_update_merges_and_resorts() {
        let persistence = Persistence::in_memory();
        let mut page = Page::<Announcement>::load(&persistence, false);

        let first = page
            .create(AnnouncementDraft::new().title("Primo").content("x"))
            .unwrap()
            .id
            .clone();
        page.create(AnnouncementDraft::new().title("Secondo").content("y"))
            .unwrap();
        assert_eq!(page.items()[0].title, "Secondo");

        std::thread::sleep(std::time::Duration::from_millis(5));
        page.update(
            &first,
            AnnouncementPatch {
                title: Some("Primo (modificato)".into()),
                ..Default::default()
            },
        )
        .unwrap();

        // Editing refreshes the date, so the edited one moves to the top
        assert_eq!(page.items()[0].title, "Primo (modificato)");
        assert_eq!(page.items()[0].content, "x");
        assert!(is_sorted(page.items()));

        let stored: Vec<Announcement> = persistence.get(keys::ANNOUNCEMENTS).unwrap();
        assert_eq!(stored, page.items());
    }

    #[test]
    fn test_update_rejects_blank_merge() {
        let persistence = Persistence::in_memory();
        let mut page = Page::<Announcement>::load(&persistence, false);
        let id = page
            .create(AnnouncementDraft::new().title("A").content("B"))
            .unwrap()
            .id
            .clone();

        let err = page
            .update(
                &id,
                AnnouncementPatch {
                    title: Some("   ".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(page.items()[0].title, "A");
    }

    #[test]
    fn test_update_unknown_id() {
        let persistence = Persistence::in_memory();
        let mut page = Page::<Document>::load(&persistence, true);

        let err = page.update("nope", Default::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "document", .. }));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let persistence = Persistence::in_memory();
        let mut page = Page::<Document>::load(&persistence, true);

        assert_eq!(page.delete("1", &refuse), Deletion::Cancelled);
        assert_eq!(page.len(), 3);
        assert!(page.get("1").is_some());
    }

    #[test]
    fn test_delete_passes_prompt_text() {
        let persistence = Persistence::in_memory();
        let mut page = Page::<Document>::load(&persistence, true);

        let asked = std::cell::RefCell::new(String::new());
        let record = |message: &str| {
            *asked.borrow_mut() = message.to_string();
            true
        };
        assert_eq!(page.delete("1", &record), Deletion::Removed);
        assert_eq!(*asked.borrow(), Document::DELETE_PROMPT);
    }

    #[test]
    fn test_delete_removes_and_persists() {
        let persistence = Persistence::in_memory();
        let mut page = Page::<Document>::load(&persistence, true);

        assert_eq!(page.delete("2", &AssumeYes), Deletion::Removed);
        assert!(page.get("2").is_none());

        let stored: Vec<Document> = persistence.get(keys::DOCUMENTS).unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().all(|d| d.id != "2"));
    }

    #[test]
    fn test_delete_missing_id_is_idempotent() {
        let persistence = Persistence::in_memory();
        let mut page = Page::<Document>::load(&persistence, true);
        let before: Vec<Document> = persistence.get(keys::DOCUMENTS).unwrap();

        assert_eq!(page.delete("does-not-exist", &AssumeYes), Deletion::Missing);
        assert_eq!(page.items(), before.as_slice());
        assert_eq!(persistence.get::<Vec<Document>>(keys::DOCUMENTS), Some(before));
    }

    #[test]
    fn test_reservations_soonest_first() {
        let persistence = Persistence::in_memory();
        let mut page = Page::<Reservation>::load(&persistence, true);
        let today = Utc::now().date_naive();
        let at = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();

        for (days, hour, amenity) in [(3, 10, "Sala Feste"), (1, 18, "Tennis"), (1, 9, "Palestra")] {
            page.create(
                ReservationDraft::new()
                    .amenity(amenity)
                    .user_name("Anna")
                    .date(today + Duration::days(days))
                    .time(at(hour)),
            )
            .unwrap();
        }

        let order: Vec<_> = page.items().iter().map(|r| r.amenity.as_str()).collect();
        assert_eq!(order, ["Palestra", "Tennis", "Sala Feste"]);
        assert!(is_sorted(page.items()));
    }

    #[test]
    fn test_reload_sees_external_writes() {
        let persistence = Persistence::in_memory();
        let mut page = Page::<Announcement>::load(&persistence, false);

        let mut other = Page::<Announcement>::load(&persistence, false);
        other
            .create(AnnouncementDraft::new().title("A").content("B"))
            .unwrap();

        assert!(page.is_empty());
        page.reload();
        assert_eq!(page.len(), 1);
    }

    fn resident() -> UserProfile {
        UserProfile {
            id: "u2".into(),
            name: "Anna".into(),
            email: "anna@example.com".into(),
            phone: None,
            is_admin: false,
            units: Vec::new(),
        }
    }

    #[test]
    fn test_issue_admin_fields_need_admin() {
        let persistence = Persistence::in_memory();
        let mut page = Page::<Issue>::load(&persistence, true);
        let close = || IssuePatch {
            status: Some(IssueStatus::Chiuso),
            ..Default::default()
        };

        let err = page.update_as(Some(&resident()), "1", close()).unwrap_err();
        assert!(matches!(err, Error::AdminOnly { field: "status" }));
        let err = page.update_as(None, "1", close()).unwrap_err();
        assert!(matches!(err, Error::AdminOnly { .. }));

        let admin = UserProfile {
            is_admin: true,
            ..resident()
        };
        let issue = page.update_as(Some(&admin), "1", close()).unwrap();
        assert_eq!(issue.status, IssueStatus::Chiuso);
    }

    #[test]
    fn test_issue_resident_fields_open_to_everyone() {
        let persistence = Persistence::in_memory();
        let mut page = Page::<Issue>::load(&persistence, true);

        let issue = page
            .update_as(
                None,
                "2",
                IssuePatch {
                    urgency: Some(Urgency::Critica),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(issue.urgency, Urgency::Critica);
        // Updating an issue does not touch its report date
        assert_eq!(issue.reported_date, Issue::seed()[1].reported_date);
    }

    #[test]
    fn test_reported_issue_goes_first() {
        let persistence = Persistence::in_memory();
        let mut page = Page::<Issue>::load(&persistence, true);

        let created = page
            .create(
                IssueDraft::new()
                    .description("Cancello bloccato")
                    .location("Ingresso carraio")
                    .urgency(Urgency::Alta),
            )
            .unwrap()
            .clone();

        assert_eq!(page.items()[0], created);
        assert_eq!(created.status, IssueStatus::Aperto);
        assert!(created.reported_date <= Utc::now());
    }

    #[test]
    fn test_unreadable_records_survive_writes() {
        let persistence = Persistence::in_memory();
        let stored = serde_json::json!([
            {"id": "100", "title": "Ok", "content": "x", "date": "2024-03-01T10:00:00Z"},
            {"id": "101", "title": "Rotto", "content": "y", "date": "ieri"}
        ]);
        persistence.set(keys::ANNOUNCEMENTS, &stored);

        let mut page = Page::<Announcement>::load(&persistence, true);
        assert_eq!(page.len(), 1);
        assert_eq!(page.unreadable(), 1);

        page.create(AnnouncementDraft::new().title("Nuovo").content("z"))
            .unwrap();
        assert_eq!(page.delete("100", &AssumeYes), Deletion::Removed);

        let values: Vec<serde_json::Value> = persistence.get(keys::ANNOUNCEMENTS).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["title"], "Nuovo");
        assert_eq!(values[1], stored[1]);
    }
}
