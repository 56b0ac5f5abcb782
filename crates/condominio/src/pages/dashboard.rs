//! Landing page: navigation cards plus a summary of every collection.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Announcement, Document, Issue, Reservation};
use crate::repository::Repository;
use crate::storage::Persistence;

/// A navigation card on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardCard {
    /// Card heading.
    pub title: &'static str,
    /// One-line explanation.
    pub description: &'static str,
    /// Route of the page it opens.
    pub route: &'static str,
}

/// The dashboard's cards, in display order.
pub const CARDS: [DashboardCard; 5] = [
    DashboardCard {
        title: "Avvisi Recenti",
        description: "Leggi gli ultimi avvisi e comunicazioni.",
        route: "/avvisi",
    },
    DashboardCard {
        title: "Documenti Utili",
        description: "Accedi a regolamenti, verbali e altri documenti.",
        route: "/documenti",
    },
    DashboardCard {
        title: "Segnala un Problema",
        description: "Invia una segnalazione per guasti o manutenzioni.",
        route: "/segnalazioni",
    },
    DashboardCard {
        title: "Prenota Spazi Comuni",
        description: "Verifica disponibilità e prenota sale o attrezzature.",
        route: "/prenotazioni",
    },
    DashboardCard {
        title: "Contatti di Emergenza",
        description: "Trova numeri utili per amministrazione e servizi.",
        route: "/contatti",
    },
];

/// Counts across all collections.
///
/// Computed from what is stored; never seeds anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Stored announcements.
    pub announcements: usize,
    /// Title of the most recent announcement.
    pub latest_announcement: Option<String>,
    /// Stored documents.
    pub documents: usize,
    /// Stored issue reports.
    pub issues: usize,
    /// Issues still `Aperto` or `In Elaborazione`.
    pub open_issues: usize,
    /// Stored reservations.
    pub reservations: usize,
    /// Reservations on or after `today`.
    pub upcoming_reservations: usize,
}

impl Summary {
    /// Summarize the stored collections as of `today`.
    #[must_use]
    pub fn collect(persistence: &Persistence, today: NaiveDate) -> Self {
        let announcements = Repository::<Announcement>::new(persistence).load(false);
        let documents = Repository::<Document>::new(persistence).load(false);
        let issues = Repository::<Issue>::new(persistence).load(false);
        let reservations = Repository::<Reservation>::new(persistence).load(false);

        Self {
            announcements: announcements.len(),
            latest_announcement: announcements.first().map(|a| a.title.clone()),
            documents: documents.len(),
            issues: issues.len(),
            open_issues: issues.iter().filter(|i| i.status.is_open()).count(),
            reservations: reservations.len(),
            upcoming_reservations: reservations.iter().filter(|r| r.date >= today).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{next_id, today, AnnouncementDraft, Draft, ReservationDraft};
    use crate::pages::Page;
    use chrono::{Duration, NaiveTime, TimeZone, Utc};

    #[test]
    fn test_cards() {
        assert_eq!(CARDS.len(), 5);
        assert!(CARDS.iter().all(|c| c.route.starts_with('/')));
    }

    #[test]
    fn test_empty_store() {
        let persistence = Persistence::in_memory();
        let summary = Summary::collect(&persistence, Utc::now().date_naive());
        assert_eq!(summary, Summary::default());
        assert!(persistence.keys().is_empty());
    }

    #[test]
    fn test_counts() {
        let persistence = Persistence::in_memory();
        let today = Utc::now().date_naive();

        let _ = Page::<Issue>::load(&persistence, true);
        let _ = Page::<Document>::load(&persistence, true);
        let mut announcements = Page::<Announcement>::load(&persistence, false);
        announcements
            .create(AnnouncementDraft::new().title("Vecchio").content("x"))
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        announcements
            .create(AnnouncementDraft::new().title("Nuovo").content("y"))
            .unwrap();
        Page::<Reservation>::load(&persistence, false)
            .create(
                ReservationDraft::new()
                    .amenity("Sala Feste")
                    .user_name("Anna")
                    .date(today + Duration::days(2))
                    .time(NaiveTime::from_hms_opt(20, 0, 0).unwrap()),
            )
            .unwrap();

        let summary = Summary::collect(&persistence, today);
        assert_eq!(summary.announcements, 2);
        assert_eq!(summary.latest_announcement.as_deref(), Some("Nuovo"));
        assert_eq!(summary.documents, 3);
        assert_eq!(summary.issues, 3);
        assert_eq!(summary.open_issues, 2);
        assert_eq!(summary.reservations, 1);
        assert_eq!(summary.upcoming_reservations, 1);

        // A week later the booking is in the past
        let later = Summary::collect(&persistence, today + Duration::days(7));
        assert_eq!(later.upcoming_reservations, 0);
    }

    #[test]
    fn test_booking_and_summary_share_the_day() {
        // Late evening UTC, already the next day east of Greenwich
        let now = Utc.with_ymd_and_hms(2030, 5, 1, 23, 30, 0).unwrap();
        let day = today(now);
        let draft = || {
            ReservationDraft::new()
                .amenity("Palestra")
                .user_name("Luca")
                .time(NaiveTime::from_hms_opt(8, 0, 0).unwrap())
        };

        let booked = draft().date(day).build(next_id(now), now).unwrap();
        assert!(draft()
            .date(day - Duration::days(1))
            .build(next_id(now), now)
            .is_err());

        let persistence = Persistence::in_memory();
        Repository::<Reservation>::new(&persistence).save(&[booked]);
        let summary = Summary::collect(&persistence, day);
        assert_eq!(summary.upcoming_reservations, 1);
    }
}
