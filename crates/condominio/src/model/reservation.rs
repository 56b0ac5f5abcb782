use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{non_blank, require, today, Draft, Entity, Patch};
use crate::error::{Error, Result};
use crate::storage::keys;

const REQUIRED: &str = "Tutti i campi sono obbligatori per la prenotazione.";
const PAST_DATE: &str = "La data della prenotazione non può essere nel passato.";

/// A booking of a shared amenity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    /// Time-derived id.
    pub id: String,
    /// What is booked, e.g. "Sala Feste".
    pub amenity: String,
    /// Who booked it.
    pub user_name: String,
    /// Day of the booking.
    pub date: NaiveDate,
    /// Start time, stored as `HH:MM`.
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
}

impl Reservation {
    /// Start of the booking.
    #[must_use]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

impl Entity for Reservation {
    const STORAGE_KEY: &'static str = keys::RESERVATIONS;
    const NAME: &'static str = "reservation";
    const DELETE_PROMPT: &'static str = "Sei sicuro di voler cancellare questa prenotazione?";

    type Draft = ReservationDraft;
    type Patch = ReservationPatch;

    fn id(&self) -> &str {
        &self.id
    }

    // Soonest first
    fn compare(a: &Self, b: &Self) -> Ordering {
        a.starts_at().cmp(&b.starts_at())
    }

    fn validate(&self) -> Result<()> {
        require(&[&self.amenity, &self.user_name], REQUIRED)
    }
}

/// Parse an `HH:MM` (or `HH:MM:SS`) time of day.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the input is not a time of day.
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
        .map_err(|_| Error::validation(format!("Orario non valido: {input}")))
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw).map_err(de::Error::custom)
    }
}

/// Builder for a new [`Reservation`].
#[derive(Debug, Clone, Default)]
pub struct ReservationDraft {
    amenity: Option<String>,
    user_name: Option<String>,
    date: Option<NaiveDate>,
    time: Option<NaiveTime>,
}

impl ReservationDraft {
    /// An empty draft; the date defaults to today when built.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the amenity.
    #[must_use]
    pub fn amenity(mut self, amenity: impl Into<String>) -> Self {
        self.amenity = Some(amenity.into());
        self
    }

    /// Set who is booking.
    #[must_use]
    pub fn user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    /// Set the day.
    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the start time.
    #[must_use]
    pub fn time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }
}

impl Draft for ReservationDraft {
    type Output = Reservation;

    fn build(self, id: String, now: DateTime<Utc>) -> Result<Reservation> {
        let today = today(now);
        let (Some(amenity), Some(user_name), Some(time)) =
            (non_blank(self.amenity), non_blank(self.user_name), self.time)
        else {
            return Err(Error::validation(REQUIRED));
        };
        let date = self.date.unwrap_or(today);
        if date < today {
            return Err(Error::validation(PAST_DATE));
        }
        Ok(Reservation {
            id,
            amenity,
            user_name,
            date,
            time,
        })
    }
}

/// Edit of an existing [`Reservation`].
#[derive(Debug, Clone, Default)]
pub struct ReservationPatch {
    /// New amenity.
    pub amenity: Option<String>,
    /// New booker.
    pub user_name: Option<String>,
    /// New day.
    pub date: Option<NaiveDate>,
    /// New start time.
    pub time: Option<NaiveTime>,
}

impl Patch<Reservation> for ReservationPatch {
    fn apply(self, target: &mut Reservation, _now: DateTime<Utc>) {
        if let Some(amenity) = self.amenity {
            target.amenity = amenity.trim().to_string();
        }
        if let Some(user_name) = self.user_name {
            target.user_name = user_name.trim().to_string();
        }
        if let Some(date) = self.date {
            target.date = date;
        }
        if let Some(time) = self.time {
            target.time = time;
        }
    }
}
