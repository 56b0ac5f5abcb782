use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{non_blank, next_id, require, Draft, Patch};
use crate::error::{Error, Result};
use crate::storage::{keys, Persistence};

const REQUIRED: &str = "Nome ed email sono obbligatori.";

/// A unit owned or rented by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUnit {
    /// Stable id.
    pub id: String,
    /// Street address or internal reference.
    pub address: String,
    /// "appartamento", "garage", "cantina", "posto_auto"...
    #[serde(rename = "type")]
    pub kind: String,
}

/// The profile of whoever is using this installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Stable id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Unlocks the administrator fields of issue reports.
    #[serde(default)]
    pub is_admin: bool,
    /// Units in the building.
    #[serde(default)]
    pub units: Vec<UserUnit>,
}

impl UserProfile {
    /// Read the stored profile, if any.
    #[must_use]
    pub fn load(persistence: &Persistence) -> Option<Self> {
        persistence.get(keys::USER_PROFILE)
    }

    /// Overwrite the stored profile.
    pub fn save(&self, persistence: &Persistence) {
        persistence.set(keys::USER_PROFILE, self);
    }

    /// Whether `profile` grants administrator rights. No profile means no.
    #[must_use]
    pub fn is_admin_profile(profile: Option<&Self>) -> bool {
        profile.is_some_and(|p| p.is_admin)
    }

    /// Check that name and email are filled in.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when either is blank.
    pub fn validate(&self) -> Result<()> {
        require(&[&self.name, &self.email], REQUIRED)
    }
}

/// Parse one `ADDRESS:KIND` unit argument. `index` numbers the unit id.
///
/// The split is on the last colon, so addresses may contain colons.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the colon is missing or either side
/// is blank.
pub fn parse_unit(index: usize, raw: &str) -> Result<UserUnit> {
    let invalid = || Error::validation(format!("Unità non valida: '{raw}' (usa INDIRIZZO:TIPO)"));
    let (address, kind) = raw.rsplit_once(':').ok_or_else(invalid)?;
    let (address, kind) = (address.trim(), kind.trim());
    if address.is_empty() || kind.is_empty() {
        return Err(invalid());
    }
    Ok(UserUnit {
        id: format!("unit-{}", index + 1),
        address: address.to_string(),
        kind: kind.to_string(),
    })
}

/// Parse a list of unit arguments, failing on the first bad one.
///
/// # Errors
///
/// See [`parse_unit`].
pub fn parse_units<S: AsRef<str>>(raw: &[S]) -> Result<Vec<UserUnit>> {
    raw.iter()
        .enumerate()
        .map(|(i, unit)| parse_unit(i, unit.as_ref()))
        .collect()
}

/// Builder for the first [`UserProfile`].
#[derive(Debug, Clone, Default)]
pub struct UserProfileDraft {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    is_admin: bool,
    units: Vec<UserUnit>,
}

impl UserProfileDraft {
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

    /// Set the email address.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the phone number.
    #[must_use]
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Grant or withhold administrator rights.
    #[must_use]
    pub fn admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Set the units.
    #[must_use]
    pub fn units(mut self, units: Vec<UserUnit>) -> Self {
        self.units = units;
        self
    }
}

impl From<UserProfilePatch> for UserProfileDraft {
    fn from(patch: UserProfilePatch) -> Self {
        Self {
            name: patch.name,
            email: patch.email,
            phone: patch.phone,
            is_admin: patch.is_admin.unwrap_or(false),
            units: patch.units.unwrap_or_default(),
        }
    }
}

impl Draft for UserProfileDraft {
    type Output = UserProfile;

    fn build(self, id: String, _now: DateTime<Utc>) -> Result<UserProfile> {
        let (Some(name), Some(email)) = (non_blank(self.name), non_blank(self.email)) else {
            return Err(Error::validation(REQUIRED));
        };
        Ok(UserProfile {
            id,
            name,
            email,
            phone: non_blank(self.phone),
            is_admin: self.is_admin,
            units: self.units,
        })
    }
}

/// Edit of the stored [`UserProfile`].
#[derive(Debug, Clone, Default)]
pub struct UserProfilePatch {
    /// New display name.
    pub name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New phone number; a blank one clears it.
    pub phone: Option<String>,
    /// New administrator flag.
    pub is_admin: Option<bool>,
    /// Replacement unit list.
    pub units: Option<Vec<UserUnit>>,
}

impl UserProfilePatch {
    /// Merge into `existing`, or build a new profile when there is none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the result lacks a name or an
    /// email. Nothing is changed in that case.
    pub fn resolve(self, existing: Option<UserProfile>, now: DateTime<Utc>) -> Result<UserProfile> {
        let Some(mut profile) = existing else {
            return UserProfileDraft::from(self).build(next_id(now), now);
        };
        self.apply(&mut profile, now);
        profile.validate()?;
        Ok(profile)
    }
}

impl Patch<UserProfile> for UserProfilePatch {
    fn apply(self, target: &mut UserProfile, _now: DateTime<Utc>) {
        if let Some(name) = self.name {
            target.name = name.trim().to_string();
        }
        if let Some(email) = self.email {
            target.email = email.trim().to_string();
        }
        if let Some(phone) = self.phone {
            target.phone = non_blank(Some(phone));
        }
        if let Some(is_admin) = self.is_admin {
            target.is_admin = is_admin;
        }
        if let Some(units) = self.units {
            target.units = units;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> UserProfile {
        UserProfile {
            id: "u1".into(),
            name: "Mario Rossi".into(),
            email: "amministratore@condominio.it".into(),
            phone: None,
            is_admin: true,
            units: vec![UserUnit {
                id: "1".into(),
                address: "Scala A, int. 3".into(),
                kind: "appartamento".into(),
            }],
        }
    }

    #[test]
    fn test_save_and_load() {
        let persistence = Persistence::in_memory();
        assert!(UserProfile::load(&persistence).is_none());

        admin().save(&persistence);
        assert_eq!(UserProfile::load(&persistence), Some(admin()));
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(admin()).unwrap();
        assert_eq!(json["isAdmin"], true);
        assert_eq!(json["units"][0]["type"], "appartamento");
    }

    #[test]
    fn test_is_admin_profile() {
        assert!(UserProfile::is_admin_profile(Some(&admin())));
        assert!(!UserProfile::is_admin_profile(None));

        let resident = UserProfile {
            is_admin: false,
            ..admin()
        };
        assert!(!UserProfile::is_admin_profile(Some(&resident)));
    }

    #[test]
    fn test_first_profile_requires_name_and_email() {
        let only_name = UserProfilePatch {
            name: Some("Anna".into()),
            ..UserProfilePatch::default()
        };
        let err = only_name.resolve(None, Utc::now()).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), REQUIRED);

        let err = UserProfileDraft::new()
            .name("Anna")
            .email("   ")
            .build("1".into(), Utc::now())
            .unwrap_err();
        assert_eq!(err.to_string(), REQUIRED);
    }

    #[test]
    fn test_first_profile_defaults() {
        let profile = UserProfilePatch {
            name: Some(" Anna Bianchi ".into()),
            email: Some("anna@example.com".into()),
            phone: Some("  ".into()),
            ..UserProfilePatch::default()
        }
        .resolve(None, Utc::now())
        .unwrap();
        assert_eq!(profile.name, "Anna Bianchi");
        assert_eq!(profile.phone, None);
        assert!(!profile.is_admin);
        assert!(profile.units.is_empty());
        assert!(!profile.id.is_empty());
    }

    #[test]
    fn test_blank_phone_clears_stored_phone() {
        let existing = UserProfile {
            phone: Some("+39 333 1234567".into()),
            ..admin()
        };
        let updated = UserProfilePatch {
            phone: Some(" ".into()),
            ..UserProfilePatch::default()
        }
        .resolve(Some(existing), Utc::now())
        .unwrap();
        assert_eq!(updated.phone, None);
        assert_eq!(updated.name, "Mario Rossi");
        assert_eq!(updated.units, admin().units);
    }

    #[test]
    fn test_patch_cannot_blank_the_name() {
        let patch = UserProfilePatch {
            name: Some("  ".into()),
            ..UserProfilePatch::default()
        };
        let err = patch.resolve(Some(admin()), Utc::now()).unwrap_err();
        assert_eq!(err.to_string(), REQUIRED);
    }

    #[test]
    fn test_admin_toggle() {
        let now = Utc::now();
        let revoke = UserProfilePatch {
            is_admin: Some(false),
            ..UserProfilePatch::default()
        };
        let resident = revoke.resolve(Some(admin()), now).unwrap();
        assert!(!resident.is_admin);
        assert_eq!(resident.id, "u1");

        // Leaving the flag out keeps the stored value
        let unchanged = UserProfilePatch::default()
            .resolve(Some(resident), now)
            .unwrap();
        assert!(!unchanged.is_admin);

        let grant = UserProfilePatch {
            is_admin: Some(true),
            ..UserProfilePatch::default()
        };
        assert!(grant.resolve(Some(unchanged), now).unwrap().is_admin);
    }

    #[test]
    fn test_parse_unit() {
        let unit = parse_unit(1, " Via Roma 1: int. 4 : cantina ").unwrap();
        assert_eq!(unit.id, "unit-2");
        assert_eq!(unit.address, "Via Roma 1: int. 4");
        assert_eq!(unit.kind, "cantina");

        for bad in ["Scala A", "Scala A:", ":garage", " : "] {
            let err = parse_unit(0, bad).unwrap_err();
            assert!(err.is_validation(), "{bad}");
            assert!(err.to_string().contains("INDIRIZZO:TIPO"));
        }
    }

    #[test]
    fn test_parse_units_stops_at_bad_entry() {
        let units = parse_units(&["Scala A:appartamento", "Box 7:garage"]).unwrap();
        assert_eq!(units.len(), 2);
        assert_eq!(units[1].id, "unit-2");
        assert!(parse_units(&["Scala A:appartamento", "Box 7"]).is_err());
    }
}
