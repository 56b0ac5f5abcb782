use serde::{Deserialize, Serialize};

/// An entry in the building's contact directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Stable id.
    pub id: String,
    /// Person or company.
    pub name: String,
    /// What they do for the building.
    pub role: String,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// The fixed contact directory. Not persisted.
#[must_use]
pub fn directory() -> Vec<Contact> {
    let entry = |id: &str, name: &str, role: &str, phone: &str, email: Option<&str>| Contact {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        phone: Some(phone.to_string()),
        email: email.map(ToString::to_string),
    };
    vec![
        entry(
            "1",
            "Mario Rossi",
            "Amministratore Condominiale",
            "012-3456789",
            Some("amministratore@condominio.it"),
        ),
        entry("2", "Luigi Verdi", "Portiere (Mattina)", "333-1122334", None),
        entry("3", "Giovanna Bianchi", "Portiere (Pomeriggio)", "333-4455667", None),
        entry(
            "4",
            "Pronto Intervento Idraulico H24",
            "Idraulico Emergenze",
            "800-123456",
            None,
        ),
        entry(
            "5",
            "Servizio Elettricisti Associati",
            "Elettricista Emergenze",
            "800-654321",
            None,
        ),
        entry(
            "6",
            "Manutenzione Ascensori S.r.l.",
            "Assistenza Ascensori",
            "02-9876543",
            None,
        ),
    ]
}
