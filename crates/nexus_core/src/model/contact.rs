//! Contact record.
//!
//! Contacts arrive through seed data only and are edited by full replace.

use super::{ensure_id, Record, RecordId, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub position: String,
    /// ISO date (`YYYY-MM-DD`).
    pub last_contacted: String,
    pub notes: String,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Two-letter avatar initials; missing name parts are skipped.
    pub fn initials(&self) -> String {
        [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_id(&self.id)
    }
}

impl Record for Contact {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::Contact;

    fn contact(first: &str, last: &str) -> Contact {
        Contact {
            id: "c9".to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: String::new(),
            phone: String::new(),
            company: String::new(),
            position: String::new(),
            last_contacted: "2023-10-25".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn initials_and_full_name() {
        let c = contact("alice", "Johnson");
        assert_eq!(c.initials(), "AJ");
        assert_eq!(c.full_name(), "alice Johnson");
    }

    #[test]
    fn initials_skip_empty_parts() {
        assert_eq!(contact("", "Bowman").initials(), "B");
        assert_eq!(contact("", "").full_name(), "");
    }

    #[test]
    fn serializes_camel_case_fields() {
        let json = serde_json::to_value(contact("Bob", "Smith")).unwrap();
        assert_eq!(json["firstName"], "Bob");
        assert_eq!(json["lastContacted"], "2023-10-25");
    }
}
