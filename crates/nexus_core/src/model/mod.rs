//! CRM domain records.
//!
//! # Responsibility
//! - Define the canonical records persisted in slots and held in memory.
//! - Provide validation applied before every Store write.
//!
//! # Invariants
//! - Every list record is identified by a stable string `id`.
//! - Records are replaced wholesale; there are no partial patches.
//! - Field names serialize in camelCase to keep the slot layout stable.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod activity;
pub mod contact;
pub mod deal;
pub mod notification;
pub mod profile;
pub mod task;

/// Stable identifier shared by every list record.
pub type RecordId = String;

/// Record stored in an id-addressed collection slot.
pub trait Record {
    fn id(&self) -> &str;
}

/// Validation failures raised before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyId,
    EmptyTitle { id: RecordId },
    ProbabilityOutOfRange { id: RecordId, value: u8 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "record id cannot be empty"),
            Self::EmptyTitle { id } => write!(f, "title cannot be empty for record `{id}`"),
            Self::ProbabilityOutOfRange { id, value } => write!(
                f,
                "probability {value} is out of range 0..=100 for deal `{id}`"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Generates a new record id with a one-letter collection prefix.
pub fn new_record_id(prefix: char) -> RecordId {
    format!("{prefix}{}", uuid::Uuid::new_v4().simple())
}

pub(crate) fn ensure_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::EmptyId);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::new_record_id;

    #[test]
    fn new_record_id_keeps_prefix_and_is_unique() {
        let first = new_record_id('d');
        let second = new_record_id('d');
        assert!(first.starts_with('d'));
        assert_eq!(first.len(), 33);
        assert_ne!(first, second);
    }
}
