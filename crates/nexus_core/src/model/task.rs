//! Task record.

use super::{ensure_id, new_record_id, Record, RecordId, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    /// ISO date (`YYYY-MM-DD`).
    pub due_date: String,
    pub completed: bool,
    /// Free-text relation label, e.g. a company or deal name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_to: Option<String>,
}

impl Task {
    /// Creates an open task with a generated id.
    pub fn new(title: impl Into<String>, due_date: impl Into<String>) -> Self {
        Self {
            id: new_record_id('t'),
            title: title.into(),
            due_date: due_date.into(),
            completed: false,
            related_to: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_id(&self.id)?;
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }
}
