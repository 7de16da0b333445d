//! In-app notification record.

use super::{ensure_id, Record, RecordId, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Warning,
    Success,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: RecordId,
    pub title: String,
    pub message: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    pub read: bool,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

impl Notification {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_id(&self.id)
    }
}

impl Record for Notification {
    fn id(&self) -> &str {
        &self.id
    }
}
