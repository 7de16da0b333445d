//! Audit/activity log entries.
//!
//! # Invariants
//! - Entries are append-only and never mutated after creation.
//! - Collections keep newest entries first.

use super::{ensure_id, new_record_id, Record, RecordId, ValidationError};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Email,
    Call,
    Meeting,
    Note,
    Create,
    Update,
    Delete,
    System,
}

impl ActivityType {
    pub const ALL: [ActivityType; 8] = [
        ActivityType::Email,
        ActivityType::Call,
        ActivityType::Meeting,
        ActivityType::Note,
        ActivityType::Create,
        ActivityType::Update,
        ActivityType::Delete,
        ActivityType::System,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Call => "call",
            Self::Meeting => "meeting",
            Self::Note => "note",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value.trim().to_ascii_lowercase())
    }
}

/// Kind of record an activity refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Contact,
    Deal,
    Task,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogEntry {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    /// Display name of the acting user.
    pub user: String,
    /// Short action label, e.g. "Deal Stage Changed".
    pub action: String,
    pub details: String,
    /// RFC 3339 timestamp.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<EntityType>,
}

impl ActivityLogEntry {
    /// Creates an entry stamped at `at` with a generated id.
    pub fn new(
        kind: ActivityType,
        user: impl Into<String>,
        action: impl Into<String>,
        details: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: new_record_id('a'),
            kind,
            user: user.into(),
            action: action.into(),
            details: details.into(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
            entity_id: None,
            entity_type: None,
        }
    }

    /// Attaches the affected record reference.
    pub fn about(mut self, entity_type: EntityType, entity_id: impl Into<RecordId>) -> Self {
        self.entity_type = Some(entity_type);
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_id(&self.id)
    }
}

impl Record for ActivityLogEntry {
    fn id(&self) -> &str {
        &self.id
    }
}
