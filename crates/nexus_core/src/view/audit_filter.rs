//! Audit-log search and type filter.

use crate::model::activity::{ActivityLogEntry, ActivityType};

/// Case-insensitive substring search over action, details and user,
/// combined with an optional type filter (`None` means all types).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilter {
    pub search: String,
    pub kind: Option<ActivityType>,
}

impl ActivityFilter {
    pub fn new(search: impl Into<String>, kind: Option<ActivityType>) -> Self {
        Self {
            search: search.into(),
            kind,
        }
    }

    pub fn matches(&self, entry: &ActivityLogEntry) -> bool {
        if self.kind.is_some_and(|kind| kind != entry.kind) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || [&entry.action, &entry.details, &entry.user]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn apply<'a>(&self, entries: &'a [ActivityLogEntry]) -> Vec<&'a ActivityLogEntry> {
        entries.iter().filter(|entry| self.matches(entry)).collect()
    }
}
