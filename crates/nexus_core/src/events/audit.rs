//! Audit policy: maps change events to activity-log entries.
//!
//! # Invariants
//! - A deal update yields at most one entry; stage change wins over amount change.
//! - Contact updates always yield one entry.
//! - Task toggles, notification reads and profile saves yield none.

use super::{Change, ChangeEvent, ChangeSubscriber};
use crate::model::activity::{ActivityLogEntry, ActivityType, EntityType};
use crate::model::deal::format_amount;

pub const ACTION_CONTACT_UPDATED: &str = "Updated Contact";
pub const ACTION_DEAL_STAGE_CHANGED: &str = "Deal Stage Changed";
pub const ACTION_DEAL_VALUE_UPDATED: &str = "Deal Value Updated";
pub const ACTION_DEAL_CREATED: &str = "Created Deal";
pub const ACTION_TASK_CREATED: &str = "Created Task";

/// Derives the audit entry for one event, if the policy records it.
pub fn derive_entry(event: &ChangeEvent) -> Option<ActivityLogEntry> {
    let entry = |kind: ActivityType, action: &str, details: String| {
        ActivityLogEntry::new(kind, event.actor.as_str(), action, details, event.at)
    };

    match &event.change {
        Change::ContactUpdated { after, .. } => Some(
            entry(
                ActivityType::Update,
                ACTION_CONTACT_UPDATED,
                format!("Updated contact details for {}", after.full_name()),
            )
            .about(EntityType::Contact, after.id.as_str()),
        ),
        Change::DealUpdated {
            before: Some(before),
            after,
        } => {
            let (action, details) = if before.stage != after.stage {
                (
                    ACTION_DEAL_STAGE_CHANGED,
                    format!(
                        "Moved \"{}\" from {} to {}",
                        after.title, before.stage, after.stage
                    ),
                )
            } else if before.amount != after.amount {
                (
                    ACTION_DEAL_VALUE_UPDATED,
                    format!(
                        "Updated \"{}\" value from {} to {}",
                        after.title,
                        format_amount(before.amount),
                        format_amount(after.amount)
                    ),
                )
            } else {
                return None;
            };
            Some(
                entry(ActivityType::Update, action, details)
                    .about(EntityType::Deal, after.id.as_str()),
            )
        }
        Change::DealUpdated { before: None, .. } => None,
        Change::DealCreated { deal } => Some(
            entry(
                ActivityType::Create,
                ACTION_DEAL_CREATED,
                format!("Created deal \"{}\" in {}", deal.title, deal.stage),
            )
            .about(EntityType::Deal, deal.id.as_str()),
        ),
        Change::TaskCreated { task } => Some(
            entry(
                ActivityType::Create,
                ACTION_TASK_CREATED,
                format!("Created task \"{}\" due {}", task.title, task.due_date),
            )
            .about(EntityType::Task, task.id.as_str()),
        ),
        Change::TaskToggled { .. }
        | Change::NotificationRead { .. }
        | Change::AllNotificationsRead
        | Change::ProfileUpdated { .. } => None,
    }
}

/// Subscriber that queues derived entries until the controller persists them.
#[derive(Debug, Default)]
pub struct AuditSubscriber {
    pending: Vec<ActivityLogEntry>,
}

impl AuditSubscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains queued entries in derivation order.
    pub fn take_pending(&mut self) -> Vec<ActivityLogEntry> {
        std::mem::take(&mut self.pending)
    }
}

impl ChangeSubscriber for AuditSubscriber {
    fn on_change(&mut self, event: &ChangeEvent) {
        if let Some(entry) = derive_entry(event) {
            self.pending.push(entry);
        }
    }
}
