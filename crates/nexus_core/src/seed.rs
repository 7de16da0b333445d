//! First-run demo data written into empty slots by `Store::init`.

use crate::model::activity::{ActivityLogEntry, ActivityType, EntityType};
use crate::model::contact::Contact;
use crate::model::deal::{Deal, DealStage};
use crate::model::notification::{Notification, NotificationKind};
use crate::model::profile::{NotificationPreferences, UserProfile};
use crate::model::task::Task;
use chrono::{DateTime, Duration, SecondsFormat, Utc};

fn contact(
    id: &str,
    name: (&str, &str),
    email: &str,
    phone: &str,
    company: &str,
    position: &str,
    last_contacted: &str,
    notes: &str,
) -> Contact {
    Contact {
        id: id.to_string(),
        first_name: name.0.to_string(),
        last_name: name.1.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        company: company.to_string(),
        position: position.to_string(),
        last_contacted: last_contacted.to_string(),
        notes: notes.to_string(),
    }
}

pub fn contacts() -> Vec<Contact> {
    vec![
        contact(
            "c1",
            ("Alice", "Johnson"),
            "alice@techcorp.com",
            "+1 555-0101",
            "TechCorp",
            "CTO",
            "2023-10-25",
            "Interested in enterprise plan. Concerns about security compliance.",
        ),
        contact(
            "c2",
            ("Bob", "Smith"),
            "bob@marketinggurus.io",
            "+1 555-0102",
            "MarketingGurus",
            "VP Sales",
            "2023-10-28",
            "Met at conference. Looking for automation tools.",
        ),
        contact(
            "c3",
            ("Carol", "Danvers"),
            "carol@avengers.inc",
            "+1 555-0103",
            "Avengers Inc",
            "Director",
            "2023-10-20",
            "High priority lead. Needs fast implementation.",
        ),
        contact(
            "c4",
            ("David", "Bowman"),
            "dave@discovery.org",
            "+1 555-0104",
            "Discovery One",
            "Lead Engineer",
            "2023-10-15",
            "Evaluating API capabilities.",
        ),
    ]
}

fn deal(
    id: &str,
    title: &str,
    amount: u64,
    stage: DealStage,
    contact_id: &str,
    close_date: &str,
    probability: u8,
) -> Deal {
    Deal {
        id: id.to_string(),
        title: title.to_string(),
        amount,
        stage,
        contact_id: contact_id.to_string(),
        close_date: close_date.to_string(),
        probability,
    }
}

pub fn deals() -> Vec<Deal> {
    vec![
        deal("d1", "TechCorp Enterprise License", 50_000, DealStage::Negotiation, "c1", "2023-11-15", 80),
        deal("d2", "MarketingGurus Starter Pack", 5_000, DealStage::Qualified, "c2", "2023-12-01", 40),
        deal("d3", "Avengers Global Rollout", 120_000, DealStage::ProposalSent, "c3", "2023-11-30", 60),
        deal("d4", "Discovery API Integration", 15_000, DealStage::New, "c4", "2024-01-10", 20),
        deal("d5", "Previous Quarter Deal", 30_000, DealStage::ClosedWon, "c1", "2023-09-15", 100),
    ]
}

fn task(id: &str, title: &str, due_date: &str, completed: bool, related_to: &str) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        due_date: due_date.to_string(),
        completed,
        related_to: Some(related_to.to_string()),
    }
}

pub fn tasks() -> Vec<Task> {
    vec![
        task("t1", "Follow up with Alice regarding security docs", "2023-11-01", false, "TechCorp Deal"),
        task("t2", "Prepare slide deck for Avengers presentation", "2023-11-05", false, "Avengers Inc"),
        task("t3", "Send contract to legal", "2023-10-30", true, "General"),
    ]
}

fn activity(
    id: &str,
    kind: ActivityType,
    user: &str,
    action: &str,
    details: &str,
    timestamp: &str,
    entity: (EntityType, Option<&str>),
) -> ActivityLogEntry {
    ActivityLogEntry {
        id: id.to_string(),
        kind,
        user: user.to_string(),
        action: action.to_string(),
        details: details.to_string(),
        timestamp: timestamp.to_string(),
        entity_id: entity.1.map(ToString::to_string),
        entity_type: Some(entity.0),
    }
}

pub fn activities() -> Vec<ActivityLogEntry> {
    vec![
        activity(
            "a1",
            ActivityType::Email,
            "Sarah Sales",
            "Sent Proposal Email",
            "Sent proposal v2 to Alice Johnson regarding Enterprise License",
            "2023-10-25T14:30:00Z",
            (EntityType::Contact, Some("c1")),
        ),
        activity(
            "a2",
            ActivityType::Call,
            "Mike Manager",
            "Discovery Call",
            "Discussed requirements with Bob Smith. Client is interested in Q4 deployment.",
            "2023-10-28T10:00:00Z",
            (EntityType::Contact, Some("c2")),
        ),
        activity(
            "a3",
            ActivityType::Update,
            "Sarah Sales",
            "Updated Deal Stage",
            "Moved \"Avengers Global Rollout\" from Qualified to Proposal Sent",
            "2023-10-20T11:00:00Z",
            (EntityType::Deal, Some("d3")),
        ),
        activity(
            "a4",
            ActivityType::System,
            "System Admin",
            "System Maintenance",
            "Scheduled maintenance completed successfully",
            "2023-10-15T02:00:00Z",
            (EntityType::System, None),
        ),
        activity(
            "a5",
            ActivityType::Create,
            "Mike Manager",
            "Created New Lead",
            "Added David Bowman from Discovery One manually",
            "2023-10-15T09:30:00Z",
            (EntityType::Contact, Some("c4")),
        ),
        activity(
            "a6",
            ActivityType::Delete,
            "Sarah Sales",
            "Deleted Task",
            "Removed outdated task \"Call John Doe\"",
            "2023-10-18T16:45:00Z",
            (EntityType::Task, None),
        ),
    ]
}

fn notification(
    id: &str,
    title: &str,
    message: &str,
    at: DateTime<Utc>,
    read: bool,
    kind: NotificationKind,
) -> Notification {
    Notification {
        id: id.to_string(),
        title: title.to_string(),
        message: message.to_string(),
        timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        read,
        kind,
    }
}

/// Seed notifications, timestamped relative to `now`.
pub fn notifications(now: DateTime<Utc>) -> Vec<Notification> {
    vec![
        notification(
            "n1",
            "New Lead Assigned",
            "You have been assigned a new lead: Sarah Connor.",
            now - Duration::minutes(30),
            false,
            NotificationKind::Info,
        ),
        notification(
            "n2",
            "Task Due Soon",
            "Prepare slide deck is due tomorrow.",
            now - Duration::hours(2),
            false,
            NotificationKind::Warning,
        ),
        notification(
            "n3",
            "Deal Won",
            "The TechCorp Enterprise License deal was closed won!",
            now - Duration::hours(24),
            true,
            NotificationKind::Success,
        ),
        notification(
            "n4",
            "System Update",
            "Nexus CRM will undergo maintenance tonight at 2 AM.",
            now - Duration::hours(48),
            true,
            NotificationKind::Alert,
        ),
    ]
}

pub fn default_profile() -> UserProfile {
    UserProfile {
        id: "u1".to_string(),
        name: "Sarah Sales".to_string(),
        email: "sarah@nexus.com".to_string(),
        role: "Senior Account Executive".to_string(),
        phone: "+1 (555) 019-2834".to_string(),
        location: "San Francisco, CA".to_string(),
        bio: "Dedicated sales professional with 5+ years of experience in SaaS. Focused on building long-term client relationships and driving revenue growth.".to_string(),
        avatar: None,
        notification_preferences: NotificationPreferences {
            email: true,
            desktop: true,
            marketing: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{activities, contacts, deals, notifications, tasks};
    use chrono::Utc;

    #[test]
    fn seed_records_are_valid() {
        assert!(contacts().iter().all(|c| c.validate().is_ok()));
        assert!(deals().iter().all(|d| d.validate().is_ok()));
        assert!(tasks().iter().all(|t| t.validate().is_ok()));
        assert!(activities().iter().all(|a| a.validate().is_ok()));
        assert!(notifications(Utc::now()).iter().all(|n| n.validate().is_ok()));
    }

    #[test]
    fn seed_notifications_are_newest_first() {
        let items = notifications(Utc::now());
        assert_eq!(items.len(), 4);
        assert!(items.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
        assert_eq!(items.iter().filter(|n| !n.read).count(), 2);
    }
}
