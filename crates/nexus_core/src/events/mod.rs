//! Typed change events emitted by controller mutations.
//!
//! # Responsibility
//! - Describe every state mutation as a `ChangeEvent` value.
//! - Fan events out to registered subscribers in registration order.
//!
//! # Invariants
//! - Exactly one event is published per successful mutation.
//! - Events are published after persistence succeeded, never before.

use crate::model::contact::Contact;
use crate::model::deal::Deal;
use crate::model::profile::UserProfile;
use crate::model::task::Task;
use crate::model::RecordId;
use chrono::{DateTime, Utc};

pub mod audit;

/// What changed. `before` is `None` when the record was not held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    ContactUpdated {
        before: Option<Contact>,
        after: Contact,
    },
    DealUpdated {
        before: Option<Deal>,
        after: Deal,
    },
    DealCreated {
        deal: Deal,
    },
    TaskCreated {
        task: Task,
    },
    TaskToggled {
        id: RecordId,
        completed: bool,
    },
    NotificationRead {
        id: RecordId,
    },
    AllNotificationsRead,
    ProfileUpdated {
        profile: UserProfile,
    },
}

impl Change {
    /// Stable short name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ContactUpdated { .. } => "contact_updated",
            Self::DealUpdated { .. } => "deal_updated",
            Self::DealCreated { .. } => "deal_created",
            Self::TaskCreated { .. } => "task_created",
            Self::TaskToggled { .. } => "task_toggled",
            Self::NotificationRead { .. } => "notification_read",
            Self::AllNotificationsRead => "all_notifications_read",
            Self::ProfileUpdated { .. } => "profile_updated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Display name of the acting user.
    pub actor: String,
    pub at: DateTime<Utc>,
    pub change: Change,
}

pub trait ChangeSubscriber {
    fn on_change(&mut self, event: &ChangeEvent);
}

/// Ordered list of subscribers.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<Box<dyn ChangeSubscriber>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn ChangeSubscriber>) {
        self.subscribers.push(subscriber);
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn publish(&mut self, event: &ChangeEvent) {
        for subscriber in &mut self.subscribers {
            subscriber.on_change(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Change, ChangeEvent, ChangeSubscriber, EventBus};
    use chrono::Utc;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Names(Rc<RefCell<Vec<&'static str>>>);

    impl ChangeSubscriber for Names {
        fn on_change(&mut self, event: &ChangeEvent) {
            self.0.borrow_mut().push(event.change.name());
        }
    }

    #[test]
    fn publish_reaches_every_subscriber_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(Names(Rc::clone(&seen))));
        bus.subscribe(Box::new(Names(Rc::clone(&seen))));

        bus.publish(&ChangeEvent {
            actor: "Sarah Sales".to_string(),
            at: Utc::now(),
            change: Change::AllNotificationsRead,
        });

        assert_eq!(bus.len(), 2);
        assert_eq!(*seen.borrow(), vec!["all_notifications_read"; 2]);
    }
}
