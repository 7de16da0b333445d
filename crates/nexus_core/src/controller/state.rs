//! In-memory session copies of every entity collection.

use crate::model::activity::ActivityLogEntry;
use crate::model::contact::Contact;
use crate::model::deal::Deal;
use crate::model::notification::Notification;
use crate::model::profile::UserProfile;
use crate::model::task::Task;
use crate::model::Record;
use crate::store::slots::SlotStorage;
use crate::store::{Store, StoreResult};

/// Owned by the controller; views receive `&AppState`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub contacts: Vec<Contact>,
    pub deals: Vec<Deal>,
    pub tasks: Vec<Task>,
    /// Newest first.
    pub activities: Vec<ActivityLogEntry>,
    pub notifications: Vec<Notification>,
    pub profile: UserProfile,
}

impl AppState {
    /// Reads every collection from an initialized store.
    pub fn load<S: SlotStorage>(store: &Store<S>) -> StoreResult<Self> {
        Ok(Self {
            contacts: store.get_contacts()?,
            deals: store.get_deals()?,
            tasks: store.get_tasks()?,
            activities: store.get_activities()?,
            notifications: store.get_notifications()?,
            profile: store.get_profile()?,
        })
    }

    pub fn contact(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|contact| contact.id == id)
    }

    pub fn deal(&self, id: &str) -> Option<&Deal> {
        self.deals.iter().find(|deal| deal.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn unread_notifications(&self) -> usize {
        self.notifications.iter().filter(|item| !item.read).count()
    }
}

/// Replaces the record with the same id; returns whether one was found.
pub(crate) fn replace_by_id<T: Record>(items: &mut [T], record: T) -> bool {
    match items.iter_mut().find(|item| item.id() == record.id()) {
        Some(item) => {
            *item = record;
            true
        }
        None => false,
    }
}
