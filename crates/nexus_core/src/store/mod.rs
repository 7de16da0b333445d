//! Key-value persistence façade over named JSON slots.
//!
//! # Responsibility
//! - Expose per-entity get/add/update operations over slot documents.
//! - Seed empty slots with demo data on first run.
//! - Emulate remote latency through an injectable `Delay`.
//!
//! # Invariants
//! - `init()` must succeed before any other operation.
//! - `add` prepends; `update` replaces by id and is a no-op when absent.
//! - Records are validated before every write.
//! - Medium and serialization failures are returned, never swallowed.

use crate::clock::{Clock, SystemClock};
use crate::model::activity::ActivityLogEntry;
use crate::model::contact::Contact;
use crate::model::deal::Deal;
use crate::model::notification::Notification;
use crate::model::profile::UserProfile;
use crate::model::task::Task;
use crate::model::{Record, ValidationError};
use crate::seed;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::Cell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub mod latency;
pub mod slots;

use latency::{Delay, LatencyProfile, NoDelay};
use slots::{SlotError, SlotStorage};

/// Slot document layout version written by this build.
pub const SLOT_SCHEMA_VERSION: u32 = 1;

/// Named persistence slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Contacts,
    Deals,
    Tasks,
    Activities,
    Notifications,
    User,
    SchemaVersion,
}

impl Slot {
    pub const DATA: [Slot; 6] = [
        Slot::Contacts,
        Slot::Deals,
        Slot::Tasks,
        Slot::Activities,
        Slot::Notifications,
        Slot::User,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Contacts => "nexus_contacts",
            Self::Deals => "nexus_deals",
            Self::Tasks => "nexus_tasks",
            Self::Activities => "nexus_activities",
            Self::Notifications => "nexus_notifications",
            Self::User => "nexus_user",
            Self::SchemaVersion => "nexus_schema_version",
        }
    }
}

/// Raw contents of one slot captured before a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCheckpoint {
    slot: Slot,
    raw: Option<String>,
}

impl SlotCheckpoint {
    pub fn slot(&self) -> Slot {
        self.slot
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    NotInitialized,
    Slot(SlotError),
    Serialization {
        slot: &'static str,
        source: serde_json::Error,
    },
    Validation(ValidationError),
    UnsupportedSchemaVersion {
        found: u32,
        supported: u32,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "store used before init() completed"),
            Self::Slot(err) => write!(f, "{err}"),
            Self::Serialization { slot, source } => {
                write!(f, "invalid JSON document in slot `{slot}`: {source}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "slot schema version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Slot(err) => Some(err),
            Self::Serialization { source, .. } => Some(source),
            Self::Validation(err) => Some(err),
            Self::NotInitialized | Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<SlotError> for StoreError {
    fn from(value: SlotError) -> Self {
        Self::Slot(value)
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Persistence façade. One instance per session.
pub struct Store<S: SlotStorage> {
    storage: S,
    latency: LatencyProfile,
    delay: Box<dyn Delay>,
    clock: Box<dyn Clock>,
    initialized: Cell<bool>,
}

impl<S: SlotStorage> Store<S> {
    /// Creates an uninitialized store with no latency and the system clock.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            latency: LatencyProfile::none(),
            delay: Box::new(NoDelay),
            clock: Box::new(SystemClock),
            initialized: Cell::new(false),
        }
    }

    pub fn with_latency(mut self, latency: LatencyProfile, delay: impl Delay + 'static) -> Self {
        self.latency = latency;
        self.delay = Box::new(delay);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// Seeds every empty slot and stamps the schema version.
    ///
    /// Idempotent: slots that already hold a value are left untouched.
    ///
    /// # Errors
    /// - `UnsupportedSchemaVersion` when the slots were written by a newer build.
    /// - Medium or serialization errors from the slot backend.
    pub fn init(&self) -> StoreResult<()> {
        self.delay.wait(self.latency.init);

        if let Some(found) = self.read_json::<u32>(Slot::SchemaVersion)? {
            if found > SLOT_SCHEMA_VERSION {
                return Err(StoreError::UnsupportedSchemaVersion {
                    found,
                    supported: SLOT_SCHEMA_VERSION,
                });
            }
        }

        let mut seeded = 0usize;
        for slot in Slot::DATA {
            if self.storage.read_slot(slot.key())?.is_some() {
                continue;
            }
            match slot {
                Slot::Contacts => self.write_json(slot, &seed::contacts())?,
                Slot::Deals => self.write_json(slot, &seed::deals())?,
                Slot::Tasks => self.write_json(slot, &seed::tasks())?,
                Slot::Activities => self.write_json(slot, &seed::activities())?,
                Slot::Notifications => {
                    self.write_json(slot, &seed::notifications(self.clock.now()))?
                }
                Slot::User => self.write_json(slot, &seed::default_profile())?,
                Slot::SchemaVersion => {}
            }
            seeded += 1;
        }
        self.write_json(Slot::SchemaVersion, &SLOT_SCHEMA_VERSION)?;

        self.initialized.set(true);
        info!(
            "event=store_init module=store status=ok seeded_slots={seeded} schema_version={SLOT_SCHEMA_VERSION}"
        );
        Ok(())
    }

    pub fn get_contacts(&self) -> StoreResult<Vec<Contact>> {
        self.get_all(Slot::Contacts)
    }

    pub fn update_contact(&self, contact: &Contact) -> StoreResult<bool> {
        contact.validate()?;
        self.replace(Slot::Contacts, contact, self.latency.write)
    }

    pub fn get_deals(&self) -> StoreResult<Vec<Deal>> {
        self.get_all(Slot::Deals)
    }

    pub fn add_deal(&self, deal: &Deal) -> StoreResult<()> {
        deal.validate()?;
        self.prepend(Slot::Deals, deal, self.latency.write)
    }

    pub fn update_deal(&self, deal: &Deal) -> StoreResult<bool> {
        deal.validate()?;
        self.replace(Slot::Deals, deal, self.latency.write)
    }

    pub fn get_tasks(&self) -> StoreResult<Vec<Task>> {
        self.get_all(Slot::Tasks)
    }

    pub fn add_task(&self, task: &Task) -> StoreResult<()> {
        task.validate()?;
        self.prepend(Slot::Tasks, task, self.latency.write)
    }

    pub fn update_task(&self, task: &Task) -> StoreResult<bool> {
        task.validate()?;
        self.replace(Slot::Tasks, task, self.latency.task_write)
    }

    /// Flips `completed` for the task with `id`; returns whether it existed.
    pub fn toggle_task(&self, id: &str) -> StoreResult<bool> {
        self.modify_list::<Task, _>(Slot::Tasks, self.latency.task_write, |tasks| {
            match tasks.iter_mut().find(|task| task.id == id) {
                Some(task) => {
                    task.completed = !task.completed;
                    true
                }
                None => false,
            }
        })
    }

    pub fn get_activities(&self) -> StoreResult<Vec<ActivityLogEntry>> {
        self.get_all(Slot::Activities)
    }

    /// Appends a log entry at the head. Not delayed.
    pub fn add_activity(&self, entry: &ActivityLogEntry) -> StoreResult<()> {
        entry.validate()?;
        self.prepend(Slot::Activities, entry, Duration::ZERO)
    }

    pub fn get_notifications(&self) -> StoreResult<Vec<Notification>> {
        self.get_all(Slot::Notifications)
    }

    /// Marks one notification read. Not delayed.
    pub fn mark_notification_read(&self, id: &str) -> StoreResult<bool> {
        self.modify_list::<Notification, _>(Slot::Notifications, Duration::ZERO, |items| {
            match items.iter_mut().find(|item| item.id == id) {
                Some(item) => {
                    item.read = true;
                    true
                }
                None => false,
            }
        })
    }

    /// Marks every notification read. Not delayed.
    pub fn mark_all_notifications_read(&self) -> StoreResult<()> {
        self.modify_list::<Notification, _>(Slot::Notifications, Duration::ZERO, |items| {
            items.iter_mut().for_each(|item| item.read = true);
            true
        })?;
        Ok(())
    }

    /// Returns the stored profile, or the default profile when the slot is empty.
    pub fn get_profile(&self) -> StoreResult<UserProfile> {
        self.ensure_initialized()?;
        self.delay.wait(self.latency.read);
        Ok(self
            .read_json::<UserProfile>(Slot::User)?
            .unwrap_or_else(seed::default_profile))
    }

    pub fn update_profile(&self, profile: &UserProfile) -> StoreResult<()> {
        self.ensure_initialized()?;
        self.delay.wait(self.latency.profile_write);
        self.write_json(Slot::User, profile)
    }

    /// Captures the raw document of `slot`. Not delayed.
    pub fn checkpoint(&self, slot: Slot) -> StoreResult<SlotCheckpoint> {
        self.ensure_initialized()?;
        Ok(SlotCheckpoint {
            slot,
            raw: self.storage.read_slot(slot.key())?,
        })
    }

    /// Writes a checkpointed document back. A slot that was absent when
    /// captured is left as is. Not delayed.
    pub fn restore(&self, checkpoint: &SlotCheckpoint) -> StoreResult<()> {
        self.ensure_initialized()?;
        if let Some(raw) = &checkpoint.raw {
            self.storage.write_slot(checkpoint.slot.key(), raw)?;
            debug!(
                "event=slot_restore module=store status=ok slot={}",
                checkpoint.slot.key()
            );
        }
        Ok(())
    }

    fn ensure_initialized(&self) -> StoreResult<()> {
        if self.initialized.get() {
            Ok(())
        } else {
            Err(StoreError::NotInitialized)
        }
    }

    fn get_all<T: DeserializeOwned>(&self, slot: Slot) -> StoreResult<Vec<T>> {
        self.ensure_initialized()?;
        self.delay.wait(self.latency.read);
        self.read_list(slot)
    }

    fn prepend<T>(&self, slot: Slot, record: &T, delay: Duration) -> StoreResult<()>
    where
        T: Serialize + DeserializeOwned + Clone,
    {
        self.modify_list::<T, _>(slot, delay, |items| {
            items.insert(0, record.clone());
            true
        })?;
        Ok(())
    }

    fn replace<T>(&self, slot: Slot, record: &T, delay: Duration) -> StoreResult<bool>
    where
        T: Record + Serialize + DeserializeOwned + Clone,
    {
        let replaced = self.modify_list::<T, _>(slot, delay, |items| {
            match items.iter_mut().find(|item| item.id() == record.id()) {
                Some(item) => {
                    *item = record.clone();
                    true
                }
                None => false,
            }
        })?;
        if !replaced {
            debug!(
                "event=slot_update module=store status=noop slot={} record_id={}",
                slot.key(),
                record.id()
            );
        }
        Ok(replaced)
    }

    /// Read-modify-write of one list slot. Writes back only when `apply` reports a change.
    fn modify_list<T, F>(&self, slot: Slot, delay: Duration, apply: F) -> StoreResult<bool>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> bool,
    {
        self.ensure_initialized()?;
        self.delay.wait(delay);
        let mut items = self.read_list::<T>(slot)?;
        if !apply(&mut items) {
            return Ok(false);
        }
        self.write_json(slot, &items)?;
        Ok(true)
    }

    fn read_list<T: DeserializeOwned>(&self, slot: Slot) -> StoreResult<Vec<T>> {
        Ok(self.read_json(slot)?.unwrap_or_default())
    }

    fn read_json<T: DeserializeOwned>(&self, slot: Slot) -> StoreResult<Option<T>> {
        match self.storage.read_slot(slot.key())? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StoreError::Serialization {
                    slot: slot.key(),
                    source,
                }),
            None => Ok(None),
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, slot: Slot, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialization {
            slot: slot.key(),
            source,
        })?;
        self.storage.write_slot(slot.key(), &raw)?;
        Ok(())
    }
}
