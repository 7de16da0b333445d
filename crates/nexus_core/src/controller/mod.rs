//! Application state controller.
//!
//! # Responsibility
//! - Own the in-memory session state and be its only writer.
//! - Sequence each mutation against the Store per its `WriteStrategy`.
//! - Publish one `ChangeEvent` per mutation and persist derived audit entries.
//!
//! # Invariants
//! - Optimistic mutations roll memory back when persistence fails.
//! - Profile saves persist before memory reflects them.
//! - Adding a deal or task reloads every collection from the Store.
//! - Audit entries are prepended to memory only after they were persisted.
//! - A mutation and its audit entry land together: when the entry cannot be
//!   persisted, the record slot and memory are restored.

use crate::assistant::CrmSnapshot;
use crate::events::audit::AuditSubscriber;
use crate::events::{Change, ChangeEvent, ChangeSubscriber, EventBus};
use crate::model::contact::Contact;
use crate::model::deal::{Deal, DealStage};
use crate::model::profile::UserProfile;
use crate::model::task::Task;
use crate::model::ValidationError;
use crate::store::slots::SlotStorage;
use crate::store::{Slot, Store, StoreError, StoreResult};
use crate::view::board::PipelineBoard;
use crate::view::dashboard::DashboardMetrics;
use crate::view::navigation::{Navigator, View};
use crate::view::panels::PanelState;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

mod state;

pub use state::AppState;
use state::replace_by_id;

pub type CrmResult<T> = Result<T, CrmError>;

#[derive(Debug)]
pub enum CrmError {
    Store(StoreError),
    Validation(ValidationError),
}

impl Display for CrmError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CrmError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<StoreError> for CrmError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<ValidationError> for CrmError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Ordering between the in-memory update and the Store write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStrategy {
    /// Update memory first, then persist; restore memory if persisting fails.
    Optimistic,
    /// Persist first; memory changes only after the write succeeded.
    PersistThenReflect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    UpdateContact,
    UpdateDeal,
    AddDeal,
    AddTask,
    ToggleTask,
    MarkNotificationRead,
    MarkAllNotificationsRead,
    UpdateProfile,
}

impl MutationKind {
    /// Profile saves avoid showing unsaved data during the slow save; new
    /// records are persisted before the full reload that reflects them.
    pub fn write_strategy(self) -> WriteStrategy {
        match self {
            Self::UpdateProfile | Self::AddDeal | Self::AddTask => {
                WriteStrategy::PersistThenReflect
            }
            Self::UpdateContact
            | Self::UpdateDeal
            | Self::ToggleTask
            | Self::MarkNotificationRead
            | Self::MarkAllNotificationsRead => WriteStrategy::Optimistic,
        }
    }

    /// Slot the record write touches.
    pub fn slot(self) -> Slot {
        match self {
            Self::UpdateContact => Slot::Contacts,
            Self::UpdateDeal | Self::AddDeal => Slot::Deals,
            Self::AddTask | Self::ToggleTask => Slot::Tasks,
            Self::MarkNotificationRead | Self::MarkAllNotificationsRead => Slot::Notifications,
            Self::UpdateProfile => Slot::User,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpdateContact => "contact_update",
            Self::UpdateDeal => "deal_update",
            Self::AddDeal => "deal_create",
            Self::AddTask => "task_create",
            Self::ToggleTask => "task_toggle",
            Self::MarkNotificationRead => "notification_read",
            Self::MarkAllNotificationsRead => "notification_read_all",
            Self::UpdateProfile => "profile_update",
        }
    }
}

/// Single writer of session state.
pub struct CrmController<S: SlotStorage> {
    store: Store<S>,
    state: AppState,
    navigator: Navigator,
    board: PipelineBoard,
    panels: PanelState,
    audit: AuditSubscriber,
    bus: EventBus,
}

impl<S: SlotStorage> CrmController<S> {
    /// Initializes the store (seeding empty slots) and loads every collection.
    pub fn bootstrap(store: Store<S>) -> CrmResult<Self> {
        let started_at = Instant::now();
        store.init()?;
        let state = AppState::load(&store)?;
        info!(
            "event=session_bootstrap module=controller status=ok contacts={} deals={} tasks={} activities={} duration_ms={}",
            state.contacts.len(),
            state.deals.len(),
            state.tasks.len(),
            state.activities.len(),
            started_at.elapsed().as_millis()
        );

        Ok(Self {
            store,
            state,
            navigator: Navigator::new(),
            board: PipelineBoard::new(),
            panels: PanelState::default(),
            audit: AuditSubscriber::new(),
            bus: EventBus::new(),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn board(&self) -> &PipelineBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut PipelineBoard {
        &mut self.board
    }

    pub fn panels(&self) -> &PanelState {
        &self.panels
    }

    pub fn panels_mut(&mut self) -> &mut PanelState {
        &mut self.panels
    }

    /// Registers an extra change subscriber; the audit subscriber is built in.
    pub fn subscribe(&mut self, subscriber: Box<dyn ChangeSubscriber>) {
        self.bus.subscribe(subscriber);
    }

    pub fn dashboard(&self) -> DashboardMetrics {
        DashboardMetrics::compute(&self.state.deals, &self.state.tasks)
    }

    pub fn unread_notification_count(&self) -> usize {
        self.state.unread_notifications()
    }

    /// Borrowed view of every collection for the assistant.
    pub fn snapshot(&self) -> CrmSnapshot<'_> {
        CrmSnapshot::from_state(&self.state)
    }

    /// Replaces every in-memory collection with the Store's copy.
    pub fn reload_all(&mut self) -> CrmResult<()> {
        self.state = AppState::load(&self.store)?;
        Ok(())
    }

    pub fn update_contact(&mut self, contact: Contact) -> CrmResult<()> {
        let change = Change::ContactUpdated {
            before: self.state.contact(&contact.id).cloned(),
            after: contact.clone(),
        };
        self.apply(
            MutationKind::UpdateContact,
            |state| {
                replace_by_id(&mut state.contacts, contact.clone());
            },
            |store| store.update_contact(&contact).map(|_| ()),
            change,
        )
    }

    /// Saves a deal from the edit form or a board drop.
    ///
    /// Logs "Deal Stage Changed" when the stage moved, otherwise "Deal Value
    /// Updated" when only the amount moved, otherwise nothing.
    pub fn update_deal(&mut self, deal: Deal) -> CrmResult<()> {
        let change = Change::DealUpdated {
            before: self.state.deal(&deal.id).cloned(),
            after: deal.clone(),
        };
        self.apply(
            MutationKind::UpdateDeal,
            |state| {
                replace_by_id(&mut state.deals, deal.clone());
            },
            |store| store.update_deal(&deal).map(|_| ()),
            change,
        )
    }

    /// Creates the default deal bound to the first contact.
    ///
    /// With no contacts the deal keeps an empty `contact_id` instead of failing.
    pub fn add_deal(&mut self) -> CrmResult<Deal> {
        let contact_id = self
            .state
            .contacts
            .first()
            .map(|contact| contact.id.clone())
            .unwrap_or_default();
        if contact_id.is_empty() {
            warn!("event=deal_create module=controller status=degraded reason=no_contacts");
        }

        let deal = Deal::new_default(contact_id, self.store.clock().today());
        self.apply(
            MutationKind::AddDeal,
            |state| state.deals.insert(0, deal.clone()),
            |store| store.add_deal(&deal),
            Change::DealCreated { deal: deal.clone() },
        )?;
        self.reload_all()?;

        self.navigator.clear_stage_filter();
        self.navigator.navigate_to(View::Deals);
        Ok(deal)
    }

    /// Creates an open task. A blank `due_date` defaults to today.
    pub fn add_task(&mut self, title: &str, due_date: &str) -> CrmResult<Task> {
        let due_date = match due_date.trim() {
            "" => self.store.clock().today(),
            date => date.to_string(),
        };
        let task = Task::new(title.trim(), due_date);
        task.validate()?;

        self.apply(
            MutationKind::AddTask,
            |state| state.tasks.insert(0, task.clone()),
            |store| store.add_task(&task),
            Change::TaskCreated { task: task.clone() },
        )?;
        self.reload_all()?;
        Ok(task)
    }

    /// Flips completion. Produces no audit entry.
    ///
    /// Returns `false` when the task is unknown to the session.
    pub fn toggle_task(&mut self, id: &str) -> CrmResult<bool> {
        let Some(completed) = self.state.task(id).map(|task| !task.completed) else {
            return Ok(false);
        };
        self.apply(
            MutationKind::ToggleTask,
            |state| {
                if let Some(task) = state.tasks.iter_mut().find(|task| task.id == id) {
                    task.completed = completed;
                }
            },
            |store| store.toggle_task(id).map(|_| ()),
            Change::TaskToggled {
                id: id.to_string(),
                completed,
            },
        )?;
        Ok(true)
    }

    pub fn mark_notification_read(&mut self, id: &str) -> CrmResult<()> {
        self.apply(
            MutationKind::MarkNotificationRead,
            |state| {
                if let Some(item) = state.notifications.iter_mut().find(|item| item.id == id) {
                    item.read = true;
                }
            },
            |store| store.mark_notification_read(id).map(|_| ()),
            Change::NotificationRead { id: id.to_string() },
        )
    }

    pub fn mark_all_notifications_read(&mut self) -> CrmResult<()> {
        self.apply(
            MutationKind::MarkAllNotificationsRead,
            |state| state.notifications.iter_mut().for_each(|item| item.read = true),
            |store| store.mark_all_notifications_read(),
            Change::AllNotificationsRead,
        )
    }

    /// Saves the profile; memory keeps the old profile until the write lands.
    pub fn update_profile(&mut self, profile: UserProfile) -> CrmResult<()> {
        self.apply(
            MutationKind::UpdateProfile,
            |state| state.profile = profile.clone(),
            |store| store.update_profile(&profile),
            Change::ProfileUpdated {
                profile: profile.clone(),
            },
        )
    }

    pub fn navigate_to(&mut self, view: View) -> bool {
        self.navigator.navigate_to(view)
    }

    pub fn back(&mut self) -> View {
        self.navigator.back()
    }

    /// Sidebar selection; choosing deals clears the drill-down filter.
    pub fn select_tab(&mut self, view: View) -> bool {
        self.navigator.select_tab(view)
    }

    /// Dashboard stage metric selection.
    pub fn drill_down(&mut self, stage: DealStage) {
        self.navigator.drill_down(stage);
    }

    /// Completes a board drag over `stage`, persisting the move if the stage differs.
    pub fn drop_deal_on(&mut self, stage: DealStage) -> CrmResult<Option<Deal>> {
        let Some(moved) = self.board.drop_on(stage, &self.state.deals) else {
            return Ok(None);
        };
        self.update_deal(moved.clone())?;
        Ok(Some(moved))
    }

    /// Runs `write` and then `emit` as one unit.
    fn apply<R, P>(
        &mut self,
        kind: MutationKind,
        reflect: R,
        persist: P,
        change: Change,
    ) -> CrmResult<()>
    where
        R: FnOnce(&mut AppState),
        P: FnOnce(&Store<S>) -> StoreResult<()>,
    {
        let previous = self.state.clone();
        let checkpoint = self.store.checkpoint(kind.slot())?;
        self.write(kind, reflect, persist)?;

        let Err(err) = self.emit(change) else {
            return Ok(());
        };
        self.state = previous;
        match self.store.restore(&checkpoint) {
            Ok(()) => warn!(
                "event={} module=controller status=rolled_back reason=audit_write_failed error={}",
                kind.as_str(),
                err
            ),
            Err(restore_err) => error!(
                "event={} module=controller status=error reason=restore_failed slot={} error={}",
                kind.as_str(),
                checkpoint.slot().key(),
                restore_err
            ),
        }
        Err(err)
    }

    fn write<R, P>(&mut self, kind: MutationKind, reflect: R, persist: P) -> CrmResult<()>
    where
        R: FnOnce(&mut AppState),
        P: FnOnce(&Store<S>) -> StoreResult<()>,
    {
        let started_at = Instant::now();
        let strategy = kind.write_strategy();
        let result = match strategy {
            WriteStrategy::Optimistic => {
                let previous = self.state.clone();
                reflect(&mut self.state);
                persist(&self.store).map_err(|err| {
                    self.state = previous;
                    err
                })
            }
            WriteStrategy::PersistThenReflect => {
                persist(&self.store).map(|()| reflect(&mut self.state))
            }
        };

        match result {
            Ok(()) => {
                info!(
                    "event={} module=controller status=ok strategy={:?} duration_ms={}",
                    kind.as_str(),
                    strategy,
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event={} module=controller status=error strategy={:?} duration_ms={} error={}",
                    kind.as_str(),
                    strategy,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn emit(&mut self, change: Change) -> CrmResult<()> {
        let event = ChangeEvent {
            actor: self.state.profile.name.clone(),
            at: self.store.clock().now(),
            change,
        };
        self.audit.on_change(&event);

        let entries = self.audit.take_pending();
        for entry in &entries {
            self.store.add_activity(entry)?;
        }
        for entry in entries {
            info!(
                "event=audit_append module=controller status=ok change={} entry_id={}",
                event.change.name(),
                entry.id
            );
            self.state.activities.insert(0, entry);
        }

        self.bus.publish(&event);
        Ok(())
    }
}
