use chrono::{TimeZone, Utc};
use nexus_core::model::activity::ActivityType;
use nexus_core::store::slots::MemorySlotStorage;
use nexus_core::store::Store;
use nexus_core::view::audit_filter::ActivityFilter;
use nexus_core::view::panels::Panel;
use nexus_core::{CrmController, CrmError, DealStage, FixedClock, ValidationError, View};

fn session() -> CrmController<MemorySlotStorage> {
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap());
    CrmController::bootstrap(Store::new(MemorySlotStorage::new()).with_clock(clock)).unwrap()
}

#[test]
fn bootstrap_loads_seeded_collections() {
    let session = session();
    let state = session.state();

    assert_eq!(state.contacts.len(), 4);
    assert_eq!(state.deals.len(), 5);
    assert_eq!(state.tasks.len(), 3);
    assert_eq!(state.activities.len(), 6);
    assert_eq!(state.profile.name, "Sarah Sales");
    assert_eq!(session.unread_notification_count(), 2);
    assert_eq!(session.navigator().active(), View::Dashboard);

    let metrics = session.dashboard();
    assert_eq!(metrics.total_pipeline, 220_000);
    assert_eq!(metrics.won_revenue, 30_000);
    assert_eq!(metrics.open_deals, 4);
    assert_eq!(metrics.pending_tasks, 2);
}

#[test]
fn toggling_twice_restores_task_and_persists_each_time() {
    let mut session = session();

    assert!(session.toggle_task("t1").unwrap());
    assert!(session.state().task("t1").unwrap().completed);
    assert!(session.store().get_tasks().unwrap()[0].completed);

    assert!(session.toggle_task("t1").unwrap());
    assert!(!session.state().task("t1").unwrap().completed);
    assert!(!session.store().get_tasks().unwrap()[0].completed);

    assert_eq!(session.state().activities.len(), 6);
    assert_eq!(session.dashboard().pending_tasks, 2);
}

#[test]
fn toggling_unknown_task_reports_false() {
    let mut session = session();
    assert!(!session.toggle_task("t404").unwrap());
}

#[test]
fn add_task_defaults_due_date_and_logs_creation() {
    let mut session = session();

    let task = session.add_task("  Send pricing sheet ", "").unwrap();

    assert_eq!(task.title, "Send pricing sheet");
    assert_eq!(task.due_date, "2024-02-01");
    assert!(!task.completed);
    assert_eq!(session.state().tasks[0], task);
    assert_eq!(session.store().get_tasks().unwrap()[0], task);

    let entry = &session.state().activities[0];
    assert_eq!(entry.kind, ActivityType::Create);
    assert_eq!(entry.action, "Created Task");
    assert!(entry.details.contains("Send pricing sheet"));
}

#[test]
fn add_task_rejects_blank_title_without_persisting() {
    let mut session = session();

    let err = session.add_task("   ", "2024-03-01").unwrap_err();

    assert!(matches!(
        err,
        CrmError::Validation(ValidationError::EmptyTitle { .. })
    ));
    assert_eq!(session.store().get_tasks().unwrap().len(), 3);
}

#[test]
fn marking_notifications_read() {
    let mut session = session();

    session.mark_notification_read("n1").unwrap();
    assert_eq!(session.unread_notification_count(), 1);

    session.mark_all_notifications_read().unwrap();
    let after_first = session.store().get_notifications().unwrap();
    session.mark_all_notifications_read().unwrap();
    let after_second = session.store().get_notifications().unwrap();

    assert_eq!(session.unread_notification_count(), 0);
    assert!(after_first.iter().all(|item| item.read));
    assert_eq!(after_first, after_second);
    assert_eq!(session.state().activities.len(), 6);
}

#[test]
fn profile_is_reflected_only_after_save() {
    let mut session = session();
    let original = session.state().profile.clone();
    let used = session.store().storage().used_bytes();
    session.store().storage().set_quota(Some(used));

    let mut edited = original.clone();
    edited.bio.push_str(" Closes enterprise deals across North America.");
    assert!(session.update_profile(edited.clone()).is_err());
    assert_eq!(session.state().profile, original);

    session.store().storage().set_quota(None);
    session.update_profile(edited.clone()).unwrap();
    assert_eq!(session.state().profile, edited);
    assert_eq!(session.store().get_profile().unwrap(), edited);
}

#[test]
fn audit_entries_use_current_profile_name() {
    let mut session = session();
    let mut profile = session.state().profile.clone();
    profile.name = "Sam Seller".to_string();
    session.update_profile(profile).unwrap();

    let contact = session.state().contact("c1").unwrap().clone();
    session.update_contact(contact).unwrap();

    assert_eq!(session.state().activities[0].user, "Sam Seller");
}

#[test]
fn dashboard_contacts_deals_then_back_twice() {
    let mut session = session();

    assert!(session.navigate_to(View::Contacts));
    assert!(session.navigate_to(View::Deals));
    assert!(!session.navigate_to(View::Deals));

    assert_eq!(session.back(), View::Contacts);
    assert_eq!(session.back(), View::Dashboard);
    assert_eq!(session.navigator().active(), View::Dashboard);
    assert!(session.navigator().back_stack().is_empty());
    assert_eq!(session.back(), View::Dashboard);
}

#[test]
fn drill_down_filter_cleared_by_deals_tab() {
    let mut session = session();

    session.drill_down(DealStage::Negotiation);
    assert_eq!(session.navigator().active(), View::Deals);
    assert_eq!(
        session.navigator().stage_filter(),
        Some(DealStage::Negotiation)
    );

    session.select_tab(View::Tasks);
    assert_eq!(
        session.navigator().stage_filter(),
        Some(DealStage::Negotiation)
    );
    session.select_tab(View::Deals);
    assert_eq!(session.navigator().stage_filter(), None);
}

#[test]
fn audit_view_filters_session_log() {
    let mut session = session();
    let deal = session
        .state()
        .deal("d4")
        .unwrap()
        .with_stage(DealStage::Qualified);
    session.update_deal(deal).unwrap();

    let filter = ActivityFilter::new("discovery", Some(ActivityType::Update));
    let hits = filter.apply(&session.state().activities);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].action, "Deal Stage Changed");
}

#[test]
fn header_panels_close_on_outside_pointer() {
    let mut session = session();

    session.panels_mut().toggle(Panel::Notifications);
    session.panels_mut().pointer_down(Some(Panel::Notifications));
    assert!(session.panels().is_open(Panel::Notifications));

    session.panels_mut().toggle(Panel::ProfileMenu);
    assert!(session.panels().is_open(Panel::ProfileMenu));
    assert!(!session.panels().is_open(Panel::Notifications));

    session.panels_mut().pointer_down(None);
    assert_eq!(session.panels().open_panel(), None);
}
