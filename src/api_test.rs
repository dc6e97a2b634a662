use super::*;
use crate::clock::ManualClock;
use crate::config::GuardConfig;
use crate::page::RecordingPage;
use crate::session::{SessionUser, UserId};
use crate::store::MemoryStore;
use chrono::{DateTime, TimeDelta};

type TestGuard = SessionGuard<MemoryStore, ManualClock, RecordingPage>;

fn setup() -> (MemoryStore, ManualClock, RecordingPage, Rc<TestGuard>) {
    let local = MemoryStore::new();
    let clock = ManualClock::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap());
    let page = RecordingPage::at("/dashboard.html");
    let guard = Rc::new(SessionGuard::new(
        GuardConfig::default(),
        local.clone(),
        MemoryStore::new(),
        clock.clone(),
        page.clone(),
    ));
    (local, clock, page, guard)
}

fn sign_in(guard: &TestGuard) {
    guard
        .establish_session(SessionUser::new(UserId::Number(7), "Ann", "a@x.com", "admin"))
        .unwrap();
}

#[test]
fn auth_api_reports_signed_in_user() {
    let (_, _, _, guard) = setup();
    let api = AuthApi::new(Rc::clone(&guard));
    assert!(api.current_user().is_none());
    sign_in(&guard);
    assert_eq!(api.current_user().unwrap().name, "Ann");
    assert!(api.has_role("admin"));
    assert_eq!(api.time_remaining().unwrap().hours, 24);
}

#[test]
fn auth_api_extend_maps_failure_to_false() {
    let (local, clock, _, guard) = setup();
    let api = AuthApi::new(Rc::clone(&guard));
    assert!(!api.extend_session());

    sign_in(&guard);
    clock.advance(TimeDelta::hours(1));
    assert!(api.extend_session());

    local.reject_writes(true);
    assert!(!api.extend_session());
}

#[test]
fn auth_api_logout_clears_session() {
    let (_, _, page, guard) = setup();
    let api = AuthApi::new(Rc::clone(&guard));
    sign_in(&guard);
    api.clone().logout();
    assert!(api.current_user().is_none());
    assert_eq!(page.navigations(), vec!["login.html".to_owned()]);
}

#[test]
fn debug_api_mirrors_guard() {
    let (_, _, _, guard) = setup();
    let debug = DebugApi::new(Rc::clone(&guard));
    assert!(debug.show_session().is_none());
    assert!(debug.show_time_remaining().is_none());
    sign_in(&guard);
    assert!(debug.show_session().is_some());
    assert!(debug.extend_session());
    debug.force_logout();
    assert!(debug.show_session().is_none());
}

#[test]
fn auth_api_role_gates() {
    let (_, _, page, guard) = setup();
    let api = AuthApi::new(Rc::clone(&guard));
    sign_in(&guard);

    assert!(api.has_any_role(&["editor", "admin"]));
    assert!(!api.has_any_role(&["editor"]));
    assert!(api.require_role("admin", None));
    assert!(page.navigations().is_empty());

    assert!(!api.require_role("owner", Some("forbidden.html")));
    assert_eq!(page.navigations(), vec!["forbidden.html".to_owned()]);
}
