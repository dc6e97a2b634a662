use super::*;
use chrono::{DateTime, Utc};
use hubber_session::{GuardConfig, KeyValueStore, ManualClock, SystemClock};
use serde_json::json;

const DASHBOARD: &str = "http://localhost/dashboard.html";

fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

struct Fixture {
    _dir: tempfile::TempDir,
    local: FileStore,
    transient: FileStore,
    clock: ManualClock,
    guard: Rc<CliGuard<ManualClock, Vec<u8>>>,
}

impl Fixture {
    fn at(url: &str) -> Self {
        Self::with_page(TerminalPage::new(url, true, Vec::new()))
    }

    fn answering(url: &str, answer: &str) -> Self {
        let page = TerminalPage::new(url, false, Vec::new()).with_input(std::io::Cursor::new(answer.to_owned()));
        Self::with_page(page)
    }

    fn with_page(page: TerminalPage<Vec<u8>>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let local = FileStore::new(dir.path().join("storage.json"));
        let transient = FileStore::new(dir.path().join("storage.tab.json"));
        let clock = ManualClock::new(t0());
        let guard = Rc::new(SessionGuard::new(
            GuardConfig::default(),
            local.clone(),
            transient.clone(),
            clock.clone(),
            page,
        ));
        Self { _dir: dir, local, transient, clock, guard }
    }

    fn run(&self, command: Command) -> Result<bool, CliError> {
        run(command, &self.guard)
    }

    fn output(&self) -> String {
        String::from_utf8(self.guard.page().take_output()).unwrap()
    }

    fn login(&self, role: &str) {
        let args = LoginArgs {
            email: "ada@example.com".to_owned(),
            name: "Ada".to_owned(),
            role: role.to_owned(),
            id: Some("7".to_owned()),
        };
        assert!(self.run(Command::Login(args)).unwrap());
        self.output();
    }
}

// =============================================================================
// Login, show, check
// =============================================================================

#[test]
fn show_without_session_is_negative() {
    let fx = Fixture::at(DASHBOARD);
    assert!(!fx.run(Command::Show).unwrap());
    assert_eq!(fx.output(), "no session\n");
}

#[test]
fn login_writes_session_and_goes_to_default_page() {
    let fx = Fixture::at("http://localhost/login.html");
    let args = LoginArgs { email: "ada@example.com".to_owned(), name: "Ada".to_owned(), role: "admin".to_owned(), id: None };
    assert!(fx.run(Command::Login(args)).unwrap());

    let output = fx.output();
    assert!(output.starts_with("session "));
    assert!(output.ends_with("-> index.html\n"));

    let raw = fx.local.get("hubber_session").unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["user"]["email"], json!("ada@example.com"));
    assert!(stored["user"]["id"].is_string());
}

#[test]
fn numeric_login_id_is_stored_as_number() {
    let fx = Fixture::at("http://localhost/login.html");
    fx.login("user");
    let raw = fx.local.get("hubber_session").unwrap().unwrap();
    let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored["user"]["id"], json!(7));
}

#[test]
fn check_on_protected_page_redirects_and_login_returns() {
    let fx = Fixture::at(DASHBOARD);
    assert!(!fx.run(Command::Check).unwrap());
    assert_eq!(fx.output(), "-> login.html\nRedirected\n");
    assert_eq!(fx.transient.get("hubber_redirect_after_login").unwrap().as_deref(), Some(DASHBOARD));

    let args = LoginArgs { email: "ada@example.com".to_owned(), name: "Ada".to_owned(), role: "user".to_owned(), id: None };
    assert!(fx.run(Command::Login(args)).unwrap());
    assert!(fx.output().ends_with(&format!("-> {DASHBOARD}\n")));
    assert_eq!(fx.transient.get("hubber_redirect_after_login").unwrap(), None);
}

#[test]
fn check_with_valid_session_renders_user_fields() {
    let fx = Fixture::at(DASHBOARD);
    fx.login("admin");
    assert!(fx.run(Command::Check).unwrap());

    let output = fx.output();
    assert!(output.contains("user-name: Ada\n"));
    assert!(output.contains("user-role: Admin\n"));
    assert!(output.ends_with("ValidSession\n"));
}

#[test]
fn show_discards_expired_session() {
    let fx = Fixture::at(DASHBOARD);
    fx.login("user");
    fx.clock.advance(TimeDelta::hours(25));

    assert!(!fx.run(Command::Show).unwrap());
    assert_eq!(fx.local.get("hubber_session").unwrap(), None);
}

// =============================================================================
// Expiry
// =============================================================================

#[test]
fn remaining_reports_hours_and_minutes() {
    let fx = Fixture::at(DASHBOARD);
    fx.login("user");
    fx.clock.advance(TimeDelta::minutes(90));

    assert!(fx.run(Command::Remaining).unwrap());
    assert_eq!(fx.output(), "22h 30m remaining (81000000 ms)\n");
}

#[test]
fn remaining_inside_warning_window_shows_notice() {
    let fx = Fixture::at(DASHBOARD);
    fx.login("user");
    fx.clock.advance(TimeDelta::hours(24) - TimeDelta::minutes(20));

    assert!(fx.run(Command::Remaining).unwrap());
    let output = fx.output();
    assert!(output.contains("[alert-warning] Your session expires in 20 minutes [Extend Session]"));
}

#[test]
fn extend_resets_expiry() {
    let fx = Fixture::at(DASHBOARD);
    fx.login("user");
    fx.clock.advance(TimeDelta::hours(23));

    assert!(fx.run(Command::Extend).unwrap());
    assert_eq!(fx.output(), "24h 0m remaining (86400000 ms)\n");
}

#[test]
fn extend_without_session_is_an_error() {
    let fx = Fixture::at(DASHBOARD);
    assert!(matches!(fx.run(Command::Extend), Err(CliError::NoSession)));
}

// =============================================================================
// Logout, roles, profile
// =============================================================================

#[test]
fn logout_clears_session_and_stamps_history() {
    let fx = Fixture::at(DASHBOARD);
    fx.login("user");
    fx.local.set("hubber_user_7", "cached").unwrap();
    fx.clock.advance(TimeDelta::minutes(5));

    assert!(fx.run(Command::Logout).unwrap());
    assert_eq!(
        fx.output(),
        "(signed out)\n[alert-info] Logged out successfully (dismissed after 3s)\n-> login.html (after 1500 ms)\n"
    );
    assert_eq!(fx.local.get("hubber_session").unwrap(), None);
    assert_eq!(fx.local.get("hubber_user_7").unwrap(), None);

    let history: serde_json::Value =
        serde_json::from_str(&fx.local.get("hubber_login_history").unwrap().unwrap()).unwrap();
    assert_eq!(history[0]["logoutTime"], json!("2023-11-14T22:18:20.000Z"));
}

#[test]
fn logout_declined_at_prompt_keeps_session() {
    let fx = Fixture::answering(DASHBOARD, "n\n");
    fx.login("user");

    assert!(!fx.run(Command::Logout).unwrap());
    assert_eq!(fx.output(), "Are you sure you want to logout? [y/N] ");
    assert!(fx.local.get("hubber_session").unwrap().is_some());
}

#[test]
fn logout_accepted_at_prompt_clears_session() {
    let fx = Fixture::answering(DASHBOARD, "yes\n");
    fx.login("user");

    assert!(fx.run(Command::Logout).unwrap());
    let output = fx.output();
    assert!(output.starts_with("Are you sure you want to logout? [y/N] (signed out)\n"));
    assert!(output.ends_with("-> login.html (after 1500 ms)\n"));
    assert_eq!(fx.local.get("hubber_session").unwrap(), None);
}

#[test]
fn logout_with_closed_input_declines() {
    let fx = Fixture::answering(DASHBOARD, "");
    fx.login("user");
    assert!(!fx.run(Command::Logout).unwrap());
    assert!(fx.local.get("hubber_session").unwrap().is_some());
}

#[test]
fn force_logout_skips_prompt() {
    let fx = Fixture::answering(DASHBOARD, "n\n");
    fx.login("user");

    assert!(fx.run(Command::ForceLogout).unwrap());
    assert!(!fx.output().contains("[y/N]"));
    assert_eq!(fx.local.get("hubber_session").unwrap(), None);
}

#[test]
fn has_role_single_and_any() {
    let fx = Fixture::at(DASHBOARD);
    fx.login("editor");

    assert!(fx.run(Command::HasRole { roles: vec!["editor".to_owned()] }).unwrap());
    assert!(!fx.run(Command::HasRole { roles: vec!["admin".to_owned()] }).unwrap());
    assert!(fx.run(Command::HasRole { roles: vec!["admin".to_owned(), "editor".to_owned()] }).unwrap());
    assert_eq!(fx.output(), "yes\nno\nyes\n");
}

#[test]
fn profile_set_merges_and_mirrors_registry() {
    let fx = Fixture::at(DASHBOARD);
    fx.local
        .set("hubber_users", r#"{"ada@example.com":{"password":"x","profile":{"theme":"dark"}}}"#)
        .unwrap();
    fx.login("user");

    let pairs = vec!["theme=light".to_owned(), "age=36".to_owned()];
    let set = Command::Profile(ProfileCommand { command: ProfileSubcommand::Set { pairs } });
    assert!(fx.run(set).unwrap());
    fx.output();

    let show = Command::Profile(ProfileCommand { command: ProfileSubcommand::Show });
    assert!(fx.run(show).unwrap());
    let shown: serde_json::Value = serde_json::from_str(&fx.output()).unwrap();
    assert_eq!(shown, json!({ "age": 36, "theme": "light" }));

    let users: serde_json::Value = serde_json::from_str(&fx.local.get("hubber_users").unwrap().unwrap()).unwrap();
    assert_eq!(users["ada@example.com"]["password"], json!("x"));
    assert_eq!(users["ada@example.com"]["profile"]["age"], json!(36));
}

#[test]
fn profile_set_without_session_is_an_error() {
    let fx = Fixture::at(DASHBOARD);
    let set = Command::Profile(ProfileCommand { command: ProfileSubcommand::Set { pairs: vec!["a=1".to_owned()] } });
    assert!(matches!(fx.run(set), Err(CliError::NoSession)));
}

#[test]
fn parse_pairs_keeps_json_and_falls_back_to_strings() {
    let patch = parse_pairs(&["n=1".to_owned(), "flag=true".to_owned(), "name=Ada Lovelace".to_owned()]).unwrap();
    assert_eq!(patch["n"], json!(1));
    assert_eq!(patch["flag"], json!(true));
    assert_eq!(patch["name"], json!("Ada Lovelace"));
}

#[test]
fn parse_pairs_rejects_missing_separator_and_empty_key() {
    assert!(matches!(parse_pairs(&["novalue".to_owned()]), Err(CliError::InvalidPair(p)) if p == "novalue"));
    assert!(matches!(parse_pairs(&["=1".to_owned()]), Err(CliError::InvalidPair(_))));
}

// =============================================================================
// Watch
// =============================================================================

fn system_guard(dir: &tempfile::TempDir, url: &str) -> Rc<CliGuard<SystemClock, Vec<u8>>> {
    Rc::new(SessionGuard::new(
        GuardConfig::default(),
        FileStore::new(dir.path().join("storage.json")),
        FileStore::new(dir.path().join("storage.tab.json")),
        SystemClock,
        TerminalPage::new(url, true, Vec::new()),
    ))
}

#[test]
fn watch_runs_requested_ticks_with_valid_session() {
    let dir = tempfile::tempdir().unwrap();
    let guard = system_guard(&dir, DASHBOARD);
    guard
        .establish_session(SessionUser::new(UserId::Number(1), "Ada", "ada@example.com", "user"))
        .unwrap();

    let watch = Command::Watch(WatchArgs { ticks: Some(2), interval_ms: Some(1) });
    assert!(run(watch, &guard).unwrap());

    let output = String::from_utf8(guard.page().take_output()).unwrap();
    assert_eq!(output.matches("ValidSession\n").count(), 3);
}

#[test]
fn watch_without_session_stops_after_redirect() {
    let dir = tempfile::tempdir().unwrap();
    let guard = system_guard(&dir, DASHBOARD);

    let watch = Command::Watch(WatchArgs { ticks: Some(5), interval_ms: Some(1) });
    assert!(!run(watch, &guard).unwrap());
    let output = String::from_utf8(guard.page().take_output()).unwrap();
    assert_eq!(output, "-> login.html\nRedirected\n");
}
