use std::sync::{Mutex, MutexGuard, PoisonError};

use super::*;

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// # Safety
/// Callers must hold `lock_env()` so no other test touches the environment.
unsafe fn clear_hubber_env() {
    unsafe {
        std::env::remove_var("HUBBER_SESSION_TTL_SECS");
        std::env::remove_var("HUBBER_VALIDATION_INTERVAL_SECS");
        std::env::remove_var("HUBBER_WARNING_WINDOW_SECS");
        std::env::remove_var("HUBBER_LOGOUT_DELAY_MS");
        std::env::remove_var("HUBBER_LOGIN_PAGE");
    }
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_keys_match_login_pages() {
    let keys = StorageKeys::default();
    assert_eq!(keys.session, "hubber_session");
    assert_eq!(keys.users, "hubber_users");
    assert_eq!(keys.login_history, "hubber_login_history");
    assert_eq!(keys.redirect_after_login, "hubber_redirect_after_login");
    assert_eq!(keys.user_cache_prefix, "hubber_user_");
}

#[test]
fn default_timings() {
    let cfg = GuardConfig::default();
    assert_eq!(cfg.session_ttl, TimeDelta::hours(24));
    assert_eq!(cfg.validation_interval, TimeDelta::minutes(5));
    assert_eq!(cfg.warning_window, TimeDelta::minutes(30));
    assert_eq!(cfg.logout_redirect_delay, Duration::from_millis(1500));
    assert_eq!(cfg.logout_notice_lifetime, Duration::from_secs(3));
    assert_eq!(cfg.warning_notice_lifetime, Duration::from_secs(10));
}

// =============================================================
// Public pages
// =============================================================

#[test]
fn public_pages_by_last_segment() {
    let cfg = GuardConfig::default();
    assert!(cfg.is_public_page("/index.html"));
    assert!(cfg.is_public_page("/app/login.html"));
    assert!(cfg.is_public_page("/register.html"));
    assert!(!cfg.is_public_page("/dashboard.html"));
    assert!(!cfg.is_public_page("/login.html/profile.html"));
}

#[test]
fn trailing_slash_is_default_page() {
    let cfg = GuardConfig::default();
    assert!(cfg.is_public_page("/"));
    assert!(cfg.is_public_page("/app/"));
    assert!(cfg.is_public_page(""));
}

// =============================================================
// from_env
// =============================================================

#[test]
fn from_env_defaults_without_overrides() {
    let _env = lock_env();
    unsafe { clear_hubber_env() };
    assert_eq!(GuardConfig::from_env(), GuardConfig::default());
}

#[test]
fn from_env_applies_overrides() {
    let _env = lock_env();
    unsafe {
        clear_hubber_env();
        std::env::set_var("HUBBER_SESSION_TTL_SECS", "60");
        std::env::set_var("HUBBER_VALIDATION_INTERVAL_SECS", "5");
        std::env::set_var("HUBBER_WARNING_WINDOW_SECS", "30");
        std::env::set_var("HUBBER_LOGOUT_DELAY_MS", "0");
        std::env::set_var("HUBBER_LOGIN_PAGE", " signin.html ");
    }

    let cfg = GuardConfig::from_env();
    assert_eq!(cfg.session_ttl, TimeDelta::seconds(60));
    assert_eq!(cfg.validation_interval, TimeDelta::seconds(5));
    assert_eq!(cfg.warning_window, TimeDelta::seconds(30));
    assert_eq!(cfg.logout_redirect_delay, Duration::from_millis(DEFAULT_LOGOUT_REDIRECT_DELAY_MS));
    assert_eq!(cfg.login_page, "signin.html");

    unsafe { clear_hubber_env() };
}

#[test]
fn from_env_ignores_garbage() {
    let _env = lock_env();
    unsafe {
        clear_hubber_env();
        std::env::set_var("HUBBER_SESSION_TTL_SECS", "a day");
        std::env::set_var("HUBBER_VALIDATION_INTERVAL_SECS", "-5");
    }

    let cfg = GuardConfig::from_env();
    assert_eq!(cfg.session_ttl, TimeDelta::seconds(DEFAULT_SESSION_TTL_SECS));
    assert_eq!(cfg.validation_interval, TimeDelta::seconds(DEFAULT_VALIDATION_INTERVAL_SECS));

    unsafe { clear_hubber_env() };
}
