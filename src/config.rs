//! Guard configuration: storage keys, page names, and timings.
//!
//! `Default` reproduces the values every Hubber page has always used;
//! [`GuardConfig::from_env`] lets the CLI (or a test harness) override the
//! timing knobs without recompiling.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use chrono::TimeDelta;

use crate::page::current_page;

pub const DEFAULT_SESSION_TTL_SECS: i64 = 24 * 60 * 60;
pub const DEFAULT_VALIDATION_INTERVAL_SECS: i64 = 5 * 60;
pub const DEFAULT_WARNING_WINDOW_SECS: i64 = 30 * 60;
pub const DEFAULT_LOGOUT_REDIRECT_DELAY_MS: u64 = 1500;
pub const DEFAULT_LOGOUT_NOTICE_MS: u64 = 3000;
pub const DEFAULT_WARNING_NOTICE_MS: u64 = 10_000;
pub const DEFAULT_LOGIN_PAGE: &str = "login.html";

/// Storage key names shared with the login and registration pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    /// Persistent key holding the session record.
    pub session: String,
    /// Persistent key holding the email-keyed user registry.
    pub users: String,
    /// Persistent key holding the login history array.
    pub login_history: String,
    /// Transient (per-tab) key holding the post-login return URL.
    pub redirect_after_login: String,
    /// Persistent keys starting with this prefix are per-user cache entries.
    pub user_cache_prefix: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            session: "hubber_session".to_owned(),
            users: "hubber_users".to_owned(),
            login_history: "hubber_login_history".to_owned(),
            redirect_after_login: "hubber_redirect_after_login".to_owned(),
            user_cache_prefix: "hubber_user_".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    pub keys: StorageKeys,
    /// Page unauthenticated visitors are sent to.
    pub login_page: String,
    /// Page names reachable without a session.
    pub public_pages: Vec<String>,
    /// Page name assumed when the location path ends in `/`.
    pub default_page: String,
    /// Lifetime granted by `establish_session` and `extend_session`.
    pub session_ttl: TimeDelta,
    /// Period of the background re-validation.
    pub validation_interval: TimeDelta,
    /// Remaining time at or below which the expiry warning is shown.
    pub warning_window: TimeDelta,
    /// Pause between the logout notice and the login redirect.
    pub logout_redirect_delay: Duration,
    pub logout_notice_lifetime: Duration,
    pub warning_notice_lifetime: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            keys: StorageKeys::default(),
            login_page: DEFAULT_LOGIN_PAGE.to_owned(),
            public_pages: ["index.html", "login.html", "register.html", "/"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            default_page: "index.html".to_owned(),
            session_ttl: TimeDelta::seconds(DEFAULT_SESSION_TTL_SECS),
            validation_interval: TimeDelta::seconds(DEFAULT_VALIDATION_INTERVAL_SECS),
            warning_window: TimeDelta::seconds(DEFAULT_WARNING_WINDOW_SECS),
            logout_redirect_delay: Duration::from_millis(DEFAULT_LOGOUT_REDIRECT_DELAY_MS),
            logout_notice_lifetime: Duration::from_millis(DEFAULT_LOGOUT_NOTICE_MS),
            warning_notice_lifetime: Duration::from_millis(DEFAULT_WARNING_NOTICE_MS),
        }
    }
}

impl GuardConfig {
    /// Build config from defaults plus environment overrides.
    ///
    /// Optional:
    /// - `HUBBER_SESSION_TTL_SECS`: default 86400
    /// - `HUBBER_VALIDATION_INTERVAL_SECS`: default 300
    /// - `HUBBER_WARNING_WINDOW_SECS`: default 1800
    /// - `HUBBER_LOGOUT_DELAY_MS`: default 1500
    /// - `HUBBER_LOGIN_PAGE`: default `login.html`
    ///
    /// Unparsable or non-positive values fall back to the default.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let login_page = std::env::var("HUBBER_LOGIN_PAGE")
            .ok()
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.login_page.clone());

        Self {
            login_page,
            session_ttl: TimeDelta::seconds(env_parse_positive("HUBBER_SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)),
            validation_interval: TimeDelta::seconds(env_parse_positive(
                "HUBBER_VALIDATION_INTERVAL_SECS",
                DEFAULT_VALIDATION_INTERVAL_SECS,
            )),
            warning_window: TimeDelta::seconds(env_parse_positive(
                "HUBBER_WARNING_WINDOW_SECS",
                DEFAULT_WARNING_WINDOW_SECS,
            )),
            logout_redirect_delay: Duration::from_millis(env_parse_positive(
                "HUBBER_LOGOUT_DELAY_MS",
                DEFAULT_LOGOUT_REDIRECT_DELAY_MS,
            )),
            ..defaults
        }
    }

    /// Whether `pathname` names a page reachable without a session.
    #[must_use]
    pub fn is_public_page(&self, pathname: &str) -> bool {
        let page = current_page(pathname, &self.default_page);
        self.public_pages.iter().any(|p| p == page)
    }
}

fn env_parse_positive<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .filter(|v| *v > T::default())
        .unwrap_or(default)
}
