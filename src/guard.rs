//! Session guard: the per-page session state machine.
//!
//! ARCHITECTURE
//! ============
//! One [`SessionGuard`] is built per page and handed to whatever needs it
//! (components, the public API facade, timers). It owns no global state;
//! storage, time, and page effects all come in through its constructor.
//!
//! State per page load:
//!
//! ```text
//!   NoSession ──┐
//!               ├─(non-public page)──▶ Redirected
//!   ExpiredSession ┘
//!   ValidSession ──(expiry elapses | logout)──▶ NoSession
//! ```
//!
//! ERROR HANDLING
//! ==============
//! Reads fail closed: a record that cannot be read or decoded is removed and
//! treated as absent. Login history and registry updates are best-effort
//! bookkeeping; their failures are logged and swallowed.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::GuardConfig;
use crate::display::UserDisplay;
use crate::error::GuardError;
use crate::notice::Notice;
use crate::page::PageHost;
use crate::session::{
    LoginHistoryEntry, Profile, SessionRecord, SessionUser, TimeRemaining, format_timestamp, merge_profile,
};
use crate::store::{KeyValueStore, load_json, save_json};
use crate::triggers::{ClickOutcome, ClickTarget, LOGOUT_CONFIRM_MESSAGE, LogoutTrigger};

/// What storage currently holds under the session key.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionStatus {
    Absent,
    /// Unreadable, not JSON, or not a session record.
    Malformed,
    Expired(SessionRecord),
    Valid(SessionRecord),
}

/// Outcome of validating the current page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageState {
    NoSession,
    ValidSession,
    ExpiredSession,
    /// The visitor was sent to the login page.
    Redirected,
}

pub struct SessionGuard<S, C, P> {
    config: GuardConfig,
    local: S,
    transient: S,
    clock: C,
    page: P,
    triggers: Vec<LogoutTrigger>,
}

impl<S, C, P> SessionGuard<S, C, P>
where
    S: KeyValueStore,
    C: Clock,
    P: PageHost,
{
    /// `local` persists across visits (session, history, registry);
    /// `transient` lives for the tab (post-login return URL).
    pub fn new(config: GuardConfig, local: S, transient: S, clock: C, page: P) -> Self {
        Self { config, local, transient, clock, page, triggers: LogoutTrigger::defaults() }
    }

    /// Replace the default logout trigger registrations.
    #[must_use]
    pub fn with_triggers(mut self, triggers: Vec<LogoutTrigger>) -> Self {
        self.triggers = triggers;
        self
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn logout_triggers(&self) -> &[LogoutTrigger] {
        &self.triggers
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // =========================================================================
    // Reading
    // =========================================================================

    /// Classify the stored record without touching storage.
    pub fn inspect(&self) -> SessionStatus {
        let key = &self.config.keys.session;
        let raw = match self.local.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return SessionStatus::Absent,
            Err(e) => {
                warn!(error = %e, key = %key, "session read failed");
                return SessionStatus::Malformed;
            }
        };
        match SessionRecord::decode(&raw) {
            Ok(record) if record.is_valid_at(self.now()) => SessionStatus::Valid(record),
            Ok(record) => SessionStatus::Expired(record),
            Err(e) => {
                warn!(error = %e, key = %key, "discarding unreadable session record");
                SessionStatus::Malformed
            }
        }
    }

    /// The stored session if it is still valid. Expired or corrupt records
    /// are cleared on the way.
    pub fn current_session(&self) -> Option<SessionRecord> {
        match self.inspect() {
            SessionStatus::Valid(record) => Some(record),
            SessionStatus::Absent => None,
            SessionStatus::Expired(record) => {
                info!(session_id = %record.session_id, "session expired");
                self.clear_session();
                None
            }
            SessionStatus::Malformed => {
                self.clear_session();
                None
            }
        }
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.current_session().map(|s| s.user)
    }

    // =========================================================================
    // Page access
    // =========================================================================

    /// Check the session for the current page, redirecting to login from
    /// non-public pages when there is no valid session.
    pub fn validate_session(&self) -> PageState {
        self.evaluate().0
    }

    fn evaluate(&self) -> (PageState, Option<SessionRecord>) {
        let state = match self.inspect() {
            SessionStatus::Valid(record) => return (PageState::ValidSession, Some(record)),
            SessionStatus::Absent => PageState::NoSession,
            SessionStatus::Malformed => {
                self.clear_session();
                PageState::NoSession
            }
            SessionStatus::Expired(record) => {
                info!(session_id = %record.session_id, "session expired");
                self.clear_session();
                PageState::ExpiredSession
            }
        };

        let location = self.page.location();
        if self.config.is_public_page(&location.pathname) {
            debug!(pathname = %location.pathname, ?state, "public page without session");
            return (state, None);
        }
        if self.redirect_to_login() {
            (PageState::Redirected, None)
        } else {
            (state, None)
        }
    }

    /// Re-validation run by the background timer. Public pages are skipped.
    pub fn periodic_check(&self) -> Option<PageState> {
        let location = self.page.location();
        if self.config.is_public_page(&location.pathname) {
            return None;
        }
        Some(self.validate_session())
    }

    /// Page-load sequence: validate, then mirror the user into the page.
    pub fn start(&self) -> PageState {
        let (state, session) = self.evaluate();
        if let Some(session) = session {
            self.page.render_user(&UserDisplay::from_session(&session));
        }
        debug!(?state, "session guard started");
        state
    }

    /// Push the current user's fields to the page. Returns false without a
    /// session.
    pub fn render_user_display(&self) -> bool {
        let Some(session) = self.current_session() else {
            return false;
        };
        self.page.render_user(&UserDisplay::from_session(&session));
        true
    }

    /// Save the current URL for the post-login hop and go to the login page.
    /// Does nothing (returns false) when already on the login page.
    pub fn redirect_to_login(&self) -> bool {
        let location = self.page.location();
        if location.pathname.contains(self.config.login_page.as_str()) {
            return false;
        }
        let key = &self.config.keys.redirect_after_login;
        if let Err(e) = self.transient.set(key, &location.href) {
            warn!(error = %e, key = %key, "failed to save post-login return URL");
        }
        info!(from = %location.href, to = %self.config.login_page, "redirecting to login");
        self.page.navigate(&self.config.login_page);
        true
    }

    /// Read and forget the URL saved by [`Self::redirect_to_login`].
    pub fn take_return_url(&self) -> Option<String> {
        let key = &self.config.keys.redirect_after_login;
        let url = match self.transient.get(key) {
            Ok(url) => url?,
            Err(e) => {
                warn!(error = %e, key = %key, "failed to read post-login return URL");
                return None;
            }
        };
        if let Err(e) = self.transient.remove(key) {
            warn!(error = %e, key = %key, "failed to clear post-login return URL");
        }
        Some(url)
    }

    // =========================================================================
    // Roles
    // =========================================================================

    pub fn has_role(&self, role: &str) -> bool {
        self.current_session().is_some_and(|s| s.user.role == role)
    }

    pub fn has_any_role<R: AsRef<str>>(&self, roles: &[R]) -> bool {
        self.current_session()
            .is_some_and(|s| roles.iter().any(|r| r.as_ref() == s.user.role))
    }

    /// Send the visitor to `fallback_url` (the login page when `None`) unless
    /// the session carries `role`. Returns whether access was granted.
    pub fn require_role(&self, role: &str, fallback_url: Option<&str>) -> bool {
        if self.has_role(role) {
            return true;
        }
        let target = fallback_url.unwrap_or(self.config.login_page.as_str());
        info!(role, target, "role check failed");
        self.page.navigate(target);
        false
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Start a fresh session for an already-verified `user` and prepend it to
    /// the login history. Called by the login flow.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError`] when the session record cannot be written. A
    /// history write failure is logged only.
    pub fn establish_session(&self, user: SessionUser) -> Result<SessionRecord, GuardError> {
        let now = self.now();
        let record = SessionRecord::new(Uuid::new_v4().to_string(), user, now + self.config.session_ttl);
        self.write_session(&record)?;
        if let Err(e) = self.record_login(&record, now) {
            warn!(error = %e, "failed to record login in history");
        }
        info!(session_id = %record.session_id, email = %record.user.email, "session established");
        Ok(record)
    }

    /// Reset expiry to now plus the session TTL. Returns false when there is
    /// no session.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError`] when the extended record cannot be written.
    pub fn extend_session(&self) -> Result<bool, GuardError> {
        let Some(mut session) = self.current_session() else {
            return Ok(false);
        };
        session.expiry = self.now() + self.config.session_ttl;
        self.write_session(&session)?;
        info!(session_id = %session.session_id, expiry = %session.expiry, "session extended");
        Ok(true)
    }

    pub fn user_profile(&self) -> Option<Profile> {
        self.current_session().and_then(|s| s.user.profile)
    }

    /// Shallow-merge `patch` into the session user's profile, then mirror the
    /// merged profile into the registry entry for the same email.
    ///
    /// The session write is authoritative. The registry mirror is
    /// best-effort: it only updates an existing entry, and its failure is
    /// logged without failing the call.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError`] when the session record cannot be written.
    pub fn update_user_profile(&self, patch: &Profile) -> Result<bool, GuardError> {
        let Some(mut session) = self.current_session() else {
            return Ok(false);
        };
        let merged = merge_profile(session.user.profile.as_ref(), patch);
        session.user.profile = Some(merged.clone());
        self.write_session(&session)?;

        if let Err(e) = self.sync_registry_profile(&session.user.email, merged) {
            warn!(error = %e, email = %session.user.email, "failed to mirror profile into user registry");
        }
        Ok(true)
    }

    /// Remove the session and every per-user cache entry.
    pub fn clear_session(&self) {
        let keys = &self.config.keys;
        if let Err(e) = self.local.remove(&keys.session) {
            warn!(error = %e, key = %keys.session, "failed to remove session");
        }
        let cached = match self.local.keys() {
            Ok(all) => all,
            Err(e) => {
                warn!(error = %e, "failed to list storage keys");
                return;
            }
        };
        for key in cached.iter().filter(|k| k.starts_with(&keys.user_cache_prefix)) {
            if let Err(e) = self.local.remove(key) {
                warn!(error = %e, key = %key, "failed to remove user cache entry");
            }
        }
    }

    /// Stamp the history, clear storage, show the logout notice, and head to
    /// the login page after the configured delay.
    pub fn logout(&self) {
        if let Some(session) = self.current_session() {
            if let Err(e) = self.stamp_logout(&session) {
                warn!(error = %e, session_id = %session.session_id, "failed to record logout in history");
            }
            info!(session_id = %session.session_id, "logged out");
        }
        self.clear_session();
        self.page.clear_user();
        self.page.show_notice(Notice::LoggedOut, self.config.logout_notice_lifetime);
        self.page.navigate_after(&self.config.login_page, self.config.logout_redirect_delay);
    }

    /// Ask for confirmation, then log out. Returns whether logout happened.
    pub fn request_logout(&self) -> bool {
        if !self.page.confirm(LOGOUT_CONFIRM_MESSAGE) {
            return false;
        }
        self.logout();
        true
    }

    /// Route a page click through the registered logout triggers.
    pub fn handle_click(&self, target: &ClickTarget) -> ClickOutcome {
        if !self.triggers.iter().any(|t| t.matches(target)) {
            return ClickOutcome::Ignored;
        }
        if self.request_logout() {
            ClickOutcome::LoggedOut
        } else {
            ClickOutcome::Cancelled
        }
    }

    // =========================================================================
    // Expiry
    // =========================================================================

    pub fn session_time_remaining(&self) -> Option<TimeRemaining> {
        let now = self.now();
        self.current_session().map(|s| s.time_remaining(now))
    }

    /// The expiry warning, when remaining whole minutes fall within
    /// `(0, warning window]`.
    pub fn session_warning(&self) -> Option<Notice> {
        let remaining = self.session_time_remaining()?;
        let window = self.config.warning_window.num_minutes();
        (remaining.minutes > 0 && remaining.minutes <= window)
            .then_some(Notice::ExpiryWarning { minutes: remaining.minutes })
    }

    /// Surface [`Self::session_warning`] on the page. Returns whether it was
    /// shown.
    pub fn show_session_warning(&self) -> bool {
        let Some(notice) = self.session_warning() else {
            return false;
        };
        self.page.show_notice(notice, self.config.warning_notice_lifetime);
        true
    }

    // =========================================================================
    // Storage helpers
    // =========================================================================

    fn write_session(&self, session: &SessionRecord) -> Result<(), GuardError> {
        let key = &self.config.keys.session;
        let raw = session
            .encode()
            .map_err(|source| GuardError::Encode { key: key.clone(), source })?;
        self.local.set(key, &raw)?;
        Ok(())
    }

    // History and registry are edited as raw JSON so entries this guard does
    // not own keep their stored shape.

    fn record_login(&self, session: &SessionRecord, now: DateTime<Utc>) -> Result<(), GuardError> {
        let key = &self.config.keys.login_history;
        let mut history: Vec<Value> = load_json(&self.local, key)?.unwrap_or_default();
        let entry = serde_json::to_value(LoginHistoryEntry::new(session.session_id.clone(), now))
            .map_err(|source| GuardError::Encode { key: key.clone(), source })?;
        history.insert(0, entry);
        save_json(&self.local, key, &history)
    }

    /// Set `logoutTime` on the newest history entry for `session`. Returns
    /// whether one was found.
    fn stamp_logout(&self, session: &SessionRecord) -> Result<bool, GuardError> {
        let key = &self.config.keys.login_history;
        let Some(mut history) = load_json::<Vec<Value>>(&self.local, key)? else {
            return Ok(false);
        };
        let stamp = Value::String(format_timestamp(self.now()));
        let Some(entry) = history
            .iter_mut()
            .filter_map(Value::as_object_mut)
            .find(|e| e.get("sessionId").and_then(Value::as_str) == Some(session.session_id.as_str()))
        else {
            return Ok(false);
        };
        entry.insert("logoutTime".to_owned(), stamp);
        save_json(&self.local, key, &history)?;
        Ok(true)
    }

    fn sync_registry_profile(&self, email: &str, profile: Profile) -> Result<bool, GuardError> {
        let key = &self.config.keys.users;
        let Some(mut registry) = load_json::<Map<String, Value>>(&self.local, key)? else {
            return Ok(false);
        };
        let Some(entry) = registry.get_mut(email).and_then(Value::as_object_mut) else {
            return Ok(false);
        };
        entry.insert("profile".to_owned(), Value::Object(profile));
        save_json(&self.local, key, &registry)?;
        Ok(true)
    }
}
