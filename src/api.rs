//! Surface exposed to the hosting page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Page scripts only need a handful of calls: who is signed in, log out,
//! role checks, extend, time left. [`AuthApi`] wraps a shared guard and turns
//! write failures into `false` after logging them. [`DebugApi`] is the
//! developer console variant that logs what it finds.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::rc::Rc;

use tracing::{info, warn};

use crate::clock::Clock;
use crate::guard::SessionGuard;
use crate::page::PageHost;
use crate::session::{SessionRecord, SessionUser, TimeRemaining};
use crate::store::KeyValueStore;

pub struct AuthApi<S, C, P> {
    guard: Rc<SessionGuard<S, C, P>>,
}

impl<S, C, P> Clone for AuthApi<S, C, P> {
    fn clone(&self) -> Self {
        Self { guard: Rc::clone(&self.guard) }
    }
}

impl<S, C, P> AuthApi<S, C, P>
where
    S: KeyValueStore,
    C: Clock,
    P: PageHost,
{
    pub fn new(guard: Rc<SessionGuard<S, C, P>>) -> Self {
        Self { guard }
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.guard.current_user()
    }

    pub fn logout(&self) {
        self.guard.logout();
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.guard.has_role(role)
    }

    pub fn has_any_role<R: AsRef<str>>(&self, roles: &[R]) -> bool {
        self.guard.has_any_role(roles)
    }

    /// Redirect to `fallback_url` (login page by default) unless the user
    /// holds `role`.
    pub fn require_role(&self, role: &str, fallback_url: Option<&str>) -> bool {
        self.guard.require_role(role, fallback_url)
    }

    pub fn extend_session(&self) -> bool {
        self.guard.extend_session().unwrap_or_else(|e| {
            warn!(error = %e, "session extension failed");
            false
        })
    }

    pub fn time_remaining(&self) -> Option<TimeRemaining> {
        self.guard.session_time_remaining()
    }
}

pub struct DebugApi<S, C, P> {
    guard: Rc<SessionGuard<S, C, P>>,
}

impl<S, C, P> DebugApi<S, C, P>
where
    S: KeyValueStore,
    C: Clock,
    P: PageHost,
{
    pub fn new(guard: Rc<SessionGuard<S, C, P>>) -> Self {
        Self { guard }
    }

    pub fn show_session(&self) -> Option<SessionRecord> {
        let session = self.guard.current_session();
        info!(session = ?session, "current session");
        session
    }

    pub fn show_time_remaining(&self) -> Option<TimeRemaining> {
        let remaining = self.guard.session_time_remaining();
        info!(remaining = ?remaining, "time remaining");
        remaining
    }

    pub fn force_logout(&self) {
        self.guard.logout();
    }

    pub fn extend_session(&self) -> bool {
        AuthApi::new(Rc::clone(&self.guard)).extend_session()
    }
}
