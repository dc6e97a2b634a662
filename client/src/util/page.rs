//! Browser page host: `window.location`, `confirm`, timers, and the signals
//! the overlay components render from.
//!
//! TRADE-OFFS
//! ==========
//! Navigation and prompts are hydrate-only. During SSR the location is empty
//! (treated as the default public page), prompts answer "no", and navigation
//! is skipped, so the server never renders a redirect.

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

use std::time::Duration;

use hubber_session::{Notice, PageHost, PageLocation, UserDisplay};
use leptos::prelude::*;

use crate::state::notices::NoticeState;

/// Page host backed by the browser window and reactive signals.
#[derive(Clone, Copy)]
pub struct BrowserPage {
    notices: RwSignal<NoticeState>,
    display: RwSignal<Option<UserDisplay>>,
}

impl BrowserPage {
    #[must_use]
    pub fn new() -> Self {
        Self { notices: RwSignal::new(NoticeState::default()), display: RwSignal::new(None) }
    }

    #[must_use]
    pub fn notices(&self) -> RwSignal<NoticeState> {
        self.notices
    }

    #[must_use]
    pub fn display(&self) -> RwSignal<Option<UserDisplay>> {
        self.display
    }

    pub fn dismiss(&self, id: u64) {
        self.notices.update(|state| state.dismiss(id));
    }
}

impl Default for BrowserPage {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp a delay to the `u32` milliseconds `setTimeout` accepts.
#[must_use]
pub fn timer_millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)
}

#[cfg(feature = "hydrate")]
fn set_href(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.location().set_href(url) {
            leptos::logging::warn!("navigation to {url} failed: {e:?}");
        }
    }
}

impl PageHost for BrowserPage {
    fn location(&self) -> PageLocation {
        #[cfg(feature = "hydrate")]
        {
            let Some(window) = web_sys::window() else {
                return PageLocation::default();
            };
            let location = window.location();
            PageLocation::new(location.pathname().unwrap_or_default(), location.href().unwrap_or_default())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            PageLocation::default()
        }
    }

    fn navigate(&self, url: &str) {
        #[cfg(feature = "hydrate")]
        set_href(url);
        #[cfg(not(feature = "hydrate"))]
        let _ = url;
    }

    fn navigate_after(&self, url: &str, delay: Duration) {
        #[cfg(feature = "hydrate")]
        {
            let url = url.to_owned();
            gloo_timers::callback::Timeout::new(timer_millis(delay), move || set_href(&url)).forget();
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (url, delay);
        }
    }

    fn confirm(&self, message: &str) -> bool {
        #[cfg(feature = "hydrate")]
        {
            web_sys::window()
                .and_then(|w| w.confirm_with_message(message).ok())
                .unwrap_or(false)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = message;
            false
        }
    }

    fn show_notice(&self, notice: Notice, lifetime: Duration) {
        let mut id = 0;
        self.notices.update(|state| id = state.push(notice));

        #[cfg(feature = "hydrate")]
        {
            let notices = self.notices;
            gloo_timers::callback::Timeout::new(timer_millis(lifetime), move || {
                notices.update(|state| state.dismiss(id));
            })
            .forget();
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (id, lifetime);
        }
    }

    fn render_user(&self, display: &UserDisplay) {
        self.display.set(Some(display.clone()));
    }

    fn clear_user(&self) {
        self.display.set(None);
    }
}
