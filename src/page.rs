//! The page the guard runs inside: location, navigation, prompts, notices,
//! and user rendering.
//!
//! SYSTEM CONTEXT
//! ==============
//! `client` implements [`PageHost`] over `window` and Leptos signals; `cli`
//! implements it over the terminal. [`RecordingPage`] captures every call for
//! tests and dry runs.

#[cfg(test)]
#[path = "page_test.rs"]
mod page_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use crate::display::UserDisplay;
use crate::notice::Notice;

/// Where the page currently is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageLocation {
    /// Path component, e.g. `/app/dashboard.html`.
    pub pathname: String,
    /// Full URL, saved as the post-login return target.
    pub href: String,
}

impl PageLocation {
    #[must_use]
    pub fn new(pathname: impl Into<String>, href: impl Into<String>) -> Self {
        Self { pathname: pathname.into(), href: href.into() }
    }

    /// Split a URL (or bare path) into pathname and href. Scheme and host are
    /// skipped; query and fragment are not part of the pathname.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
        let path_start = if url.contains("://") { after_scheme.find('/') } else { Some(0) };
        let path = path_start.map_or("/", |i| &after_scheme[i..]);
        let pathname = path.split(['?', '#']).next().unwrap_or_default();
        let pathname = if pathname.is_empty() { "/" } else { pathname };
        Self::new(pathname, url)
    }
}

/// Last path segment of `pathname`, or `default_page` when it is empty.
#[must_use]
pub fn current_page<'a>(pathname: &'a str, default_page: &'a str) -> &'a str {
    match pathname.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => default_page,
    }
}

/// Environment seam for everything the guard does to the page.
pub trait PageHost {
    fn location(&self) -> PageLocation;

    /// Navigate immediately.
    fn navigate(&self, url: &str);

    /// Navigate once `delay` has elapsed.
    fn navigate_after(&self, url: &str, delay: Duration);

    /// Ask the visitor a yes/no question.
    fn confirm(&self, message: &str) -> bool;

    /// Surface a transient notice; the host dismisses it after `lifetime`.
    fn show_notice(&self, notice: Notice, lifetime: Duration);

    /// Reflect the signed-in user into the page.
    fn render_user(&self, display: &UserDisplay);

    /// Remove the user fields after logout.
    fn clear_user(&self);
}

impl<T: PageHost + ?Sized> PageHost for &T {
    fn location(&self) -> PageLocation {
        (**self).location()
    }
    fn navigate(&self, url: &str) {
        (**self).navigate(url);
    }
    fn navigate_after(&self, url: &str, delay: Duration) {
        (**self).navigate_after(url, delay);
    }
    fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message)
    }
    fn show_notice(&self, notice: Notice, lifetime: Duration) {
        (**self).show_notice(notice, lifetime);
    }
    fn render_user(&self, display: &UserDisplay) {
        (**self).render_user(display);
    }
    fn clear_user(&self) {
        (**self).clear_user();
    }
}

/// Something a [`RecordingPage`] was asked to do.
#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    Navigate(String),
    NavigateAfter(String, Duration),
    Confirm(String),
    Notice(Notice, Duration),
    RenderUser(UserDisplay),
    ClearUser,
}

/// Page host that records calls instead of performing them. Clones share the
/// same location and log.
#[derive(Clone, Debug, Default)]
pub struct RecordingPage {
    location: Rc<RefCell<PageLocation>>,
    confirm_answer: Rc<Cell<bool>>,
    events: Rc<RefCell<Vec<PageEvent>>>,
}

impl RecordingPage {
    #[must_use]
    pub fn at(url: &str) -> Self {
        let page = Self::default();
        page.set_location(PageLocation::from_url(url));
        page.answer_confirm(true);
        page
    }

    pub fn set_location(&self, location: PageLocation) {
        *self.location.borrow_mut() = location;
    }

    /// Answer every later `confirm` prompt with `answer`.
    pub fn answer_confirm(&self, answer: bool) {
        self.confirm_answer.set(answer);
    }

    #[must_use]
    pub fn events(&self) -> Vec<PageEvent> {
        self.events.borrow().clone()
    }

    /// Every navigation target, immediate or delayed, in call order.
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                PageEvent::Navigate(url) | PageEvent::NavigateAfter(url, _) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                PageEvent::Notice(notice, _) => Some(notice.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    fn record(&self, event: PageEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl PageHost for RecordingPage {
    fn location(&self) -> PageLocation {
        self.location.borrow().clone()
    }

    fn navigate(&self, url: &str) {
        self.record(PageEvent::Navigate(url.to_owned()));
    }

    fn navigate_after(&self, url: &str, delay: Duration) {
        self.record(PageEvent::NavigateAfter(url.to_owned(), delay));
    }

    fn confirm(&self, message: &str) -> bool {
        self.record(PageEvent::Confirm(message.to_owned()));
        self.confirm_answer.get()
    }

    fn show_notice(&self, notice: Notice, lifetime: Duration) {
        self.record(PageEvent::Notice(notice, lifetime));
    }

    fn render_user(&self, display: &UserDisplay) {
        self.record(PageEvent::RenderUser(display.clone()));
    }

    fn clear_user(&self) {
        self.record(PageEvent::ClearUser);
    }
}
