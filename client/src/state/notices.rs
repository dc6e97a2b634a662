//! Notice stack state for transient session alerts.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser page host pushes notices here; `NoticeStack` renders them and
//! a `gloo-timers` timeout dismisses each one after its lifetime.

#[cfg(test)]
#[path = "notices_test.rs"]
mod notices_test;

use hubber_session::Notice;

/// A notice currently on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveNotice {
    pub id: u64,
    pub notice: Notice,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NoticeState {
    items: Vec<ActiveNotice>,
    next_id: u64,
}

impl NoticeState {
    /// Add `notice` and return its id for later dismissal. A second expiry
    /// warning replaces the one already showing.
    pub fn push(&mut self, notice: Notice) -> u64 {
        if matches!(notice, Notice::ExpiryWarning { .. }) {
            self.items
                .retain(|item| !matches!(item.notice, Notice::ExpiryWarning { .. }));
        }
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(ActiveNotice { id, notice });
        id
    }

    /// Remove the notice with `id`. Unknown ids are ignored, so a timer firing
    /// after a manual dismiss is harmless.
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|item| item.id != id);
    }

    #[must_use]
    pub fn items(&self) -> &[ActiveNotice] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
