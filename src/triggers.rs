//! Explicit logout trigger registrations.
//!
//! DESIGN
//! ======
//! The page registers a list of [`LogoutTrigger`]s and forwards clicks as a
//! [`ClickTarget`] description. No document-wide listener is installed by the
//! guard itself.

#[cfg(test)]
#[path = "triggers_test.rs"]
mod triggers_test;

pub const LOGOUT_CONFIRM_MESSAGE: &str = "Are you sure you want to logout?";

/// What a click landed on, as seen by the page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickTarget {
    /// Upper- or lower-case element tag name (`A`, `button`, ...).
    pub tag: String,
    /// Classes on the clicked element.
    pub classes: Vec<String>,
    /// Classes on any ancestor of the clicked element.
    pub ancestor_classes: Vec<String>,
    /// Raw `href` attribute, for anchors.
    pub href: Option<String>,
}

impl ClickTarget {
    #[must_use]
    pub fn element(tag: &str, classes: &[&str]) -> Self {
        Self {
            tag: tag.to_owned(),
            classes: classes.iter().map(|c| (*c).to_owned()).collect(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn anchor(href: &str) -> Self {
        Self { tag: "A".to_owned(), href: Some(href.to_owned()), ..Self::default() }
    }

    #[must_use]
    pub fn inside(mut self, ancestor_classes: &[&str]) -> Self {
        self.ancestor_classes
            .extend(ancestor_classes.iter().map(|c| (*c).to_owned()));
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogoutTrigger {
    /// Element carrying this class, or nested inside one that does.
    Class(String),
    /// Anchor whose `href` attribute equals this value exactly.
    AnchorHref(String),
}

impl LogoutTrigger {
    /// `logout-btn` elements and `#logout` anchors.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![Self::Class("logout-btn".to_owned()), Self::AnchorHref("#logout".to_owned())]
    }

    #[must_use]
    pub fn matches(&self, target: &ClickTarget) -> bool {
        match self {
            Self::Class(class) => target
                .classes
                .iter()
                .chain(&target.ancestor_classes)
                .any(|c| c == class),
            Self::AnchorHref(href) => {
                target.tag.eq_ignore_ascii_case("a") && target.href.as_deref() == Some(href.as_str())
            }
        }
    }
}

/// Result of routing a click through the logout triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No trigger matched; the page handles the click normally.
    Ignored,
    /// A trigger matched but the visitor declined the confirmation.
    Cancelled,
    LoggedOut,
}
