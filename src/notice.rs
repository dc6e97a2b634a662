//! Transient notices the guard surfaces on the page.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
}

impl NoticeLevel {
    /// CSS modifier used by the page's alert styling.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Info => "alert-info",
            Self::Warning => "alert-warning",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Shown right after logout, before the login redirect.
    LoggedOut,
    /// Session is about to expire; offers one-click extension.
    ExpiryWarning { minutes: i64 },
}

impl Notice {
    #[must_use]
    pub fn level(&self) -> NoticeLevel {
        match self {
            Self::LoggedOut => NoticeLevel::Info,
            Self::ExpiryWarning { .. } => NoticeLevel::Warning,
        }
    }

    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::LoggedOut => "Logged out successfully".to_owned(),
            Self::ExpiryWarning { minutes } => format!("Your session expires in {minutes} minutes"),
        }
    }

    /// Label of the inline action button, if the notice has one.
    #[must_use]
    pub fn action_label(&self) -> Option<&'static str> {
        match self {
            Self::LoggedOut => None,
            Self::ExpiryWarning { .. } => Some("Extend Session"),
        }
    }
}
