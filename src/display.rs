//! Declarative user-field bindings.
//!
//! DESIGN
//! ======
//! Instead of querying the document for `.user-name` and friends, the guard
//! hands the page host a [`UserDisplay`]: one `(field, text)` binding per
//! conventional class. Hosts decide how to paint them.

#[cfg(test)]
#[path = "display_test.rs"]
mod display_test;

use serde::Serialize;

use crate::session::SessionRecord;

/// A user attribute mirrored into the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum UserField {
    Name,
    Email,
    Role,
    Id,
}

impl UserField {
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Role, Self::Id];

    /// Class name that marks elements showing this field.
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Name => "user-name",
            Self::Email => "user-email",
            Self::Role => "user-role",
            Self::Id => "user-id",
        }
    }
}

/// Text for every user field, ready to render.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserDisplay {
    bindings: Vec<(UserField, String)>,
}

impl UserDisplay {
    #[must_use]
    pub fn from_session(session: &SessionRecord) -> Self {
        let user = &session.user;
        Self {
            bindings: vec![
                (UserField::Name, user.name.clone()),
                (UserField::Email, user.email.clone()),
                (UserField::Role, capitalize(&user.role)),
                (UserField::Id, user.id.to_string()),
            ],
        }
    }

    #[must_use]
    pub fn bindings(&self) -> &[(UserField, String)] {
        &self.bindings
    }

    #[must_use]
    pub fn text(&self, field: UserField) -> Option<&str> {
        self.bindings.iter().find(|(f, _)| *f == field).map(|(_, text)| text.as_str())
    }
}

/// Upper-case the first character, leave the rest as written.
#[must_use]
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
