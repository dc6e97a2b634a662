//! Persisted session schema.
//!
//! DESIGN
//! ======
//! These types mirror the JSON the login flow writes into storage, field for
//! field (`sessionId`, `user`, `expiry`, ...). Unknown fields are kept in
//! `extra` so rewriting a record after `extend` or a profile merge never
//! drops data another page put there.
//!
//! Timestamps are written as ISO-8601 UTC with millisecond precision. On
//! read, integer milliseconds since the Unix epoch are accepted as well.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Open-ended user profile object (bio, avatar, preferences, ...).
pub type Profile = Map<String, Value>;

/// User identifier as written by the login flow: numeric or string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The signed-in user carried inside a session record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email; also the key into the user registry.
    pub email: String,
    /// Coarse access tag (e.g. `"admin"`, `"user"`).
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionUser {
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role: role.into(),
            profile: None,
            extra: Map::new(),
        }
    }
}

/// Client-held proof of login. Valid while `expiry` lies in the future.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: String,
    pub user: SessionUser,
    #[serde(with = "timestamp")]
    pub expiry: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionRecord {
    #[must_use]
    pub fn new(session_id: impl Into<String>, user: SessionUser, expiry: DateTime<Utc>) -> Self {
        Self { session_id: session_id.into(), user, expiry, extra: Map::new() }
    }

    /// Parse and validate a raw stored value.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when the value is not JSON, misses a required
    /// field, or carries an empty `sessionId`.
    pub fn decode(raw: &str) -> Result<Self, DecodeError> {
        let record: Self = serde_json::from_str(raw)?;
        if record.session_id.trim().is_empty() {
            return Err(DecodeError::EmptySessionId);
        }
        Ok(record)
    }

    /// Serialize into the stored JSON form.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures (only possible for non-string map keys
    /// smuggled into `extra`).
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expiry > now
    }

    #[must_use]
    pub fn time_remaining(&self, now: DateTime<Utc>) -> TimeRemaining {
        TimeRemaining::from_millis((self.expiry - now).num_milliseconds())
    }
}

/// One login event, newest first in the history list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginHistoryEntry {
    pub session_id: String,
    #[serde(with = "timestamp")]
    pub login_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub logout_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LoginHistoryEntry {
    #[must_use]
    pub fn new(session_id: impl Into<String>, login_time: DateTime<Utc>) -> Self {
        Self { session_id: session_id.into(), login_time, logout_time: None, extra: Map::new() }
    }
}

/// Time left before a session expires, floored per unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub milliseconds: i64,
    pub minutes: i64,
    pub hours: i64,
}

impl TimeRemaining {
    #[must_use]
    pub fn from_millis(milliseconds: i64) -> Self {
        Self {
            milliseconds,
            minutes: milliseconds.div_euclid(60 * 1000),
            hours: milliseconds.div_euclid(60 * 60 * 1000),
        }
    }
}

/// Shallow merge: keys in `patch` replace keys in `base`, all others survive.
#[must_use]
pub fn merge_profile(base: Option<&Profile>, patch: &Profile) -> Profile {
    let mut merged = base.cloned().unwrap_or_default();
    for (key, value) in patch {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Render a timestamp the way the login flow writes it.
#[must_use]
pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Serde adapter: ISO-8601 out, ISO-8601 or epoch milliseconds in.
pub(crate) mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        parse(Value::deserialize(deserializer)?).map_err(D::Error::custom)
    }

    pub(super) fn parse(value: Value) -> Result<DateTime<Utc>, String> {
        match value {
            Value::String(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| format!("invalid timestamp '{raw}': {e}")),
            Value::Number(n) => n
                .as_i64()
                .and_then(DateTime::from_timestamp_millis)
                .ok_or_else(|| format!("timestamp out of range: {n}")),
            other => Err(format!("expected timestamp string or milliseconds, got {other}")),
        }
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};
        use serde_json::Value;

        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error> {
            match value {
                Some(dt) => serializer.serialize_some(&super::super::format_timestamp(*dt)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Value::deserialize(deserializer)? {
                Value::Null => Ok(None),
                other => super::parse(other).map(Some).map_err(D::Error::custom),
            }
        }
    }
}
