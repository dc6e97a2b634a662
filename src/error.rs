//! Error types for storage access and session writes.
//!
//! ERROR HANDLING
//! ==============
//! Read paths never surface these to callers: a failed read or a record that
//! does not decode is the "no session" case. Only write paths (extend,
//! profile merge, establishing a session) return [`GuardError`].

/// Failure reported by a [`crate::store::KeyValueStore`] backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backing storage is not reachable (no window, private mode, SSR).
    #[error("storage unavailable")]
    Unavailable,
    /// Reading `key` failed in the backend.
    #[error("storage read failed for `{key}`: {message}")]
    Read { key: String, message: String },
    /// Writing or removing `key` failed in the backend (quota, read-only).
    #[error("storage write failed for `{key}`: {message}")]
    Write { key: String, message: String },
}

/// A stored session record that cannot be trusted.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The raw value is not JSON or does not match the record schema.
    #[error("invalid session record: {0}")]
    Json(#[from] serde_json::Error),
    /// The record decoded but carries an empty `sessionId`.
    #[error("session record has an empty sessionId")]
    EmptySessionId,
}

/// Error returned by guard operations that write storage, and by the
/// best-effort bookkeeping (history, registry) the guard logs and swallows.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The value stored under `key` is not the expected JSON.
    #[error("failed to decode `{key}`: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    /// A value could not be serialized before writing it under `key`.
    #[error("failed to encode `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
