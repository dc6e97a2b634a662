//! # hubber-session
//!
//! Client-side session guard for Hubber pages. Owns the locally stored
//! session record, decides page access from its expiry and role, mirrors the
//! signed-in user into the page, and handles logout and extension.
//!
//! DESIGN
//! ======
//! The guard never touches a browser directly. Storage, time, and the page
//! (navigation, prompts, notices, user rendering) are injected through the
//! [`store::KeyValueStore`], [`clock::Clock`], and [`page::PageHost`] seams so
//! the same state machine runs in the WASM front end (`client`), the debug
//! CLI (`cli`), and unit tests.
//!
//! TRADE-OFFS
//! ==========
//! Trust is entirely client-asserted: nothing here verifies credentials or
//! signs tokens. A corrupt or expired record is treated as "no session" and
//! removed, so every failure degrades to a login redirect.

pub mod api;
pub mod clock;
pub mod config;
pub mod display;
pub mod error;
pub mod guard;
pub mod notice;
pub mod page;
pub mod schedule;
pub mod session;
pub mod store;
pub mod triggers;

pub use api::{AuthApi, DebugApi};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::GuardConfig;
pub use display::{UserDisplay, UserField};
pub use error::{DecodeError, GuardError, StoreError};
pub use guard::{PageState, SessionGuard, SessionStatus};
pub use notice::{Notice, NoticeLevel};
pub use page::{PageHost, PageLocation, RecordingPage};
pub use schedule::ValidationSchedule;
pub use session::{LoginHistoryEntry, Profile, SessionRecord, SessionUser, TimeRemaining, UserId};
pub use store::{KeyValueStore, MemoryStore};
pub use triggers::{ClickOutcome, ClickTarget, LogoutTrigger};
