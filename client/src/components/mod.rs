//! Session overlay components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the page host and guard handle from Leptos context
//! provided by `SessionOverlay`.

pub mod logout;
pub mod notice_stack;
pub mod session_overlay;
pub mod user_fields;
