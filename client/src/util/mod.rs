//! Browser glue for the session guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns (storage, window,
//! timers) from components so the guard logic stays testable off-browser.

pub mod page;
pub mod storage;
pub mod validation_timer;
