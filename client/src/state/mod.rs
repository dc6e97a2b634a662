//! Client-side state for the session overlay.

pub mod notices;
