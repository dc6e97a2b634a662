//! # client
//!
//! Leptos + WASM front end for the Hubber session guard. Wires the
//! `hubber-session` state machine to browser storage, `window.location`,
//! and a small overlay of components (user fields, logout controls, notice
//! stack).
//!
//! DESIGN
//! ======
//! One guard is built per page in [`start`] and shared through a local
//! `StoredValue`; components reach it via context instead of a global.

pub mod components;
pub mod globals;
pub mod state;
pub mod util;

use std::rc::Rc;

use hubber_session::{GuardConfig, SessionGuard, SystemClock};
use leptos::prelude::*;

use crate::util::page::BrowserPage;
use crate::util::storage::BrowserStorage;

/// The guard as wired for the browser.
pub type BrowserGuard = SessionGuard<BrowserStorage, SystemClock, BrowserPage>;

/// Copyable handle to the page's guard. The guard itself is not `Send`, so
/// it lives in thread-local arena storage. The `Rc` is shared with the
/// page-script exports in [`globals`].
pub type GuardHandle = StoredValue<Rc<BrowserGuard>, LocalStorage>;

/// Build the page's guard over `localStorage`/`sessionStorage`.
#[must_use]
pub fn build_guard(config: GuardConfig, page: BrowserPage) -> BrowserGuard {
    SessionGuard::new(config, BrowserStorage::local(), BrowserStorage::session(), SystemClock, page)
}

/// WASM entry point: validate the page, install `window.hubberAuth` and
/// `window.debugSession`, mount the overlay, start the timer.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let page = BrowserPage::new();
    let guard = Rc::new(build_guard(GuardConfig::default(), page));
    let state = guard.start();
    guard.show_session_warning();
    leptos::logging::log!("session guard started: {state:?}");

    let interval = guard.config().validation_interval;
    globals::install(&guard);
    let guard: GuardHandle = StoredValue::new_local(guard);
    util::validation_timer::start(guard, interval);

    leptos::mount::mount_to_body(move || {
        view! { <components::session_overlay::SessionOverlay page=page guard=guard /> }
    });
}
