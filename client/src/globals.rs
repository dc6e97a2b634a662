//! Page-script surface: `window.hubberAuth` and `window.debugSession`.
//!
//! SYSTEM CONTEXT
//! ==============
//! Scripts on the hosting page call the guard through two exported objects
//! installed by [`crate::start`]. Records cross the boundary as plain JS
//! objects parsed from their JSON form; absent values are `null`.

use serde::Serialize;

/// JSON text of `value`, `None` when absent or unserializable.
pub fn json_text<T: Serialize>(value: Option<&T>) -> Option<String> {
    let value = value?;
    match serde_json::to_string(value) {
        Ok(text) => Some(text),
        Err(e) => {
            leptos::logging::warn!("failed to encode value for page script: {e}");
            None
        }
    }
}

#[cfg(feature = "hydrate")]
mod exports {
    use std::rc::Rc;

    use hubber_session::{AuthApi, DebugApi, SystemClock};
    use wasm_bindgen::prelude::*;

    use super::json_text;
    use crate::BrowserGuard;
    use crate::util::page::BrowserPage;
    use crate::util::storage::BrowserStorage;

    fn to_js(text: Option<String>) -> JsValue {
        text.and_then(|t| js_sys::JSON::parse(&t).ok()).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen]
    pub struct HubberAuth {
        api: AuthApi<BrowserStorage, SystemClock, BrowserPage>,
    }

    #[wasm_bindgen]
    impl HubberAuth {
        #[wasm_bindgen(js_name = getCurrentUser)]
        pub fn current_user(&self) -> JsValue {
            to_js(json_text(self.api.current_user().as_ref()))
        }

        pub fn logout(&self) {
            self.api.logout();
        }

        #[wasm_bindgen(js_name = hasRole)]
        pub fn has_role(&self, role: &str) -> bool {
            self.api.has_role(role)
        }

        #[wasm_bindgen(js_name = hasAnyRole)]
        pub fn has_any_role(&self, roles: Vec<String>) -> bool {
            self.api.has_any_role(&roles)
        }

        #[wasm_bindgen(js_name = requireRole)]
        pub fn require_role(&self, role: &str, fallback_url: Option<String>) -> bool {
            self.api.require_role(role, fallback_url.as_deref())
        }

        #[wasm_bindgen(js_name = extendSession)]
        pub fn extend_session(&self) -> bool {
            self.api.extend_session()
        }

        #[wasm_bindgen(js_name = getTimeRemaining)]
        pub fn time_remaining(&self) -> JsValue {
            to_js(json_text(self.api.time_remaining().as_ref()))
        }
    }

    #[wasm_bindgen]
    pub struct DebugSession {
        api: DebugApi<BrowserStorage, SystemClock, BrowserPage>,
    }

    #[wasm_bindgen]
    impl DebugSession {
        #[wasm_bindgen(js_name = showSession)]
        pub fn show_session(&self) -> JsValue {
            to_js(json_text(self.api.show_session().as_ref()))
        }

        #[wasm_bindgen(js_name = showTimeRemaining)]
        pub fn show_time_remaining(&self) -> JsValue {
            to_js(json_text(self.api.show_time_remaining().as_ref()))
        }

        #[wasm_bindgen(js_name = forceLogout)]
        pub fn force_logout(&self) {
            self.api.force_logout();
        }

        #[wasm_bindgen(js_name = extendSession)]
        pub fn extend_session(&self) -> bool {
            self.api.extend_session()
        }
    }

    /// Attach both objects to `window`.
    pub fn install(guard: &Rc<BrowserGuard>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let auth = HubberAuth { api: AuthApi::new(Rc::clone(guard)) };
        let debug = DebugSession { api: DebugApi::new(Rc::clone(guard)) };
        for (name, value) in [("hubberAuth", JsValue::from(auth)), ("debugSession", JsValue::from(debug))] {
            if let Err(e) = js_sys::Reflect::set(&window, &JsValue::from_str(name), &value) {
                leptos::logging::warn!("failed to install window.{name}: {e:?}");
            }
        }
    }
}

#[cfg(feature = "hydrate")]
pub use exports::{DebugSession, HubberAuth, install};
