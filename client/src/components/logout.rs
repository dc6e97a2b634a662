//! Logout controls.
//!
//! Both controls are explicit registrations of the guard's default logout
//! triggers: a `logout-btn` button and a `#logout` anchor. Clicks are routed
//! through the guard so confirmation and trigger matching stay in one place.

use hubber_session::{ClickOutcome, ClickTarget};
use leptos::prelude::*;

use crate::GuardHandle;

fn route_click(guard: GuardHandle, target: &ClickTarget) -> ClickOutcome {
    guard.with_value(|g| g.handle_click(target))
}

#[component]
pub fn LogoutButton(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    let guard = expect_context::<GuardHandle>();
    let label = label.unwrap_or_else(|| "Logout".to_owned());

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        let outcome = route_click(guard, &ClickTarget::element("button", &["btn", "logout-btn"]));
        leptos::logging::log!("logout button: {outcome:?}");
    };

    view! {
        <button class="btn logout-btn" type="button" on:click=on_click>
            <i class="fas fa-sign-out-alt"></i>
            " "
            {label}
        </button>
    }
}

#[component]
pub fn LogoutLink(#[prop(optional, into)] label: Option<String>) -> impl IntoView {
    let guard = expect_context::<GuardHandle>();
    let label = label.unwrap_or_else(|| "Sign out".to_owned());

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        let outcome = route_click(guard, &ClickTarget::anchor("#logout"));
        leptos::logging::log!("logout link: {outcome:?}");
    };

    view! { <a href="#logout" on:click=on_click>{label}</a> }
}
