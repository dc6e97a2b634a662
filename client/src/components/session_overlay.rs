//! Root overlay mounted by [`crate::start`].
//!
//! Provides the page host and guard handle as context, then renders the
//! user badge, logout controls, and notice stack.

use leptos::prelude::*;

use crate::GuardHandle;
use crate::components::logout::{LogoutButton, LogoutLink};
use crate::components::notice_stack::NoticeStack;
use crate::components::user_fields::UserBadge;
use crate::util::page::BrowserPage;

#[component]
pub fn SessionOverlay(page: BrowserPage, guard: GuardHandle) -> impl IntoView {
    provide_context(page);
    provide_context(guard);

    view! {
        <div class="session-overlay">
            <Show when=move || page.display().with(Option::is_some)>
                <div class="session-overlay__user">
                    <UserBadge />
                    <LogoutButton />
                    <LogoutLink />
                </div>
            </Show>
            <NoticeStack />
        </div>
    }
}
