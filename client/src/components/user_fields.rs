//! Signed-in user fields.
//!
//! Each field renders as an element carrying its conventional class
//! (`user-name`, `user-email`, `user-role`, `user-id`) so existing page CSS
//! keeps applying.

use hubber_session::UserField;
use leptos::prelude::*;

use crate::util::page::BrowserPage;

/// Text of one user field, empty while signed out.
#[component]
pub fn UserFieldText(field: UserField) -> impl IntoView {
    let page = expect_context::<BrowserPage>();
    let text = move || {
        page.display()
            .with(|d| d.as_ref().and_then(|d| d.text(field)).map(str::to_owned))
            .unwrap_or_default()
    };

    view! { <span class=field.class_name()>{text}</span> }
}

/// Name, role, and email of the signed-in user.
#[component]
pub fn UserBadge() -> impl IntoView {
    let page = expect_context::<BrowserPage>();

    view! {
        <Show when=move || page.display().with(Option::is_some)>
            <div class="user-badge">
                <UserFieldText field=UserField::Name />
                <span class="user-badge__role">
                    <UserFieldText field=UserField::Role />
                </span>
                <UserFieldText field=UserField::Email />
            </div>
        </Show>
    }
}
