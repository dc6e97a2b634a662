//! Fixed-position stack of session notices (logout confirmation, expiry
//! warning with one-click extension).

use hubber_session::Notice;
use leptos::prelude::*;

use crate::GuardHandle;
use crate::util::page::BrowserPage;

#[component]
pub fn NoticeStack() -> impl IntoView {
    let page = expect_context::<BrowserPage>();
    let guard = expect_context::<GuardHandle>();

    view! {
        <div class="notice-stack">
            {move || {
                page.notices()
                    .get()
                    .items()
                    .iter()
                    .cloned()
                    .map(|item| view! { <NoticeCard id=item.id notice=item.notice page=page guard=guard /> })
                    .collect_view()
            }}
        </div>
    }
}

#[component]
fn NoticeCard(id: u64, notice: Notice, page: BrowserPage, guard: GuardHandle) -> impl IntoView {
    let class = format!("alert {} notice-stack__item", notice.level().css_class());
    let action = notice.action_label();

    let on_extend = move |_| {
        let extended = guard.with_value(|g| g.extend_session());
        match extended {
            Ok(true) => {}
            Ok(false) => leptos::logging::warn!("no session to extend"),
            Err(e) => leptos::logging::warn!("session extension failed: {e}"),
        }
        page.dismiss(id);
    };
    let on_dismiss = move |_| page.dismiss(id);

    view! {
        <div class=class role="status">
            <span class="notice-stack__message">{notice.message()}</span>
            {action
                .map(|label| {
                    view! {
                        <button class="btn btn-sm btn-outline-dark ms-2" on:click=on_extend>
                            {label}
                        </button>
                    }
                })}
            <button class="btn-close" aria-label="Dismiss" on:click=on_dismiss></button>
        </div>
    }
}
