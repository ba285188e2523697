//! Stack of transient notices for failed operations.
//!
//! SYSTEM CONTEXT
//! ==============
//! Views report API failures through [`push_error_notice`]; the banner lives
//! once in the app shell so every page shares it.

use leptos::prelude::*;

use crate::net::error::ApiError;
use crate::state::notice::{NoticeLevel, NoticeState};

#[cfg(feature = "hydrate")]
const AUTO_DISMISS_MS: u32 = 6_000;

/// Queue `err` as a notice and schedule its dismissal.
pub fn push_error_notice(notices: RwSignal<NoticeState>, err: &ApiError) {
    let mut id = 0;
    notices.update(|state| id = state.push_error(err));
    schedule_dismiss(notices, id);
}

/// Queue an informational notice and schedule its dismissal.
pub fn push_info_notice(notices: RwSignal<NoticeState>, message: impl Into<String>) {
    let mut id = 0;
    let message = message.into();
    notices.update(|state| id = state.push(NoticeLevel::Info, message));
    schedule_dismiss(notices, id);
}

fn schedule_dismiss(notices: RwSignal<NoticeState>, id: u64) {
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(AUTO_DISMISS_MS).await;
        notices.update(|state| state.dismiss(id));
    });
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (notices, id);
    }
}

#[component]
pub fn NoticeBanner() -> impl IntoView {
    let notices = expect_context::<RwSignal<NoticeState>>();

    view! {
        <div class="notice-stack" aria-live="assertive">
            <For
                each=move || notices.get().notices
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    let class = match notice.level {
                        NoticeLevel::Info => "notice notice--info",
                        NoticeLevel::Error => "notice notice--error",
                    };
                    view! {
                        <div class=class>
                            <span class="notice__message">{notice.message}</span>
                            <button
                                class="notice__close"
                                title="Dismiss"
                                on:click=move |_| notices.update(|state| state.dismiss(id))
                            >
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
