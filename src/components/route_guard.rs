//! Route guard wrappers for authenticated and admin-only screens.
//!
//! SYSTEM CONTEXT
//! ==============
//! UX-only gates. They keep signed-out users off private screens and
//! non-admins off the console; the API still validates every request.

use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

use crate::state::auth::AuthState;
use crate::util::auth::{GuardDecision, admin_guard, authenticated_guard, install_guard_redirect};

/// Render `children` only for a signed-in user.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    guarded(authenticated_guard, children)
}

/// Render `children` only for an admin profile.
#[component]
pub fn RequireAdmin(children: ChildrenFn) -> impl IntoView {
    guarded(admin_guard, children)
}

fn guarded(decide: fn(&AuthState, &str) -> GuardDecision, children: ChildrenFn) -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let location = use_location();

    let decision = Memo::new(move |_| {
        let path = current_path(&location.pathname.get(), &location.search.get());
        auth.with(|state| decide(state, &path))
    });
    install_guard_redirect(decision, use_navigate());

    move || match decision.get() {
        GuardDecision::Render => children().into_any(),
        GuardDecision::Wait => view! { <GuardSpinner/> }.into_any(),
        GuardDecision::Redirect(_) => ().into_any(),
    }
}

fn current_path(pathname: &str, search: &str) -> String {
    let search = search.trim_start_matches('?');
    if search.is_empty() { pathname.to_owned() } else { format!("{pathname}?{search}") }
}

/// Neutral placeholder shown while the session settles.
#[component]
pub fn GuardSpinner() -> impl IntoView {
    view! {
        <div class="guard-spinner" role="status" aria-live="polite">
            <span class="guard-spinner__dot"></span>
            <span class="guard-spinner__label">"Loading..."</span>
        </div>
    }
}
