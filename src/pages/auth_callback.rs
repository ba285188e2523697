//! OAuth provider return route: `/auth/callback?token=...`.
//!
//! SYSTEM CONTEXT
//! ==============
//! The provider redirects here with a bearer token (or an `error`). The
//! token carries no identity, so the profile is fetched once to build the
//! `User` handed to `SessionStore::login`.

#[cfg(test)]
#[path = "auth_callback_test.rs"]
mod auth_callback_test;

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::util::auth::LOGIN_ROUTE;

/// Extract the token from callback query values.
pub(crate) fn parse_callback(token: Option<&str>, error: Option<&str>) -> Result<String, String> {
    if let Some(error) = error.map(str::trim).filter(|e| !e.is_empty()) {
        return Err(format!("Sign-in was cancelled or failed: {error}"));
    }
    token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| "Sign-in link is missing its token.".to_owned())
}

#[component]
pub fn AuthCallbackPage() -> impl IntoView {
    let query = use_query_map();
    let message = RwSignal::new("Completing sign-in...".to_owned());
    let failed = RwSignal::new(false);

    let parsed = query.with_untracked(|q| parse_callback(q.get("token").as_deref(), q.get("error").as_deref()));

    match parsed {
        Ok(token) => {
            #[cfg(feature = "hydrate")]
            {
                use leptos_router::NavigateOptions;
                use leptos_router::hooks::use_navigate;

                use super::login::start_session;
                use crate::net::api::{ApiClient, SessionApi};
                use crate::net::types::AuthSuccess;
                use crate::state::notice::NoticeState;
                use crate::state::session::SessionStore;
                use crate::util::auth::LANDING_ROUTE;

                let api = expect_context::<ApiClient>();
                let store = expect_context::<SessionStore>();
                let notices = expect_context::<RwSignal<NoticeState>>();
                let navigate = use_navigate();
                leptos::task::spawn_local(async move {
                    match api.fetch_profile(&token).await {
                        Ok(profile) => {
                            start_session(&store, AuthSuccess { token, user: profile.to_user() });
                            navigate(LANDING_ROUTE, NavigateOptions { replace: true, ..NavigateOptions::default() });
                        }
                        Err(e) => {
                            crate::components::notice_banner::push_error_notice(notices, &e);
                            message.set("Sign-in failed.".to_owned());
                            failed.set(true);
                        }
                    }
                });
            }
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = token;
            }
        }
        Err(msg) => {
            log::warn!("oauth callback rejected: {msg}");
            message.set(msg);
            failed.set(true);
        }
    }

    view! {
        <div class="login-page">
            <div class="login-card">
                <p class="login-message">{move || message.get()}</p>
                <Show when=move || failed.get()>
                    <a class="login-button" href=LOGIN_ROUTE>"Back to sign in"</a>
                </Show>
            </div>
        </div>
    }
}
