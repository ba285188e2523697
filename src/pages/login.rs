//! Login page: email + password, with a second step for 2FA accounts.
//!
//! SYSTEM CONTEXT
//! ==============
//! On success the page hands the token to `SessionStore::login`, spawns the
//! profile fetch, and navigates immediately to the `next` target. Guards on
//! the target route tolerate the profile arriving later.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::net::api::ApiClient;
use crate::state::auth::AuthState;
use crate::state::notice::NoticeState;
use crate::state::session::SessionStore;
use crate::util::auth::{NEXT_PARAM, return_target};

pub(crate) const TWO_FACTOR_CODE_LEN: usize = 6;

/// Trim inputs and require both fields.
pub(crate) fn validate_credentials(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and password.");
    }
    if !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// Keep only digits, capped at the code length.
pub(crate) fn normalize_two_factor_code(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(TWO_FACTOR_CODE_LEN)
        .collect()
}

pub(crate) fn validate_two_factor_code(raw: &str) -> Result<String, &'static str> {
    let code = normalize_two_factor_code(raw);
    if code.len() == TWO_FACTOR_CODE_LEN { Ok(code) } else { Err("Enter the 6-digit code.") }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let api = expect_context::<ApiClient>();
    let store = expect_context::<SessionStore>();
    let notices = expect_context::<RwSignal<NoticeState>>();
    let query = use_query_map();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let code = RwSignal::new(String::new());
    let temp_token = RwSignal::new(None::<String>);
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let target = move || return_target(query.get().get(NEXT_PARAM).as_deref());

    // Already signed in: skip the form.
    Effect::new(move || {
        let state = auth.get();
        if !state.loading() && state.user().is_some() {
            navigate(&target(), leptos_router::NavigateOptions::default());
        }
    });

    let (login_api, login_store) = (api.clone(), store.clone());
    let on_login = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (email_value, password_value) = match validate_credentials(&email.get(), &password.get()) {
            Ok(values) => values,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        let (api, store) = (login_api.clone(), login_store.clone());
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            use crate::net::types::LoginOutcome;

            match api.login(&email_value, &password_value).await {
                Ok(LoginOutcome::Authenticated(success)) => {
                    info.set(String::new());
                    start_session(&store, success);
                }
                Ok(LoginOutcome::TwoFactorRequired { temp_token: tmp }) => {
                    temp_token.set(Some(tmp));
                    password.set(String::new());
                    info.set("Enter the code from your authenticator app.".to_owned());
                }
                Err(e) => {
                    info.set(String::new());
                    crate::components::notice_banner::push_error_notice(notices, &e);
                }
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email_value, password_value, api, store, notices);
        }
    };

    let on_verify = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let Some(tmp) = temp_token.get() else {
            return;
        };
        let code_value = match validate_two_factor_code(&code.get()) {
            Ok(value) => value,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Verifying code...".to_owned());

        let (api, store) = (api.clone(), store.clone());
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match api.verify_two_factor(&tmp, &code_value).await {
                Ok(success) => {
                    info.set(String::new());
                    start_session(&store, success);
                }
                Err(e) => {
                    info.set(String::new());
                    crate::components::notice_banner::push_error_notice(notices, &e);
                }
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (tmp, code_value, api, store, notices);
        }
    };

    let on_back = move |_| {
        temp_token.set(None);
        code.set(String::new());
        info.set(String::new());
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"PaySphere"</h1>
                <Show
                    when=move || temp_token.get().is_some()
                    fallback=move || {
                        view! {
                            <p class="login-card__subtitle">"Sign in to your account"</p>
                            <form class="login-form" on:submit=on_login.clone()>
                                <input
                                    class="login-input"
                                    type="email"
                                    placeholder="you@example.com"
                                    prop:value=move || email.get()
                                    on:input=move |ev| email.set(event_target_value(&ev))
                                />
                                <input
                                    class="login-input"
                                    type="password"
                                    placeholder="Password"
                                    prop:value=move || password.get()
                                    on:input=move |ev| password.set(event_target_value(&ev))
                                />
                                <button class="login-button" type="submit" disabled=move || busy.get()>
                                    "Sign In"
                                </button>
                            </form>
                            <a class="login-link" href="/signup">"Create an account"</a>
                        }
                    }
                >
                    <p class="login-card__subtitle">"Two-factor verification"</p>
                    <form class="login-form" on:submit=on_verify.clone()>
                        <input
                            class="login-input login-input--code"
                            type="text"
                            inputmode="numeric"
                            maxlength="6"
                            placeholder="123456"
                            prop:value=move || code.get()
                            on:input=move |ev| code.set(normalize_two_factor_code(&event_target_value(&ev)))
                        />
                        <button class="login-button" type="submit" disabled=move || busy.get()>
                            "Verify"
                        </button>
                    </form>
                    <button class="login-link" type="button" on:click=on_back>
                        "Use a different account"
                    </button>
                </Show>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}

/// Hand a fresh credential to the session store and let the profile fetch
/// run in the background. Callers navigate without waiting for it.
#[cfg(feature = "hydrate")]
pub(crate) fn start_session(store: &SessionStore, success: crate::net::types::AuthSuccess) {
    let pending = store.login(success.token, success.user);
    leptos::task::spawn_local(async move {
        pending.await;
    });
}
