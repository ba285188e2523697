//! Account creation page.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

#[cfg(feature = "hydrate")]
use super::login::start_session;
use crate::net::api::ApiClient;
use crate::state::auth::AuthState;
use crate::state::notice::NoticeState;
use crate::state::session::SessionStore;
use crate::util::auth::LANDING_ROUTE;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct SignupInput {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

pub(crate) fn validate_signup(email: &str, full_name: &str, password: &str, confirm: &str) -> Result<SignupInput, &'static str> {
    let email = email.trim();
    let full_name = full_name.trim();
    if email.is_empty() || full_name.is_empty() || password.is_empty() {
        return Err("Fill in every field.");
    }
    if !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters.");
    }
    if password != confirm {
        return Err("Passwords do not match.");
    }
    Ok(SignupInput { email: email.to_owned(), full_name: full_name.to_owned(), password: password.to_owned() })
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let api = expect_context::<ApiClient>();
    let store = expect_context::<SessionStore>();
    let notices = expect_context::<RwSignal<NoticeState>>();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let full_name = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    Effect::new(move || {
        let state = auth.get();
        if !state.loading() && state.user().is_some() {
            navigate(LANDING_ROUTE, NavigateOptions::default());
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let input = match validate_signup(&email.get(), &full_name.get(), &password.get(), &confirm.get()) {
            Ok(input) => input,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Creating account...".to_owned());

        let (api, store) = (api.clone(), store.clone());
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match api.signup(&input.email, &input.password, &input.full_name).await {
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
            let _ = (input, api, store, notices);
        }
    };

    let field = move |signal: RwSignal<String>, kind: &'static str, placeholder: &'static str| {
        view! {
            <input
                class="login-input"
                type=kind
                placeholder=placeholder
                prop:value=move || signal.get()
                on:input=move |ev| signal.set(event_target_value(&ev))
            />
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"PaySphere"</h1>
                <p class="login-card__subtitle">"Create your account"</p>
                <form class="login-form" on:submit=on_submit>
                    {field(full_name, "text", "Full name")}
                    {field(email, "email", "you@example.com")}
                    {field(password, "password", "Password")}
                    {field(confirm, "password", "Confirm password")}
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign Up"
                    </button>
                </form>
                <a class="login-link" href="/login">"Already have an account? Sign in"</a>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
