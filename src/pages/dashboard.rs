//! Dashboard page: the default authenticated landing route.
//!
//! SYSTEM CONTEXT
//! ==============
//! Rendered inside `RequireAuth`, so a user is always present. The profile
//! may still be in flight right after login; every profile-derived field
//! shows a placeholder until it lands.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::collections::BTreeMap;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::net::types::{Profile, User};
use crate::state::auth::AuthState;
use crate::state::notice::NoticeState;
use crate::state::session::SessionStore;
use crate::util::auth::LOGIN_ROUTE;

pub(crate) fn display_name(user: Option<&User>) -> String {
    match user {
        Some(u) if !u.full_name.trim().is_empty() => u.full_name.trim().to_owned(),
        Some(u) if !u.email.is_empty() => u.email.clone(),
        _ => "there".to_owned(),
    }
}

pub(crate) fn plan_label(profile: Option<&Profile>) -> String {
    match profile {
        None => "Loading plan...".to_owned(),
        Some(p) => match p.plan_tier.as_deref().map(str::trim) {
            Some(tier) if !tier.is_empty() => {
                let mut chars = tier.chars();
                let first = chars.next().map(|c| c.to_uppercase().collect::<String>()).unwrap_or_default();
                format!("{first}{} plan", chars.as_str())
            }
            _ => "No plan".to_owned(),
        },
    }
}

/// `SYMBOL amount` lines, sorted by symbol.
pub(crate) fn balance_lines(balances: &BTreeMap<String, f64>) -> Vec<String> {
    balances
        .iter()
        .map(|(symbol, amount)| {
            let digits = if is_fiat(symbol) { 2 } else { 8 };
            format!("{symbol} {amount:.prec$}", prec = digits)
        })
        .collect()
}

fn is_fiat(symbol: &str) -> bool {
    matches!(symbol, "USD" | "EUR" | "GBP" | "NGN" | "JPY" | "CAD" | "AUD")
}

/// Verification badges in display order.
pub(crate) fn verification_badges(profile: &Profile) -> Vec<(&'static str, bool)> {
    vec![
        ("Email", profile.email_verified),
        ("KYC", profile.kyc_verified),
        ("2FA", profile.two_factor_enabled),
    ]
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let store = expect_context::<SessionStore>();
    let notices = expect_context::<RwSignal<NoticeState>>();
    let navigate = use_navigate();
    let refreshing = RwSignal::new(false);

    let name = move || auth.with(|s| display_name(s.user()));
    let plan = move || auth.with(|s| plan_label(s.profile()));
    let balances = move || auth.with(|s| s.profile().map(|p| balance_lines(&p.balances)).unwrap_or_default());
    let badges = move || auth.with(|s| s.profile().map(verification_badges).unwrap_or_default());
    let is_admin = move || auth.with(AuthState::is_admin);

    let refresh_store = store.clone();
    let on_refresh = move |_| {
        if refreshing.get() {
            return;
        }
        refreshing.set(true);
        let pending = refresh_store.refresh_profile();
        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            use crate::components::notice_banner::push_info_notice;
            use crate::state::session::ProfileSync;

            match pending.await {
                ProfileSync::Authenticated => push_info_notice(notices, "Profile updated."),
                ProfileSync::SignedOut => push_info_notice(notices, "Your session has expired. Please sign in again."),
                ProfileSync::Superseded | ProfileSync::NoSession => {}
            }
            refreshing.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        {
            drop(pending);
            let _ = notices;
            refreshing.set(false);
        }
    };

    let on_sign_out = move |_| {
        store.sign_out();
        navigate(LOGIN_ROUTE, NavigateOptions { replace: true, ..NavigateOptions::default() });
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-header">
                <h1>{move || format!("Welcome, {}", name())}</h1>
                <span class="dashboard-plan">{plan}</span>
                <Show when=is_admin>
                    <a class="dashboard-link" href="/admin">"Admin console"</a>
                </Show>
                <button class="dashboard-button" on:click=on_refresh disabled=move || refreshing.get()>
                    "Refresh"
                </button>
                <button class="dashboard-button dashboard-button--quiet" on:click=on_sign_out>
                    "Sign out"
                </button>
            </header>
            <section class="dashboard-section">
                <h2>"Balances"</h2>
                <ul class="dashboard-balances">
                    {move || balances().into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
                </ul>
            </section>
            <section class="dashboard-section">
                <h2>"Verification"</h2>
                <ul class="dashboard-badges">
                    {move || {
                        badges()
                            .into_iter()
                            .map(|(label, ok)| {
                                let class = if ok { "badge badge--ok" } else { "badge badge--pending" };
                                view! { <li class=class>{label}</li> }
                            })
                            .collect_view()
                    }}
                </ul>
            </section>
        </div>
    }
}
