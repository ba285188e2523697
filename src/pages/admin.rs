//! Admin console landing page. Rendered inside `RequireAdmin`.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use leptos::prelude::*;

use crate::net::types::Profile;
use crate::state::auth::AuthState;

/// Operator identity for the header; a placeholder until the profile lands.
pub(crate) fn operator_label(profile: Option<&Profile>) -> String {
    profile.map_or_else(|| "Loading...".to_owned(), |p| format!("{} <{}>", p.full_name, p.email))
}

#[component]
pub fn AdminPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();

    let operator = move || auth.with(|s| operator_label(s.profile()));

    view! {
        <div class="admin-page">
            <header class="admin-header">
                <h1>"Admin console"</h1>
                <span class="admin-operator">{operator}</span>
                <a class="dashboard-link" href="/dashboard">"Back to dashboard"</a>
            </header>
        </div>
    }
}
