//! Route-guard decisions and redirect helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `RequireAuth` and `RequireAdmin` delegate to the pure functions here so
//! the ordering rules can be tested without a browser.
//!
//! INVARIANTS
//! ==========
//! - While the session is loading, every guard answers `Wait`. A user who
//!   is about to be authenticated must never be bounced to login.
//! - The admin guard also waits while a fresh login's profile is in flight;
//!   role cannot be judged before the profile exists.
//! - A signed-in non-admin is sent to the landing route, not to login.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::auth::AuthState;

/// Public entry route.
pub const LOGIN_ROUTE: &str = "/login";
/// Default authenticated landing route.
pub const LANDING_ROUTE: &str = "/dashboard";
/// Query parameter carrying the post-login return path.
pub const NEXT_PARAM: &str = "next";

/// What a guard should do for the current session state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not settled; show a neutral waiting indicator.
    Wait,
    /// Access granted; render the guarded children.
    Render,
    /// Access denied; navigate to the contained path.
    Redirect(String),
}

/// Decision for routes that need any signed-in user.
pub fn authenticated_guard(state: &AuthState, current_path: &str) -> GuardDecision {
    if state.loading() {
        return GuardDecision::Wait;
    }
    if state.user().is_none() {
        return GuardDecision::Redirect(login_redirect(current_path));
    }
    GuardDecision::Render
}

/// Decision for routes that need an admin profile.
pub fn admin_guard(state: &AuthState, current_path: &str) -> GuardDecision {
    if state.loading() || state.awaiting_profile() {
        return GuardDecision::Wait;
    }
    if state.user().is_none() {
        return GuardDecision::Redirect(login_redirect(current_path));
    }
    if !state.is_admin() {
        return GuardDecision::Redirect(LANDING_ROUTE.to_owned());
    }
    GuardDecision::Render
}

/// Login URL that returns to `current_path` after sign-in.
pub fn login_redirect(current_path: &str) -> String {
    if current_path.is_empty() || current_path == "/" || current_path.starts_with(LOGIN_ROUTE) {
        return LOGIN_ROUTE.to_owned();
    }
    format!("{LOGIN_ROUTE}?{NEXT_PARAM}={}", urlencoding::encode(current_path))
}

/// Where to go after a successful login, given the raw `next` query value.
///
/// Only same-origin paths are honoured; anything else falls back to the
/// landing route.
pub fn return_target(next: Option<&str>) -> String {
    next.and_then(|raw| urlencoding::decode(raw).ok())
        .map(std::borrow::Cow::into_owned)
        .filter(|path| is_local_path(path) && !path.starts_with(LOGIN_ROUTE))
        .unwrap_or_else(|| LANDING_ROUTE.to_owned())
}

/// Browsers drop tab, CR and LF while parsing URLs, so `/\t/host` would
/// resolve to `//host`. Any control or whitespace character disqualifies.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.contains("://")
        && !path.chars().any(|c| c.is_control() || c.is_whitespace())
}

/// Navigate if `decision` is a redirect. Returns whether navigation happened.
pub fn apply_decision<F>(decision: &GuardDecision, navigate: &F) -> bool
where
    F: Fn(&str, NavigateOptions),
{
    match decision {
        GuardDecision::Redirect(path) => {
            navigate(path, NavigateOptions { replace: true, ..NavigateOptions::default() });
            true
        }
        GuardDecision::Wait | GuardDecision::Render => false,
    }
}

/// Follow `decision` whenever it changes to a redirect.
pub fn install_guard_redirect<F>(decision: Memo<GuardDecision>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        apply_decision(&decision.get(), &navigate);
    });
}
