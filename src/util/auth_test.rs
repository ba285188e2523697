use std::cell::RefCell;
use std::collections::BTreeMap;

use super::*;
use crate::net::types::{Profile, Role, User};
use crate::state::auth::SessionPhase;

fn user(id: &str) -> User {
    User { id: id.to_owned(), email: "a@b.com".to_owned(), full_name: "A".to_owned() }
}

fn profile(id: &str, role: Role) -> Profile {
    Profile {
        id: id.to_owned(),
        email: "a@b.com".to_owned(),
        full_name: "A".to_owned(),
        role,
        plan_tier: None,
        balances: BTreeMap::new(),
        email_verified: false,
        kyc_verified: false,
        two_factor_enabled: false,
    }
}

fn state(phase: SessionPhase) -> AuthState {
    AuthState::new(phase)
}

fn signed_in(role: Role) -> AuthState {
    state(SessionPhase::Authenticated { token: "tok".into(), user: user("u1"), profile: profile("u1", role) })
}

fn partial() -> AuthState {
    state(SessionPhase::PartiallyAuthenticated { token: "tok".into(), user: user("u1") })
}

fn loading_states() -> Vec<AuthState> {
    vec![state(SessionPhase::Initializing), state(SessionPhase::Bootstrapping { token: "tok".into() })]
}

// =============================================================
// Authenticated guard
// =============================================================

#[test]
fn authenticated_guard_waits_while_loading() {
    for s in loading_states() {
        assert_eq!(authenticated_guard(&s, "/wallets"), GuardDecision::Wait);
    }
}

#[test]
fn authenticated_guard_never_navigates_while_loading() {
    let log = RefCell::new(Vec::<(String, bool)>::new());
    let navigate = |path: &str, opts: NavigateOptions| log.borrow_mut().push((path.to_owned(), opts.replace));
    for s in loading_states() {
        for path in ["/", "/dashboard", "/admin", "/cards/42"] {
            assert!(!apply_decision(&authenticated_guard(&s, path), &navigate));
        }
    }
    assert!(log.borrow().is_empty());
}

#[test]
fn authenticated_guard_redirects_signed_out_user_with_return_path() {
    let s = state(SessionPhase::Unauthenticated);
    assert_eq!(
        authenticated_guard(&s, "/cards/42"),
        GuardDecision::Redirect("/login?next=%2Fcards%2F42".to_owned())
    );
}

#[test]
fn authenticated_guard_renders_for_fresh_login_before_profile() {
    assert_eq!(authenticated_guard(&partial(), "/dashboard"), GuardDecision::Render);
}

#[test]
fn authenticated_guard_renders_for_full_session() {
    assert_eq!(authenticated_guard(&signed_in(Role::User), "/dashboard"), GuardDecision::Render);
}

#[test]
fn redirect_uses_replace_navigation() {
    let log = RefCell::new(Vec::<(String, bool)>::new());
    let navigate = |path: &str, opts: NavigateOptions| log.borrow_mut().push((path.to_owned(), opts.replace));
    let decision = authenticated_guard(&state(SessionPhase::Unauthenticated), "/p2p");
    assert!(apply_decision(&decision, &navigate));
    assert_eq!(log.borrow().as_slice(), &[("/login?next=%2Fp2p".to_owned(), true)]);
}

// =============================================================
// Admin guard
// =============================================================

#[test]
fn admin_guard_waits_while_loading() {
    for s in loading_states() {
        assert_eq!(admin_guard(&s, "/admin"), GuardDecision::Wait);
    }
}

#[test]
fn admin_guard_waits_for_profile_after_login() {
    assert_eq!(admin_guard(&partial(), "/admin"), GuardDecision::Wait);
}

#[test]
fn admin_guard_sends_signed_out_user_to_login() {
    assert_eq!(
        admin_guard(&state(SessionPhase::Unauthenticated), "/admin"),
        GuardDecision::Redirect("/login?next=%2Fadmin".to_owned())
    );
}

#[test]
fn admin_guard_sends_non_admin_to_landing() {
    assert_eq!(admin_guard(&signed_in(Role::User), "/admin"), GuardDecision::Redirect(LANDING_ROUTE.to_owned()));
    assert_eq!(admin_guard(&signed_in(Role::Other), "/admin"), GuardDecision::Redirect(LANDING_ROUTE.to_owned()));
}

#[test]
fn admin_guard_renders_for_admin() {
    assert_eq!(admin_guard(&signed_in(Role::Admin), "/admin/users"), GuardDecision::Render);
}

#[test]
fn no_flash_redirect_across_bootstrap() {
    // Initializing -> Bootstrapping -> Authenticated must yield zero navigations.
    let log = RefCell::new(Vec::<(String, bool)>::new());
    let navigate = |path: &str, opts: NavigateOptions| log.borrow_mut().push((path.to_owned(), opts.replace));
    let sequence = [
        state(SessionPhase::Initializing),
        state(SessionPhase::Bootstrapping { token: "tok".into() }),
        signed_in(Role::Admin),
    ];
    for s in &sequence {
        apply_decision(&authenticated_guard(s, "/admin"), &navigate);
        apply_decision(&admin_guard(s, "/admin"), &navigate);
    }
    assert!(log.borrow().is_empty());
}

// =============================================================
// Redirect helpers
// =============================================================

#[test]
fn login_redirect_skips_trivial_paths() {
    assert_eq!(login_redirect(""), "/login");
    assert_eq!(login_redirect("/"), "/login");
    assert_eq!(login_redirect("/login"), "/login");
}

#[test]
fn login_redirect_encodes_query() {
    assert_eq!(login_redirect("/trade?pair=BTC-USD"), "/login?next=%2Ftrade%3Fpair%3DBTC-USD");
}

#[test]
fn return_target_accepts_local_paths() {
    assert_eq!(return_target(Some("%2Fcards%2F42")), "/cards/42");
    assert_eq!(return_target(Some("/wallets")), "/wallets");
}

#[test]
fn return_target_rejects_foreign_targets() {
    assert_eq!(return_target(None), LANDING_ROUTE);
    assert_eq!(return_target(Some("https://evil.test")), LANDING_ROUTE);
    assert_eq!(return_target(Some("%2F%2Fevil.test")), LANDING_ROUTE);
    assert_eq!(return_target(Some("/\\evil.test")), LANDING_ROUTE);
    assert_eq!(return_target(Some("/login?next=%2Fx")), LANDING_ROUTE);
}

#[test]
fn return_target_rejects_paths_browsers_collapse_to_another_host() {
    for raw in [
        "/\t/evil.test",
        "/\n/evil.test",
        "/\r/evil.test",
        "/%09/evil.test",
        "/%0A/evil.test",
        "/%0D/evil.test",
        "%2F%09%2Fevil.test",
        "/%20/evil.test",
    ] {
        assert_eq!(return_target(Some(raw)), LANDING_ROUTE, "accepted {raw:?}");
    }
}
