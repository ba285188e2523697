//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login
//! redirects and identity-dependent rendering.
//!
//! DESIGN
//! ======
//! The session is a tagged phase rather than a bag of nullable fields, so
//! combinations such as "profile without token" cannot be represented.
//! `loading`, `user`, `profile` and `is_admin` are all derived on read.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::{Profile, Role, User};

/// Lifecycle phase of the browser session.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum SessionPhase {
    /// App start, before the persisted token has been read.
    #[default]
    Initializing,
    /// A persisted token was found and its profile fetch is in flight.
    Bootstrapping { token: String },
    /// No credential.
    Unauthenticated,
    /// Fresh login: identity is known, the profile fetch has not settled yet.
    PartiallyAuthenticated { token: String, user: User },
    /// Token, identity and server profile are all present.
    Authenticated { token: String, user: User, profile: Profile },
}

/// Snapshot of the session as read by guards and views.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub phase: SessionPhase,
}

impl AuthState {
    #[must_use]
    pub fn new(phase: SessionPhase) -> Self {
        Self { phase }
    }

    /// True until the startup profile fetch settles. Guards must not
    /// redirect while this holds.
    #[must_use]
    pub fn loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Initializing | SessionPhase::Bootstrapping { .. })
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        match &self.phase {
            SessionPhase::Bootstrapping { token }
            | SessionPhase::PartiallyAuthenticated { token, .. }
            | SessionPhase::Authenticated { token, .. } => Some(token),
            SessionPhase::Initializing | SessionPhase::Unauthenticated => None,
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        match &self.phase {
            SessionPhase::PartiallyAuthenticated { user, .. } | SessionPhase::Authenticated { user, .. } => Some(user),
            _ => None,
        }
    }

    #[must_use]
    pub fn profile(&self) -> Option<&Profile> {
        match &self.phase {
            SessionPhase::Authenticated { profile, .. } => Some(profile),
            _ => None,
        }
    }

    /// Whether the current profile carries the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.profile().is_some_and(|p| p.role == Role::Admin)
    }

    /// Identity is known but the profile has not arrived yet.
    #[must_use]
    pub fn awaiting_profile(&self) -> bool {
        matches!(self.phase, SessionPhase::PartiallyAuthenticated { .. })
    }
}
