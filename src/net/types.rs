//! Shared REST DTOs for the client/API boundary.
//!
//! DESIGN
//! ======
//! Field names follow the API's camelCase JSON. Profile payloads carry the
//! record id as `_id`; `id` is accepted as an alias so both shapes decode.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Minimal identity set alongside the bearer token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
}

/// Account role as reported by the profile endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
    /// Any role this client does not know about. Never privileged.
    #[serde(other)]
    Other,
}

/// Extended server-side account record fetched after the token is known.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub plan_tier: Option<String>,
    /// Balance per asset symbol (e.g. `"USD"`, `"BTC"`).
    #[serde(default)]
    pub balances: BTreeMap<String, f64>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub kyc_verified: bool,
    #[serde(default)]
    pub two_factor_enabled: bool,
}

impl Profile {
    /// Identity view of this profile.
    #[must_use]
    pub fn to_user(&self) -> User {
        User { id: self.id.clone(), email: self.email.clone(), full_name: self.full_name.clone() }
    }
}

/// Successful credential exchange: a bearer token plus the identity it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AuthSuccess {
    pub token: String,
    pub user: User,
}

/// Result of `POST /auth/login`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials accepted; the session can start.
    Authenticated(AuthSuccess),
    /// A second factor is needed. `temp_token` is exchanged via `verify-2fa`.
    TwoFactorRequired { temp_token: String },
}

/// Wire shape of the login response, which is one of two object layouts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LoginResponse {
    TwoFactor {
        #[serde(rename = "requires2FA")]
        requires_2fa: bool,
        #[serde(rename = "tempToken")]
        temp_token: String,
    },
    Session(AuthSuccess),
}

impl LoginResponse {
    pub(crate) fn into_outcome(self) -> Option<LoginOutcome> {
        match self {
            Self::TwoFactor { requires_2fa: true, temp_token } => Some(LoginOutcome::TwoFactorRequired { temp_token }),
            Self::TwoFactor { requires_2fa: false, .. } => None,
            Self::Session(success) => Some(LoginOutcome::Authenticated(success)),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignupRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub full_name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VerifyTwoFactorRequest<'a> {
    pub temp_token: &'a str,
    pub code: &'a str,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}
