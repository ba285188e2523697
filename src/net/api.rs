//! REST client wrapper for the account API.
//!
//! DESIGN
//! ======
//! One `reqwest::Client` serves both the browser (fetch-backed on wasm32)
//! and native builds. Each call is one-shot: no retry, no backoff, no
//! caching. Responses are read as text first so that non-2xx bodies can be
//! mined for a `message` and 2xx bodies decoded with a precise error.
//!
//! AUTH
//! ====
//! Every request carries `Authorization: Bearer <token>` whenever the token
//! storage holds one, including endpoints that do not need it. Rejecting is
//! the server's job.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{
    AuthSuccess, LoginOutcome, LoginRequest, LoginResponse, Profile, SignupRequest, VerifyTwoFactorRequest,
};
use crate::config::ClientConfig;
use crate::state::storage::TokenStorage;

#[cfg(not(target_arch = "wasm32"))]
const CONNECT_TIMEOUT_SECS: u64 = 10;

pub const PROFILE_PATH: &str = "/profile";
pub const LOGIN_PATH: &str = "/auth/login";
pub const SIGNUP_PATH: &str = "/auth/signup";
pub const VERIFY_TWO_FACTOR_PATH: &str = "/auth/verify-2fa";

// =============================================================================
// SESSION API SEAM
// =============================================================================

/// The single backend call the session store depends on.
///
/// `ApiClient` is the production implementation; tests substitute mocks.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait SessionApi: Send + Sync {
    /// Fetch the profile for the holder of `token`.
    async fn fetch_profile(&self, token: &str) -> Result<Profile, ApiError>;
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStorage>,
}

impl ApiClient {
    /// Build a client rooted at `config.api_base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStorage>) -> Result<Self, ApiError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS));
        let http = builder
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: absolute_base_url(&config.api_base_url), tokens })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET path` with the stored bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or undecodable body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let token = self.tokens.load();
        self.send::<(), T>(Method::GET, path, token.as_deref(), None).await
    }

    /// `POST path` with a JSON body and the stored bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-2xx status, or undecodable body.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self.tokens.load();
        self.send(Method::POST, path, token.as_deref(), Some(body)).await
    }

    /// Exchange email + password via `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Returns the API's `message` on rejection, or a decode error if the
    /// response matches neither login shape.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, ApiError> {
        let resp: LoginResponse = self.post(LOGIN_PATH, &LoginRequest { email, password }).await?;
        resp.into_outcome()
            .ok_or_else(|| ApiError::Decode("login response carried neither a token nor a 2FA challenge".to_owned()))
    }

    /// Create an account via `POST /auth/signup`.
    ///
    /// # Errors
    ///
    /// Returns the API's `message` on rejection.
    pub async fn signup(&self, email: &str, password: &str, full_name: &str) -> Result<AuthSuccess, ApiError> {
        self.post(SIGNUP_PATH, &SignupRequest { email, password, full_name })
            .await
    }

    /// Complete a 2FA challenge via `POST /auth/verify-2fa`.
    ///
    /// # Errors
    ///
    /// Returns the API's `message` on rejection (e.g. wrong code).
    pub async fn verify_two_factor(&self, temp_token: &str, code: &str) -> Result<AuthSuccess, ApiError> {
        self.post(VERIFY_TWO_FACTOR_PATH, &VerifyTwoFactorRequest { temp_token, code })
            .await
    }

    async fn send<B, T>(&self, method: Method, path: &str, token: Option<&str>, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = join_url(&self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = token {
            request = request.header(reqwest::header::AUTHORIZATION, bearer_value(token));
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            log::warn!("{method} {path} failed before response: {e}");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            let err = ApiError::from_response_body(status.as_u16(), &text);
            log::debug!("{method} {path} -> {} ({})", status.as_u16(), err.error_code());
            return Err(err);
        }

        log::debug!("{method} {path} -> {}", status.as_u16());
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl SessionApi for ApiClient {
    async fn fetch_profile(&self, token: &str) -> Result<Profile, ApiError> {
        self.send::<(), Profile>(Method::GET, PROFILE_PATH, Some(token), None)
            .await
    }
}

// =============================================================================
// URL HELPERS
// =============================================================================

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn bearer_value(token: &str) -> String {
    format!("Bearer {token}")
}

/// The fetch-backed client needs absolute URLs; same-origin bases such as
/// `/api` are resolved against the page origin in the browser.
fn absolute_base_url(base: &str) -> String {
    if base.starts_with("http://") || base.starts_with("https://") {
        return base.trim_end_matches('/').to_owned();
    }
    let origin = page_origin().unwrap_or_default();
    format!("{origin}{}", base.trim_end_matches('/'))
}

fn page_origin() -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        web_sys::window().and_then(|w| w.location().origin().ok())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        None
    }
}
