//! Client configuration parsed from a key lookup.
//!
//! DESIGN
//! ======
//! Parsing is written against a lookup closure so the same rules serve
//! runtime environment variables (SSR, native tests) and values baked in at
//! compile time for the WASM bundle, where no process environment exists.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "/api";
pub const DEFAULT_TOKEN_STORAGE_KEY: &str = "paysphere_token";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const API_BASE_URL_VAR: &str = "PAYSPHERE_API_BASE_URL";
pub const TOKEN_STORAGE_KEY_VAR: &str = "PAYSPHERE_TOKEN_KEY";
pub const REQUEST_TIMEOUT_SECS_VAR: &str = "PAYSPHERE_REQUEST_TIMEOUT_SECS";

/// Errors produced while reading client configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was present but could not be parsed.
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    /// A variable was present but empty.
    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// REST API root without a trailing slash (e.g. `/api` or `https://api.example.com/v1`).
    pub api_base_url: String,
    /// `localStorage` key holding the bearer token.
    pub token_storage_key: String,
    /// Whole-request timeout. Ignored on wasm32, where the browser owns timeouts.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            token_storage_key: DEFAULT_TOKEN_STORAGE_KEY.to_owned(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Build config from process environment variables.
    ///
    /// Optional:
    /// - `PAYSPHERE_API_BASE_URL`: default `/api`
    /// - `PAYSPHERE_TOKEN_KEY`: default `paysphere_token`
    /// - `PAYSPHERE_REQUEST_TIMEOUT_SECS`: default 30
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but empty or unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from values captured at compile time with `option_env!`.
    ///
    /// # Errors
    ///
    /// Returns an error if a baked-in value is empty or unparseable.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            let value = match key {
                API_BASE_URL_VAR => option_env!("PAYSPHERE_API_BASE_URL"),
                TOKEN_STORAGE_KEY_VAR => option_env!("PAYSPHERE_TOKEN_KEY"),
                REQUEST_TIMEOUT_SECS_VAR => option_env!("PAYSPHERE_REQUEST_TIMEOUT_SECS"),
                _ => None,
            };
            value.map(str::to_owned)
        })
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a looked-up value is empty or unparseable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = match lookup(API_BASE_URL_VAR) {
            Some(raw) => normalize_base_url(&raw).ok_or(ConfigError::Empty { var: API_BASE_URL_VAR })?,
            None => DEFAULT_API_BASE_URL.to_owned(),
        };

        let token_storage_key = match lookup(TOKEN_STORAGE_KEY_VAR) {
            Some(raw) if raw.trim().is_empty() => return Err(ConfigError::Empty { var: TOKEN_STORAGE_KEY_VAR }),
            Some(raw) => raw.trim().to_owned(),
            None => DEFAULT_TOKEN_STORAGE_KEY.to_owned(),
        };

        let request_timeout_secs = match lookup(REQUEST_TIMEOUT_SECS_VAR) {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self { api_base_url, token_storage_key, request_timeout_secs })
    }
}

fn normalize_base_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        // A bare "/" means "same origin, no prefix".
        return raw.trim().starts_with('/').then(String::new);
    }
    Some(trimmed.to_owned())
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidValue { var: REQUEST_TIMEOUT_SECS_VAR, value: raw.to_owned() }),
    }
}
