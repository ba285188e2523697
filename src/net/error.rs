//! Error taxonomy for REST calls.
//!
//! ERROR HANDLING
//! ==============
//! Every call through `ApiClient` is fallible. Callers branch on
//! [`ApiError::kind`] only when they must (the session store treats every
//! kind as "session invalid"); views surface [`ApiError::user_message`].

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use super::types::ErrorBody;

/// Errors produced by `ApiClient` operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),

    /// The request never produced a response (DNS, connection, CORS, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// The API answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// A 2xx response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),
}

/// Coarse failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Client,
    Server,
    Decode,
}

impl ApiError {
    /// Build a status error from a non-2xx response body.
    ///
    /// Uses the JSON `message` field when present, otherwise a generic
    /// message naming the status.
    #[must_use]
    pub fn from_response_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| generic_failure_message(status));
        Self::Status { status, message }
    }

    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ClientBuild(_) | Self::Network(_) => FailureKind::Network,
            Self::Status { status, .. } if *status >= 500 => FailureKind::Server,
            Self::Status { .. } => FailureKind::Client,
            Self::Decode(_) => FailureKind::Decode,
        }
    }

    /// HTTP status, when the server responded.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the bearer credential.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Stable machine-readable code for logs.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Network(_) => "E_NETWORK",
            Self::Status { status: 401, .. } => "E_UNAUTHORIZED",
            Self::Status { status: 403, .. } => "E_FORBIDDEN",
            Self::Status { .. } => "E_API_STATUS",
            Self::Decode(_) => "E_API_DECODE",
        }
    }

    /// Text suitable for a user-facing notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            Self::ClientBuild(_) | Self::Network(_) => "Could not reach the server. Check your connection.".to_owned(),
            Self::Decode(_) => "The server sent an unexpected response.".to_owned(),
        }
    }
}

pub(crate) fn generic_failure_message(status: u16) -> String {
    format!("request failed: {status}")
}
