//! Auth errors

use thiserror::Error;

use crate::key::KeyError;

/// Failure reported by the upstream identity provider.
///
/// Carries the HTTP status and raw body when the provider answered, so
/// operators can diagnose the failure from the API response.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct UpstreamError {
    /// HTTP status, absent for transport failures
    pub status: Option<u16>,
    /// Raw response body, when one was read
    pub body: Option<String>,
    /// Human-readable summary
    pub message: String,
}

impl UpstreamError {
    /// Transport-level failure (connect, timeout, body read)
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: None,
            message: message.into(),
        }
    }

    /// Provider answered with a failure
    pub fn response(status: u16, body: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            body: Some(body.into()),
            message: message.into(),
        }
    }
}

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// Wrong email or password; deliberately does not say which
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Missing or blank required request fields
    #[error("malformed request: {0}")]
    MalformedRequest(String),

    /// Token failed signature, expiry, or subject checks
    #[error("invalid token")]
    TokenInvalid,

    /// Principal could not be turned into a subject
    #[error("could not resolve subject")]
    SubjectResolutionFailure,

    /// Identity provider failed or reported an error
    #[error("upstream provider error: {0}")]
    UpstreamProvider(#[from] UpstreamError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidCredentials | Self::TokenInvalid => 401,
            Self::MalformedRequest(_) | Self::SubjectResolutionFailure => 400,
            Self::UpstreamProvider(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::MalformedRequest(_) => "BAD_REQUEST",
            Self::TokenInvalid => "INVALID_TOKEN",
            Self::SubjectResolutionFailure => "SUBJECT_RESOLUTION_FAILED",
            Self::UpstreamProvider(_) => "UPSTREAM_PROVIDER_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<KeyError> for AuthError {
    fn from(err: KeyError) -> Self {
        Self::Configuration(err.to_string())
    }
}
