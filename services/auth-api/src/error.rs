//! Error types for the Auth API service.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use taskmate_auth_core::AuthError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// Magic-link failure body: `error` is a plain string for the web client
#[derive(Debug, Serialize)]
pub struct MagicLinkErrorResponse {
    pub error: String,
    pub details: serde_json::Value,
}

const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    BadRequest(String),

    #[error("Magic link login failed")]
    MagicLink(#[source] AuthError),

    #[error("Auth error")]
    Auth(#[source] AuthError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::MalformedRequest(message) => Self::BadRequest(message),
            other => Self::Auth(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), error = %rejection, "Rejected request body");
        Self::BadRequest(INVALID_BODY_MESSAGE.to_string())
    }
}

impl ApiError {
    /// Wrap a failure from the magic-link flow
    pub fn magic_link(err: AuthError) -> Self {
        match err {
            AuthError::MalformedRequest(message) => Self::BadRequest(message),
            other => Self::MagicLink(other),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::MagicLink(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(e) => StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::MagicLink(e) | Self::Auth(e) => e.error_code(),
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Auth(e) if e.status_code() < 500 => e.to_string(),
            Self::Auth(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::MagicLink(AuthError::UpstreamProvider(upstream)) => Some(json!({
                "code": self.error_code(),
                "message": upstream.message,
                "provider_status": upstream.status,
                "provider_body": upstream.body,
            })),
            Self::MagicLink(other) => Some(json!({
                "code": self.error_code(),
                "message": other.to_string(),
            })),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Log internal errors
        if status.is_server_error() {
            tracing::error!(error = ?self, "Internal API error");
        }

        if let Some(details) = self.details() {
            let body = MagicLinkErrorResponse {
                error: self.message(),
                details,
            };
            return (status, Json(body)).into_response();
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
