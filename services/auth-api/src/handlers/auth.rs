//! Authentication handlers (login, logout, magic link, me)

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskmate_axum::RequireAuth;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MagicLinkRequest {
    pub email: Option<String>,
    pub redirect_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub subject: String,
    pub role: &'static str,
    pub source: &'static str,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
///
/// Exchange email and password for a session token, also set as a cookie
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;

    let email = req.email.filter(|email| !email.trim().is_empty());
    let password = req.password.filter(|password| !password.is_empty());
    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::BadRequest(
            "email and password are required".to_string(),
        ));
    };

    let token = state.auth.login(&email, &password).await?;
    let cookie = state.session_cookie(token.as_str());

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie.to_string())],
        Json(LoginResponse {
            access_token: token.into_string(),
        }),
    ))
}

/// POST /auth/logout
///
/// Clear the session cookie. Tokens are stateless, so nothing is revoked.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, state.cleared_cookie().to_string())],
        Json(MessageResponse {
            message: "Logged out",
        }),
    )
}

/// POST /auth/magic
///
/// Ask the identity provider to email a sign-in link
pub async fn magic_link(
    State(state): State<AppState>,
    payload: Result<Json<MagicLinkRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Json(req) = payload?;

    let Some(email) = req.email.filter(|email| !email.trim().is_empty()) else {
        return Err(ApiError::BadRequest("Email is required".to_string()));
    };

    state
        .auth
        .send_magic_link(&email, req.redirect_to.as_deref())
        .await
        .map_err(ApiError::magic_link)?;

    Ok(Json(MessageResponse {
        message: "Magic link sent",
    }))
}

/// GET /auth/me
///
/// Identity established for the current request
pub async fn me(auth: RequireAuth) -> Json<MeResponse> {
    Json(MeResponse {
        subject: auth.subject.clone(),
        role: auth.role.as_str(),
        source: auth.source.as_str(),
    })
}
