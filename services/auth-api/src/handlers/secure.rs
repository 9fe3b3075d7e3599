//! Sample protected endpoint

use axum::extract::State;
use taskmate_axum::RequireAuth;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/secure
pub async fn secure(State(state): State<AppState>, auth: RequireAuth) -> ApiResult<String> {
    let subject = state.auth.resolve_principal(&auth.principal())?;
    Ok(format!(
        "Hello, {subject}! You have accessed a secure endpoint."
    ))
}
